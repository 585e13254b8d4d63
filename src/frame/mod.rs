//! Link-layer framing: the Frame Scanner locates candidate frames in a raw
//! byte stream, and the HDLC Parser validates and unpacks each one.

pub mod hdlc;
pub mod scanner;

pub use hdlc::{parse, DecodedFrame, ParseOptions};
pub use scanner::{decode_frame_format, scan, RawFrame};
