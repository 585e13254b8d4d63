//! # HAN Decoder Error Handling
//!
//! This module defines the `HanError` enum, which represents the different error
//! types that can occur while extracting, validating, and interpreting HAN frames.

use thiserror::Error;

/// Represents the different error types that can occur in the HAN decoder.
#[derive(Debug, Error)]
pub enum HanError {
    /// The byte source ended before a frame that was begun could be completed.
    #[error("short read: stream ended after {read} of {expected} expected bytes")]
    ShortRead { read: usize, expected: usize },

    /// A structural impossibility in a candidate frame (bad length, truncated
    /// header, unknown COSEM tag in strict mode, ...).
    #[error("malformed frame at offset {offset}: {reason}")]
    MalformedFrame { offset: usize, reason: String },

    /// Header Check Sequence mismatch (CRC over the HDLC header).
    #[error("header checksum mismatch: expected 0x{expected:04X}, calculated 0x{calculated:04X}")]
    HeaderChecksum { expected: u16, calculated: u16 },

    /// Frame Check Sequence mismatch (CRC over the whole frame).
    #[error("frame checksum mismatch: expected 0x{expected:04X}, calculated 0x{calculated:04X}")]
    FrameChecksum { expected: u16, calculated: u16 },

    /// A COSEM TLV tag this decoder does not know how to parse.
    #[error("unknown COSEM tag 0x{tag:02X} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    /// A malformed OBIS code (not exactly six octets).
    #[error("invalid OBIS code: expected 6 octets, got {0}")]
    InvalidObis(usize),

    /// The requested vendor/version selector has no register dictionary.
    #[error("unsupported vendor map: {0}")]
    UnsupportedVendor(String),

    /// I/O failure on the underlying byte source.
    #[error("byte source error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialisation failure in the emitter.
    #[error("emitter error: {0}")]
    Emit(#[from] serde_json::Error),
}
