//! # han-decode — a DLMS/COSEM decoder for the Norwegian AMS HAN port
//!
//! Decodes the binary telemetry stream emitted by smart electricity meters
//! over a Home Area Network (HAN) port: DLMS/COSEM application-layer data
//! framed inside HDLC type-3 link frames over an M-Bus slave serial link.
//!
//! The pipeline is five stages feeding one another synchronously over a
//! single blocking [`ByteSource`]:
//!
//! 1. [`frame::scan`] — locates `0x7E`-delimited candidate frames in the
//!    raw byte stream, resyncing past noise.
//! 2. [`frame::parse`] — validates the HCS/FCS checksums, strips the HDLC
//!    header and LLC sub-header, exposes the inner APDU payload.
//! 3. [`cosem::decode`] — parses the payload into a recursive COSEM value
//!    tree.
//! 4. [`interpreter::interpret`] — pairs OBIS codes with readings per the
//!    selected vendor dictionary, producing a flat measurement map.
//! 5. [`emitter`] — serialises the result to JSON and dispatches it to one
//!    or more [`emitter::FrameSink`]s.
//!
//! ```toml
//! [dependencies]
//! han-decode = "0.1.0"
//! ```

pub mod constants;
pub mod cosem;
pub mod crc;
pub mod emitter;
pub mod error;
pub mod frame;
pub mod interpreter;
pub mod logging;
pub mod source;
pub mod util;
pub mod vendors;

#[cfg(feature = "crypto")]
pub mod crypto;

pub use crate::emitter::{build_document, FrameSink};
pub use crate::error::HanError;
pub use crate::frame::{DecodedFrame, ParseOptions};
pub use crate::logging::init_logger;
pub use crate::source::ByteSource;
pub use crate::vendors::VendorMap;

/// Ties the four core stages together: reads frames from a [`ByteSource`],
/// validates and parses each one, interprets it against a fixed vendor
/// dictionary, and hands the resulting document to a [`FrameSink`].
///
/// Holds no long-lived mutable state beyond its configuration; one
/// `Decoder` can drive any number of `run` calls over different sources.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    vendor: VendorMap,
    parse_options: ParseOptions,
}

impl Decoder {
    pub fn new(vendor: VendorMap, parse_options: ParseOptions) -> Self {
        Self {
            vendor,
            parse_options,
        }
    }

    /// Runs the pipeline over `source` until clean EOF, emitting one
    /// document per accepted frame to `sink`. A malformed or
    /// checksum-failing frame is logged and skipped (§7); the scan
    /// continues at the next `0x7E`. Returns `Err` only on
    /// [`HanError::ShortRead`] (stream ended mid-frame) or a sink failure.
    pub fn run<S, K>(&self, source: &mut S, sink: &mut K) -> Result<(), HanError>
    where
        S: ByteSource + ?Sized,
        K: FrameSink,
    {
        let mut sink_err = None;
        frame::scan(source, |raw| {
            let decoded = frame::parse(
                &raw.bytes,
                raw.length,
                raw.segmentation,
                raw.frame_type,
                raw.frame_format,
                self.parse_options,
            )?;
            let values = cosem::decode(decoded.payload)?;
            let data = interpreter::interpret(&values, decoded.frame_type, self.vendor)?;
            let document = emitter::build_document(&decoded, &values, &data);
            if let Err(e) = sink.emit(&document) {
                sink_err = Some(e);
            }
            Ok(())
        })?;
        match sink_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
