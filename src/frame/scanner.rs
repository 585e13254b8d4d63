//! # Frame Scanner
//!
//! Consumes raw bytes from a `ByteSource`, locates HDLC frame boundaries
//! using the `0x7E` delimiter, and recovers from noise. Hands each
//! well-formed candidate frame to the HDLC Parser, catching and logging any
//! error it raises so scanning can resume at the next delimiter.

use crate::constants::{
    FRAME_FORMAT_LENGTH_MASK, FRAME_FORMAT_SEGMENTATION_BIT, FRAME_FORMAT_TYPE_SHIFT, HDLC_FLAG,
};
use crate::error::HanError;
use crate::logging::{log_debug, log_warn};
use crate::source::ByteSource;

/// A candidate frame extracted between two `0x7E` delimiters, with its
/// frame-format word already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub bytes: Vec<u8>,
    pub length: u16,
    pub segmentation: bool,
    pub frame_type: u8,
    pub frame_format: u16,
}

/// Decodes the frame-format word using the corrected mask-then-shift bit
/// layout (length = low 11 bits, segmentation = bit 11, type = bits 15..12).
/// The reference implementation's `value & MASK >> shift` has an
/// operator-precedence defect that evaluates as `value & (MASK >> shift)`;
/// this is the deliberate fix, not a behavioural regression (see
/// SPEC_FULL.md §9).
pub fn decode_frame_format(word: u16) -> (u16, bool, u8) {
    let length = word & FRAME_FORMAT_LENGTH_MASK;
    let segmentation = (word >> FRAME_FORMAT_SEGMENTATION_BIT) & 1 == 1;
    let frame_type = (word >> FRAME_FORMAT_TYPE_SHIFT) as u8;
    (length, segmentation, frame_type)
}

/// Scans `source` for well-formed candidate frames, invoking `on_frame` for
/// each one. Returns when the stream reaches a clean EOF between frames.
/// Any error raised while extracting or processing a single frame is
/// logged and scanning resumes at the next `0x7E`; a short read mid-frame
/// terminates the scan with `HanError::ShortRead`.
pub fn scan<S, F>(source: &mut S, mut on_frame: F) -> Result<(), HanError>
where
    S: ByteSource + ?Sized,
    F: FnMut(RawFrame) -> Result<(), HanError>,
{
    loop {
        // Step 1: discard noise until a flag octet is found.
        loop {
            match source.read_byte()? {
                Some(HDLC_FLAG) => break,
                Some(_) => continue,
                None => return Ok(()),
            }
        }

        // Step 2: the octet right after that flag decides whether the flag
        // just found was a lone opening delimiter, or the stop flag of the
        // previous frame immediately followed by the next frame's start
        // flag (back-to-back frames share a single 0x7E on the wire).
        let second = match source.read_byte()? {
            Some(b) => b,
            None => return Ok(()),
        };

        let (hi, lo) = if second == HDLC_FLAG {
            let hi = match source.read_byte()? {
                Some(b) => b,
                None => return Ok(()),
            };
            let lo = match source.read_byte()? {
                Some(b) => b,
                None => return Ok(()),
            };
            (hi, lo)
        } else {
            let lo = match source.read_byte()? {
                Some(b) => b,
                None => return Ok(()),
            };
            (second, lo)
        };

        let frame_format = u16::from_be_bytes([hi, lo]);
        let (length, segmentation, frame_type) = decode_frame_format(frame_format);

        if length <= 2 {
            log_warn(&format!("resync: frame-format length {length} too small"));
            continue;
        }

        let remainder_len = (length - 2) as usize;
        let remainder = match source.read_exact_or_eof(remainder_len)? {
            Some(bytes) => bytes,
            None => {
                return Err(HanError::ShortRead {
                    read: 0,
                    expected: remainder_len,
                })
            }
        };

        let mut frame_bytes = Vec::with_capacity(2 + remainder.len());
        frame_bytes.push(hi);
        frame_bytes.push(lo);
        frame_bytes.extend_from_slice(&remainder);

        let raw = RawFrame {
            bytes: frame_bytes,
            length,
            segmentation,
            frame_type,
            frame_format,
        };

        log_debug(&format!(
            "candidate frame: length={length} type={frame_type} segmentation={segmentation}"
        ));

        if let Err(e) = on_frame(raw) {
            log_warn(&format!("dropping frame: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ByteSource;
    use std::io;

    struct SliceSource<'a> {
        data: &'a [u8],
        pos: usize,
    }

    impl<'a> SliceSource<'a> {
        fn new(data: &'a [u8]) -> Self {
            Self { data, pos: 0 }
        }
    }

    impl<'a> ByteSource for SliceSource<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let remaining = self.data.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    const S1: &[u8] = &[
        0x7E, 0xA0, 0x2A, 0x41, 0x08, 0x83, 0x13, 0x04, 0x13, 0xE6, 0xE7, 0x00, 0x0F, 0x40, 0x00,
        0x00, 0x00, 0x00, 0x01, 0x01, 0x02, 0x03, 0x09, 0x06, 0x01, 0x00, 0x01, 0x07, 0x00, 0xFF,
        0x06, 0x00, 0x00, 0x0E, 0x90, 0x02, 0x02, 0x0F, 0x00, 0x16, 0x1B, 0x77, 0x24, 0x7E,
    ];

    #[test]
    fn decode_frame_format_masks_then_shifts() {
        let (length, segmentation, frame_type) = decode_frame_format(0xA02A);
        assert_eq!(length, 42);
        assert!(!segmentation);
        assert_eq!(frame_type, 0xA);
    }

    #[test]
    fn scans_single_frame() {
        let mut source = SliceSource::new(S1);
        let mut frames = Vec::new();
        scan(&mut source, |f| {
            frames.push(f);
            Ok(())
        })
        .unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].length, 42);
    }

    #[test]
    fn resyncs_past_leading_noise() {
        let mut noisy = vec![0x11u8; 64];
        noisy.extend_from_slice(S1);
        let mut source = SliceSource::new(&noisy);
        let mut frames = Vec::new();
        scan(&mut source, |f| {
            frames.push(f);
            Ok(())
        })
        .unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes, S1[1..S1.len() - 1].to_vec());
    }

    #[test]
    fn short_read_mid_frame_terminates_cleanly() {
        let truncated = &S1[..S1.len() - 10];
        let mut source = SliceSource::new(truncated);
        let result = scan(&mut source, |_| Ok(()));
        assert!(matches!(result, Err(HanError::ShortRead { .. })));
    }

    #[test]
    fn errors_from_the_callback_are_swallowed_and_scanning_continues() {
        let mut doubled = S1.to_vec();
        doubled.extend_from_slice(S1);
        let mut source = SliceSource::new(&doubled);
        let mut accepted = 0;
        scan(&mut source, |_| {
            accepted += 1;
            if accepted == 1 {
                Err(HanError::MalformedFrame {
                    offset: 0,
                    reason: "simulated".to_string(),
                })
            } else {
                Ok(())
            }
        })
        .unwrap();
        assert_eq!(accepted, 2);
    }
}
