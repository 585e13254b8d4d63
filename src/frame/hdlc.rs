//! # HDLC Parser
//!
//! Validates a candidate frame (already extracted by the Frame Scanner) and
//! exposes its APDU payload: checks the full-frame CRC, walks the
//! variable-length address fields, checks the header CRC, strips the LLC
//! sub-header, and parses the APDU prefix.

use crate::constants::{ADDRESS_TERMINATOR_BIT, CRC_LEN, LLC_HEADER, LLC_HEADER_LEN, MIN_FRAME_LENGTH};
use crate::crc::{crc16_x25, read_u16_le};
use crate::error::HanError;
use crate::logging::log_warn;
use nom::{
    bytes::complete::{take, take_while},
    number::complete::{be_u32, be_u8},
};

/// The fully-decoded HDLC frame with its inner APDU payload sliced out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame<'a> {
    pub length: u16,
    pub segmentation: bool,
    pub frame_type: u8,
    pub frame_format: u16,
    pub client_address: Vec<u8>,
    pub server_address: Vec<u8>,
    pub control: u8,
    pub hcs: u16,
    pub llc: [u8; LLC_HEADER_LEN],
    pub apdu_tag: u8,
    pub invoke_id_and_priority: u32,
    pub datetime: Vec<u8>,
    pub fcs: u16,
    pub payload: &'a [u8],
}

/// Options affecting HDLC validation strictness.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub ignore_checksum: bool,
}

/// Parses and validates one candidate frame. `frame_bytes` is the full
/// frame including the frame-format word but excluding the `0x7E`
/// delimiters (per §4.2).
pub fn parse<'a>(
    frame_bytes: &'a [u8],
    length: u16,
    segmentation: bool,
    frame_type: u8,
    frame_format: u16,
    opts: ParseOptions,
) -> Result<DecodedFrame<'a>, HanError> {
    if frame_bytes.len() < MIN_FRAME_LENGTH {
        return Err(HanError::MalformedFrame {
            offset: 0,
            reason: format!(
                "frame too short: {} octets, minimum {MIN_FRAME_LENGTH}",
                frame_bytes.len()
            ),
        });
    }

    let fcs_region = &frame_bytes[..frame_bytes.len() - CRC_LEN];
    let fcs_calc = crc16_x25(fcs_region);
    let fcs = read_u16_le(&frame_bytes[frame_bytes.len() - CRC_LEN..]);
    if fcs != fcs_calc && !opts.ignore_checksum {
        return Err(HanError::FrameChecksum {
            expected: fcs,
            calculated: fcs_calc,
        });
    }

    // Cursor past the 2-octet frame format word (already decoded by the
    // caller, but still consumed here so the header CRC covers it).
    let (rest, _format_word) =
        take::<_, _, nom::error::Error<&[u8]>>(2usize)(frame_bytes).map_err(|_| short("format word"))?;

    let (rest, client_address) = parse_variable_address(rest)?;
    let (rest, server_address) = parse_variable_address(rest)?;
    let (rest, control) = be_u8::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short("control"))?;

    let header_len = frame_bytes.len() - rest.len();
    let header_region = &frame_bytes[..header_len];
    let hcs_calc = crc16_x25(header_region);
    let (rest, hcs_bytes) =
        take::<_, _, nom::error::Error<&[u8]>>(CRC_LEN)(rest).map_err(|_| short("HCS"))?;
    let hcs = read_u16_le(hcs_bytes);
    if hcs != hcs_calc && !opts.ignore_checksum {
        return Err(HanError::HeaderChecksum {
            expected: hcs,
            calculated: hcs_calc,
        });
    }

    let (rest, llc_bytes) =
        take::<_, _, nom::error::Error<&[u8]>>(LLC_HEADER_LEN)(rest).map_err(|_| short("LLC header"))?;
    let mut llc = [0u8; LLC_HEADER_LEN];
    llc.copy_from_slice(llc_bytes);
    if llc != LLC_HEADER {
        log_warn(&format!(
            "LLC sub-header {llc:02X?} is not the nominal {LLC_HEADER:02X?}"
        ));
    }

    let (rest, apdu_tag) =
        be_u8::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short("APDU tag"))?;
    let (rest, invoke_id_and_priority) =
        be_u32::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short("invoke id"))?;
    let (rest, datetime_len) =
        be_u8::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short("datetime length"))?;
    let (rest, datetime_bytes) = take::<_, _, nom::error::Error<&[u8]>>(datetime_len as usize)(rest)
        .map_err(|_| short("datetime octets"))?;

    if rest.len() < CRC_LEN {
        return Err(HanError::MalformedFrame {
            offset: frame_bytes.len() - rest.len(),
            reason: "no room left for COSEM payload and FCS".to_string(),
        });
    }
    let payload = &rest[..rest.len() - CRC_LEN];

    Ok(DecodedFrame {
        length,
        segmentation,
        frame_type,
        frame_format,
        client_address,
        server_address,
        control,
        hcs,
        llc,
        apdu_tag,
        invoke_id_and_priority,
        datetime: datetime_bytes.to_vec(),
        fcs,
        payload,
    })
}

/// A variable-length HDLC address: octets until one has its
/// least-significant bit set.
fn parse_variable_address(input: &[u8]) -> Result<(&[u8], Vec<u8>), HanError> {
    let (rest, body): (&[u8], &[u8]) =
        take_while::<_, _, nom::error::Error<&[u8]>>(|b: u8| b & ADDRESS_TERMINATOR_BIT == 0)(input)
            .map_err(|_| short("address"))?;
    let (rest, terminator) =
        be_u8::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short("address terminator"))?;
    let mut address = body.to_vec();
    address.push(terminator);
    Ok((rest, address))
}

fn short(what: &str) -> HanError {
    HanError::MalformedFrame {
        offset: 0,
        reason: format!("short read parsing {what}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Scenario S1 from the spec: AIDON_V0001 power_active_import = 3728 W.
    const S1: &[u8] = &[
        0xA0, 0x2A, 0x41, 0x08, 0x83, 0x13, 0x04, 0x13, 0xE6, 0xE7, 0x00, 0x0F, 0x40, 0x00, 0x00,
        0x00, 0x00, 0x01, 0x01, 0x02, 0x03, 0x09, 0x06, 0x01, 0x00, 0x01, 0x07, 0x00, 0xFF, 0x06,
        0x00, 0x00, 0x0E, 0x90, 0x02, 0x02, 0x0F, 0x00, 0x16, 0x1B, 0x77, 0x24,
    ];

    fn decode_length(bytes: &[u8; 2]) -> (u16, bool, u8) {
        let w = u16::from_be_bytes(*bytes);
        let length = w & crate::constants::FRAME_FORMAT_LENGTH_MASK;
        let segmentation = (w >> crate::constants::FRAME_FORMAT_SEGMENTATION_BIT) & 1 == 1;
        let frame_type = (w >> crate::constants::FRAME_FORMAT_TYPE_SHIFT) as u8;
        (length, segmentation, frame_type)
    }

    #[test]
    fn parses_s1_scenario_frame() {
        let (length, segmentation, frame_type) = decode_length(&[S1[0], S1[1]]);
        let frame_format = u16::from_be_bytes([S1[0], S1[1]]);
        let decoded = parse(
            S1,
            length,
            segmentation,
            frame_type,
            frame_format,
            ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(decoded.llc, [0xE6, 0xE7, 0x00]);
        assert_eq!(decoded.apdu_tag, 0x0F);
        assert_eq!(decoded.invoke_id_and_priority, 0x40000000);
        assert!(decoded.datetime.is_empty());
        assert_eq!(decoded.payload[0], 0x01); // top-level structure tag
    }

    #[test]
    fn non_nominal_llc_header_is_logged_but_still_decodes() {
        let mut corrupted = S1.to_vec();
        corrupted[8..11].copy_from_slice(&[0xAA, 0xBB, 0xCC]);
        let (length, segmentation, frame_type) = decode_length(&[corrupted[0], corrupted[1]]);
        let frame_format = u16::from_be_bytes([corrupted[0], corrupted[1]]);
        let decoded = parse(
            &corrupted,
            length,
            segmentation,
            frame_type,
            frame_format,
            ParseOptions {
                ignore_checksum: true,
            },
        )
        .unwrap();
        assert_eq!(decoded.llc, [0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn rejects_too_short_frame() {
        let err = parse(&[0; 6], 6, false, 3, 6, ParseOptions::default()).unwrap_err();
        assert!(matches!(err, HanError::MalformedFrame { .. }));
    }

    #[test]
    fn detects_frame_checksum_mismatch() {
        let mut corrupted = S1.to_vec();
        corrupted[20] ^= 0xFF; // flip a bit inside the payload, not the FCS
        let (length, segmentation, frame_type) = decode_length(&[corrupted[0], corrupted[1]]);
        let frame_format = u16::from_be_bytes([corrupted[0], corrupted[1]]);
        let err = parse(
            &corrupted,
            length,
            segmentation,
            frame_type,
            frame_format,
            ParseOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, HanError::FrameChecksum { .. }));
    }

    #[test]
    fn ignore_checksum_option_decodes_despite_mismatch() {
        let mut corrupted = S1.to_vec();
        corrupted[20] ^= 0xFF;
        let (length, segmentation, frame_type) = decode_length(&[corrupted[0], corrupted[1]]);
        let frame_format = u16::from_be_bytes([corrupted[0], corrupted[1]]);
        let decoded = parse(
            &corrupted,
            length,
            segmentation,
            frame_type,
            frame_format,
            ParseOptions {
                ignore_checksum: true,
            },
        )
        .unwrap();
        assert_eq!(decoded.apdu_tag, 0x0F);
    }
}
