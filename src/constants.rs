//! HDLC / COSEM protocol constants.
//!
//! Mirrors the bit layout in the data model: the HDLC flag delimiter, the
//! frame-format word's field masks, the LLC sub-header, and the minimum
//! frame length invariant.

/// HDLC flag delimiter that opens and closes every frame.
pub const HDLC_FLAG: u8 = 0x7E;

/// Low 11 bits of the frame-format word: total frame length, excluding the
/// delimiters, including the format word itself and the trailing FCS.
pub const FRAME_FORMAT_LENGTH_MASK: u16 = 0x07FF;

/// Bit 11 of the frame-format word: 1 if more segments follow.
pub const FRAME_FORMAT_SEGMENTATION_BIT: u16 = 11;

/// Bits 15..12 of the frame-format word: the HDLC frame type nibble.
pub const FRAME_FORMAT_TYPE_SHIFT: u16 = 12;

/// Minimum valid frame length: format word (2) + minimal addresses (2) +
/// control (1) + FCS (2).
pub const MIN_FRAME_LENGTH: usize = 7;

/// Nominal LLC sub-header bytes (destination LSAP, source LSAP, control).
pub const LLC_HEADER: [u8; 3] = [0xE6, 0xE7, 0x00];

/// Size in octets of the LLC sub-header.
pub const LLC_HEADER_LEN: usize = 3;

/// Size in octets of a CRC-16 checksum field (HCS or FCS).
pub const CRC_LEN: usize = 2;

/// Bit marking the terminating octet of a variable-length HDLC address.
pub const ADDRESS_TERMINATOR_BIT: u8 = 0x01;

/// OBIS code identifying the meter's internal clock register.
pub const OBIS_CLOCK: &str = "0-0:1.0.0.255";

/// Synthetic OBIS code used for the Kamstrup list-version entry that has
/// no OBIS code of its own in the flat Kamstrup payload shape.
pub const OBIS_VERSION_SYNTHETIC: &str = "1-1:0.2.129.255";
