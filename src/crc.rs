//! # Checksum Engine
//!
//! CRC-16/X-25 as used for both the HDLC Header Check Sequence (HCS) and the
//! whole-frame Check Sequence (FCS): width 16, polynomial `0x1021`, init
//! `0xFFFF`, reflected input and output, xor-out `0xFFFF`.
//!
//! Built on the `crc` crate's table-driven `Crc<u16>` engine rather than a
//! hand-rolled bit loop, the same way the corpus reaches for `crc` wherever
//! it needs a standard CRC variant.

use crc::{Algorithm, Crc};

const X25: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0xFFFF,
    refin: true,
    refout: true,
    xorout: 0xFFFF,
    check: 0x906E,
    residue: 0xF0B8,
};

static CRC16_X25: Crc<u16> = Crc::<u16>::new(&X25);

/// Computes CRC-16/X-25 over `data`.
pub fn crc16_x25(data: &[u8]) -> u16 {
    CRC16_X25.checksum(data)
}

/// Reads a little-endian `u16` from the first two bytes of `data`.
///
/// # Panics
/// Panics if `data` has fewer than 2 bytes; callers must slice first.
pub fn read_u16_le(data: &[u8]) -> u16 {
    u16::from_le_bytes([data[0], data[1]])
}
