//! # Utility Modules
//!
//! Hex encoding/decoding used for rendering raw octet-strings in emitted
//! JSON and for parsing hex-dump capture files.

pub mod hex;

pub use hex::{decode_hex, encode_hex};
