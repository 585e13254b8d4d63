//! Hex encoding/decoding used to render octet-string values in emitted JSON
//! and to read hex-dump capture files back into raw bytes.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexError {
    #[error("odd number of hex characters: {0}")]
    OddLength(usize),
    #[error("empty hex string")]
    EmptyString,
    #[error("hex decoding error: {0}")]
    DecodeError(String),
}

/// Encodes bytes as lowercase hex, with no separators.
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decodes a hex string, stripping whitespace first.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, HexError> {
    if hex_str.is_empty() {
        return Err(HexError::EmptyString);
    }
    let cleaned: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() % 2 != 0 {
        return Err(HexError::OddLength(cleaned.len()));
    }
    hex::decode(&cleaned).map_err(|e| HexError::DecodeError(e.to_string()))
}
