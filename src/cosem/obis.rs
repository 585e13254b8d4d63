//! OBIS (Object Identification System) code.
//!
//! A six-octet hierarchical register address, rendered `"A-B:C.D.E.F"` with
//! each component printed as an unsigned decimal.

use crate::error::HanError;
use std::fmt;

/// A parsed six-component OBIS code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Obis([u8; 6]);

impl Obis {
    /// Builds an `Obis` from exactly six raw octets.
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Parses an OBIS code from an octet-string payload; fails if it is not
    /// exactly six octets long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HanError> {
        if bytes.len() != 6 {
            return Err(HanError::InvalidObis(bytes.len()));
        }
        let mut octets = [0u8; 6];
        octets.copy_from_slice(bytes);
        Ok(Self(octets))
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for Obis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a}-{b}:{c}.{d}.{e}.{g}")
    }
}
