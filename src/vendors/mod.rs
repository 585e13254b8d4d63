//! Register Interpreter: vendor/version-specific dictionaries mapping OBIS
//! codes to a canonical key, human description, and default scaler/unit, plus
//! the positional key sequences the flat-list vendor shapes rely on.

pub mod aidon;
pub mod kamstrup;
pub mod kfm;
pub mod units;

use crate::error::HanError;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::str::FromStr;

/// One entry of a register dictionary: what a given OBIS code means, and the
/// default scaler/unit to apply when the frame carries no scaler-unit pair
/// of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegisterDef {
    pub obis: &'static str,
    pub key: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub factor: f64,
}

impl RegisterDef {
    pub const fn new(
        obis: &'static str,
        key: &'static str,
        description: &'static str,
        unit: &'static str,
        factor: f64,
    ) -> Self {
        Self {
            obis,
            key,
            description,
            unit,
            factor,
        }
    }
}

/// The selected vendor/version register dictionary. Immutable once chosen
/// at startup (§5); picking one is a configuration-time decision, never
/// re-evaluated per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VendorMap {
    #[value(name = "AIDON_V0001")]
    AidonV0001,
    #[value(name = "Kamstrup_V0001")]
    KamstrupV0001,
    #[value(name = "KFM_001")]
    KfmV001,
}

fn index(table: &'static [RegisterDef]) -> HashMap<&'static str, &'static RegisterDef> {
    table.iter().map(|def| (def.obis, def)).collect()
}

static AIDON_INDEX: Lazy<HashMap<&'static str, &'static RegisterDef>> =
    Lazy::new(|| index(aidon::REGISTERS));
static KAMSTRUP_INDEX: Lazy<HashMap<&'static str, &'static RegisterDef>> =
    Lazy::new(|| index(kamstrup::REGISTERS));
static KFM_INDEX: Lazy<HashMap<&'static str, &'static RegisterDef>> =
    Lazy::new(|| index(kfm::REGISTERS));

impl VendorMap {
    /// Looks up an OBIS code's default dictionary entry for this vendor.
    ///
    /// Each vendor's table is compiled into a `HashMap` once, behind a
    /// `Lazy`, the first time any frame for that vendor is interpreted —
    /// a fixed per-process cost, not a per-frame one.
    pub fn lookup(&self, obis: &str) -> Option<&'static RegisterDef> {
        let index: &Lazy<HashMap<&'static str, &'static RegisterDef>> = match self {
            VendorMap::AidonV0001 => &AIDON_INDEX,
            VendorMap::KamstrupV0001 => &KAMSTRUP_INDEX,
            VendorMap::KfmV001 => &KFM_INDEX,
        };
        index.get(obis).copied()
    }
}

impl FromStr for VendorMap {
    type Err = HanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AIDON_V0001" => Ok(VendorMap::AidonV0001),
            "Kamstrup_V0001" => Ok(VendorMap::KamstrupV0001),
            "KFM_001" => Ok(VendorMap::KfmV001),
            other => Err(HanError::UnsupportedVendor(other.to_string())),
        }
    }
}
