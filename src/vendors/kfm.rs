//! KFM_001 register dictionary.
//!
//! KFM frames carry a flat list with no embedded OBIS codes at all: meaning
//! is assigned purely by position, and the position sequence itself depends
//! on the HDLC frame type (§4.4). `list_for_frame_type` returns the OBIS
//! sequence to zip against the decoded value list; `REGISTERS` is then used
//! exactly as in the other two vendors, to attach description/unit/factor
//! to each assigned OBIS code.

use super::RegisterDef;

/// Frame type 7: a single active-power-import reading (List 1).
pub const LIST_1: &[&str] = &["1-0:1.7.0.255"];

/// Frame types 8 and 9: the base register set (List 2).
pub const LIST_2: &[&str] = &[
    "1-1:0.2.129.255",
    "0-0:96.1.0.255",
    "0-0:96.1.7.255",
    "1-0:1.7.0.255",
    "1-0:2.7.0.255",
    "1-0:3.7.0.255",
    "1-0:4.7.0.255",
    "1-0:31.7.0.255",
    "1-0:51.7.0.255",
    "1-0:71.7.0.255",
    "1-0:32.7.0.255",
    "1-0:52.7.0.255",
    "1-0:72.7.0.255",
];

/// Frame types 10 and 11: List 2 plus five more registers (List 3).
pub const LIST_3_EXTRA: &[&str] = &[
    "0-0:1.0.0.255",
    "1-0:1.8.0.255",
    "1-0:2.8.0.255",
    "1-0:3.8.0.255",
    "1-0:4.8.0.255",
];

/// Returns the OBIS code sequence for a given HDLC frame type, or `None` if
/// the frame type carries no defined KFM_001 register list.
pub fn list_for_frame_type(frame_type: u8) -> Option<Vec<&'static str>> {
    match frame_type {
        7 => Some(LIST_1.to_vec()),
        8 | 9 => Some(LIST_2.to_vec()),
        10 | 11 => {
            let mut list = LIST_2.to_vec();
            list.extend_from_slice(LIST_3_EXTRA);
            Some(list)
        }
        _ => None,
    }
}

pub const REGISTERS: &[RegisterDef] = &[
    RegisterDef::new("1-1:0.2.129.255", "obis_version", "OBIS list version identifier", "", 1.0),
    RegisterDef::new("0-0:96.1.0.255", "meter_id", "Meter serial number", "", 1.0),
    RegisterDef::new("0-0:96.1.7.255", "meter_type", "Meter type designation", "", 1.0),
    RegisterDef::new("0-0:1.0.0.255", "meter_clock", "Meter clock", "", 1.0),
    RegisterDef::new("1-0:1.7.0.255", "power_active_import", "Active power import (Q1+Q4)", "W", 1.0),
    RegisterDef::new("1-0:2.7.0.255", "power_active_export", "Active power export (Q2+Q3)", "W", 1.0),
    RegisterDef::new("1-0:3.7.0.255", "power_reactive_import", "Reactive power import (Q1+Q2)", "VAr", 1.0),
    RegisterDef::new("1-0:4.7.0.255", "power_reactive_export", "Reactive power export (Q3+Q4)", "VAr", 1.0),
    RegisterDef::new("1-0:31.7.0.255", "current_l1", "Current, phase L1", "A", 1.0),
    RegisterDef::new("1-0:51.7.0.255", "current_l2", "Current, phase L2", "A", 1.0),
    RegisterDef::new("1-0:71.7.0.255", "current_l3", "Current, phase L3", "A", 1.0),
    RegisterDef::new("1-0:32.7.0.255", "voltage_l1", "Voltage, phase L1", "V", 1.0),
    RegisterDef::new("1-0:52.7.0.255", "voltage_l2", "Voltage, phase L2", "V", 1.0),
    RegisterDef::new("1-0:72.7.0.255", "voltage_l3", "Voltage, phase L3", "V", 1.0),
    RegisterDef::new("1-0:1.8.0.255", "energy_active_import_total", "Cumulative active energy import", "Wh", 1.0),
    RegisterDef::new("1-0:2.8.0.255", "energy_active_export_total", "Cumulative active energy export", "Wh", 1.0),
    RegisterDef::new("1-0:3.8.0.255", "energy_reactive_import_total", "Cumulative reactive energy import", "VArh", 1.0),
    RegisterDef::new("1-0:4.8.0.255", "energy_reactive_export_total", "Cumulative reactive energy export", "VArh", 1.0),
];
