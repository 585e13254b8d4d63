//! Kamstrup_V0001 register dictionary.
//!
//! Kamstrup frames carry a flat `[code1, value1, code2, value2, ...]` list
//! with no leading OBIS-version entry; the interpreter synthesises one from
//! the first structure member before pairing the rest positionally (§4.4).
//! The dictionary entries below are otherwise identical in shape to
//! AIDON's: each register still carries its own OBIS code, so lookups are
//! still by OBIS string, not by position.

use super::RegisterDef;
use crate::constants::OBIS_VERSION_SYNTHETIC;

pub const REGISTERS: &[RegisterDef] = &[
    RegisterDef::new(OBIS_VERSION_SYNTHETIC, "obis_version", "OBIS list version identifier", "", 1.0),
    RegisterDef::new("0-0:96.1.0.255", "meter_id", "Meter serial number", "", 1.0),
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
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_version_entry_is_registered() {
        let def = REGISTERS.iter().find(|d| d.obis == OBIS_VERSION_SYNTHETIC).unwrap();
        assert_eq!(def.key, "obis_version");
    }
}
