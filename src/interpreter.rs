//! Register Interpreter (§4.4).
//!
//! Converts the generic COSEM value tree produced by the TLV decoder into a
//! flat, keyed map of labelled measurements, dispatching on the selected
//! vendor dictionary and (for `KFM_001`) on the HDLC frame type.

use crate::constants::{OBIS_CLOCK, OBIS_VERSION_SYNTHETIC};
use crate::cosem::{ClockValue, Obis, Value};
use crate::error::HanError;
use crate::util::hex::encode_hex;
use crate::vendors::{units, VendorMap};
use serde::Serialize;
use std::collections::BTreeMap;

/// One labelled measurement, ready for JSON emission (§6).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Measurement {
    pub obis_code: String,
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A register as extracted from the value tree, before dictionary lookup:
/// its OBIS code, raw value, and an optional scaler-unit pair carried by
/// the frame itself.
struct RawRegister {
    obis: Obis,
    value: Value,
    scaler_unit: Option<(i8, u8)>,
}

/// Interprets the notification body for the given vendor dictionary and
/// frame type, producing the flat `data` map of the emitted document.
///
/// The capture timestamp is carried by the APDU prefix's datetime octets
/// (`DecodedFrame::datetime`, already split off by the HDLC Parser), not by
/// the COSEM payload — a notification APDU's value tree is a single
/// top-level value, the register container itself. Some profiles do still
/// wrap that container as a two-element `[timestamp, registers]` structure
/// inside the payload; `notification_body` unwraps that case too, so either
/// shape lands on the same register container.
pub fn interpret(
    values: &[Value],
    frame_type: u8,
    vendor: VendorMap,
) -> Result<BTreeMap<String, Measurement>, HanError> {
    let body = notification_body(values)?;

    let registers = match vendor {
        VendorMap::AidonV0001 => extract_aidon(body)?,
        VendorMap::KamstrupV0001 => extract_kamstrup(body)?,
        VendorMap::KfmV001 => extract_kfm(body, frame_type)?,
    };

    let mut data = BTreeMap::new();
    for register in registers {
        let (key, measurement) = build_measurement(register, vendor)?;
        data.insert(key, measurement);
    }
    Ok(data)
}

/// Picks the single notification-body value out of the decoded top-level
/// list and unwraps a `[timestamp, registers]` wrapper structure if the
/// payload happens to carry one of its own.
fn notification_body(values: &[Value]) -> Result<&Value, HanError> {
    let top = values.last().ok_or_else(|| HanError::MalformedFrame {
        offset: 0,
        reason: "APDU payload carries no notification body".to_string(),
    })?;
    Ok(match top {
        Value::Structure(items) if items.len() == 2 && items[1].as_structure().is_some() => {
            &items[1]
        }
        _ => top,
    })
}

fn body_items(body: &Value) -> Result<&[Value], HanError> {
    body.as_structure().ok_or_else(|| HanError::MalformedFrame {
        offset: 0,
        reason: "APDU body is not an array or structure".to_string(),
    })
}

/// AIDON_V0001: body is a structure of `[code, value, scaler-unit?]`
/// triplets.
fn extract_aidon(body: &Value) -> Result<Vec<RawRegister>, HanError> {
    let mut out = Vec::new();
    for item in body_items(body)? {
        let fields = item.as_structure().ok_or_else(|| HanError::MalformedFrame {
            offset: 0,
            reason: "AIDON register is not a structure".to_string(),
        })?;
        let obis = fields
            .first()
            .and_then(Value::as_obis)
            .ok_or_else(|| HanError::MalformedFrame {
                offset: 0,
                reason: "AIDON register is missing its OBIS code".to_string(),
            })?;
        let value = fields
            .get(1)
            .cloned()
            .ok_or_else(|| HanError::MalformedFrame {
                offset: 0,
                reason: "AIDON register is missing its value".to_string(),
            })?;
        let scaler_unit = fields.get(2).and_then(parse_scaler_unit);
        out.push(RawRegister {
            obis,
            value,
            scaler_unit,
        });
    }
    Ok(out)
}

/// Kamstrup_V0001: body is `[version, code1, value1, code2, value2, ...]`
/// with no leading OBIS-version entry of its own.
fn extract_kamstrup(body: &Value) -> Result<Vec<RawRegister>, HanError> {
    let items = body_items(body)?;
    let version = items.first().ok_or_else(|| HanError::MalformedFrame {
        offset: 0,
        reason: "Kamstrup body is empty".to_string(),
    })?;

    let mut out = vec![RawRegister {
        obis: obis_from_str(OBIS_VERSION_SYNTHETIC),
        value: version.clone(),
        scaler_unit: None,
    }];

    let rest = &items[1..];
    for pair in rest.chunks(2) {
        let (code, value) = match pair {
            [code, value] => (code, value),
            _ => {
                return Err(HanError::MalformedFrame {
                    offset: 0,
                    reason: "Kamstrup register list has an odd trailing element".to_string(),
                })
            }
        };
        let obis = code.as_obis().ok_or_else(|| HanError::MalformedFrame {
            offset: 0,
            reason: "Kamstrup register code is not a 6-octet OBIS string".to_string(),
        })?;
        out.push(RawRegister {
            obis,
            value: value.clone(),
            scaler_unit: None,
        });
    }
    Ok(out)
}

/// KFM_001: body is a flat list of raw values; meaning is assigned purely
/// by position, per the OBIS sequence for this frame type.
fn extract_kfm(body: &Value, frame_type: u8) -> Result<Vec<RawRegister>, HanError> {
    let items = body_items(body)?;
    let obis_list = crate::vendors::kfm::list_for_frame_type(frame_type).ok_or_else(|| {
        HanError::MalformedFrame {
            offset: 0,
            reason: format!("KFM_001 has no register list for frame type {frame_type}"),
        }
    })?;
    if items.len() != obis_list.len() {
        return Err(HanError::MalformedFrame {
            offset: 0,
            reason: format!(
                "KFM_001 frame type {frame_type} expects {} values, got {}",
                obis_list.len(),
                items.len()
            ),
        });
    }
    Ok(obis_list
        .into_iter()
        .zip(items.iter())
        .map(|(obis_str, value)| RawRegister {
            obis: obis_from_str(obis_str),
            value: value.clone(),
            scaler_unit: None,
        })
        .collect())
}

/// Parses an OBIS code from its canonical `"A-B:C.D.E.F"` string form,
/// which every static dictionary entry is written in.
fn obis_from_str(s: &str) -> Obis {
    let mut octets = [0u8; 6];
    let digits: Vec<u8> = s
        .split(|c: char| c == '-' || c == ':' || c == '.')
        .map(|part| part.parse::<u8>().unwrap_or(0))
        .collect();
    for (slot, value) in octets.iter_mut().zip(digits.into_iter()) {
        *slot = value;
    }
    Obis::new(octets)
}

/// A scaler-unit pair is itself a COSEM structure of `[i8 exponent, enum
/// unit]` (see the S1 test vector; the distilled spec's prose description
/// of a trailing `u16` does not match the observed encoding).
fn parse_scaler_unit(value: &Value) -> Option<(i8, u8)> {
    let fields = value.as_structure()?;
    let exponent = match fields.first()? {
        Value::I8(v) => *v,
        _ => return None,
    };
    let unit = match fields.get(1)? {
        Value::Enum(v) => *v,
        _ => return None,
    };
    Some((exponent, unit))
}

fn build_measurement(
    register: RawRegister,
    vendor: VendorMap,
) -> Result<(String, Measurement), HanError> {
    let obis_str = register.obis.to_string();
    let def = vendor.lookup(&obis_str);

    if obis_str == OBIS_CLOCK {
        let bytes = register.value.as_octet_string().ok_or_else(|| HanError::MalformedFrame {
            offset: 0,
            reason: "meter clock register is not an octet-string".to_string(),
        })?;
        let clock = ClockValue::parse(bytes)?;
        let key = def.map(|d| d.key.to_string()).unwrap_or_else(|| obis_str.clone());
        return Ok((
            key,
            Measurement {
                obis_code: obis_str,
                value: serde_json::Value::String(clock.render()),
                description: def.map(|d| d.description.to_string()),
                unit: def.and_then(|d| empty_to_none(d.unit)),
            },
        ));
    }

    let (factor, unit) = match register.scaler_unit {
        Some((exponent, unit_code)) => (10f64.powi(exponent as i32), units::unit_symbol(unit_code).to_string()),
        None => match def {
            Some(d) => (d.factor, d.unit.to_string()),
            None => (1.0, String::new()),
        },
    };

    let value = render_value(&register.value, factor);
    let key = def.map(|d| d.key.to_string()).unwrap_or_else(|| obis_str.clone());

    Ok((
        key,
        Measurement {
            obis_code: obis_str,
            value,
            description: def.map(|d| d.description.to_string()),
            unit: empty_to_none(&unit),
        },
    ))
}

fn render_value(value: &Value, factor: f64) -> serde_json::Value {
    match value {
        Value::VisibleString(s) | Value::Utf8String(s) => serde_json::Value::String(s.clone()),
        Value::OctetString(bytes) => serde_json::Value::String(encode_hex(bytes)),
        Value::Null => serde_json::Value::Null,
        other => match other.as_f64() {
            Some(n) => serde_json::json!(n * factor),
            None => serde_json::Value::String(format!("{other:?}")),
        },
    }
}

fn empty_to_none(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
