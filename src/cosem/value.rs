//! # COSEM TLV Decoder
//!
//! Parses the length-delimited typed tree carried in the APDU payload into
//! a recursive `Value` tree. Runs in strict mode: an unknown type tag or a
//! short read inside a known variant is a `HanError` that aborts decoding
//! of the current frame, rather than the reference implementation's lenient
//! null-substitution — a silently-nulled register is a worse failure mode
//! for a monitoring pipeline than a dropped frame with a clear diagnostic.

use crate::error::HanError;
use nom::{
    bytes::complete::take,
    number::complete::{be_i16, be_i8, be_u16, be_u32, be_u8},
};

/// A decoded COSEM value. The variant set is fixed by §3 of the spec; there
/// is deliberately no catch-all "raw" variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Array(Vec<Value>),
    Structure(Vec<Value>),
    U32(u32),
    OctetString(Vec<u8>),
    VisibleString(String),
    Utf8String(String),
    I8(i8),
    I16(i16),
    U16(u16),
    Enum(u8),
}

impl Value {
    /// The OBIS code, if this value is a 6-byte octet-string.
    pub fn as_obis(&self) -> Option<crate::cosem::obis::Obis> {
        match self {
            Value::OctetString(bytes) => crate::cosem::obis::Obis::from_slice(bytes).ok(),
            _ => None,
        }
    }

    pub fn as_octet_string(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&[Value]> {
        match self {
            Value::Structure(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric interpretation used by the interpreter when applying a
    /// scaler-unit factor: any integral scalar variant as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::U32(v) => Some(*v as f64),
            Value::I8(v) => Some(*v as f64),
            Value::I16(v) => Some(*v as f64),
            Value::U16(v) => Some(*v as f64),
            Value::Enum(v) => Some(*v as f64),
            _ => None,
        }
    }
}

/// Decodes the top-level sequence of values that fit within `payload`.
pub fn decode(payload: &[u8]) -> Result<Vec<Value>, HanError> {
    let mut values = Vec::new();
    let mut input = payload;
    let base_len = payload.len();
    while !input.is_empty() {
        let offset = base_len - input.len();
        let (rest, value) = decode_one(input, offset)?;
        values.push(value);
        input = rest;
    }
    Ok(values)
}

fn decode_one<'a>(input: &'a [u8], offset: usize) -> Result<(&'a [u8], Value), HanError> {
    let (rest, tag) = be_u8::<_, nom::error::Error<&[u8]>>(input)
        .map_err(|_| short_read(offset, "type tag"))?;

    match tag {
        0x00 => Ok((rest, Value::Null)),
        0x01 => decode_collection(rest, offset + 1, Value::Array),
        0x02 => decode_collection(rest, offset + 1, Value::Structure),
        0x06 => {
            let (rest, v) =
                be_u32::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short_read(offset, "u32"))?;
            Ok((rest, Value::U32(v)))
        }
        0x09 => decode_length_prefixed_bytes(rest, offset).map(|(r, b)| (r, Value::OctetString(b))),
        0x0A => {
            let (rest, bytes) = decode_length_prefixed_bytes(rest, offset)?;
            Ok((rest, Value::VisibleString(ascii_lossy(&bytes))))
        }
        0x0C => decode_utf8_string(rest, offset),
        0x0F => {
            let (rest, v) =
                be_i8::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short_read(offset, "i8"))?;
            Ok((rest, Value::I8(v)))
        }
        0x10 => {
            let (rest, v) =
                be_i16::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short_read(offset, "i16"))?;
            Ok((rest, Value::I16(v)))
        }
        0x12 => {
            let (rest, v) =
                be_u16::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short_read(offset, "u16"))?;
            Ok((rest, Value::U16(v)))
        }
        0x16 => {
            let (rest, v) =
                be_u8::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short_read(offset, "enum"))?;
            Ok((rest, Value::Enum(v)))
        }
        other => Err(HanError::UnknownTag { tag: other, offset }),
    }
}

fn decode_collection<'a>(
    input: &'a [u8],
    offset: usize,
    wrap: impl Fn(Vec<Value>) -> Value,
) -> Result<(&'a [u8], Value), HanError> {
    let (mut rest, count) =
        be_u8::<_, nom::error::Error<&[u8]>>(input).map_err(|_| short_read(offset, "collection length"))?;
    let mut items = Vec::with_capacity(count as usize);
    let mut cursor = offset + 1;
    for _ in 0..count {
        let (next_rest, value) = decode_one(rest, cursor)?;
        cursor += rest.len() - next_rest.len();
        rest = next_rest;
        items.push(value);
    }
    Ok((rest, wrap(items)))
}

fn decode_length_prefixed_bytes<'a>(
    input: &'a [u8],
    offset: usize,
) -> Result<(&'a [u8], Vec<u8>), HanError> {
    let (rest, len) =
        be_u8::<_, nom::error::Error<&[u8]>>(input).map_err(|_| short_read(offset, "string length"))?;
    let (rest, bytes): (&[u8], &[u8]) = take::<_, _, nom::error::Error<&[u8]>>(len as usize)(rest)
        .map_err(|_| short_read(offset + 1, "string body"))?;
    Ok((rest, bytes.to_vec()))
}

fn ascii_lossy(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Decodes the UTF-8 variant, whose length prefix counts *characters*, not
/// bytes: read one byte at a time and accumulate until a complete code
/// point has been decoded, then repeat. Invalid sequences yield U+FFFD.
fn decode_utf8_string<'a>(input: &'a [u8], offset: usize) -> Result<(&'a [u8], Value), HanError> {
    let (mut rest, char_count) =
        be_u8::<_, nom::error::Error<&[u8]>>(input).map_err(|_| short_read(offset, "utf8 length"))?;
    let mut text = String::new();
    let mut byte_offset = offset + 1;
    for _ in 0..char_count {
        let mut buf = Vec::new();
        loop {
            let (next_rest, byte) =
                be_u8::<_, nom::error::Error<&[u8]>>(rest).map_err(|_| short_read(byte_offset, "utf8 body"))?;
            buf.push(byte);
            rest = next_rest;
            byte_offset += 1;
            match std::str::from_utf8(&buf) {
                Ok(s) => {
                    text.push_str(s);
                    break;
                }
                Err(e) if e.error_len().is_some() => {
                    // Invalid sequence: emit replacement and restart on the
                    // byte that caused the error.
                    text.push('\u{FFFD}');
                    break;
                }
                Err(_) => continue, // Incomplete sequence so far; keep reading.
            }
        }
    }
    Ok((rest, Value::Utf8String(text)))
}

fn short_read(offset: usize, what: &str) -> HanError {
    HanError::MalformedFrame {
        offset,
        reason: format!("short read decoding {what}"),
    }
}
