//! # Emitter
//!
//! Serialises a decoded frame — its HDLC/LLC/APDU header, the raw COSEM
//! value tree, and the interpreter's flat measurement map — into the JSON
//! document shape of §6, and dispatches it to one or more sinks.
//!
//! `serde_json::Value`'s default `Map` is a `BTreeMap`, so object keys come
//! out alphabetically sorted with no extra work on our part; that is what
//! satisfies the "keys sorted" requirement for both the pretty and compact
//! output forms.

use crate::cosem::Value;
use crate::error::HanError;
use crate::frame::DecodedFrame;
use crate::interpreter::Measurement;
use crate::util::hex::encode_hex;
use std::collections::BTreeMap;
use std::io::Write;

/// Builds the full JSON document for one decoded frame.
pub fn build_document(
    frame: &DecodedFrame<'_>,
    payload_values: &[Value],
    data: &BTreeMap<String, Measurement>,
) -> serde_json::Value {
    serde_json::json!({
        "header": header_json(frame),
        "payload": payload_values.iter().map(value_to_json).collect::<Vec<_>>(),
        "data": data,
    })
}

fn header_json(frame: &DecodedFrame<'_>) -> serde_json::Value {
    serde_json::json!({
        "hdlc_length": frame.length,
        "hdlc_segmentation": frame.segmentation as u8,
        "hdlc_type": frame.frame_type,
        "hdlc_frame_format": hex4(frame.frame_format),
        "hdlc_addr_client": encode_hex(&frame.client_address),
        "hdlc_addr_server": encode_hex(&frame.server_address),
        "hdlc_control": hex2(frame.control),
        "hdlc_hcs": hex4(frame.hcs),
        "llc_dst_svc_ap": hex2(frame.llc[0]),
        "llc_src_svc_ap": hex2(frame.llc[1]),
        "llc_control": hex2(frame.llc[2]),
        "apdu_tag": hex2(frame.apdu_tag),
        "apdu_invoke_id_and_priority": hex8(frame.invoke_id_and_priority),
        "hdlc_fcs": hex4(frame.fcs),
    })
}

/// Renders the raw COSEM value tree for the `payload` field: octet-strings
/// as hex (the only variant that isn't already natural JSON), everything
/// else structurally, recursing into arrays and structures.
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Array(items) | Value::Structure(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::U32(v) => serde_json::json!(v),
        Value::OctetString(bytes) => serde_json::Value::String(encode_hex(bytes)),
        Value::VisibleString(s) | Value::Utf8String(s) => serde_json::Value::String(s.clone()),
        Value::I8(v) => serde_json::json!(v),
        Value::I16(v) => serde_json::json!(v),
        Value::U16(v) => serde_json::json!(v),
        Value::Enum(v) => serde_json::json!(v),
    }
}

fn hex2(v: u8) -> String {
    format!("0x{v:02X}")
}

fn hex4(v: u16) -> String {
    format!("0x{v:04X}")
}

fn hex8(v: u32) -> String {
    format!("0x{v:08X}")
}

/// A destination for one JSON document per decoded frame. `Decoder` invokes
/// this once per accepted frame, in arrival order (§5): the emitter never
/// begins the next frame's document before the current one's `emit`
/// returns, so a sink that writes synchronously sees frames strictly in
/// sequence.
pub trait FrameSink {
    fn emit(&mut self, document: &serde_json::Value) -> Result<(), HanError>;
}

/// Emits pretty-printed (default) or compact, one-line JSON to any `Write`
/// (stdout, a file, a child-process pipe).
pub struct WriterSink<W: Write> {
    writer: W,
    compact: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, compact: bool) -> Self {
        Self { writer, compact }
    }
}

impl<W: Write> FrameSink for WriterSink<W> {
    fn emit(&mut self, document: &serde_json::Value) -> Result<(), HanError> {
        if self.compact {
            serde_json::to_writer(&mut self.writer, document)?;
        } else {
            serde_json::to_writer_pretty(&mut self.writer, document)?;
        }
        writeln!(self.writer).map_err(HanError::Io)?;
        self.writer.flush().map_err(HanError::Io)?;
        Ok(())
    }
}

/// Fans a document out to every sink in the list, so a caller can wire up
/// e.g. stdout plus a child-process pipe without the core knowing either
/// sink's concrete type.
pub struct MultiSink {
    sinks: Vec<Box<dyn FrameSink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Box<dyn FrameSink>>) -> Self {
        Self { sinks }
    }
}

impl FrameSink for MultiSink {
    fn emit(&mut self, document: &serde_json::Value) -> Result<(), HanError> {
        for sink in &mut self.sinks {
            sink.emit(document)?;
        }
        Ok(())
    }
}
