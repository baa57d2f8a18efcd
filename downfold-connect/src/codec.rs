//! Transport envelope and JSON record codec.

use std::collections::HashMap;

use downfold_core::types::{OutputRecord, Record};

use crate::error::TransportError;

/// One transport message: optional key, byte payload, string headers.
///
/// Both the inbound and outbound transport use this shape; aggregation is
/// not per-entity, so outbound envelopes usually leave the key unset.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub key: Option<String>,
    pub payload: Vec<u8>,
    pub headers: HashMap<String, String>,
}

impl Envelope {
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            key: None,
            payload,
            headers: HashMap::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Decode a JSON payload into a [`Record`], carrying over the envelope's
/// key and headers.
pub fn decode_record(envelope: &Envelope) -> Result<Record, TransportError> {
    let mut record: Record = serde_json::from_slice(&envelope.payload)?;
    record.key = envelope.key.clone();
    record.headers = envelope.headers.clone();
    Ok(record)
}

/// Encode a closed-window summary as `{"time": <end ms>, "<field>": <mean>}`.
pub fn encode_output(output: &OutputRecord) -> Vec<u8> {
    let mut body = serde_json::Map::new();
    body.insert("time".to_string(), output.time.into());
    body.insert(output.field.clone(), output.value.into());
    serde_json::Value::Object(body).to_string().into_bytes()
}
