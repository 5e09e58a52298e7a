//! Rendering of `get` payloads

use bytes::Bytes;
use serde::Serialize;

use crate::serialized::{expand_nested_document, parse, ContentSniff, Value};

/// What a `get` payload turned into
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Not sniffed as serialized, or failed to decode; lossy UTF-8
    Text(String),

    /// Decoded value tree
    Decoded(Value),
}

/// Decode `raw` when `sniff` accepts it, otherwise pass it through as text.
///
/// A decode failure falls back to text. With `expand_nested` the nested
/// document stage runs on the decoded tree.
pub fn render_payload(raw: Vec<u8>, sniff: &dyn ContentSniff, expand_nested: bool) -> Payload {
    if !sniff.looks_serialized(&raw) {
        return Payload::Text(String::from_utf8_lossy(&raw).into_owned());
    }

    let raw = Bytes::from(raw);
    match parse(raw.clone()) {
        Ok(value) if expand_nested => Payload::Decoded(expand_nested_document(value)),
        Ok(value) => Payload::Decoded(value),
        Err(e) => {
            tracing::warn!("Showing payload as text, decode failed: {}", e);
            Payload::Text(String::from_utf8_lossy(&raw).into_owned())
        }
    }
}
