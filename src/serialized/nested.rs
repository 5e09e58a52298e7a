//! Nested document expansion
//!
//! Framework caches store `[payload, dependency]` pairs where the payload
//! is itself a JSON document. This runs after [`parse`](super::parse) and
//! never inside it.

use bytes::Bytes;

use super::Value;

/// Reparse the head of a two-element array when it holds a JSON object.
///
/// Applies only when `value` is an association list of exactly two pairs
/// whose first value is a string starting with `{`. When the string is not
/// valid JSON the failure is logged and `value` is returned untouched.
pub fn expand_nested_document(value: Value) -> Value {
    let mut pairs = match value {
        Value::Assoc(pairs) if pairs.len() == 2 => pairs,
        other => return other,
    };

    let head = match &pairs[0].1 {
        Value::Str(bytes) if bytes.first() == Some(&b'{') => Some(bytes.clone()),
        _ => None,
    };
    let Some(head) = head else {
        return Value::Assoc(pairs);
    };

    match serde_json::from_slice::<serde_json::Value>(&head) {
        Ok(document) => pairs[0].1 = json_to_value(document),
        Err(e) => {
            tracing::warn!("Keeping embedded document as text, JSON decode failed: {}", e);
        }
    }

    Value::Assoc(pairs)
}

/// Convert a JSON tree into a [`Value`].
///
/// Objects keep their member order under string keys; arrays become
/// association lists keyed by index.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Str(Bytes::from(s)),
        serde_json::Value::Array(items) => Value::Assoc(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (Value::Int(i as i64), json_to_value(item)))
                .collect(),
        ),
        serde_json::Value::Object(members) => Value::Assoc(
            members
                .into_iter()
                .map(|(k, v)| (Value::Str(Bytes::from(k)), json_to_value(v)))
                .collect(),
        ),
    }
}
