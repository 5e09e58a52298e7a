//! Decoded value tree

use bytes::Bytes;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A decoded serialized value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),

    /// Raw bytes; not necessarily UTF-8
    Str(Bytes),

    /// Key/value pairs in encounter order. Keys are not deduplicated.
    Assoc(Vec<(Value, Value)>),
}

impl Value {
    /// Build a string value from anything byte-like
    pub fn str(bytes: impl Into<Bytes>) -> Self {
        Value::Str(bytes.into())
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(b) => Some(b.as_ref()),
            _ => None,
        }
    }

    pub fn as_assoc(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Assoc(pairs) => Some(pairs.as_slice()),
            _ => None,
        }
    }

    /// Look up the first pair whose key equals `key`
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_assoc()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// True for an association list keyed `0, 1, 2, ...` in order
    pub fn is_list(&self) -> bool {
        match self {
            Value::Assoc(pairs) => pairs
                .iter()
                .enumerate()
                .all(|(i, (k, _))| matches!(k, Value::Int(n) if *n == i as i64)),
            _ => false,
        }
    }

    /// Key rendering used when an association list becomes a JSON object.
    ///
    /// For display only. Floats use Rust's shortest form, so `1.0` renders
    /// as `"1"`. Distinct keys may render the same string.
    fn key_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => String::new(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(b) => String::from_utf8_lossy(b).into_owned(),
            Value::Assoc(_) => "Array".to_string(),
        }
    }
}

/// Display form: lists become arrays, other association lists become
/// objects with stringified keys, strings are rendered as lossy UTF-8.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(b) => serializer.serialize_str(&String::from_utf8_lossy(b)),
            Value::Assoc(pairs) if self.is_list() => {
                let mut seq = serializer.serialize_seq(Some(pairs.len()))?;
                for (_, v) in pairs {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Assoc(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    map.serialize_entry(&k.key_string(), v)?;
                }
                map.end()
            }
        }
    }
}
