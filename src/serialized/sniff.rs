//! Content sniffing for `get` payloads
//!
//! Stored values carry no type information, so whether to decode one is a
//! guess made from its leading bytes. The guess can be wrong: a plain text
//! value that happens to start with `a:` is sent to the parser and fails.

/// Decides whether a payload should be handed to the parser
pub trait ContentSniff {
    fn looks_serialized(&self, payload: &[u8]) -> bool;
}

/// Matches payloads longer than two bytes that start with `a:`
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayPrefixSniff;

impl ContentSniff for ArrayPrefixSniff {
    fn looks_serialized(&self, payload: &[u8]) -> bool {
        payload.len() > 2 && payload.starts_with(b"a:")
    }
}

impl<F: Fn(&[u8]) -> bool> ContentSniff for F {
    fn looks_serialized(&self, payload: &[u8]) -> bool {
        self(payload)
    }
}
