//! Serialized Value Module
//!
//! Decoder for the length-prefixed, type-tagged format PHP's `serialize()`
//! produces, plus the rendering steps applied to `get` payloads.
//!
//! ## Grammar
//! ```text
//! value  := null | bool | int | float | string | array
//! null   := 'N' ';'
//! bool   := 'b' ':' ('0'|'1') ';'
//! int    := 'i' ':' digits ';'
//! float  := 'd' ':' float-literal ';'
//! string := 's' ':' length ':' '"' <length raw bytes> '"' ';'
//! array  := 'a' ':' count ':' '{' (value value){count} '}'
//! ```
//!
//! ## Layers
//! 1. [`ContentSniff`] decides whether a payload is worth decoding
//! 2. [`parse`] decodes it into a [`Value`] tree, all or nothing
//! 3. [`expand_nested_document`] optionally reparses an embedded JSON head

mod value;
mod parser;
mod sniff;
mod nested;

pub use value::Value;
pub use parser::{parse, Parser, DEFAULT_MAX_DEPTH};
pub use sniff::{ArrayPrefixSniff, ContentSniff};
pub use nested::{expand_nested_document, json_to_value};
