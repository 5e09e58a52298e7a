//! Recursive-descent parser
//!
//! Decodes one value from a byte buffer. Declared lengths and counts are
//! authoritative: a string payload is taken as exactly `length` raw bytes,
//! an array consumes exactly `2 * count` values. Any grammar violation,
//! including leftover input, aborts the whole parse.
//!
//! Arrays nest up to [`DEFAULT_MAX_DEPTH`] levels unless the parser is
//! built with [`Parser::with_max_depth`]. Deeper input is a decode error.

use bytes::Bytes;

use crate::error::{MemviewError, Result};
use super::Value;

/// Decode a complete buffer into a single value
pub fn parse(input: impl Into<Bytes>) -> Result<Value> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    if parser.remaining() > 0 {
        return Err(parser.error(format!(
            "{} trailing bytes after value",
            parser.remaining()
        )));
    }
    Ok(value)
}

/// Array nesting accepted by [`parse`]
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Position-tracked cursor over the input
pub struct Parser {
    input: Bytes,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(input: impl Into<Bytes>) -> Self {
        Self {
            input: input.into(),
            pos: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the deepest array nesting accepted
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Byte offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Decode the value starting at the current position
    pub fn parse_value(&mut self) -> Result<Value> {
        let start = self.pos;
        let tag = self.next_byte()?;

        match tag {
            b'N' => {
                self.expect(b';')?;
                Ok(Value::Null)
            }
            b'b' => {
                self.expect(b':')?;
                let flag = match self.next_byte()? {
                    b'0' => false,
                    b'1' => true,
                    other => {
                        return Err(self.error_at(
                            self.pos - 1,
                            format!("boolean must be 0 or 1, got {:?}", other as char),
                        ))
                    }
                };
                self.expect(b';')?;
                Ok(Value::Bool(flag))
            }
            b'i' => {
                self.expect(b':')?;
                let n = self.number_until::<i64>(b';', "integer")?;
                Ok(Value::Int(n))
            }
            b'd' => {
                self.expect(b':')?;
                let f = self.number_until::<f64>(b';', "float")?;
                Ok(Value::Float(f))
            }
            b's' => {
                self.expect(b':')?;
                let len = self.number_until::<usize>(b':', "string length")?;
                self.expect(b'"')?;
                let payload = self.take(len)?;
                self.expect(b'"')?;
                self.expect(b';')?;
                Ok(Value::Str(payload))
            }
            b'a' => {
                if self.depth >= self.max_depth {
                    return Err(self.error_at(
                        start,
                        format!("arrays nested deeper than {} levels", self.max_depth),
                    ));
                }
                self.expect(b':')?;
                let count = self.number_until::<usize>(b':', "array count")?;
                self.expect(b'{')?;
                // Each pair needs at least four bytes, so a lying count
                // cannot force a huge allocation
                let mut pairs = Vec::with_capacity(count.min(self.remaining() / 4));
                self.depth += 1;
                for _ in 0..count {
                    let key = self.parse_value()?;
                    let value = self.parse_value()?;
                    pairs.push((key, value));
                }
                self.depth -= 1;
                self.expect(b'}')?;
                Ok(Value::Assoc(pairs))
            }
            other => Err(self.error_at(start, format!("unknown type tag {:?}", other as char))),
        }
    }

    // =========================================================================
    // Cursor primitives
    // =========================================================================

    fn next_byte(&mut self) -> Result<u8> {
        let byte = *self
            .input
            .get(self.pos)
            .ok_or_else(|| self.error("unexpected end of input"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect(&mut self, wanted: u8) -> Result<()> {
        let at = self.pos;
        let got = self.next_byte()?;
        if got != wanted {
            return Err(self.error_at(
                at,
                format!("expected {:?}, got {:?}", wanted as char, got as char),
            ));
        }
        Ok(())
    }

    /// Zero-copy slice of the next `len` bytes
    fn take(&mut self, len: usize) -> Result<Bytes> {
        if len > self.remaining() {
            return Err(self.error(format!(
                "string declares {} bytes but only {} remain",
                len,
                self.remaining()
            )));
        }
        let slice = self.input.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(slice)
    }

    /// Parse the ASCII number running up to `delimiter`, consuming both
    fn number_until<T: std::str::FromStr>(&mut self, delimiter: u8, what: &str) -> Result<T> {
        let start = self.pos;
        let end = self.input[start..]
            .iter()
            .position(|&b| b == delimiter)
            .map(|offset| start + offset)
            .ok_or_else(|| {
                self.error(format!("unterminated {}, expected {:?}", what, delimiter as char))
            })?;

        let parsed = std::str::from_utf8(&self.input[start..end])
            .ok()
            .and_then(|text| text.parse::<T>().ok())
            .ok_or_else(|| {
                self.error_at(
                    start,
                    format!(
                        "invalid {} {:?}",
                        what,
                        String::from_utf8_lossy(&self.input[start..end])
                    ),
                )
            })?;

        self.pos = end + 1;
        Ok(parsed)
    }

    fn error(&self, reason: impl Into<String>) -> MemviewError {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, offset: usize, reason: impl Into<String>) -> MemviewError {
        MemviewError::Decode {
            offset,
            reason: reason.into(),
        }
    }
}
