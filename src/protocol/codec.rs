//! Protocol codec
//!
//! Request encoding and reply reading for the text protocol.
//!
//! Replies are read through [`ReplyReader`], which a live
//! [`Connection`](crate::network::Connection) implements and which any
//! `BufReader` over an in-memory buffer implements for testing.

use std::io::{self, BufRead, BufReader, Read};

use crate::error::{MemviewError, Result};
use super::command::{MAX_KEY_LEN, MAX_VALUE_LEN};
use super::{Command, StatsSnapshot, StatusReply, ValueBlock};

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Sentinel closing value and stats blocks
pub const END: &[u8] = b"END";

/// Prefix of a value header line
pub const VALUE_PREFIX: &[u8] = b"VALUE ";

/// Prefix of a stats line
pub const STAT_PREFIX: &[u8] = b"STAT ";

// =============================================================================
// Reply Source
// =============================================================================

/// Something replies can be read from
pub trait ReplyReader {
    /// Read one line without its terminator
    fn read_line(&mut self) -> Result<Vec<u8>>;

    /// Read exactly `n` bytes
    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>>;
}

impl<R: Read> ReplyReader for BufReader<R> {
    fn read_line(&mut self) -> Result<Vec<u8>> {
        read_line(self)
    }

    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        read_exact(self, n)
    }
}

/// Read one line from `reader`, stripping `\r\n` or a bare `\n`.
///
/// End of stream before the terminator is an `UnexpectedEof` error.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let n = reader.read_until(b'\n', &mut line)?;
    if n == 0 || line.last() != Some(&b'\n') {
        return Err(MemviewError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed mid-response",
        )));
    }
    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(line)
}

/// Initial buffer for [`read_exact`]; larger blocks grow as data arrives
const READ_CHUNK: usize = 64 * 1024;

/// Read exactly `n` bytes from `reader`, whatever they contain.
///
/// Memory is committed as bytes arrive, not up front from `n`.
pub fn read_exact<R: Read>(reader: &mut R, n: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(n.min(READ_CHUNK));
    reader.by_ref().take(n as u64).read_to_end(&mut buf)?;
    if buf.len() < n {
        return Err(MemviewError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("connection closed after {} of {} bytes", buf.len(), n),
        )));
    }
    Ok(buf)
}

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to the bytes sent on the wire
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    if let Some(key) = command.key() {
        validate_key(key)?;
    }

    let mut message = Vec::new();
    match command {
        Command::Stats | Command::FlushAll => {
            message.extend_from_slice(command.name().as_bytes());
        }
        Command::Get { key } | Command::Delete { key } => {
            message.extend_from_slice(command.name().as_bytes());
            message.push(b' ');
            message.extend_from_slice(key.as_bytes());
        }
        Command::Set(args) => {
            let header = format!(
                "set {} {} {} {}",
                args.key,
                args.flags,
                args.expiration,
                args.value.len()
            );
            message.reserve(header.len() + args.value.len() + 2 * CRLF.len());
            message.extend_from_slice(header.as_bytes());
            message.extend_from_slice(CRLF);
            message.extend_from_slice(&args.value);
        }
    }
    message.extend_from_slice(CRLF);

    Ok(message)
}

/// Reject keys that would break the line framing
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(MemviewError::InvalidKey("key is empty".to_string()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(MemviewError::InvalidKey(format!(
            "key is {} bytes (max {})",
            key.len(),
            MAX_KEY_LEN
        )));
    }
    if key.bytes().any(|b| b.is_ascii_whitespace() || b.is_ascii_control()) {
        return Err(MemviewError::InvalidKey(format!(
            "key {:?} contains whitespace or control characters",
            key
        )));
    }
    Ok(())
}

// =============================================================================
// Reply Reading
// =============================================================================

/// Read a single status line.
///
/// Error lines become [`MemviewError::Protocol`] with the server's text;
/// anything else is returned verbatim for the caller to judge.
pub fn read_status<R: ReplyReader + ?Sized>(reader: &mut R) -> Result<StatusReply> {
    let line = reader.read_line()?;
    check_error_line(&line)?;
    Ok(StatusReply(lossy(&line)))
}

/// Read the reply to a single-key `get`.
///
/// `None` when the server answers with the bare sentinel. The data block is
/// read by its declared length, so terminator-like bytes inside it are kept.
pub fn read_value<R: ReplyReader + ?Sized>(reader: &mut R) -> Result<Option<ValueBlock>> {
    let header = reader.read_line()?;
    if header == END {
        return Ok(None);
    }
    check_error_line(&header)?;

    let fields = header.strip_prefix(VALUE_PREFIX).ok_or_else(|| {
        MemviewError::Protocol(format!("expected VALUE or END, got '{}'", lossy(&header)))
    })?;

    // VALUE <key> <flags> <bytes> [<cas>]
    let mut parts = fields
        .split(|&b| b == b' ')
        .filter(|part| !part.is_empty());
    let key = parts
        .next()
        .map(lossy)
        .ok_or_else(|| malformed_header(&header))?;
    let flags = parts
        .next()
        .and_then(parse_ascii::<u32>)
        .ok_or_else(|| malformed_header(&header))?;
    let len = parts
        .next()
        .and_then(parse_ascii::<usize>)
        .ok_or_else(|| malformed_header(&header))?;
    if len > MAX_VALUE_LEN {
        return Err(MemviewError::Protocol(format!(
            "value for '{}' declares {} bytes, over the {} byte limit",
            key, len, MAX_VALUE_LEN
        )));
    }

    let data = reader.read_exact(len)?;
    let terminator = reader.read_exact(CRLF.len())?;
    if terminator != CRLF {
        return Err(MemviewError::Protocol(format!(
            "value for '{}' is longer than its declared {} bytes",
            key, len
        )));
    }

    let trailer = reader.read_line()?;
    if trailer != END {
        return Err(MemviewError::Protocol(format!(
            "expected END after value, got '{}'",
            lossy(&trailer)
        )));
    }

    Ok(Some(ValueBlock { key, flags, data }))
}

/// Read a `stats` block up to its sentinel.
///
/// Lines without the `STAT ` prefix are skipped.
pub fn read_stats<R: ReplyReader + ?Sized>(reader: &mut R) -> Result<StatsSnapshot> {
    let mut stats = StatsSnapshot::new();

    loop {
        let line = reader.read_line()?;
        if line == END {
            break;
        }
        check_error_line(&line)?;

        let Some(entry) = line.strip_prefix(STAT_PREFIX) else {
            tracing::trace!("Skipping stats line '{}'", lossy(&line));
            continue;
        };
        let entry = lossy(entry);
        let (name, value) = entry.split_once(' ').unwrap_or((entry.as_str(), ""));
        stats.insert(name.to_string(), value.to_string());
    }

    Ok(stats)
}

// =============================================================================
// Helpers
// =============================================================================

fn check_error_line(line: &[u8]) -> Result<()> {
    if line == b"ERROR" || line.starts_with(b"CLIENT_ERROR") || line.starts_with(b"SERVER_ERROR") {
        return Err(MemviewError::Protocol(lossy(line)));
    }
    Ok(())
}

fn malformed_header(header: &[u8]) -> MemviewError {
    MemviewError::Protocol(format!("malformed value header '{}'", lossy(header)))
}

fn parse_ascii<T: std::str::FromStr>(field: &[u8]) -> Option<T> {
    std::str::from_utf8(field).ok()?.parse().ok()
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
