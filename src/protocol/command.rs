//! Command definitions
//!
//! Requests sent to the cache server.

/// Longest key the server accepts
pub const MAX_KEY_LEN: usize = 250;

/// Largest data block accepted in a `VALUE` reply, memcached's hard item
/// size ceiling (1 GiB)
pub const MAX_VALUE_LEN: usize = 1024 * 1024 * 1024;

/// Arguments of a storage command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageArgs {
    pub key: String,

    /// Raw value bytes, sent length-prefixed
    pub value: Vec<u8>,

    /// Opaque client flags stored alongside the value
    pub flags: u32,

    /// Seconds until expiry, 0 = never
    pub expiration: i64,
}

impl StorageArgs {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>, expiration: i64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            flags: 0,
            expiration,
        }
    }

    /// Build args from form-style text fields.
    ///
    /// The expiration goes through [`parse_expiration`].
    pub fn from_fields(key: impl Into<String>, value: impl Into<Vec<u8>>, expiration: &str) -> Self {
        Self::new(key, value, parse_expiration(expiration))
    }
}

/// Parse an expiration field. Anything that is not an integer means 0.
///
/// Integers are passed through as given, sign included.
pub fn parse_expiration(field: &str) -> i64 {
    field.parse::<i64>().unwrap_or(0)
}

/// A request to the cache server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Dump server statistics
    Stats,

    /// Fetch one key
    Get { key: String },

    /// Store a value unconditionally
    Set(StorageArgs),

    /// Remove one key
    Delete { key: String },

    /// Invalidate every item
    FlushAll,
}

impl Command {
    /// Protocol verb for this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::Stats => "stats",
            Command::Get { .. } => "get",
            Command::Set(_) => "set",
            Command::Delete { .. } => "delete",
            Command::FlushAll => "flush_all",
        }
    }

    /// Key this command targets, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Command::Get { key } | Command::Delete { key } => Some(key.as_str()),
            Command::Set(args) => Some(args.key.as_str()),
            Command::Stats | Command::FlushAll => None,
        }
    }
}
