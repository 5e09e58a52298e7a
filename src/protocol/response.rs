//! Response definitions
//!
//! Replies read back from the cache server.

use std::collections::HashMap;

/// Stat name to raw value, as returned by one `stats` exchange
pub type StatsSnapshot = HashMap<String, String>;

/// A single status line, verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReply(pub String);

impl StatusReply {
    pub const STORED: &'static str = "STORED";
    pub const DELETED: &'static str = "DELETED";
    pub const OK: &'static str = "OK";

    /// The literal server text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_stored(&self) -> bool {
        self.0 == Self::STORED
    }

    pub fn is_deleted(&self) -> bool {
        self.0 == Self::DELETED
    }

    pub fn is_ok(&self) -> bool {
        self.0 == Self::OK
    }
}

/// One value from a `get` reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueBlock {
    pub key: String,
    pub flags: u32,
    pub data: Vec<u8>,
}
