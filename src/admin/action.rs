//! Action allow-list and requests

use std::fmt;
use std::str::FromStr;

use crate::error::{MemviewError, Result};
use crate::protocol::parse_expiration;

/// Operations an operator may run against a server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Get,
    Set,
    Delete,
    FlushAll,
}

impl Action {
    /// Every accepted action name
    pub const ALLOWED: [&'static str; 4] = ["get", "set", "delete", "flush_all"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Set => "set",
            Action::Delete => "delete",
            Action::FlushAll => "flush_all",
        }
    }
}

impl FromStr for Action {
    type Err = MemviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "get" => Ok(Action::Get),
            "set" => Ok(Action::Set),
            "delete" => Ok(Action::Delete),
            "flush_all" => Ok(Action::FlushAll),
            other => Err(MemviewError::Config(format!("unknown action '{}'", other))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated operator request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    Get { key: String },
    Set { key: String, value: String, expiration: i64 },
    Delete { key: String },
    FlushAll,
}

impl ActionRequest {
    /// Build a request from form-style fields.
    ///
    /// `action` must be on the allow-list. A missing `exp_time` means 0, and
    /// so does one that is not an integer.
    pub fn from_fields(
        action: &str,
        key: Option<&str>,
        value: Option<&str>,
        exp_time: Option<&str>,
    ) -> Result<Self> {
        let key = key.unwrap_or_default().to_string();
        Ok(match action.parse::<Action>()? {
            Action::Get => ActionRequest::Get { key },
            Action::Set => ActionRequest::Set {
                key,
                value: value.unwrap_or_default().to_string(),
                expiration: parse_expiration(exp_time.unwrap_or("0")),
            },
            Action::Delete => ActionRequest::Delete { key },
            Action::FlushAll => ActionRequest::FlushAll,
        })
    }

    pub fn action(&self) -> Action {
        match self {
            ActionRequest::Get { .. } => Action::Get,
            ActionRequest::Set { .. } => Action::Set,
            ActionRequest::Delete { .. } => Action::Delete,
            ActionRequest::FlushAll => Action::FlushAll,
        }
    }
}
