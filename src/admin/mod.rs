//! Admin Module
//!
//! The operator-facing layer: picks a server, applies its key convention,
//! runs one allow-listed action and shapes the result for display.
//!
//! ## Flow
//! ```text
//! ActionRequest ──► key transform (if enabled) ──► CacheClient
//!                                                      │
//!        ActionOutcome ◄── render_payload (get only) ◄─┘
//! ```

mod action;
mod payload;
mod stats;

pub use action::{Action, ActionRequest};
pub use payload::{render_payload, Payload};
pub use stats::{format_memory_usage, format_uptime, StatsSummary};

use serde::Serialize;

use crate::client::CacheClient;
use crate::config::{Config, ServerConfig};
use crate::error::Result;
use crate::protocol::StorageArgs;
use crate::serialized::{ArrayPrefixSniff, ContentSniff};

/// Result of a successful action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionOutcome {
    /// `get` hit
    Found(Payload),

    /// `get` miss
    NotFound,

    /// Literal status line from `set`, `delete` or `flush_all`
    Response(String),
}

/// Runs operator actions against configured servers
pub struct Admin {
    config: Config,
    sniff: Box<dyn ContentSniff + Send + Sync>,
}

impl Admin {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sniff: Box::new(ArrayPrefixSniff),
        }
    }

    /// Replace the check deciding which payloads get decoded
    pub fn with_sniff(mut self, sniff: impl ContentSniff + Send + Sync + 'static) -> Self {
        self.sniff = Box::new(sniff);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stats for `server`, or for the first configured server when `server`
    /// is absent or unknown
    pub fn stats(&self, server: Option<&str>) -> Result<StatsSummary> {
        let target = self.config.server_or_first(server)?;
        let snapshot = self.client(target).stats()?;
        Ok(StatsSummary::from_snapshot(&snapshot).for_server(target))
    }

    /// Run `request` against the server named `server`.
    ///
    /// Unknown servers are rejected before any connection is made.
    pub fn execute(&self, server: &str, request: &ActionRequest) -> Result<ActionOutcome> {
        let target = self.config.server(server)?;
        let client = self.client(target);

        tracing::info!("{} on {}", request.action(), target.name());

        match request {
            ActionRequest::Get { key } => {
                let outcome = match client.get(&storage_key(target, key))? {
                    Some(raw) => ActionOutcome::Found(render_payload(
                        raw,
                        self.sniff.as_ref(),
                        target.key_transform.is_some(),
                    )),
                    None => ActionOutcome::NotFound,
                };
                Ok(outcome)
            }
            ActionRequest::Set {
                key,
                value,
                expiration,
            } => {
                let args = StorageArgs::new(storage_key(target, key), value.as_bytes(), *expiration);
                Ok(ActionOutcome::Response(client.set(args)?.into_string()))
            }
            ActionRequest::Delete { key } => {
                Ok(ActionOutcome::Response(client.delete(&storage_key(target, key))?.into_string()))
            }
            ActionRequest::FlushAll => Ok(ActionOutcome::Response(client.flush_all()?.into_string())),
        }
    }

    fn client(&self, server: &ServerConfig) -> CacheClient {
        CacheClient::with_config(server.address.clone(), &self.config)
    }
}

/// Key as stored on `server`, after its key convention if it has one
fn storage_key(server: &ServerConfig, key: &str) -> String {
    match &server.key_transform {
        Some(transform) => transform.apply(key),
        None => key.to_string(),
    }
}
