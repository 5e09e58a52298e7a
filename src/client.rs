//! Cache Client
//!
//! The five public cache operations. Each call dials its own connection,
//! runs one request/reply exchange and closes the connection before
//! returning, whatever the outcome.

use crate::config::{Config, ServerAddress};
use crate::error::Result;
use crate::network::{ConnectOptions, Connection};
use crate::protocol::{
    encode_command, read_stats, read_status, read_value, Command, StatsSnapshot, StatusReply,
    StorageArgs,
};

/// Client for one cache server
#[derive(Debug, Clone)]
pub struct CacheClient {
    address: ServerAddress,
    options: ConnectOptions,
}

impl CacheClient {
    pub fn new(address: ServerAddress, options: ConnectOptions) -> Self {
        Self { address, options }
    }

    /// Client using the timeouts from `config`
    pub fn with_config(address: ServerAddress, config: &Config) -> Self {
        Self::new(address, ConnectOptions::from(config))
    }

    /// Server statistics
    pub fn stats(&self) -> Result<StatsSnapshot> {
        self.exchange(&Command::Stats, |conn| read_stats(conn))
    }

    /// Raw bytes stored under `key`, `None` when the key is absent
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let command = Command::Get {
            key: key.to_string(),
        };
        let block = self.exchange(&command, |conn| read_value(conn))?;
        Ok(block.map(|b| b.data))
    }

    /// Store a value. Returns the server's status line verbatim.
    pub fn set(&self, args: StorageArgs) -> Result<StatusReply> {
        self.exchange(&Command::Set(args), |conn| read_status(conn))
    }

    /// Remove a key. Returns the server's status line verbatim.
    pub fn delete(&self, key: &str) -> Result<StatusReply> {
        let command = Command::Delete {
            key: key.to_string(),
        };
        self.exchange(&command, |conn| read_status(conn))
    }

    /// Invalidate every item. Returns the server's status line verbatim.
    pub fn flush_all(&self) -> Result<StatusReply> {
        self.exchange(&Command::FlushAll, |conn| read_status(conn))
    }

    pub fn address(&self) -> &ServerAddress {
        &self.address
    }

    /// Write `command`, then read its full reply with `read_reply`.
    ///
    /// The request is encoded before dialing so an invalid key never opens
    /// a socket.
    fn exchange<T>(
        &self,
        command: &Command,
        read_reply: impl FnOnce(&mut Connection) -> Result<T>,
    ) -> Result<T> {
        let request = encode_command(command)?;

        tracing::debug!(
            "{} {} on {}",
            command.name(),
            command.key().unwrap_or(""),
            self.address
        );

        let mut conn = Connection::open(&self.address, &self.options)?;
        let result = conn.write(&request).and_then(|()| read_reply(&mut conn));
        conn.close();

        if let Err(e) = &result {
            tracing::debug!("{} on {} failed: {}", command.name(), self.address, e);
        }
        result
    }
}
