//! Configuration for memview
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{MemviewError, Result};

// =============================================================================
// Server Address
// =============================================================================

/// A parsed `host:port` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    host: String,
    port: u16,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse a `host:port` token.
    ///
    /// IPv6 hosts must be bracketed (`[::1]:11211`).
    pub fn parse(token: &str) -> Result<Self> {
        let (host, port) = token.rsplit_once(':').ok_or_else(|| {
            MemviewError::Config(format!("server address '{}' is missing a port", token))
        })?;

        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if host.is_empty() {
            return Err(MemviewError::Config(format!(
                "server address '{}' is missing a host",
                token
            )));
        }
        if host.contains(':') && !token.starts_with('[') {
            return Err(MemviewError::Config(format!(
                "IPv6 server address '{}' must be bracketed",
                token
            )));
        }

        let port = port.parse::<u16>().map_err(|_| {
            MemviewError::Config(format!("server address '{}' has an invalid port", token))
        })?;

        Ok(Self::new(host, port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for ServerAddress {
    type Err = MemviewError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

// =============================================================================
// Per-server Configuration
// =============================================================================

/// Application key convention for a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTransformConfig {
    /// Application name whose checksum prefixes every key
    pub namespace: String,

    /// Replace the prefixed key with its MD5 digest
    pub secondary_hash: bool,
}

/// One cache server the operator can target
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: ServerAddress,

    /// Display name, empty when none was given
    pub alias: String,

    /// Key convention, `None` when keys are used verbatim
    pub key_transform: Option<KeyTransformConfig>,
}

impl ServerConfig {
    pub fn new(address: ServerAddress) -> Self {
        Self {
            address,
            alias: String::new(),
            key_transform: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_key_transform(mut self, transform: KeyTransformConfig) -> Self {
        self.key_transform = Some(transform);
        self
    }

    /// Name used to look the server up (`host:port`)
    pub fn name(&self) -> String {
        self.address.to_string()
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Main configuration for a memview instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Server Configuration
    // -------------------------------------------------------------------------
    /// Servers in the order they were configured
    pub servers: Vec<ServerConfig>,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Dial timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            connect_timeout_ms: 3000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Look up a server by its `host:port` name
    pub fn server(&self, name: &str) -> Result<&ServerConfig> {
        self.servers
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| MemviewError::Config(format!("unknown server '{}'", name)))
    }

    /// Look up a server, falling back to the first configured one
    pub fn server_or_first(&self, name: Option<&str>) -> Result<&ServerConfig> {
        if let Some(found) = name.and_then(|n| self.server(n).ok()) {
            return Ok(found);
        }
        self.servers
            .first()
            .ok_or_else(|| MemviewError::Config("no servers configured".to_string()))
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Add a server
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.servers.push(server);
        self
    }

    /// Set the dial timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
