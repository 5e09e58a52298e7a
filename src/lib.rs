//! # memview
//!
//! Operator toolkit for a memcached-compatible cache server:
//! - Text-protocol client (`stats`, `get`, `set`, `delete`, `flush_all`)
//! - One blocking connection per operation, always closed before returning
//! - Decoder for PHP `serialize()` values found in cached payloads
//! - Framework key convention (checksum namespace + optional MD5)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Admin (action allow-list)                   │
//! └──────────┬───────────────────────────────────┬──────────────┘
//!            │                                   │
//!            ▼                                   │
//!   ┌─────────────────┐                          │
//!   │  Key Transform  │                          │
//!   └────────┬────────┘                          │
//!            ▼                                   ▼
//!   ┌─────────────────┐                 ┌─────────────────┐
//!   │   CacheClient   │── get payload ─►│  Value Parser   │
//!   └────────┬────────┘                 └─────────────────┘
//!            ▼
//!   ┌─────────────────┐
//!   │ Codec over TCP  │
//!   │   Connection    │
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod network;
pub mod protocol;
pub mod client;
pub mod serialized;
pub mod keys;
pub mod admin;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{MemviewError, Result};
pub use config::{Config, KeyTransformConfig, ServerAddress, ServerConfig};
pub use client::CacheClient;
pub use admin::{Action, ActionOutcome, ActionRequest, Admin, Payload, StatsSummary};
pub use serialized::Value;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of memview
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
