//! Network Module
//!
//! Blocking TCP connections to a cache server.
//!
//! ## Lifecycle
//! - One connection per operation, never pooled
//! - Closed before the operation returns, on every exit path
//! - A [`CloseHandle`] lets a supervisor unblock an in-flight read

mod connection;

pub use connection::{CloseHandle, ConnectOptions, Connection};
