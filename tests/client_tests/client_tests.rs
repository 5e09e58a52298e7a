//! Tests for CacheClient and Connection
//!
//! These tests verify:
//! - The five operations against a live loopback server
//! - Exact request bytes on the wire
//! - Error classification (connect, protocol, closed connection)
//! - Closing a connection from another thread

#[path = "../support/mod.rs"]
mod support;

use std::thread;
use std::time::{Duration, Instant};

use memview::network::{ConnectOptions, Connection};
use memview::protocol::StorageArgs;
use memview::{CacheClient, MemviewError};
use support::{closed_address, MockServer, ScriptedServer};

// =============================================================================
// Helper Functions
// =============================================================================

fn options() -> ConnectOptions {
    ConnectOptions {
        connect_timeout: Some(Duration::from_secs(2)),
        read_timeout: Some(Duration::from_secs(5)),
        write_timeout: Some(Duration::from_secs(5)),
    }
}

fn setup_client() -> (MockServer, CacheClient) {
    let server = MockServer::spawn();
    let client = CacheClient::new(server.address(), options());
    (server, client)
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_set_then_get() {
    let (_server, client) = setup_client();

    let reply = client.set(StorageArgs::new("greeting", "hello", 0)).unwrap();
    assert!(reply.is_stored());

    assert_eq!(client.get("greeting").unwrap(), Some(b"hello".to_vec()));
}

#[test]
fn test_get_missing_key() {
    let (_server, client) = setup_client();
    assert_eq!(client.get("absent").unwrap(), None);
}

#[test]
fn test_value_with_terminators_round_trips() {
    let (server, client) = setup_client();
    let value = b"first\r\nEND\r\nSTAT x y\r\n".to_vec();

    client.set(StorageArgs::new("tricky", value.clone(), 60)).unwrap();

    assert_eq!(server.stored("tricky"), Some(value.clone()));
    assert_eq!(client.get("tricky").unwrap(), Some(value));
}

#[test]
fn test_delete() {
    let (server, client) = setup_client();
    server.insert("doomed", b"x");

    assert_eq!(client.delete("doomed").unwrap().as_str(), "DELETED");
    assert_eq!(client.delete("doomed").unwrap().as_str(), "NOT_FOUND");
    assert_eq!(client.get("doomed").unwrap(), None);
}

#[test]
fn test_flush_all_clears_everything() {
    let (_server, client) = setup_client();
    for key in ["a", "b", "c"] {
        client.set(StorageArgs::new(key, "v", 0)).unwrap();
    }

    assert!(client.flush_all().unwrap().is_ok());

    for key in ["a", "b", "c"] {
        assert_eq!(client.get(key).unwrap(), None);
    }
}

#[test]
fn test_stats() {
    let (server, client) = setup_client();
    server.insert("k", &[0u8; 2048]);

    let stats = client.stats().unwrap();
    assert_eq!(stats["pid"], "4242");
    assert_eq!(stats["uptime"], "90061");
    assert_eq!(stats["bytes"], "2048");
    assert_eq!(stats["curr_items"], "1");
}

#[test]
fn test_concurrent_clients_are_independent() {
    let (_server, client) = setup_client();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            thread::spawn(move || {
                let key = format!("key{}", i);
                let value = format!("value{}", i);
                client.set(StorageArgs::new(key.as_str(), value.as_str(), 0)).unwrap();
                assert_eq!(client.get(&key).unwrap(), Some(value.into_bytes()));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

// =============================================================================
// Wire Format Tests
// =============================================================================

#[test]
fn test_set_request_bytes() {
    let server = ScriptedServer::spawn(2, b"STORED\r\n");
    let client = CacheClient::new(server.address(), options());

    let reply = client.set(StorageArgs::from_fields("k", "v", "")).unwrap();

    assert!(reply.is_stored());
    assert_eq!(server.requests.recv().unwrap(), b"set k 0 0 1\r\nv\r\n");
}

#[test]
fn test_not_stored_is_not_an_error() {
    let server = ScriptedServer::spawn(2, b"NOT_STORED\r\n");
    let client = CacheClient::new(server.address(), options());

    let reply = client.set(StorageArgs::new("k", "v", 0)).unwrap();
    assert_eq!(reply.as_str(), "NOT_STORED");
    assert!(!reply.is_stored());
}

#[test]
fn test_server_error_surfaces_text() {
    let server = ScriptedServer::spawn(2, b"SERVER_ERROR object too large for cache\r\n");
    let client = CacheClient::new(server.address(), options());

    match client.set(StorageArgs::new("k", "v", 0)) {
        Err(MemviewError::Protocol(msg)) => {
            assert_eq!(msg, "SERVER_ERROR object too large for cache")
        }
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_peer_hangs_up_mid_value() {
    let server = ScriptedServer::spawn(1, b"VALUE k 0 100\r\nonly a few bytes");
    let client = CacheClient::new(server.address(), options());

    assert!(matches!(client.get("k"), Err(MemviewError::Io(_))));
}

// =============================================================================
// Error Classification Tests
// =============================================================================

#[test]
fn test_connect_refused() {
    let client = CacheClient::new(closed_address(), options());
    match client.stats() {
        Err(MemviewError::Connect { addr, .. }) => assert!(addr.starts_with("127.0.0.1:")),
        other => panic!("Expected connect error, got {:?}", other),
    }
}

#[test]
fn test_invalid_key_never_dials() {
    // Nothing listens here, so reaching the network would be a Connect error
    let client = CacheClient::new(closed_address(), options());
    assert!(matches!(client.get("bad key"), Err(MemviewError::InvalidKey(_))));
    assert!(matches!(client.delete(""), Err(MemviewError::InvalidKey(_))));
}

// =============================================================================
// Connection Lifecycle Tests
// =============================================================================

#[test]
fn test_closed_connection_rejects_io() {
    let server = MockServer::spawn();
    let mut conn = Connection::open(&server.address(), &options()).unwrap();

    conn.close();
    conn.close();

    assert!(conn.is_closed());
    assert!(matches!(conn.write(b"stats\r\n"), Err(MemviewError::NotConnected)));
    assert!(matches!(conn.read_line(), Err(MemviewError::NotConnected)));
    assert!(matches!(conn.read_exact(1), Err(MemviewError::NotConnected)));
}

#[test]
fn test_connection_raw_exchange() {
    let server = MockServer::spawn();
    server.insert("k", b"abc");
    let mut conn = Connection::open(&server.address(), &options()).unwrap();

    conn.write(b"get k\r\n").unwrap();
    assert_eq!(conn.read_line().unwrap(), b"VALUE k 0 3");
    assert_eq!(conn.read_exact(5).unwrap(), b"abc\r\n");
    assert_eq!(conn.read_line().unwrap(), b"END");
}

#[test]
fn test_close_handle_unblocks_pending_read() {
    let server = ScriptedServer::spawn_with_delay(1, b"END\r\n", Some(Duration::from_secs(4)));
    let mut conn = Connection::open(&server.address(), &options()).unwrap();
    conn.write(b"get k\r\n").unwrap();

    let handle = conn.close_handle();
    let closer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        handle.close();
    });

    let started = Instant::now();
    let result = conn.read_line();
    closer.join().unwrap();

    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(conn.is_closed());
}
