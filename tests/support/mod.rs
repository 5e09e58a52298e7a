//! In-process cache servers for integration tests
//!
//! - `MockServer`: a small working text-protocol server backed by a HashMap
//! - `ScriptedServer`: answers one connection with canned bytes

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use memview::ServerAddress;

type Store = Arc<Mutex<HashMap<String, (u32, Vec<u8>)>>>;

// =============================================================================
// Mock Server
// =============================================================================

pub struct MockServer {
    address: ServerAddress,
    store: Store,
}

impl MockServer {
    pub fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let store: Store = Arc::new(Mutex::new(HashMap::new()));

        let shared = Arc::clone(&store);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let store = Arc::clone(&shared);
                thread::spawn(move || serve(stream, store));
            }
        });

        Self {
            address: ServerAddress::new("127.0.0.1", port),
            store,
        }
    }

    pub fn address(&self) -> ServerAddress {
        self.address.clone()
    }

    pub fn name(&self) -> String {
        self.address.to_string()
    }

    /// Raw bytes stored under `key`, bypassing the protocol
    pub fn stored(&self, key: &str) -> Option<Vec<u8>> {
        self.store.lock().unwrap().get(key).map(|(_, v)| v.clone())
    }

    /// Seed a value directly
    pub fn insert(&self, key: &str, value: &[u8]) {
        self.store
            .lock()
            .unwrap()
            .insert(key.to_string(), (0, value.to_vec()));
    }
}

fn serve(stream: TcpStream, store: Store) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = stream;

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let parts: Vec<&str> = line.trim_end().split(' ').collect();

        let reply: Vec<u8> = match parts.as_slice() {
            ["get", key] => match store.lock().unwrap().get(*key) {
                Some((flags, data)) => {
                    let mut out = format!("VALUE {} {} {}\r\n", key, flags, data.len()).into_bytes();
                    out.extend_from_slice(data);
                    out.extend_from_slice(b"\r\nEND\r\n");
                    out
                }
                None => b"END\r\n".to_vec(),
            },
            ["set", key, flags, _exptime, len] => {
                let len: usize = len.parse().unwrap();
                let mut data = vec![0u8; len + 2];
                if reader.read_exact(&mut data).is_err() {
                    return;
                }
                data.truncate(len);
                store
                    .lock()
                    .unwrap()
                    .insert(key.to_string(), (flags.parse().unwrap(), data));
                b"STORED\r\n".to_vec()
            }
            ["delete", key] => match store.lock().unwrap().remove(*key) {
                Some(_) => b"DELETED\r\n".to_vec(),
                None => b"NOT_FOUND\r\n".to_vec(),
            },
            ["flush_all"] => {
                store.lock().unwrap().clear();
                b"OK\r\n".to_vec()
            }
            ["stats"] => {
                let guard = store.lock().unwrap();
                let bytes: usize = guard.values().map(|(_, v)| v.len()).sum();
                format!(
                    "STAT pid 4242\r\nSTAT uptime 90061\r\nSTAT version 1.6.21\r\n\
                     STAT limit_maxbytes 1048576\r\nSTAT bytes {}\r\nSTAT curr_items {}\r\n\
                     STAT curr_connections 2\r\nSTAT get_hits 7\r\nSTAT get_misses 3\r\nEND\r\n",
                    bytes,
                    guard.len()
                )
                .into_bytes()
            }
            _ => b"ERROR\r\n".to_vec(),
        };

        if writer.write_all(&reply).is_err() {
            return;
        }
    }
}

// =============================================================================
// Scripted Server
// =============================================================================

/// Accepts one connection, reads `request_lines` lines, writes `reply` and
/// hangs up. The request bytes are sent back over `requests`.
pub struct ScriptedServer {
    address: ServerAddress,
    pub requests: Receiver<Vec<u8>>,
}

impl ScriptedServer {
    pub fn spawn(request_lines: usize, reply: &[u8]) -> Self {
        Self::spawn_with_delay(request_lines, reply, None)
    }

    /// Like `spawn`, but stays silent for `hold` before replying
    pub fn spawn_with_delay(request_lines: usize, reply: &[u8], hold: Option<Duration>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();
        let reply = reply.to_vec();

        thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else { return };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = stream;

            let mut request = Vec::new();
            for _ in 0..request_lines {
                if reader.read_until(b'\n', &mut request).unwrap_or(0) == 0 {
                    break;
                }
            }
            let _ = tx.send(request);

            if let Some(hold) = hold {
                thread::sleep(hold);
            }
            let _ = writer.write_all(&reply);
        });

        Self {
            address: ServerAddress::new("127.0.0.1", port),
            requests: rx,
        }
    }

    pub fn address(&self) -> ServerAddress {
        self.address.clone()
    }
}

/// An address nothing is listening on
pub fn closed_address() -> ServerAddress {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    ServerAddress::new("127.0.0.1", port)
}
