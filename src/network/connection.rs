//! Connection
//!
//! A single blocking connection to one cache server.

use std::io::{self, BufReader, BufWriter, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, ServerAddress};
use crate::error::{MemviewError, Result};
use crate::protocol::{read_exact as codec_read_exact, read_line as codec_read_line, ReplyReader};

/// Timeouts applied when dialing and while exchanging data
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectOptions {
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl From<&Config> for ConnectOptions {
    fn from(config: &Config) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        }
    }
}

/// Shuts a connection down from any thread.
///
/// Closing is idempotent; a read blocked on the socket returns as soon as
/// the shutdown lands.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    stream: Arc<TcpStream>,
    closed: Arc<AtomicBool>,
}

impl CloseHandle {
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            // NotConnected here only means the peer already hung up
            let _ = self.stream.shutdown(Shutdown::Both);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// An open connection to a cache server
pub struct Connection {
    /// TCP stream reader (buffered for line reads)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered so a request goes out in one flush)
    writer: BufWriter<TcpStream>,

    closer: CloseHandle,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Resolve `address` and dial it.
    ///
    /// Every resolved socket address is tried in order; the last dial error
    /// is reported if none succeeds. Nothing is retried.
    pub fn open(address: &ServerAddress, options: &ConnectOptions) -> Result<Self> {
        let addr_text = address.to_string();
        let connect_err = |source: io::Error| MemviewError::Connect {
            addr: addr_text.clone(),
            source,
        };

        let candidates: Vec<SocketAddr> = (address.host(), address.port())
            .to_socket_addrs()
            .map_err(connect_err)?
            .collect();

        let mut last_err = io::Error::new(
            io::ErrorKind::NotFound,
            "host resolved to no addresses",
        );
        let mut stream = None;
        for candidate in candidates {
            let attempt = match options.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&candidate, timeout),
                None => TcpStream::connect(candidate),
            };
            match attempt {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!("Dial {} ({}) failed: {}", addr_text, candidate, e);
                    last_err = e;
                }
            }
        }
        let stream = stream.ok_or_else(|| connect_err(last_err))?;

        stream.set_nodelay(true)?;
        stream.set_read_timeout(options.read_timeout)?;
        stream.set_write_timeout(options.write_timeout)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream.try_clone()?;

        tracing::debug!("Connected to {}", addr_text);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            closer: CloseHandle {
                stream: Arc::new(stream),
                closed: Arc::new(AtomicBool::new(false)),
            },
            peer_addr: addr_text,
        })
    }

    /// Write the whole buffer and flush it to the socket
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_open()?;
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        tracing::trace!("Sent {} bytes to {}", bytes.len(), self.peer_addr);
        Ok(())
    }

    /// Read one line, without its `\r\n` (or bare `\n`) terminator.
    ///
    /// End of stream before a terminator is an `UnexpectedEof` error.
    pub fn read_line(&mut self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        let line = codec_read_line(&mut self.reader)?;
        tracing::trace!(
            "Received line from {}: {}",
            self.peer_addr,
            String::from_utf8_lossy(&line)
        );
        Ok(line)
    }

    /// Read exactly `n` bytes regardless of their content
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure_open()?;
        codec_read_exact(&mut self.reader, n)
    }

    /// Close the connection. Safe to call more than once.
    pub fn close(&mut self) {
        if !self.closer.is_closed() {
            tracing::debug!("Closing connection to {}", self.peer_addr);
        }
        self.closer.close();
    }

    /// Handle for closing this connection from another thread
    pub fn close_handle(&self) -> CloseHandle {
        self.closer.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closer.is_closed()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closer.is_closed() {
            return Err(MemviewError::NotConnected);
        }
        Ok(())
    }
}

impl ReplyReader for Connection {
    fn read_line(&mut self) -> Result<Vec<u8>> {
        Connection::read_line(self)
    }

    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        Connection::read_exact(self, n)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
