//! Per-origin pool of reusable keep-alive connections
//!
//! The idle set per origin is a bounded queue guarded by a mutex and
//! a condvar; that queue is the only synchronization the pool needs.
//! A connection is never in the idle set while a caller holds it for
//! I/O.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::TcpStream;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use netbuf::Buf;

use client::Config;


/// A TCP connection owned by one caller at a time.
///
/// The read-ahead buffer travels with the connection, so bytes read
/// past a message boundary survive between exchanges.
pub struct PooledStream {
    pub stream: TcpStream,
    pub buf: Buf,
    key: String,
}

struct Origin {
    idle: Mutex<VecDeque<PooledStream>>,
    available: Condvar,
}

impl Origin {
    fn new() -> Origin {
        Origin {
            idle: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }
}

/// Connection pool keyed by `host:port`
pub struct Pool {
    config: Arc<Config>,
    origins: Mutex<HashMap<String, Arc<Origin>>>,
}

impl Pool {
    pub fn new(config: &Arc<Config>) -> Pool {
        Pool {
            config: config.clone(),
            origins: Mutex::new(HashMap::new()),
        }
    }

    fn origin(&self, key: &str) -> Arc<Origin> {
        let mut map = self.origins.lock().unwrap();
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(Origin::new()))
            .clone()
    }

    /// Take an idle connection for the origin or open a new one.
    ///
    /// Waits a bounded time for an idle connection first. A pooled
    /// connection that fails the liveness probe is closed and the
    /// next one is tried, falling back to a fresh connect. The
    /// returned connection carries the configured read timeout.
    pub fn acquire(&self, host: &str, port: u16)
        -> io::Result<PooledStream>
    {
        let key = format!("{}:{}", host, port);
        let origin = self.origin(&key);
        let mut wait = self.config.acquire_timeout;
        loop {
            let candidate = {
                let guard = origin.idle.lock().unwrap();
                let mut guard = if guard.is_empty() && wait > Duration::new(0, 0) {
                    origin.available.wait_timeout(guard, wait).unwrap().0
                } else {
                    guard
                };
                guard.pop_front()
            };
            // only the first pass through the queue gets the wait
            wait = Duration::new(0, 0);
            match candidate {
                Some(conn) => {
                    if conn.buf.len() == 0 && is_alive(&conn.stream) {
                        conn.stream.set_read_timeout(
                            Some(self.config.connection_read_timeout))?;
                        trace!("pool: reusing connection to {}", key);
                        return Ok(conn);
                    }
                    debug!("pool: discarding dead connection to {}", key);
                }
                None => break,
            }
        }
        debug!("pool: opening new connection to {}", key);
        let stream = TcpStream::connect((host, port))?;
        stream.set_read_timeout(
            Some(self.config.connection_read_timeout))?;
        Ok(PooledStream { stream: stream, buf: Buf::new(), key: key })
    }

    /// Return a connection to the idle set.
    ///
    /// Dead or desynchronized connections are closed instead, and so
    /// is the connection when the idle set is already at
    /// `max_pool_size`. Never blocks.
    pub fn release(&self, conn: PooledStream) {
        if conn.buf.len() != 0 || !is_alive(&conn.stream) {
            debug!("pool: closing connection to {} on release", conn.key);
            return;
        }
        let origin = self.origin(&conn.key);
        let mut idle = origin.idle.lock().unwrap();
        if idle.len() < self.config.max_pool_size {
            idle.push_back(conn);
            origin.available.notify_one();
        } else {
            debug!("pool: idle set full, closing connection");
        }
    }

    /// Close every idle connection
    pub fn shutdown(&self) {
        let mut map = self.origins.lock().unwrap();
        for origin in map.values() {
            origin.idle.lock().unwrap().clear();
        }
        map.clear();
    }

    /// Number of idle connections currently pooled for the origin
    pub fn idle_count(&self, host: &str, port: u16) -> usize {
        let map = self.origins.lock().unwrap();
        map.get(&format!("{}:{}", host, port))
            .map(|origin| origin.idle.lock().unwrap().len())
            .unwrap_or(0)
    }
}

/// Probe the socket without consuming data.
///
/// A blocked zero-consuming peek means the peer is still there; a
/// clean zero means it hung up; readable bytes on an idle connection
/// mean the session is desynchronized and the connection is useless.
fn is_alive(stream: &TcpStream) -> bool {
    if stream.set_nonblocking(true).is_err() {
        return false;
    }
    let mut probe = [0u8; 1];
    let result = stream.peek(&mut probe);
    let restored = stream.set_nonblocking(false).is_ok();
    restored && match result {
        Ok(_) => false,
        Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => true,
        Err(_) => false,
    }
}
