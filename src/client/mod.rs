//! The HTTP/1.x client implementation
//!
mod cache;
mod client;
mod config;
mod errors;
mod pool;
mod transport;

pub use self::errors::Error;
pub use self::client::{Client, Fetched};
pub use self::pool::{Pool, PooledStream};

use std::time::Duration;


/// Fine-grained configuration of the HTTP client
#[derive(Debug, Clone)]
pub struct Config {
    max_pool_size: usize,
    connection_read_timeout: Duration,
    acquire_timeout: Duration,
    max_redirects: usize,
    follow_redirects: bool,
    use_cache: bool,
}
