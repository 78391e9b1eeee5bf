use std::sync::Arc;
use std::time::Duration;

use client::Config;

impl Config {
    /// Create a config with defaults
    pub fn new() -> Config {
        Config {
            max_pool_size: 10,
            connection_read_timeout: Duration::from_millis(15000),
            acquire_timeout: Duration::from_millis(1000),
            max_redirects: 5,
            follow_redirects: true,
            use_cache: true,
        }
    }
    /// Number of idle connections kept per origin
    ///
    /// A connection released when the pool is full is closed instead.
    pub fn max_pool_size(&mut self, value: usize) -> &mut Self {
        self.max_pool_size = value;
        self
    }
    /// Read timeout applied to every pooled connection
    pub fn connection_read_timeout(&mut self, value: Duration) -> &mut Self {
        self.connection_read_timeout = value;
        self
    }
    /// How long `acquire` waits for an idle connection before opening
    /// a new one
    pub fn acquire_timeout(&mut self, value: Duration) -> &mut Self {
        self.acquire_timeout = value;
        self
    }
    /// Redirect hops followed before giving up
    pub fn max_redirects(&mut self, value: usize) -> &mut Self {
        self.max_redirects = value;
        self
    }
    /// Whether 301/302 responses are followed at all
    pub fn follow_redirects(&mut self, value: bool) -> &mut Self {
        self.follow_redirects = value;
        self
    }
    /// Whether GET responses are cached and revalidated with
    /// conditional requests
    pub fn use_cache(&mut self, value: bool) -> &mut Self {
        self.use_cache = value;
        self
    }
    /// Create a Arc'd config clone to pass to the constructor
    ///
    /// This is just a convenience method.
    pub fn done(&mut self) -> Arc<Config> {
        Arc::new(self.clone())
    }
}
