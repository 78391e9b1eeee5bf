use std::sync::Arc;
use std::time::Duration;

use server::Config;

impl Config {
    /// Create a config with defaults
    pub fn new() -> Config {
        Config {
            port: ::server::DEFAULT_PORT,
            workers: 0,
            idle_timeout: Duration::from_millis(30000),
            shutdown_grace: Duration::from_millis(5000),
        }
    }
    /// Port to bind.
    ///
    /// When the default port is configured but occupied, the server
    /// falls back to an ephemeral one. Zero always binds an ephemeral
    /// port.
    pub fn port(&mut self, value: u16) -> &mut Self {
        self.port = value;
        self
    }
    /// Size of the worker pool serving connections
    ///
    /// Zero (the default) means twice the hardware parallelism, and
    /// two at least.
    pub fn workers(&mut self, value: usize) -> &mut Self {
        self.workers = value;
        self
    }
    /// How long a connection may sit idle between requests
    pub fn idle_timeout(&mut self, value: Duration) -> &mut Self {
        self.idle_timeout = value;
        self
    }
    /// How long shutdown waits for busy workers
    pub fn shutdown_grace(&mut self, value: Duration) -> &mut Self {
        self.shutdown_grace = value;
        self
    }
    /// Create a Arc'd config clone to pass to the constructor
    ///
    /// This is just a convenience method.
    pub fn done(&mut self) -> Arc<Config> {
        Arc::new(self.clone())
    }
}
