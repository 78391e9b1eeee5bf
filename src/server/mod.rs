//! HTTP server protocol implementation
//!
mod config;
mod error;
mod error_page;
mod proto;
mod router;

pub use self::error::Error;
pub use self::error_page::error_page;
pub use self::proto::{Server, DEFAULT_PORT};
pub use self::router::Router;

use std::time::Duration;

use request::Request;
use response::Response;


/// Fine-grained configuration of the HTTP server
#[derive(Debug, Clone)]
pub struct Config {
    port: u16,
    workers: usize,
    idle_timeout: Duration,
    shutdown_grace: Duration,
}

/// The application hook the server dispatches parsed requests to.
///
/// Implemented for plain closures, so
/// `Server::bind(&cfg, |req| ...)` works; `Router` gives an explicit
/// dispatch table instead. A panic inside `dispatch` is contained by
/// the connection loop and answered with a canned 500 page.
pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(&self, req: Request) -> Response;
}

impl<F> Dispatcher for F
    where F: Fn(Request) -> Response + Send + Sync + 'static
{
    fn dispatch(&self, req: Request) -> Response {
        self(req)
    }
}
