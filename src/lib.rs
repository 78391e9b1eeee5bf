//! Minimal blocking HTTP/1.1 client and server pair
//!
//! The crate implements the wire protocol directly on top of blocking
//! stream sockets: message parsing and framing (`Content-Length`,
//! chunked transfer encoding, connection-close delimitation), a
//! per-origin pool of reusable keep-alive connections, a client with
//! redirect following and conditional revalidation, and a threaded
//! server loop dispatching to an application hook.

extern crate netbuf;
extern crate num_cpus;
extern crate threadpool;
extern crate url;
#[macro_use(quick_error)] extern crate quick_error;
#[macro_use] extern crate matches;
#[macro_use] extern crate log;
#[cfg(feature="date_header")] extern crate httpdate;


pub mod server;
pub mod client;
mod enums;
mod headers;
mod request;
mod response;
mod parser;
mod chunked;
mod serializer;

pub use enums::Version;
pub use headers::Headers;
pub use request::Request;
pub use response::Response;
pub use parser::ParseError;
