//! A single request/response exchange over a pooled connection

use headers;
use parser;
use request::Request;
use response::Response;
use serializer;
use client::Error;
use client::pool::{Pool, PooledStream};


/// Perform one exchange against `host:port`.
///
/// The connection comes from the pool and goes back to it only when
/// the exchange succeeded and the response did not ask for a close.
/// Any I/O or parse failure invalidates the connection; it is dropped,
/// never released.
pub fn exchange(pool: &Pool, host: &str, port: u16, req: &Request)
    -> Result<Response, Error>
{
    let mut conn = pool.acquire(host, port)?;
    match send_and_receive(&mut conn, host, port, req) {
        Ok(resp) => {
            let close = resp.header("Connection")
                .map(|v| headers::is_close(v)).unwrap_or(false);
            if close {
                trace!("exchange with {}:{} asked for close", host, port);
            } else {
                pool.release(conn);
            }
            Ok(resp)
        }
        Err(e) => {
            debug!("exchange with {}:{} failed: {}", host, port, e);
            Err(e)
        }
    }
}

fn send_and_receive(conn: &mut PooledStream, host: &str, port: u16,
    req: &Request)
    -> Result<Response, Error>
{
    serializer::write_request(&mut conn.stream, req, host, port)?;
    let resp = parser::parse_response(&mut conn.stream, &mut conn.buf)?;
    Ok(resp)
}
