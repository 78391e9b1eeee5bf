//! This contains the common part of the serializer between client and
//! server implementation
//!
//! The head of a message is assembled in a buffer and flushed in one
//! write; the body is flushed separately, so a peer always sees a
//! complete head even when body writing fails midway.

use std::io::{self, Write};
#[cfg(feature="date_header")] use std::time::SystemTime;

use netbuf::Buf;

use enums::status;
use headers;
use request::Request;
use response::Response;


/// Size of a single frame of a chunked body
const CHUNK_SIZE: usize = 8192;


fn invalid_header(value: &str) -> bool {
    value.bytes().any(|x| x == b'\r' || x == b'\n')
}

fn write_header(buf: &mut Buf, name: &str, value: &str) -> io::Result<()> {
    if invalid_header(name) || invalid_header(value) {
        return Err(io::Error::new(io::ErrorKind::InvalidData,
            "header name or value contains CR or LF"));
    }
    write!(buf, "{}: {}\r\n", headers::canonical(name), value).unwrap();
    Ok(())
}

#[cfg(feature="date_header")]
fn write_date(buf: &mut Buf) {
    write!(buf, "Date: {}\r\n",
        ::httpdate::fmt_http_date(SystemTime::now())).unwrap();
}

#[cfg(not(feature="date_header"))]
fn write_date(_buf: &mut Buf) {
}

/// Serialize a response.
///
/// A `Connection` header is injected from the `keep_alive` flag when
/// the handler didn't set one. If the handler advertised
/// `Transfer-Encoding: chunked` the body is emitted chunked,
/// otherwise a missing `Content-Length` is injected to match the body
/// exactly. Responses with 1xx, 204 and 304 status codes are emitted
/// without a body.
pub fn write_response<W: Write>(stream: &mut W, resp: &Response,
    keep_alive: bool)
    -> io::Result<()>
{
    let mut head = Buf::new();
    match resp.status_line() {
        Some(line) => {
            write!(&mut head, "{}\r\n", line).unwrap();
        }
        None => {
            let reason = if resp.reason().is_empty() {
                status::reason(resp.code())
            } else {
                resp.reason()
            };
            write!(&mut head, "HTTP/1.1 {} {}\r\n",
                resp.code(), reason).unwrap();
        }
    }

    let mut has_connection = false;
    let mut has_length = false;
    let mut has_date = false;
    let mut chunked = false;
    for &(ref name, ref value) in resp.headers().iter() {
        if name.is_empty() {
            continue;
        }
        match &name[..] {
            "connection" => has_connection = true,
            "content-length" => has_length = true,
            "date" => has_date = true,
            "transfer-encoding" => {
                if headers::is_chunked(value) {
                    chunked = true;
                }
            }
            _ => {}
        }
        write_header(&mut head, name, value)?;
    }
    if !has_connection {
        let value = if keep_alive { "keep-alive" } else { "close" };
        write_header(&mut head, "connection", value)?;
    }
    if !has_date {
        write_date(&mut head);
    }

    let code = resp.code();
    let bodyless = (code >= 100 && code < 200) || code == 204 || code == 304;
    if chunked && !bodyless {
        head.write_all(b"\r\n").unwrap();
        stream.write_all(&head[..])?;
        stream.flush()?;
        write_chunked(stream, resp.body())?;
        stream.flush()
    } else {
        if !has_length && !bodyless {
            write!(&mut head, "Content-Length: {}\r\n",
                resp.body().len()).unwrap();
        }
        head.write_all(b"\r\n").unwrap();
        stream.write_all(&head[..])?;
        stream.flush()?;
        if !bodyless {
            stream.write_all(resp.body())?;
        }
        stream.flush()
    }
}

/// Serialize a request.
///
/// A `Host` header carrying `host[:port]` is always emitted first;
/// the port is elided when it is the scheme default. Requests carry
/// a `Content-Length` whenever they have a body (and always for
/// POST, even an empty one).
pub fn write_request<W: Write>(stream: &mut W, req: &Request,
    host: &str, port: u16)
    -> io::Result<()>
{
    let mut head = Buf::new();
    write!(&mut head, "{} {} HTTP/1.1\r\n",
        req.method(), req.path()).unwrap();
    if port == 80 {
        write_header(&mut head, "host", host)?;
    } else {
        write_header(&mut head, "host", &format!("{}:{}", host, port))?;
    }

    let mut has_length = false;
    let mut chunked = false;
    for &(ref name, ref value) in req.headers().iter() {
        if name.is_empty() || name == "host" {
            continue;
        }
        match &name[..] {
            "content-length" => has_length = true,
            "transfer-encoding" => {
                if headers::is_chunked(value) {
                    chunked = true;
                }
            }
            _ => {}
        }
        write_header(&mut head, name, value)?;
    }

    if chunked {
        head.write_all(b"\r\n").unwrap();
        stream.write_all(&head[..])?;
        stream.flush()?;
        write_chunked(stream, req.body())?;
        stream.flush()
    } else {
        if !has_length && (!req.body().is_empty() || req.method() == "POST") {
            write!(&mut head, "Content-Length: {}\r\n",
                req.body().len()).unwrap();
        }
        head.write_all(b"\r\n").unwrap();
        stream.write_all(&head[..])?;
        stream.flush()?;
        stream.write_all(req.body())?;
        stream.flush()
    }
}

fn write_chunked<W: Write>(stream: &mut W, body: &[u8]) -> io::Result<()> {
    for chunk in body.chunks(CHUNK_SIZE) {
        write!(stream, "{:x}\r\n", chunk.len())?;
        stream.write_all(chunk)?;
        stream.write_all(b"\r\n")?;
    }
    stream.write_all(b"0\r\n\r\n")
}
