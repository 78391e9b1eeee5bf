//! Reading HTTP/1.x messages from a blocking stream
//!
//! The stream is always paired with a `Buf` holding read-ahead bytes:
//! whatever the head-reading loop consumed past the `\r\n\r\n`
//! boundary stays in the buffer and becomes the prefix of the body
//! stream, and whatever is left after the body belongs to the next
//! message on a keep-alive connection.

use std::io::{self, Read};

use netbuf::Buf;

use chunked;
use enums::Version;
use headers::{self, Headers};
use request::Request;
use response::Response;


/// A hard limit on the size of the head of a message
const MAX_HEAD_SIZE: usize = 65536;


quick_error! {
    #[derive(Debug)]
    pub enum ParseError {
        /// I/O (basically networking) error while reading the message
        Io(err: io::Error) {
            description("I/O error")
            display("I/O error: {}", err)
            from()
        }
        /// Peer closed the connection before sending anything
        ///
        /// This is the normal end of a keep-alive session and is
        /// not shown to end users
        Closed {
            description("connection closed between messages")
        }
        /// Connection reset by peer while reading the head
        ResetOnHeaders {
            description("connection closed prematurely while reading headers")
        }
        /// Connection reset by peer while reading the body
        ResetOnBody {
            description("connection closed prematurely while reading body")
        }
        /// Start line has fewer than three tokens
        BadStartLine {
            description("malformed start line")
        }
        /// Head grew over the sanity limit without a `\r\n\r\n`
        HeadTooLong {
            description("message head is too long")
        }
        /// Bad `Content-Length` header
        BadContentLength {
            description("bad content length")
        }
        /// Duplicate `Content-Length` header
        DuplicateContentLength {
            description("duplicate content length")
        }
        /// Bad chunk size line
        BadChunkSize {
            description("invalid chunk size")
        }
        /// Chunk payload not followed by CRLF
        BadChunkFraming {
            description("missing CRLF after chunk payload")
        }
    }
}


/// How the body of a message is delimited on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Fixed(u64),
    Chunked,
    Eof,
    Empty,
}

struct Head {
    start_line: String,
    headers: Headers,
}

/// Parse one request from the stream, reading the body in full
pub fn parse_request<S: Read>(stream: &mut S, buf: &mut Buf)
    -> Result<Request, ParseError>
{
    let head = read_head(stream, buf)?;
    let (method, path, version) = {
        let mut tokens = head.start_line.splitn(3, ' ');
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(m), Some(p), Some(v)) => {
                (m.to_string(), p.to_string(), Version::from_token(v.trim()))
            }
            _ => return Err(ParseError::BadStartLine),
        }
    };
    let kind = body_kind(&head.headers, None, false)?;
    let body = read_body(stream, buf, kind)?;
    let mut req = Request::new(method, path);
    req.set_version(version);
    *req.headers_mut() = head.headers;
    req.set_body(body);
    Ok(req)
}

/// Parse one response from the stream, reading the body in full
///
/// A bad status code is tolerated and kept as zero, a missing reason
/// as the empty string. The raw status line is stored verbatim on the
/// returned response.
pub fn parse_response<S: Read>(stream: &mut S, buf: &mut Buf)
    -> Result<Response, ParseError>
{
    let head = read_head(stream, buf)?;
    let (code, reason) = {
        let mut tokens = head.start_line.splitn(3, ' ');
        let _version = tokens.next();
        let code = tokens.next().unwrap_or("")
            .trim().parse::<u16>().unwrap_or(0);
        let reason = tokens.next().unwrap_or("").trim().to_string();
        (code, reason)
    };
    let close = head.headers.get("Connection")
        .map(|v| headers::is_close(v)).unwrap_or(false);
    let kind = body_kind(&head.headers, Some(code), close)?;
    let body = read_body(stream, buf, kind)?;
    let mut resp = Response::new(code);
    resp.set_reason(reason);
    resp.set_status_line(head.start_line);
    *resp.headers_mut() = head.headers;
    resp.set_body(body);
    Ok(resp)
}

/// Accumulate bytes until `\r\n\r\n` and split the head into the
/// start line and header fields
///
/// Bytes past the boundary are left in `buf` for the body readers.
fn read_head<S: Read>(stream: &mut S, buf: &mut Buf)
    -> Result<Head, ParseError>
{
    let mut scanned = 0;
    let end = loop {
        if buf.len() >= 4 {
            let start = if scanned > 3 { scanned - 3 } else { 0 };
            if let Some(idx) = find(&buf[start..], b"\r\n\r\n") {
                break start + idx;
            }
            scanned = buf.len();
        }
        if buf.len() > MAX_HEAD_SIZE {
            return Err(ParseError::HeadTooLong);
        }
        match buf.read_from(stream) {
            Ok(0) => {
                return Err(if buf.len() == 0 { ParseError::Closed }
                           else { ParseError::ResetOnHeaders });
            }
            Ok(_) => {}
            Err(e) => return Err(ParseError::Io(e)),
        }
    };
    let text = String::from_utf8_lossy(&buf[..end]).into_owned();
    buf.consume(end + 4);

    let mut lines = text.split("\r\n");
    let start_line = lines.next().unwrap_or("").to_string();
    let mut hdrs = Headers::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        // a field line without a colon is dropped
        if let Some(colon) = line.find(':') {
            let name = line[..colon].trim();
            let value = line[colon + 1..].trim();
            hdrs.add(name, value);
        }
    }
    Ok(Head { start_line: start_line, headers: hdrs })
}

/// Decide the body framing
///
/// The order is chunked, then `Content-Length`, then (for responses
/// on a closing connection) read-until-EOF, then no body. Responses
/// with 1xx, 204 and 304 status codes never have a body regardless
/// of their headers.
fn body_kind(hdrs: &Headers, response_code: Option<u16>, close: bool)
    -> Result<BodyKind, ParseError>
{
    if let Some(code) = response_code {
        if (code >= 100 && code < 200) || code == 204 || code == 304 {
            return Ok(BodyKind::Empty);
        }
    }
    if let Some(te) = hdrs.get("Transfer-Encoding") {
        if headers::is_chunked(te) {
            return Ok(BodyKind::Chunked);
        }
    }
    let mut length = None;
    for &(ref name, ref value) in hdrs.iter() {
        if name == "content-length" {
            if length.is_some() {
                return Err(ParseError::DuplicateContentLength);
            }
            let n = value.trim().parse::<u64>()
                .map_err(|_| ParseError::BadContentLength)?;
            length = Some(n);
        }
    }
    if let Some(n) = length {
        return Ok(BodyKind::Fixed(n));
    }
    if response_code.is_some() && close {
        return Ok(BodyKind::Eof);
    }
    Ok(BodyKind::Empty)
}

fn read_body<S: Read>(stream: &mut S, buf: &mut Buf, kind: BodyKind)
    -> Result<Vec<u8>, ParseError>
{
    match kind {
        BodyKind::Empty => Ok(Vec::new()),
        BodyKind::Fixed(n) => read_fixed(stream, buf, n),
        BodyKind::Chunked => chunked::decode(stream, buf),
        BodyKind::Eof => read_to_eof(stream, buf),
    }
}

fn read_fixed<S: Read>(stream: &mut S, buf: &mut Buf, length: u64)
    -> Result<Vec<u8>, ParseError>
{
    let length = length as usize;
    while buf.len() < length {
        match buf.read_from(stream) {
            Ok(0) => return Err(ParseError::ResetOnBody),
            Ok(_) => {}
            Err(e) => return Err(ParseError::Io(e)),
        }
    }
    let body = buf[..length].to_vec();
    buf.consume(length);
    Ok(body)
}

fn read_to_eof<S: Read>(stream: &mut S, buf: &mut Buf)
    -> Result<Vec<u8>, ParseError>
{
    loop {
        match buf.read_from(stream) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => return Err(ParseError::Io(e)),
        }
    }
    let body = buf[..].to_vec();
    buf.consume(body.len());
    Ok(body)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
