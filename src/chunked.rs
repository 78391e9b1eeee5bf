//! Chunked transfer-encoding decoding over a blocking stream
//!
//! The encoding side lives in the serializer; only decoding needs
//! the read-ahead buffer dance.

use std::io::Read;

use netbuf::Buf;

use parser::ParseError;


/// Sanity bound on a single chunk; sizes past it are junk, not data
const MAX_CHUNK_SIZE: u64 = 1 << 31;


/// Decode a chunked body in full.
///
/// Each chunk is a hex size line (anything after `;` is an ignored
/// extension), the payload, and a mandatory CRLF. The zero chunk is
/// followed by optional trailer lines which are read and discarded
/// up to the terminating blank line.
pub fn decode<S: Read>(stream: &mut S, buf: &mut Buf)
    -> Result<Vec<u8>, ParseError>
{
    let mut body = Vec::new();
    loop {
        let line = read_line(stream, buf)?;
        let size = chunk_size(&line)?;
        if size == 0 {
            // trailers are consumed and dropped
            loop {
                if read_line(stream, buf)?.is_empty() {
                    return Ok(body);
                }
            }
        }
        let size = size as usize;
        while buf.len() < size + 2 {
            match buf.read_from(stream) {
                Ok(0) => return Err(ParseError::ResetOnBody),
                Ok(_) => {}
                Err(e) => return Err(ParseError::Io(e)),
            }
        }
        body.extend_from_slice(&buf[..size]);
        if &buf[size..size + 2] != b"\r\n" {
            return Err(ParseError::BadChunkFraming);
        }
        buf.consume(size + 2);
    }
}

fn chunk_size(line: &str) -> Result<u64, ParseError> {
    let digits = line.split(';').next().unwrap_or("").trim();
    if digits.is_empty() {
        return Err(ParseError::BadChunkSize);
    }
    let size = u64::from_str_radix(digits, 16)
        .map_err(|_| ParseError::BadChunkSize)?;
    if size > MAX_CHUNK_SIZE {
        return Err(ParseError::BadChunkSize);
    }
    Ok(size)
}

/// Read one line, stripping the terminator
fn read_line<S: Read>(stream: &mut S, buf: &mut Buf)
    -> Result<String, ParseError>
{
    loop {
        if let Some(pos) = buf[..].iter().position(|&b| b == b'\n') {
            let mut line = buf[..pos].to_vec();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            buf.consume(pos + 1);
            return Ok(String::from_utf8_lossy(&line).into_owned());
        }
        match buf.read_from(stream) {
            Ok(0) => return Err(ParseError::ResetOnBody),
            Ok(_) => {}
            Err(e) => return Err(ParseError::Io(e)),
        }
    }
}
