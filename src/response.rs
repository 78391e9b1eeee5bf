use enums::status;
use headers::Headers;


/// An HTTP response.
///
/// Built by the parser on the client side, or by a dispatcher on the
/// server side. The status line received from the wire (if any) is
/// kept verbatim; responses built by hand synthesize one from the code
/// and reason at serialization time.
#[derive(Debug, Clone)]
pub struct Response {
    code: u16,
    reason: String,
    status_line: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl Response {
    /// Create a response with the default reason phrase for the code
    pub fn new(code: u16) -> Response {
        Response {
            code: code,
            reason: status::reason(code).to_string(),
            status_line: None,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn set_reason<R: Into<String>>(&mut self, reason: R) {
        self.reason = reason.into();
    }

    /// The raw status line as received, without the trailing CRLF
    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_ref().map(|s| &s[..])
    }

    pub fn set_status_line<S: Into<String>>(&mut self, line: S) {
        self.status_line = Some(line.into());
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Value of the header, looked up case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.set(name, value);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body<B: Into<Vec<u8>>>(&mut self, body: B) {
        self.body = body.into();
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.code, 301 | 302)
    }

    pub fn is_not_modified(&self) -> bool {
        self.code == 304
    }

    /// Decode the body as text.
    ///
    /// Uses the charset parameter of `Content-Type` when present,
    /// UTF-8 otherwise. A charset this crate can't decode, or bytes
    /// that are not valid in it, fall back to lossy UTF-8.
    pub fn body_as_string(&self) -> String {
        let charset = self.header("Content-Type")
            .and_then(|ct| content_type_charset(ct));
        match charset {
            Some(ref cs) if is_utf8_charset(cs) => {
                match String::from_utf8(self.body.clone()) {
                    Ok(s) => s,
                    Err(e) => {
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    }
                }
            }
            Some(_) | None => String::from_utf8_lossy(&self.body).into_owned(),
        }
    }
}

fn content_type_charset(value: &str) -> Option<String> {
    for param in value.split(';').skip(1) {
        let param = param.trim();
        if param.len() >= 8
            && param.as_bytes()[..8].eq_ignore_ascii_case(b"charset=")
        {
            return Some(param[8..].trim_matches('"').to_string());
        }
    }
    None
}

fn is_utf8_charset(name: &str) -> bool {
    name.eq_ignore_ascii_case("utf-8") || name.eq_ignore_ascii_case("utf8")
}
