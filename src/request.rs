use enums::Version;
use headers::Headers;


/// An HTTP request.
///
/// Built by the parser on the server side, or by hand (usually through
/// the client) on the client side. Once handed to a dispatcher or to
/// the transport it is treated as read-only.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    path: String,
    version: Version,
    headers: Headers,
    body: Vec<u8>,
}

impl Request {
    /// Create a request with no headers and an empty body.
    ///
    /// An empty path is coerced to `/`.
    pub fn new<M, P>(method: M, path: P) -> Request
        where M: Into<String>, P: Into<String>,
    {
        let path = path.into();
        Request {
            method: method.into(),
            path: if path.is_empty() { "/".to_string() } else { path },
            version: Version::Http11,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request target, including the query string if any
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
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
}

#[cfg(test)]
mod test {
    use enums::Version;
    use super::Request;

    #[test]
    fn empty_path_defaults_to_root() {
        let req = Request::new("GET", "");
        assert_eq!(req.path(), "/");
    }

    #[test]
    fn header_access_is_case_insensitive() {
        let mut req = Request::new("POST", "/submit");
        req.set_header("Content-Type", "application/json");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn defaults() {
        let req = Request::new("GET", "/x?q=1");
        assert_eq!(req.version(), Version::Http11);
        assert_eq!(req.path(), "/x?q=1");
        assert_eq!(req.body(), b"");
    }
}
