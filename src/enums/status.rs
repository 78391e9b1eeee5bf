/// Default reason phrase for a status code.
///
/// Used when synthesizing a status line for a response that was
/// constructed with a bare code. Unknown codes get an empty reason,
/// which is tolerated on the wire.
pub fn reason(code: u16) -> &'static str {
    match code {
        //  1xx status codes
        100 => "Continue",
        101 => "Switching Protocols",
        //  2xx status codes
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        //  3xx status codes
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        //  4xx status codes
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Request Entity Too Large",
        414 => "Request-URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Requested Range Not Satisfiable",
        417 => "Expectation Failed",
        426 => "Upgrade Required",
        429 => "Too Many Requests",
        //  5xx status codes
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        _ => "",
    }
}

#[cfg(test)]
mod test {
    use super::reason;

    #[test]
    fn common_codes() {
        assert_eq!(reason(200), "OK");
        assert_eq!(reason(304), "Not Modified");
        assert_eq!(reason(404), "Not Found");
        assert_eq!(reason(500), "Internal Server Error");
    }

    #[test]
    fn unknown_code() {
        assert_eq!(reason(799), "");
    }
}
