use std::io;

use url;

use parser::ParseError;


quick_error! {
    #[derive(Debug)]
    /// Client request error
    pub enum Error {
        /// Scheme of this url is not supported
        UnsupportedScheme {
            description("scheme of this url is not supported")
        }
        /// The url has no host to connect to
        MissingHost {
            description("url has no host")
        }
        /// The url (or a redirect target) could not be parsed
        Url(err: url::ParseError) {
            description("invalid url")
            display("invalid url: {}", err)
            from()
        }
        /// I/O (basically networking) error occured during request
        Io(err: io::Error) {
            description("IO error")
            display("IO error: {}", err)
            from()
        }
        /// Bad response received
        Parse(err: ParseError) {
            description("bad response")
            display("bad response: {}", err)
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        // the io kind keeps its disposition when it bubbles through
        // the parser
        match err {
            ParseError::Io(e) => Error::Io(e),
            other => Error::Parse(other),
        }
    }
}
