use std::io;

use parser::ParseError;


quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Io(err: io::Error) {
            description("I/O error")
            display("I/O error: {}", err)
            from()
        }
        Parse(err: ParseError) {
            description("parse error")
            display("parse error: {}", err)
            from()
        }
    }
}
