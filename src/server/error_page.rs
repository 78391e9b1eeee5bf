use enums::status;
use response::Response;


const PART1: &'static str = "\
    <!DOCTYPE html>\
    <html>\
        <head>\
            <title>\
    ";
const PART2: &'static str = "\
            </title>\
        </head>\
        <body>\
            <h1>\
    ";
const PART3: &'static str = concat!("\
            </h1>\
            <hr>\
            <p>Yours faithfully,<br>\
                minihttp/", env!("CARGO_PKG_VERSION"), "\
            </p>\
        </body>\
    </html>\
    ");

/// Generates a response with the default error page
///
/// Used by the connection loop when a dispatcher panics, and handy as
/// a fallback for applications.
pub fn error_page(code: u16) -> Response {
    let reason = status::reason(code);
    let mut resp = Response::new(code);
    resp.set_header("Content-Type", "text/html");
    resp.set_body(format!("{p1}{code:03} {reason}{p2}{code:03} {reason}{p3}",
        code=code, reason=reason, p1=PART1, p2=PART2, p3=PART3));
    resp
}
