extern crate env_logger;
extern crate minihttp;

use minihttp::Response;
use minihttp::server::{Config, Router, Server};


fn page(body: &str) -> Response {
    let mut resp = Response::new(200);
    resp.set_header("Content-Type", "text/html");
    resp.set_body(body.as_bytes().to_vec());
    resp
}

fn main() {
    env_logger::init();

    let router = Router::new()
        .route("GET", "/", |_| page("<h1>Hello world!</h1>"))
        .subtree("/static", |rel, _| {
            match rel {
                "index.html" => page("<h1>A static page</h1>"),
                _ => minihttp::server::error_page(404),
            }
        });

    let config = Config::new().done();
    let server = Server::bind(&config, router).expect("bind server");
    println!("listening on http://{}/", server.local_addr());
    server.run().expect("accept loop");
}
