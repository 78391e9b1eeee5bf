extern crate env_logger;
extern crate minihttp;

use std::env;
use std::io::{self, Write};
use std::process::exit;

use minihttp::client::{Client, Config};


pub fn main() {
    env_logger::init();

    let url = match env::args().nth(1) {
        Some(url) => url,
        None => {
            eprintln!("usage: curl <url>");
            exit(2);
        }
    };

    let client = Client::new(&Config::new().done());
    match client.get(&url) {
        Ok(fetched) => {
            let resp = &fetched.response;
            eprintln!("HTTP/1.x {} {}", resp.code(), resp.reason());
            for &(ref name, ref value) in resp.headers().iter() {
                eprintln!("{}: {}", name, value);
            }
            eprintln!("");
            if fetched.too_many_redirects {
                eprintln!("warning: stopped after {} redirects",
                    fetched.redirects);
            }
            io::stdout().write_all(resp.body()).unwrap();
        }
        Err(e) => {
            eprintln!("request failed: {}", e);
            exit(1);
        }
    }
}
