extern crate minihttp;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use minihttp::Response;
use minihttp::client::{Client, Config};
use minihttp::server::{self, Router, Server};


const LAST_MODIFIED: &'static str = "Wed, 21 Oct 2020 07:28:00 GMT";
const INDEX_BODY: &'static str = "<html>index</html>";
const FILE_BODY: &'static str = "file contents, revalidated";

fn text(code: u16, body: &str) -> Response {
    let mut resp = Response::new(code);
    resp.set_header("Content-Type", "text/plain");
    resp.set_body(body.as_bytes().to_vec());
    resp
}

fn redirect(code: u16, location: &str) -> Response {
    let mut resp = Response::new(code);
    resp.set_header("Location", location);
    resp
}

/// Counters observed by the test while the router runs on server
/// threads
#[derive(Default)]
struct Seen {
    full_serves: AtomicUsize,
    revalidations: AtomicUsize,
    conditional_header: Mutex<Option<String>>,
}

fn demo_router(seen: Arc<Seen>) -> Router {
    Router::new()
        .route("GET", "/", |_| {
            redirect(302, "/static/index.html")
        })
        .route("POST", "/old-login", |_| redirect(301, "/login"))
        .route("GET", "/login", |_| text(200, "login-page"))
        .route("GET", "/loop", |_| redirect(302, "/loop"))
        .route("GET", "/close", |_| {
            let mut resp = text(200, "and goodbye");
            resp.set_header("Connection", "close");
            resp
        })
        .route("GET", "/chunked", |_| {
            let mut resp = Response::new(200);
            resp.set_header("Transfer-Encoding", "chunked");
            resp.set_body(&b"hello, world"[..]);
            resp
        })
        .subtree("/static", move |rel, req| {
            match rel {
                "index.html" => text(200, INDEX_BODY),
                "test.txt" => {
                    let since = req.header("If-Modified-Since")
                        .map(|v| v.to_string());
                    *seen.conditional_header.lock().unwrap() =
                        since.clone();
                    if since.as_ref().map(|v| &v[..])
                        == Some(LAST_MODIFIED)
                    {
                        seen.revalidations.fetch_add(1, Ordering::SeqCst);
                        let mut resp = Response::new(304);
                        resp.set_header("Last-Modified", LAST_MODIFIED);
                        resp
                    } else {
                        seen.full_serves.fetch_add(1, Ordering::SeqCst);
                        let mut resp = text(200, FILE_BODY);
                        resp.set_header("Last-Modified", LAST_MODIFIED);
                        resp
                    }
                }
                _ => text(404, "no such file"),
            }
        })
}

fn start() -> (Arc<Seen>, u16) {
    let seen = Arc::new(Seen::default());
    let config = server::Config::new().port(0).workers(2).done();
    let server = Arc::new(
        Server::bind(&config, demo_router(seen.clone())).unwrap());
    let port = server.local_addr().port();
    thread::spawn(move || server.run().unwrap());
    (seen, port)
}

fn client() -> Client {
    Client::new(&Config::new()
        .acquire_timeout(Duration::from_millis(10))
        .done())
}

fn url(port: u16, path: &str) -> String {
    format!("http://127.0.0.1:{}{}", port, path)
}

#[test]
fn get_with_keep_alive_pools_the_connection() {
    let (_seen, port) = start();
    let client = client();
    let fetched = client.get(&url(port, "/static/index.html")).unwrap();
    assert_eq!(fetched.response.code(), 200);
    assert_eq!(fetched.response.body(), INDEX_BODY.as_bytes());
    assert_eq!(fetched.redirects, 0);
    assert_eq!(client.pool().idle_count("127.0.0.1", port), 1);
}

#[test]
fn connection_close_is_not_pooled() {
    let (_seen, port) = start();
    let client = client();
    let fetched = client.get(&url(port, "/close")).unwrap();
    assert_eq!(fetched.response.code(), 200);
    assert_eq!(client.pool().idle_count("127.0.0.1", port), 0);
}

#[test]
fn pool_stays_within_bounds_under_sequential_use() {
    let (_seen, port) = start();
    let client = client();
    for _ in 0..5 {
        client.get(&url(port, "/static/index.html")).unwrap();
    }
    assert_eq!(client.pool().idle_count("127.0.0.1", port), 1);
}

#[test]
fn post_round_trip() {
    let (_seen, port) = start();
    let client = client();
    let fetched = client.post(&url(port, "/old-login"), b"u=x",
        "application/x-www-form-urlencoded").unwrap();
    // 301 turns the POST into a GET of /login
    assert_eq!(fetched.redirects, 1);
    assert_eq!(fetched.response.code(), 200);
    assert_eq!(fetched.response.body_as_string(), "login-page");
}

#[test]
fn redirect_is_followed_once() {
    let (_seen, port) = start();
    let client = client();
    let fetched = client.get(&url(port, "/")).unwrap();
    assert_eq!(fetched.redirects, 1);
    assert!(!fetched.too_many_redirects);
    assert_eq!(fetched.response.code(), 200);
    assert_eq!(fetched.response.body(), INDEX_BODY.as_bytes());
}

#[test]
fn redirect_loop_is_cut_off() {
    let (_seen, port) = start();
    let client = client();
    let fetched = client.get(&url(port, "/loop")).unwrap();
    assert!(fetched.too_many_redirects);
    assert_eq!(fetched.redirects, 5);
    assert_eq!(fetched.response.code(), 302);
}

#[test]
fn redirects_can_be_disabled() {
    let (_seen, port) = start();
    let client = Client::new(&Config::new()
        .acquire_timeout(Duration::from_millis(10))
        .follow_redirects(false)
        .done());
    let fetched = client.get(&url(port, "/")).unwrap();
    assert_eq!(fetched.response.code(), 302);
    assert_eq!(fetched.redirects, 0);
}

#[test]
fn conditional_revalidation() {
    let (seen, port) = start();
    let client = client();
    let target = url(port, "/static/test.txt");

    let first = client.get(&target).unwrap();
    assert_eq!(first.response.code(), 200);
    assert!(!first.from_cache);
    assert_eq!(first.response.body(), FILE_BODY.as_bytes());
    assert!(seen.conditional_header.lock().unwrap().is_none());

    let second = client.get(&target).unwrap();
    assert!(second.from_cache);
    assert_eq!(second.response.code(), 200);
    assert_eq!(second.response.body(), FILE_BODY.as_bytes());
    assert_eq!(seen.conditional_header.lock().unwrap().as_ref().unwrap(),
        LAST_MODIFIED);
    assert_eq!(seen.full_serves.load(Ordering::SeqCst), 1);
    assert_eq!(seen.revalidations.load(Ordering::SeqCst), 1);

    let third = client.get(&target).unwrap();
    assert!(third.from_cache);
    assert_eq!(third.response.body(), FILE_BODY.as_bytes());
    assert_eq!(seen.full_serves.load(Ordering::SeqCst), 1);
    assert_eq!(seen.revalidations.load(Ordering::SeqCst), 2);
}

#[test]
fn cache_can_be_disabled() {
    let (seen, port) = start();
    let client = Client::new(&Config::new()
        .acquire_timeout(Duration::from_millis(10))
        .use_cache(false)
        .done());
    let target = url(port, "/static/test.txt");
    client.get(&target).unwrap();
    let second = client.get(&target).unwrap();
    assert!(!second.from_cache);
    assert_eq!(seen.full_serves.load(Ordering::SeqCst), 2);
    assert_eq!(seen.revalidations.load(Ordering::SeqCst), 0);
}

#[test]
fn chunked_body_reaches_the_caller() {
    let (_seen, port) = start();
    let client = client();
    let fetched = client.get(&url(port, "/chunked")).unwrap();
    assert_eq!(fetched.response.body().len(), 12);
    assert_eq!(fetched.response.body(), b"hello, world");
}

#[test]
fn request_failure_is_reported_not_panicked() {
    let client = client();
    // nothing listens on this port
    let result = client.get("http://127.0.0.1:1/");
    let message = format!("{}", result.err().unwrap());
    assert!(message.len() > 0);
}
