//! Explicit dispatch table mapping requests to handler functions

use std::collections::HashMap;

use request::Request;
use response::Response;
use server::Dispatcher;
use server::error_page::error_page;


type Handler = Box<dyn Fn(Request) -> Response + Send + Sync>;
type SubtreeHandler = Box<dyn Fn(&str, &Request) -> Response + Send + Sync>;

/// Dispatch table with exact routes and path subtrees.
///
/// Exact routes match on `(method, path)` with the query string
/// stripped. Subtree handlers receive the path relative to their
/// prefix; the longest prefix wins. Unmatched requests get the
/// fallback, a canned 404 by default.
pub struct Router {
    routes: HashMap<(String, String), Handler>,
    subtrees: Vec<(String, SubtreeHandler)>,
    fallback: Handler,
}

impl Router {
    pub fn new() -> Router {
        Router {
            routes: HashMap::new(),
            subtrees: Vec::new(),
            fallback: Box::new(|_| error_page(404)),
        }
    }

    /// Register a handler for an exact method and path
    pub fn route<F>(mut self, method: &str, path: &str, handler: F)
        -> Router
        where F: Fn(Request) -> Response + Send + Sync + 'static
    {
        self.routes.insert(
            (method.to_string(), path.to_string()),
            Box::new(handler));
        self
    }

    /// Register a handler for every path under a prefix.
    ///
    /// The handler gets the remainder of the path (no leading slash)
    /// and the request. This is the seam a static-resource resolver
    /// plugs into.
    pub fn subtree<F>(mut self, prefix: &str, handler: F) -> Router
        where F: Fn(&str, &Request) -> Response + Send + Sync + 'static
    {
        let prefix = prefix.trim_end_matches('/').to_string();
        self.subtrees.push((prefix, Box::new(handler)));
        self.subtrees.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }

    /// Replace the handler for unmatched requests
    pub fn fallback<F>(mut self, handler: F) -> Router
        where F: Fn(Request) -> Response + Send + Sync + 'static
    {
        self.fallback = Box::new(handler);
        self
    }
}

impl Dispatcher for Router {
    fn dispatch(&self, req: Request) -> Response {
        let path = req.path().split('?').next().unwrap_or("/")
            .to_string();
        let key = (req.method().to_string(), path.clone());
        if let Some(handler) = self.routes.get(&key) {
            return handler(req);
        }
        for &(ref prefix, ref handler) in &self.subtrees {
            let boundary = path.len() == prefix.len()
                || path.as_bytes().get(prefix.len()) == Some(&b'/');
            if path.starts_with(&prefix[..]) && boundary {
                let rel = path[prefix.len()..]
                    .trim_start_matches('/').to_string();
                return handler(&rel, &req);
            }
        }
        (self.fallback)(req)
    }
}

#[cfg(test)]
mod test {
    use request::Request;
    use response::Response;
    use server::Dispatcher;
    use super::Router;

    fn ok(body: &str) -> Response {
        let mut resp = Response::new(200);
        resp.set_body(body.as_bytes().to_vec());
        resp
    }

    fn router() -> Router {
        Router::new()
            .route("GET", "/", |_| ok("index"))
            .route("POST", "/user/login", |_| ok("login"))
            .subtree("/static", |rel, _| ok(&format!("file:{}", rel)))
    }

    fn body(resp: Response) -> String {
        String::from_utf8_lossy(resp.body()).into_owned()
    }

    #[test]
    fn exact_routes() {
        let r = router();
        assert_eq!(body(r.dispatch(Request::new("GET", "/"))), "index");
        assert_eq!(body(r.dispatch(Request::new("POST", "/user/login"))),
            "login");
        // method is part of the key
        assert_eq!(r.dispatch(Request::new("GET", "/user/login")).code(),
            404);
    }

    #[test]
    fn query_string_is_stripped_for_matching() {
        let r = router();
        assert_eq!(body(r.dispatch(Request::new("GET", "/?lang=en"))),
            "index");
    }

    #[test]
    fn subtree_gets_the_relative_path() {
        let r = router();
        assert_eq!(
            body(r.dispatch(Request::new("GET", "/static/css/site.css"))),
            "file:css/site.css");
        assert_eq!(body(r.dispatch(Request::new("GET", "/static"))),
            "file:");
    }

    #[test]
    fn subtree_does_not_match_lookalike_paths() {
        let r = router();
        assert_eq!(r.dispatch(Request::new("GET", "/staticfile")).code(),
            404);
    }

    #[test]
    fn fallback_is_used_for_everything_else() {
        let r = router().fallback(|_| ok("nope"));
        assert_eq!(body(r.dispatch(Request::new("GET", "/missing"))),
            "nope");
    }
}
