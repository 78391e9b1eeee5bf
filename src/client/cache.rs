//! In-memory response cache keyed by absolute URL
//!
//! The cache exists to serve conditional revalidation: the stored
//! validators become `If-Modified-Since` / `If-None-Match` on the next
//! request, and a 304 answer is turned back into the cached 200.

use std::collections::HashMap;
use std::sync::Mutex;

use headers::Headers;
use response::Response;


/// Body and headers of the last 200 response for one URL
#[derive(Debug, Clone)]
struct CacheEntry {
    headers: Headers,
    body: Vec<u8>,
}

/// Validators to copy into an outgoing conditional request
#[derive(Debug, Clone)]
pub struct Validators {
    pub last_modified: Option<String>,
    pub etag: Option<String>,
}

pub struct Cache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Cache {
    pub fn new() -> Cache {
        Cache { entries: Mutex::new(HashMap::new()) }
    }

    /// Validators of the cached entry, if any carry one
    pub fn validators(&self, url: &str) -> Option<Validators> {
        let entries = self.entries.lock().unwrap();
        entries.get(url).and_then(|entry| {
            let last_modified = entry.headers.get("Last-Modified")
                .map(|v| v.to_string());
            let etag = entry.headers.get("ETag").map(|v| v.to_string());
            if last_modified.is_none() && etag.is_none() {
                None
            } else {
                Some(Validators {
                    last_modified: last_modified,
                    etag: etag,
                })
            }
        })
    }

    /// Store the 200 response, replacing any previous entry
    pub fn store(&self, url: &str, resp: &Response) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(url.to_string(), CacheEntry {
            headers: resp.headers().clone(),
            body: resp.body().to_vec(),
        });
    }

    /// Fold the headers of a 304 into the entry and return the cached
    /// response.
    ///
    /// Fresh validators (`ETag`, `Last-Modified`, `Cache-Control`)
    /// replace the stored ones; headers the 304 did not repeat are
    /// kept. Returns `None` when nothing is cached for the URL.
    pub fn merge_not_modified(&self, url: &str, resp: &Response)
        -> Option<Response>
    {
        let mut entries = self.entries.lock().unwrap();
        entries.get_mut(url).map(|entry| {
            entry.headers.merge_from(resp.headers());
            let mut cached = Response::new(200);
            *cached.headers_mut() = entry.headers.clone();
            cached.set_body(&entry.body[..]);
            cached
        })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[cfg(test)]
mod test {
    use response::Response;
    use super::Cache;

    fn ok_response(etag: &str, body: &[u8]) -> Response {
        let mut resp = Response::new(200);
        resp.set_header("ETag", etag);
        resp.set_header("Content-Type", "text/plain");
        resp.set_body(body);
        resp
    }

    #[test]
    fn store_and_validators() {
        let cache = Cache::new();
        assert!(cache.validators("http://x/a").is_none());
        cache.store("http://x/a", &ok_response("\"v1\"", b"one"));
        let validators = cache.validators("http://x/a").unwrap();
        assert_eq!(validators.etag.unwrap(), "\"v1\"");
        assert!(validators.last_modified.is_none());
    }

    #[test]
    fn entry_without_validators_is_not_revalidatable() {
        let cache = Cache::new();
        let mut resp = Response::new(200);
        resp.set_body(&b"body"[..]);
        cache.store("http://x/a", &resp);
        assert!(cache.validators("http://x/a").is_none());
    }

    #[test]
    fn store_replaces() {
        let cache = Cache::new();
        cache.store("http://x/a", &ok_response("\"v1\"", b"one"));
        cache.store("http://x/a", &ok_response("\"v2\"", b"two"));
        assert_eq!(cache.len(), 1);
        let merged = cache.merge_not_modified(
            "http://x/a", &Response::new(304)).unwrap();
        assert_eq!(merged.body(), b"two");
        assert_eq!(merged.header("etag"), Some("\"v2\""));
    }

    #[test]
    fn merge_updates_validators_and_keeps_the_rest() {
        let cache = Cache::new();
        cache.store("http://x/a", &ok_response("\"v1\"", b"one"));
        let mut not_modified = Response::new(304);
        not_modified.set_header("ETag", "\"v2\"");
        not_modified.set_header("Cache-Control", "max-age=60");
        let merged = cache.merge_not_modified(
            "http://x/a", &not_modified).unwrap();
        assert_eq!(merged.code(), 200);
        assert_eq!(merged.body(), b"one");
        assert_eq!(merged.header("etag"), Some("\"v2\""));
        assert_eq!(merged.header("cache-control"), Some("max-age=60"));
        assert_eq!(merged.header("content-type"), Some("text/plain"));
        // and the entry itself was updated
        assert_eq!(cache.validators("http://x/a").unwrap().etag.unwrap(),
            "\"v2\"");
    }

    #[test]
    fn merge_without_entry() {
        let cache = Cache::new();
        assert!(cache.merge_not_modified(
            "http://x/missing", &Response::new(304)).is_none());
    }
}
