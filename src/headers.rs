use std::slice;


/// An ordered multiset of header fields.
///
/// Names are stored lowercased, values keep their original case.
/// Lookup is case-insensitive. Re-emission on the wire goes through
/// `canonical()` so stored names never carry two representations.
#[derive(Debug, Clone)]
pub struct Headers {
    items: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Headers {
        Headers { items: Vec::new() }
    }

    /// First value of the header, compared case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items.iter()
            .find(|&&(ref n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, ref v)| &v[..])
    }

    /// Replace every occurrence of the header with a single value
    pub fn set(&mut self, name: &str, value: &str) {
        self.items.retain(|&(ref n, _)| !n.eq_ignore_ascii_case(name));
        self.add(name, value);
    }

    /// Append a header field, keeping earlier fields of the same name
    pub fn add(&mut self, name: &str, value: &str) {
        self.items.push((name.to_ascii_lowercase(), value.to_string()));
    }

    pub fn remove(&mut self, name: &str) {
        self.items.retain(|&(ref n, _)| !n.eq_ignore_ascii_case(name));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterator over `(lowercased name, value)` pairs in insertion order
    pub fn iter(&self) -> slice::Iter<(String, String)> {
        self.items.iter()
    }

    /// Copy every field of `other` into this map, replacing fields of
    /// the same name. Fields only present here are kept.
    pub fn merge_from(&mut self, other: &Headers) {
        for &(ref name, ref value) in other.iter() {
            self.set(name, value);
        }
    }
}

/// Format a lowercased header name in canonical hyphen-segmented
/// title case, e.g. `content-type` becomes `Content-Type`.
pub fn canonical(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_start = true;
    for ch in name.chars() {
        if at_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_start = ch == '-';
    }
    out
}

// Header values are comma-separated token lists and tokens are matched
// case-insensitively with surrounding whitespace stripped.
pub fn is_close(val: &str) -> bool {
    has_token(val, "close")
}

pub fn is_keep_alive(val: &str) -> bool {
    has_token(val, "keep-alive")
}

pub fn is_chunked(val: &str) -> bool {
    has_token(val, "chunked")
}

fn has_token(val: &str, token: &str) -> bool {
    val.split(',').any(|t| t.trim().eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod test {
    use super::{Headers, canonical, is_chunked, is_close, is_keep_alive};

    #[test]
    fn case_insensitive_get() {
        let mut h = Headers::new();
        h.set("Content-Type", "text/plain");
        assert_eq!(h.get("Content-Type"), Some("text/plain"));
        assert_eq!(h.get("content-type"), Some("text/plain"));
        assert_eq!(h.get("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(h.get("content-length"), None);
    }

    #[test]
    fn set_replaces_all() {
        let mut h = Headers::new();
        h.add("X-Tag", "one");
        h.add("x-tag", "two");
        assert_eq!(h.len(), 2);
        h.set("X-TAG", "three");
        assert_eq!(h.len(), 1);
        assert_eq!(h.get("x-tag"), Some("three"));
    }

    #[test]
    fn empty_value_is_preserved() {
        let mut h = Headers::new();
        h.set("X-Empty", "");
        assert_eq!(h.get("x-empty"), Some(""));
        assert!(h.contains("X-Empty"));
    }

    #[test]
    fn merge_updates_and_keeps() {
        let mut cached = Headers::new();
        cached.set("ETag", "\"v1\"");
        cached.set("Content-Type", "text/plain");
        let mut fresh = Headers::new();
        fresh.set("ETag", "\"v2\"");
        cached.merge_from(&fresh);
        assert_eq!(cached.get("etag"), Some("\"v2\""));
        assert_eq!(cached.get("content-type"), Some("text/plain"));
    }

    #[test]
    fn canonical_casing() {
        assert_eq!(canonical("content-type"), "Content-Type");
        assert_eq!(canonical("etag"), "Etag");
        assert_eq!(canonical("x-request-id"), "X-Request-Id");
        assert_eq!(canonical("if-modified-since"), "If-Modified-Since");
    }

    #[test]
    fn test_chunked() {
        assert!(is_chunked("chunked"));
        assert!(is_chunked("Chunked"));
        assert!(is_chunked("CHUNKED"));
        assert!(is_chunked("   CHUNKED  "));
        assert!(is_chunked("gzip, chunked"));
        assert!(!is_chunked("chunked 1"));
        assert!(!is_chunked("identity"));
    }

    #[test]
    fn test_close() {
        assert!(is_close("close"));
        assert!(is_close("Close"));
        assert!(is_close(" CLOSE "));
        assert!(!is_close("xclose"));
        assert!(!is_close("keep-alive"));
    }

    #[test]
    fn test_keep_alive() {
        assert!(is_keep_alive("keep-alive"));
        assert!(is_keep_alive("Keep-Alive"));
        assert!(!is_keep_alive("close"));
    }
}
