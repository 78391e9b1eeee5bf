//! High-level client: redirects and conditional revalidation

use std::sync::Arc;

use url::Url;

use request::Request;
use response::Response;
use client::{Config, Error};
use client::cache::Cache;
use client::pool::Pool;
use client::transport;


/// HTTP client with a connection pool and a response cache.
///
/// Safe to share between threads; distinct origins don't contend
/// beyond the pool map lock.
pub struct Client {
    config: Arc<Config>,
    pool: Pool,
    cache: Cache,
}

/// Outcome of a client operation
#[derive(Debug)]
pub struct Fetched {
    /// The final response of the chain
    pub response: Response,
    /// Number of redirects that were followed
    pub redirects: usize,
    /// Set when the redirect limit was hit; `response` is the last
    /// redirect received and the cache was left untouched
    pub too_many_redirects: bool,
    /// Set when the body was served from the cache after a 304
    pub from_cache: bool,
}

impl Client {
    pub fn new(config: &Arc<Config>) -> Client {
        Client {
            config: config.clone(),
            pool: Pool::new(config),
            cache: Cache::new(),
        }
    }

    pub fn get(&self, url: &str) -> Result<Fetched, Error> {
        self.request("GET", url, None)
    }

    pub fn post(&self, url: &str, body: &[u8], content_type: &str)
        -> Result<Fetched, Error>
    {
        self.request("POST", url, Some((body, content_type)))
    }

    /// The connection pool backing this client
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    fn request(&self, method: &str, url: &str,
        body: Option<(&[u8], &str)>)
        -> Result<Fetched, Error>
    {
        let mut target = parse_url(url)?;
        let mut method = method.to_string();
        let mut body = body.map(|(b, ct)| (b.to_vec(), ct.to_string()));
        let mut redirects = 0;
        loop {
            let (host, port) = endpoint(&target)?;
            let mut req = Request::new(&method[..], request_target(&target));
            if let Some((ref bytes, ref content_type)) = body {
                req.set_header("Content-Type", content_type);
                req.set_body(&bytes[..]);
            }
            let conditional = method == "GET" && self.config.use_cache;
            if conditional {
                if let Some(validators) =
                    self.cache.validators(target.as_str())
                {
                    if let Some(ref value) = validators.last_modified {
                        req.set_header("If-Modified-Since", value);
                    }
                    if let Some(ref value) = validators.etag {
                        req.set_header("If-None-Match", value);
                    }
                }
            }

            let resp = transport::exchange(&self.pool, &host, port, &req)?;

            if resp.is_redirect() && self.config.follow_redirects {
                let location = resp.header("Location")
                    .unwrap_or("").to_string();
                if location.is_empty() {
                    // nowhere to go, hand the redirect to the caller
                    return Ok(finish(resp, redirects, false, false));
                }
                if redirects >= self.config.max_redirects {
                    info!("redirect limit reached at {}", target);
                    return Ok(finish(resp, redirects, true, false));
                }
                target = target.join(&location)?;
                if method == "POST" {
                    method = "GET".to_string();
                    body = None;
                }
                redirects += 1;
                debug!("following redirect to {}", target);
                continue;
            }

            if conditional {
                if resp.is_not_modified() {
                    if let Some(cached) = self.cache
                        .merge_not_modified(target.as_str(), &resp)
                    {
                        trace!("serving {} from cache", target);
                        return Ok(finish(cached, redirects, false, true));
                    }
                    return Ok(finish(resp, redirects, false, false));
                }
                if resp.code() == 200 {
                    self.cache.store(target.as_str(), &resp);
                }
            }
            return Ok(finish(resp, redirects, false, false));
        }
    }
}

fn finish(response: Response, redirects: usize, too_many_redirects: bool,
    from_cache: bool)
    -> Fetched
{
    Fetched {
        response: response,
        redirects: redirects,
        too_many_redirects: too_many_redirects,
        from_cache: from_cache,
    }
}

/// Parse a URL, defaulting the scheme to `http`
fn parse_url(raw: &str) -> Result<Url, Error> {
    let normalized = if raw.contains("://") {
        raw.to_string()
    } else if raw.starts_with("//") {
        format!("http:{}", raw)
    } else {
        format!("http://{}", raw)
    };
    Ok(Url::parse(&normalized)?)
}

fn endpoint(url: &Url) -> Result<(String, u16), Error> {
    if url.scheme() != "http" {
        return Err(Error::UnsupportedScheme);
    }
    let host = url.host_str().ok_or(Error::MissingHost)?;
    Ok((host.to_string(), url.port().unwrap_or(80)))
}

/// Path plus query, the way it goes on the request line
fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
