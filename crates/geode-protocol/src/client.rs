//! Cache-aware fetch with redirect following

use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use url::{Host, Url};

use geode_storage::{CacheError, ContentCache, DEFAULT_MAX_AGE};

use crate::error::ProtocolError;
use crate::response::Response;
use crate::status::{Status, StatusClass, MAX_META_LEN};
use crate::transport::{Transport, DEFAULT_PORT};
use crate::Result;

pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Header line limit: two digit code, space, meta, CRLF
const MAX_HEADER_LEN: usize = MAX_META_LEN + 5;

pub struct GeminiClient {
    transport: Arc<dyn Transport>,
    cache: ContentCache,
    max_redirects: usize,
    max_age: Duration,
}

impl GeminiClient {
    pub fn new(transport: Arc<dyn Transport>, cache: ContentCache) -> Self {
        Self {
            transport,
            cache,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Cached entries older than `max_age` are refetched
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Fetch `url`, following redirects.
    ///
    /// With `use_cache`, a fresh cache entry for any URL in the redirect
    /// chain is returned without touching the network. Every body read
    /// from the network is stored under the final URL, whether or not
    /// `use_cache` was set.
    pub fn fetch(&self, url: &Url, use_cache: bool) -> Result<Response> {
        let mut current = url.clone();

        for hop in 0..=self.max_redirects {
            if current.scheme() != "gemini" {
                return Err(ProtocolError::UnsupportedScheme(current.to_string()));
            }

            if use_cache {
                if let Some(body) = self.cached_body(&current) {
                    tracing::debug!(url = %current, bytes = body.len(), "Cache hit");
                    return Ok(Response::cached(current, body));
                }
            }

            let (status, mut reader) = self.request(&current)?;

            match status.class() {
                StatusClass::Redirect => {
                    if status.meta.is_empty() {
                        return Err(ProtocolError::MalformedStatusLine(format!(
                            "redirect without target: {}",
                            status
                        )));
                    }
                    let target = current.join(&status.meta).map_err(|e| {
                        ProtocolError::MalformedStatusLine(format!("{}: {}", status, e))
                    })?;
                    tracing::info!(from = %current, to = %target, hop, "Following redirect");
                    current = target;
                }
                StatusClass::Success => {
                    let body = read_body(&current, &mut reader)?;
                    if let Err(e) = self.cache.store(&current, &body) {
                        tracing::warn!(url = %current, error = %e, "Could not cache document");
                    }
                    tracing::info!(url = %current, bytes = body.len(), "Fetched");
                    return Ok(Response::network(current, status, body));
                }
                _ => {
                    tracing::debug!(url = %current, status = %status, "Unsuccessful response");
                    return Err(ProtocolError::Status(status));
                }
            }
        }

        Err(ProtocolError::TooManyRedirects {
            url: url.to_string(),
            limit: self.max_redirects,
        })
    }

    /// Fresh cached body for `url`. Unreadable entries count as misses.
    fn cached_body(&self, url: &Url) -> Option<Vec<u8>> {
        let lookup = self.cache.is_stale(url, self.max_age).and_then(|stale| {
            if stale {
                Err(CacheError::Miss(url.to_string()))
            } else {
                self.cache.load(url)
            }
        });

        match lookup {
            Ok(body) => Some(body),
            Err(CacheError::Miss(_)) => None,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Send the request line and read the response header
    fn request(&self, url: &Url) -> Result<(Status, impl BufRead)> {
        let host = match url.host() {
            Some(Host::Ipv6(addr)) => addr.to_string(),
            Some(host) => host.to_string(),
            None => return Err(ProtocolError::InvalidUrl(url.to_string())),
        };
        let port = url.port().unwrap_or(DEFAULT_PORT);

        let mut conn = self.transport.connect(&host, port)?;
        conn.write_all(format!("{}\r\n", url).as_bytes())?;
        conn.flush()?;

        let mut reader = BufReader::new(conn);
        let status = read_header(&mut reader)?;
        Ok((status, reader))
    }
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<Status> {
    let mut line = Vec::new();
    match reader
        .by_ref()
        .take(MAX_HEADER_LEN as u64)
        .read_until(b'\n', &mut line)
    {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {}
        Err(e) => return Err(e.into()),
    }

    if line.is_empty() {
        return Err(ProtocolError::MalformedStatusLine(
            "connection closed before header".to_string(),
        ));
    }
    if !line.ends_with(b"\n") && line.len() >= MAX_HEADER_LEN {
        return Err(ProtocolError::MalformedStatusLine(
            "header line too long".to_string(),
        ));
    }

    let text = std::str::from_utf8(&line)
        .map_err(|_| ProtocolError::MalformedStatusLine("header is not UTF-8".to_string()))?;
    Status::parse(text)
}

/// Read to end of stream. A peer that drops TCP without a TLS
/// close_notify still ends the body cleanly.
fn read_body<R: Read>(url: &Url, reader: &mut R) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    let mut buf = [0u8; 8192];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => body.extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => {
                return Err(ProtocolError::TruncatedBody {
                    url: url.to_string(),
                    received: body.len(),
                    source: e,
                })
            }
        }
    }

    Ok(body)
}
