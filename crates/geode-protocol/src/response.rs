//! Fetch results

use std::borrow::Cow;
use std::path::Path;
use url::Url;

use crate::status::Status;

/// Outcome of a successful fetch
#[derive(Debug, Clone)]
pub struct Response {
    /// Final URL after any redirects
    pub url: Url,
    pub status: Status,
    pub body: Vec<u8>,
    /// Served from the local cache instead of the network
    pub from_cache: bool,
}

impl Response {
    pub(crate) fn network(url: Url, status: Status, body: Vec<u8>) -> Self {
        Self {
            url,
            status,
            body,
            from_cache: false,
        }
    }

    /// Cache hits carry a synthetic `20` status. Entries keep no header,
    /// so the media type is guessed from the file extension.
    pub(crate) fn cached(url: Url, body: Vec<u8>) -> Self {
        let mime = cached_mime(&url);
        Self {
            url,
            status: Status::new(20, mime),
            body,
            from_cache: true,
        }
    }

    /// Media type from the meta field, without parameters
    pub fn mime(&self) -> &str {
        let mime = self.status.meta.split(';').next().unwrap_or_default().trim();
        if mime.is_empty() {
            "text/gemini"
        } else {
            mime
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

fn cached_mime(url: &Url) -> &'static str {
    match Path::new(url.path()).extension().and_then(|e| e.to_str()) {
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        _ => "text/gemini",
    }
}
