//! Pages and their links

use serde::{Deserialize, Serialize};
use url::Url;

use crate::gemtext::{parse_gemtext, Line};
use crate::input::resolve_link;

/// A link found in a page, in document order.
///
/// `visited` and `bookmarked` are derived from the link target resolved
/// against the page URL, and are recomputed whenever history or bookmarks
/// change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub ordinal: usize,
    /// Target exactly as written, possibly relative
    pub target: String,
    pub label: Option<String>,
    pub visited: bool,
    pub bookmarked: bool,
}

impl Link {
    /// Absolute URL of the target, if it resolves
    pub fn resolve(&self, base: &Url) -> Option<Url> {
        resolve_link(base, &self.target).ok()
    }
}

pub const GEMTEXT_MIME: &str = "text/gemini";

/// A fetched document. Links are derived and never persisted; the media
/// type is written only when it is not gemtext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Final URL after redirects
    pub url: Url,
    pub content: String,
    #[serde(default = "gemtext_mime", skip_serializing_if = "is_gemtext_mime")]
    pub mime: String,
    #[serde(skip)]
    pub links: Vec<Link>,
}

impl Page {
    /// Build a gemtext page with its links extracted and all flags cleared
    pub fn new(url: Url, content: impl Into<String>) -> Self {
        Self::with_mime(url, content, GEMTEXT_MIME)
    }

    /// Build a page of any media type. Only gemtext has links.
    pub fn with_mime(url: Url, content: impl Into<String>, mime: impl Into<String>) -> Self {
        let mut page = Self {
            url,
            content: content.into(),
            mime: mime.into(),
            links: Vec::new(),
        };
        page.relink();
        page
    }

    pub fn is_gemtext(&self) -> bool {
        is_gemtext_mime(&self.mime)
    }

    /// Recompute link flags from the given predicates over resolved URLs
    pub fn mark_links<V, B>(&mut self, is_visited: V, is_bookmarked: B)
    where
        V: Fn(&str) -> bool,
        B: Fn(&str) -> bool,
    {
        for link in &mut self.links {
            let resolved = resolved_string(&self.url, &link.target);
            link.visited = is_visited(&resolved);
            link.bookmarked = is_bookmarked(&resolved);
        }
    }

    /// Re-derive links after deserialization
    pub fn relink(&mut self) {
        self.links = if self.is_gemtext() {
            extract_links(&self.content, &self.url, |_| false, |_| false)
        } else {
            Vec::new()
        };
    }

    pub fn link(&self, ordinal: usize) -> Option<&Link> {
        self.links.get(ordinal)
    }
}

/// Collect link lines outside preformatted blocks.
///
/// Ordinals count from zero in document order. Flags are evaluated on
/// the target resolved against `base`.
pub fn extract_links<V, B>(content: &str, base: &Url, is_visited: V, is_bookmarked: B) -> Vec<Link>
where
    V: Fn(&str) -> bool,
    B: Fn(&str) -> bool,
{
    parse_gemtext(content)
        .into_iter()
        .filter_map(|line| match line {
            Line::Link { target, label } if !target.is_empty() => Some((target, label)),
            _ => None,
        })
        .enumerate()
        .map(|(ordinal, (target, label))| {
            let resolved = resolved_string(base, target);
            Link {
                ordinal,
                target: target.to_string(),
                label: label.map(str::to_string),
                visited: is_visited(&resolved),
                bookmarked: is_bookmarked(&resolved),
            }
        })
        .collect()
}

fn gemtext_mime() -> String {
    GEMTEXT_MIME.to_string()
}

fn is_gemtext_mime(mime: &str) -> bool {
    mime == GEMTEXT_MIME
}

fn resolved_string(base: &Url, target: &str) -> String {
    resolve_link(base, target)
        .map(String::from)
        .unwrap_or_else(|_| target.to_string())
}
