//! Turning user input and link targets into absolute URLs

use url::Url;

use crate::error::NavigationError;
use crate::Result;

const GEMINI_PREFIX: &str = "gemini://";

/// Resolve typed input into an absolute URL.
///
/// Input without a scheme is taken to be a Gemini host and path:
/// `example.test/page` becomes `gemini://example.test/page`.
pub fn resolve_input(input: &str) -> Result<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(NavigationError::InvalidUrl("empty input".to_string()));
    }

    let candidate = if has_scheme(input) {
        input.to_string()
    } else {
        format!("{}{}", GEMINI_PREFIX, input.trim_start_matches('/'))
    };

    let mut url = Url::parse(&candidate)
        .map_err(|e| NavigationError::InvalidUrl(format!("{input}: {e}")))?;
    if url.scheme() == "gemini" {
        if url.host_str().map_or(true, str::is_empty) {
            return Err(NavigationError::InvalidUrl(input.to_string()));
        }
        if url.path().is_empty() {
            url.set_path("/");
        }
    }
    Ok(url)
}

/// Resolve a link target against the page it appears on
pub fn resolve_link(base: &Url, target: &str) -> Result<Url> {
    base.join(target.trim())
        .map_err(|e| NavigationError::InvalidUrl(format!("{target}: {e}")))
}

/// Whether following `target` stays on Gemini: relative targets do,
/// absolute ones only with the `gemini` scheme
pub fn is_gemini_link(target: &str) -> bool {
    let target = target.trim();
    target.starts_with(GEMINI_PREFIX) || !has_scheme(target)
}

/// RFC 3986 scheme: a letter, then letters, digits, `+`, `-` or `.`, then `:`
fn has_scheme(input: &str) -> bool {
    match input.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                && !looks_like_host_port(input)
        }
        None => false,
    }
}

/// `example.test:1966/path` reads as host and port, not a scheme
fn looks_like_host_port(input: &str) -> bool {
    match input.split_once(':') {
        Some((host, rest)) => {
            (host.contains('.') || host == "localhost")
                && rest
                    .split('/')
                    .next()
                    .is_some_and(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
        }
        None => false,
    }
}
