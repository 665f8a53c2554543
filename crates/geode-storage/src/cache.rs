//! Document cache
//!
//! One file per document at `<root>/<host>/<normalized path>`. Staleness
//! comes from the file's modification time; there is no index and no
//! eviction.

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::CacheError;
use crate::fs::atomic_write;
use crate::Result;

/// Entries older than this are refetched
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

const DEFAULT_PORT: u16 = 1965;
const INDEX_FILE: &str = "index.gmi";
const DEFAULT_EXTENSION: &str = "gmi";

/// Relative cache path for `url`.
///
/// - empty or `/` path maps to `<host>/index.gmi`
/// - a path ending in `/` gets `index.gmi` appended
/// - a last segment without an extension gets `.gmi` appended
/// - anything else is kept as is
///
/// `.` and `..` segments are dropped so the result stays under the host
/// directory. An explicit non-default port becomes part of the host
/// directory name.
pub fn normalize_path(url: &Url) -> Result<PathBuf> {
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| CacheError::InvalidUrl(url.to_string()))?;

    let mut path = PathBuf::from(match url.port() {
        Some(port) if port != DEFAULT_PORT => format!("{}_{}", host, port),
        _ => host.to_string(),
    });

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| {
            s.filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..")
                .collect()
        })
        .unwrap_or_default();

    let directory_like = segments.is_empty() || url.path().ends_with('/');

    match segments.split_last() {
        Some((last, parents)) if !directory_like => {
            path.extend(parents);
            if Path::new(last).extension().is_some() {
                path.push(last);
            } else {
                path.push(format!("{}.{}", last, DEFAULT_EXTENSION));
            }
        }
        _ => {
            path.extend(&segments);
            path.push(INDEX_FILE);
        }
    }

    Ok(path)
}

#[derive(Debug, Clone)]
pub struct ContentCache {
    root: PathBuf,
}

impl ContentCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute location of the entry for `url`
    pub fn entry_path(&self, url: &Url) -> Result<PathBuf> {
        Ok(self.root.join(normalize_path(url)?))
    }

    /// True when no entry exists or the entry is older than `max_age`
    pub fn is_stale(&self, url: &Url, max_age: Duration) -> Result<bool> {
        let path = self.entry_path(url)?;
        let modified = match fs::metadata(&path) {
            Ok(meta) if !meta.is_file() => return Ok(true),
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        let modified: DateTime<Utc> = modified.into();
        let age = Utc::now().signed_duration_since(modified);
        let limit = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
        Ok(age > limit)
    }

    pub fn load(&self, url: &Url) -> Result<Vec<u8>> {
        let path = self.entry_path(url)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(CacheError::Miss(url.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the entry for `url`, creating directories as needed
    pub fn store(&self, url: &Url, contents: &[u8]) -> Result<PathBuf> {
        let path = self.entry_path(url)?;
        atomic_write(&path, contents)?;

        tracing::debug!(url = %url, path = %path.display(), bytes = contents.len(), "Cached document");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn norm(s: &str) -> PathBuf {
        normalize_path(&url(s)).unwrap()
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(norm("gemini://example.test"), PathBuf::from("example.test/index.gmi"));
        assert_eq!(norm("gemini://example.test/"), PathBuf::from("example.test/index.gmi"));
    }

    #[test]
    fn test_normalize_directory() {
        assert_eq!(norm("gemini://example.test/dir/"), PathBuf::from("example.test/dir/index.gmi"));
        assert_eq!(norm("gemini://example.test/dir/"), norm("gemini://example.test/dir/index.gmi"));
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(norm("gemini://example.test/about"), PathBuf::from("example.test/about.gmi"));
        assert_eq!(
            norm("gemini://example.test/docs/notes.txt"),
            PathBuf::from("example.test/docs/notes.txt")
        );
    }

    #[test]
    fn test_normalize_ignores_query_and_fragment() {
        assert_eq!(norm("gemini://example.test/a?q=1#frag"), norm("gemini://example.test/a"));
    }

    #[test]
    fn test_normalize_port() {
        assert_eq!(norm("gemini://example.test:1965/"), PathBuf::from("example.test/index.gmi"));
        assert_eq!(norm("gemini://example.test:1966/"), PathBuf::from("example.test_1966/index.gmi"));
    }

    #[test]
    fn test_normalize_stays_under_host() {
        let path = norm("gemini://example.test/a/%2E%2E/../../etc/passwd");
        assert!(path.starts_with("example.test"));
        assert!(!path.components().any(|c| c == std::path::Component::ParentDir));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let a = norm("gemini://example.test/x/y");
        let b = norm("gemini://example.test/x/y");
        assert_eq!(a, b);
    }

    #[test]
    fn test_store_load_and_staleness() {
        let dir = TempDir::new().unwrap();
        let cache = ContentCache::new(dir.path());
        let u = url("gemini://example.test/");

        assert!(cache.is_stale(&u, DEFAULT_MAX_AGE).unwrap());
        assert!(matches!(cache.load(&u), Err(CacheError::Miss(_))));

        let path = cache.store(&u, b"# Hello\n").unwrap();
        assert_eq!(path, dir.path().join("example.test/index.gmi"));
        assert!(!cache.is_stale(&u, DEFAULT_MAX_AGE).unwrap());
        assert_eq!(cache.load(&u).unwrap(), b"# Hello\n");

        cache.store(&u, b"# Updated\n").unwrap();
        assert_eq!(cache.load(&u).unwrap(), b"# Updated\n");
    }

    #[test]
    fn test_old_entry_is_stale() {
        let dir = TempDir::new().unwrap();
        let cache = ContentCache::new(dir.path());
        let u = url("gemini://example.test/old");

        let path = cache.store(&u, b"old").unwrap();
        let two_days_ago = SystemTime::now() - Duration::from_secs(48 * 60 * 60);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(two_days_ago)
            .unwrap();

        assert!(cache.is_stale(&u, DEFAULT_MAX_AGE).unwrap());
        assert!(!cache.is_stale(&u, Duration::from_secs(72 * 60 * 60)).unwrap());
    }

    #[test]
    fn test_directory_in_place_of_entry_is_stale() {
        let dir = TempDir::new().unwrap();
        let cache = ContentCache::new(dir.path());

        cache
            .store(&url("gemini://example.test/v1.0/notes"), b"notes")
            .unwrap();
        let parent = url("gemini://example.test/v1.0");
        assert!(cache.entry_path(&parent).unwrap().is_dir());
        assert!(cache.is_stale(&parent, DEFAULT_MAX_AGE).unwrap());
    }
}
