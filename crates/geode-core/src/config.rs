//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use geode_protocol::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_REDIRECTS, DEFAULT_READ_TIMEOUT};
use geode_storage::DEFAULT_MAX_AGE;

const APP_DIR: &str = "geode";
const STATE_FILE: &str = "browser_state.json";
const KNOWN_HOSTS_FILE: &str = ".geode-known-hosts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Session file with bookmarks, history and the navigation stack
    pub state_path: PathBuf,
    /// Root of the document cache
    pub cache_dir: PathBuf,
    /// Trust-on-first-use fingerprint store
    pub known_hosts_path: PathBuf,
    /// Cached documents older than this are refetched
    #[serde(with = "seconds")]
    pub stale_after: Duration,
    #[serde(with = "seconds")]
    pub connect_timeout: Duration,
    #[serde(with = "seconds")]
    pub read_timeout: Duration,
    pub max_redirects: usize,
    /// Serve fresh cache entries instead of fetching
    pub use_cache: bool,
}

impl Config {
    pub fn new(data_dir: PathBuf, cache_dir: PathBuf, known_hosts_path: PathBuf) -> Self {
        Self {
            state_path: data_dir.join(STATE_FILE),
            cache_dir,
            known_hosts_path,
            stale_after: DEFAULT_MAX_AGE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            use_cache: true,
        }
    }

    /// Everything under one directory
    pub fn in_dir(root: &Path) -> Self {
        Self::new(
            root.join("data"),
            root.join("cache"),
            root.join("known-hosts"),
        )
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".geode"))
    }

    pub fn cache_dir() -> PathBuf {
        dirs::cache_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".geode/cache"))
    }

    pub fn known_hosts_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(KNOWN_HOSTS_FILE))
            .unwrap_or_else(|| PathBuf::from(KNOWN_HOSTS_FILE))
    }

    /// Point the session file into `data_dir`
    pub fn set_data_dir(&mut self, data_dir: &Path) {
        self.state_path = data_dir.join(STATE_FILE);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir(), Self::cache_dir(), Self::known_hosts_path())
    }
}

mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

// XDG base directories with HOME fallbacks
mod dirs {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("USERPROFILE").ok().map(PathBuf::from)
        }
        #[cfg(not(target_os = "windows"))]
        {
            std::env::var("HOME")
                .ok()
                .filter(|h| !h.is_empty())
                .map(PathBuf::from)
        }
    }

    pub fn data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(not(target_os = "windows"))]
        {
            xdg("XDG_DATA_HOME").or_else(|| home_dir().map(|h| h.join(".local/share")))
        }
    }

    pub fn cache_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA")
                .ok()
                .map(|d| PathBuf::from(d).join("cache"))
        }
        #[cfg(not(target_os = "windows"))]
        {
            xdg("XDG_CACHE_HOME").or_else(|| home_dir().map(|h| h.join(".cache")))
        }
    }

    #[cfg(not(target_os = "windows"))]
    fn xdg(var: &str) -> Option<PathBuf> {
        std::env::var(var)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
