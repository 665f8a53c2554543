//! Geode Core
//!
//! Coordination layer for the Geode Gemini client.
//! The [`Browser`] owns all state: the navigation stack, bookmarks and
//! history. Every command goes through it, and it publishes a session
//! snapshot after each one.

mod browser;
mod config;
mod error;

pub use browser::Browser;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use geode_navigation::{
    is_gemini_link, parse_gemtext, resolve_input, Line, Link, NavigationError, NavigationState,
    Page,
};
pub use geode_protocol::{
    GeminiClient, ProtocolError, Response, Status, TlsTransport, Transport,
};
pub use geode_session::{BrowserData, SavedState, SessionError, SessionManager};
pub use geode_storage::{CacheError, ContentCache};
pub use geode_trust::{KnownHosts, TrustError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging to stderr.
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
