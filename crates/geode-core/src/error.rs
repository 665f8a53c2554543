//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    Protocol(#[from] geode_protocol::ProtocolError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] geode_navigation::NavigationError),

    #[error("Session error: {0}")]
    Session(#[from] geode_session::SessionError),

    #[error("Cache error: {0}")]
    Cache(#[from] geode_storage::CacheError),

    #[error("Trust store error: {0}")]
    Trust(#[from] geode_trust::TrustError),

    #[error("Link {ordinal} not found (page has {count})")]
    LinkNotFound { ordinal: usize, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
