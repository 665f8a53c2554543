//! Protocol error types

use thiserror::Error;

use crate::status::Status;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Certificate for {host} changed: pinned {expected}, presented {presented}")]
    CertificateMismatch {
        host: String,
        expected: String,
        presented: String,
    },

    #[error("Trust store error: {0}")]
    Trust(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Timed out connecting to {host}:{port}")]
    ConnectTimeout { host: String, port: u16 },

    #[error("Cannot connect to {host}:{port}: {reason}")]
    Dial {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Malformed status line: {0}")]
    MalformedStatusLine(String),

    #[error("Server responded {0}")]
    Status(Status),

    #[error("Too many redirects from {url} (limit {limit})")]
    TooManyRedirects { url: String, limit: usize },

    #[error("Body of {url} cut off after {received} bytes: {source}")]
    TruncatedBody {
        url: String,
        received: usize,
        source: std::io::Error,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] geode_storage::CacheError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
