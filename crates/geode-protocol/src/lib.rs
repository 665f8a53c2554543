//! Geode Protocol Client
//!
//! Request/response exchange over TLS:
//! - Request: `<absolute-url>\r\n`
//! - Response: `<code> <meta>\r\n`, followed by a body on success
//!
//! Server identity is checked against the trust store on every handshake.
//! Redirects are followed up to a fixed number of hops, and successful
//! bodies are written to the document cache.

mod client;
mod error;
mod response;
mod status;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{GeminiClient, DEFAULT_MAX_REDIRECTS};
pub use error::ProtocolError;
pub use response::Response;
pub use status::{Status, StatusClass, MAX_META_LEN};
pub use transport::{
    Connection, TlsTransport, Transport, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT,
    DEFAULT_READ_TIMEOUT,
};

pub type Result<T> = std::result::Result<T, ProtocolError>;
