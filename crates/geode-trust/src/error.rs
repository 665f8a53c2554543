//! Trust error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrustError {
    #[error("Certificate for {host} changed: pinned {expected}, presented {presented}")]
    CertificateMismatch {
        host: String,
        expected: String,
        presented: String,
    },

    #[error("Known hosts IO error: {0}")]
    Io(#[from] std::io::Error),
}
