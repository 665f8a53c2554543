//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Index {index} out of range (have {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session file IO error: {0}")]
    Io(#[from] std::io::Error),
}
