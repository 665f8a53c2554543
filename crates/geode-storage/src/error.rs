//! Cache error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Not cached: {0}")]
    Miss(String),

    #[error("Cannot derive cache path: {0}")]
    InvalidUrl(String),

    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),
}
