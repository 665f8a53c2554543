//! Geode Storage Layer
//!
//! File-backed persistence for fetched documents.
//! Every write goes through a temp file and rename, so readers never
//! observe a partially written file.

mod cache;
mod error;
mod fs;

pub use cache::{normalize_path, ContentCache, DEFAULT_MAX_AGE};
pub use error::CacheError;
pub use fs::atomic_write;

pub type Result<T> = std::result::Result<T, CacheError>;
