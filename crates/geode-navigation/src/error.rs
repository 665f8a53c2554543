//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No previous page")]
    NoPreviousPage,

    #[error("No next page")]
    NoNextPage,

    #[error("Index {index} out of range (have {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("Navigation stack is empty")]
    EmptyStack,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
