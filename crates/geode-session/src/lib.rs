//! Geode Session Management
//!
//! - Bookmarks and history are ordered URL lists, each URL at most once
//! - The browser publishes a snapshot of its state after every mutation
//! - Saving writes the latest published snapshot, so a save triggered from
//!   another thread never sees a half-applied command
//! - The session file is replaced atomically

mod data;
mod error;
mod manager;
mod snapshot;

pub use data::BrowserData;
pub use error::SessionError;
pub use manager::SessionManager;
pub use snapshot::{NavigationSnapshot, SavedState};

pub type Result<T> = std::result::Result<T, SessionError>;
