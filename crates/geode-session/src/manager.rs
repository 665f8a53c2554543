//! Session Manager
//!
//! Holds the latest published snapshot and writes it to the session file.
//! Clones share the same snapshot, so a signal handler thread can save
//! what the command loop last published.

use parking_lot::{Mutex, RwLock};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use geode_storage::atomic_write;

use crate::snapshot::SavedState;
use crate::Result;

pub struct SessionManager {
    path: PathBuf,
    /// Most recent consistent state
    latest: Arc<RwLock<Option<SavedState>>>,
    /// Serializes writers of the session file
    write_lock: Arc<Mutex<()>>,
}

impl SessionManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            latest: Arc::new(RwLock::new(None)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the session file. A missing file is not an error.
    pub fn load(&self) -> Result<Option<SavedState>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No session file");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let state: SavedState = serde_json::from_str(&contents)?;
        tracing::info!(
            path = %self.path.display(),
            bookmarks = state.data.bookmarks.len(),
            history = state.data.history.len(),
            pages = state.navigation.as_ref().map_or(0, |n| n.stack.len()),
            "Loaded session"
        );
        Ok(Some(state))
    }

    /// Replace the latest snapshot. Nothing is written until a save.
    pub fn publish(&self, state: SavedState) {
        *self.latest.write() = Some(state);
    }

    pub fn latest(&self) -> Option<SavedState> {
        self.latest.read().clone()
    }

    /// Write the latest published snapshot, if any. Returns whether a file
    /// was written.
    pub fn save_latest(&self) -> Result<bool> {
        let Some(state) = self.latest() else {
            return Ok(false);
        };
        self.save(&state)?;
        Ok(true)
    }

    pub fn save(&self, state: &SavedState) -> Result<()> {
        let json = serde_json::to_vec_pretty(state)?;

        let _guard = self.write_lock.lock();
        atomic_write(&self.path, &json)?;

        tracing::info!(path = %self.path.display(), bytes = json.len(), "Saved session");
        Ok(())
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            latest: Arc::clone(&self.latest),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}
