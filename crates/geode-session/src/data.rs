//! Bookmarks and history

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::Result;

/// Long-lived user data. Both lists keep insertion order and hold each
/// URL at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserData {
    #[serde(default)]
    pub bookmarks: Vec<String>,
    #[serde(default)]
    pub history: Vec<String>,
}

impl BrowserData {
    pub fn new() -> Self {
        Self::default()
    }

    // === Bookmarks ===

    pub fn is_bookmarked(&self, url: &str) -> bool {
        self.bookmarks.iter().any(|b| b == url)
    }

    /// Returns false if the URL was already bookmarked
    pub fn add_bookmark(&mut self, url: &str) -> bool {
        if self.is_bookmarked(url) {
            return false;
        }
        self.bookmarks.push(url.to_string());
        true
    }

    pub fn bookmark(&self, index: usize) -> Result<&str> {
        get(&self.bookmarks, index)
    }

    pub fn remove_bookmark(&mut self, index: usize) -> Result<String> {
        check(&self.bookmarks, index)?;
        Ok(self.bookmarks.remove(index))
    }

    pub fn remove_bookmark_url(&mut self, url: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b != url);
        self.bookmarks.len() != before
    }

    pub fn swap_bookmarks(&mut self, a: usize, b: usize) -> Result<()> {
        check(&self.bookmarks, a)?;
        check(&self.bookmarks, b)?;
        self.bookmarks.swap(a, b);
        Ok(())
    }

    pub fn clear_bookmarks(&mut self) -> usize {
        std::mem::take(&mut self.bookmarks).len()
    }

    // === History ===

    pub fn is_visited(&self, url: &str) -> bool {
        self.history.iter().any(|h| h == url)
    }

    /// Append to the first-visit log. Returns false for repeat visits.
    pub fn record_visit(&mut self, url: &str) -> bool {
        if self.is_visited(url) {
            return false;
        }
        self.history.push(url.to_string());
        true
    }

    pub fn history_entry(&self, index: usize) -> Result<&str> {
        get(&self.history, index)
    }

    pub fn remove_history(&mut self, index: usize) -> Result<String> {
        check(&self.history, index)?;
        Ok(self.history.remove(index))
    }

    pub fn clear_history(&mut self) -> usize {
        std::mem::take(&mut self.history).len()
    }
}

fn check(list: &[String], index: usize) -> Result<()> {
    if index >= list.len() {
        return Err(SessionError::InvalidIndex {
            index,
            len: list.len(),
        });
    }
    Ok(())
}

fn get(list: &[String], index: usize) -> Result<&str> {
    check(list, index)?;
    Ok(&list[index])
}
