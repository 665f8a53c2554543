//! Navigation stack
//!
//! ```text
//! push(page)       position += 1 (when non-empty), truncate forward pages, append
//! go_back()        position -= 1, or NoPreviousPage at the bottom
//! go_forward()     position += 1, or NoNextPage at the top
//! close_below()    keep pages 0..=position
//! compress_above() keep pages position.., position = 0
//! empty()          drop everything
//! ```
//!
//! Invariant: when the stack is non-empty, `position < len`. When it is
//! empty, `position` is 0 and there is no current page.

use url::Url;

use crate::error::NavigationError;
use crate::page::Page;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationState {
    position: usize,
    stack: Vec<Page>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts, clamping an out of range position
    pub fn from_parts(stack: Vec<Page>, position: usize) -> Self {
        let position = position.min(stack.len().saturating_sub(1));
        Self { position, stack }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn pages(&self) -> &[Page] {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.stack.get(self.position)
    }

    /// URL of the current page
    pub fn current_url(&self) -> Option<&Url> {
        self.current_page().map(|page| &page.url)
    }

    /// Place `page` right after the current one, dropping any forward pages
    pub fn push(&mut self, page: Page) -> &Page {
        if !self.stack.is_empty() {
            self.position += 1;
        }

        if self.position < self.stack.len() {
            let dropped = self.stack.len() - self.position;
            self.stack.truncate(self.position);
            tracing::debug!(dropped, "Discarded forward pages");
        }
        self.stack.push(page);

        &self.stack[self.position]
    }

    pub fn go_back(&mut self) -> Result<&Page> {
        if !self.can_go_back() {
            return Err(NavigationError::NoPreviousPage);
        }
        self.position -= 1;
        Ok(&self.stack[self.position])
    }

    pub fn go_forward(&mut self) -> Result<&Page> {
        if !self.can_go_forward() {
            return Err(NavigationError::NoNextPage);
        }
        self.position += 1;
        Ok(&self.stack[self.position])
    }

    pub fn can_go_back(&self) -> bool {
        self.position > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.position + 1 < self.stack.len()
    }

    /// Make the page at `index` current without changing the stack
    pub fn jump_to(&mut self, index: usize) -> Result<&Page> {
        if index >= self.stack.len() {
            return Err(NavigationError::InvalidIndex {
                index,
                len: self.stack.len(),
            });
        }
        self.position = index;
        Ok(&self.stack[index])
    }

    /// Swap the current page for a refetched copy, keeping forward pages
    pub fn replace_current(&mut self, page: Page) -> Result<&Page> {
        let slot = self
            .stack
            .get_mut(self.position)
            .ok_or(NavigationError::EmptyStack)?;
        *slot = page;
        Ok(&*slot)
    }

    /// Drop every page above the current one. Returns how many went.
    pub fn close_below(&mut self) -> usize {
        if self.stack.is_empty() {
            return 0;
        }
        let removed = self.stack.len() - (self.position + 1);
        self.stack.truncate(self.position + 1);
        removed
    }

    /// Drop every page below the current one, which becomes the bottom.
    /// Returns how many went.
    pub fn compress_above(&mut self) -> usize {
        let removed = self.position;
        self.stack.drain(..self.position);
        self.position = 0;
        removed
    }

    /// Drop all pages. Returns how many went.
    pub fn empty(&mut self) -> usize {
        let removed = self.stack.len();
        self.stack.clear();
        self.position = 0;
        removed
    }

    /// Recompute link flags on every stacked page
    pub fn mark_links<V, B>(&mut self, is_visited: V, is_bookmarked: B)
    where
        V: Fn(&str) -> bool,
        B: Fn(&str) -> bool,
    {
        for page in &mut self.stack {
            page.mark_links(&is_visited, &is_bookmarked);
        }
    }
}
