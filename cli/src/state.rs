//! Shared shell state
use geode_core::{Browser, Result, SessionManager};
use parking_lot::Mutex;
use std::sync::Arc;

/// Thread-safe wrapper around the browser.
///
/// The session manager is held separately so a signal handler can save the
/// last published snapshot without waiting on the browser lock.
#[derive(Clone)]
pub struct AppState {
    browser: Arc<Mutex<Browser>>,
    session: SessionManager,
}

impl AppState {
    pub fn new(browser: Browser) -> Self {
        let session = browser.session().clone();
        Self {
            browser: Arc::new(Mutex::new(browser)),
            session,
        }
    }

    pub fn with_browser<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Browser) -> T,
    {
        let mut guard = self.browser.lock();
        f(&mut guard)
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Write the latest snapshot to the session file
    pub fn save(&self) -> Result<()> {
        self.session.save_latest()?;
        Ok(())
    }
}
