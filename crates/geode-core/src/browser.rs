//! Main browser state container
//!
//! Every operation either fully applies or leaves state untouched. After
//! each applied mutation the link flags are recomputed and a snapshot is
//! published to the session manager.

use std::sync::Arc;

use url::Url;

use geode_navigation::{resolve_input, NavigationError, NavigationState, Page};
use geode_protocol::{GeminiClient, Response, TlsTransport, Transport};
use geode_session::{BrowserData, SavedState, SessionManager};
use geode_storage::ContentCache;
use geode_trust::KnownHosts;

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

pub struct Browser {
    config: Config,
    client: GeminiClient,
    known_hosts: KnownHosts,
    navigation: NavigationState,
    data: BrowserData,
    session: SessionManager,
}

impl Browser {
    /// Browser backed by real TLS connections
    pub fn new(config: Config) -> Result<Self> {
        let transport = TlsTransport::new(KnownHosts::new(&config.known_hosts_path))?
            .with_connect_timeout(config.connect_timeout)
            .with_read_timeout(config.read_timeout);
        // `trust` edits must go through the handshake's own store handle
        let known_hosts = transport.known_hosts().clone();
        Ok(Self::with_trust(config, Arc::new(transport), known_hosts))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        let known_hosts = KnownHosts::new(&config.known_hosts_path);
        Self::with_trust(config, transport, known_hosts)
    }

    /// Browser whose `trust` commands act on `known_hosts`
    pub fn with_trust(
        config: Config,
        transport: Arc<dyn Transport>,
        known_hosts: KnownHosts,
    ) -> Self {
        let client = GeminiClient::new(transport, ContentCache::new(&config.cache_dir))
            .with_max_redirects(config.max_redirects)
            .with_max_age(config.stale_after);

        let mut browser = Self {
            known_hosts,
            session: SessionManager::new(&config.state_path),
            client,
            navigation: NavigationState::new(),
            data: BrowserData::new(),
            config,
        };
        browser.commit();
        browser
    }

    /// Load bookmarks and history from the session file, and the
    /// navigation stack too when `include_navigation` is set.
    /// Returns whether a session file existed.
    pub fn restore(&mut self, include_navigation: bool) -> Result<bool> {
        let Some(saved) = self.session.load()? else {
            return Ok(false);
        };

        if include_navigation {
            self.navigation = saved.restore_navigation();
        }
        self.data = saved.data;
        self.commit();

        tracing::info!(
            pages = self.navigation.len(),
            position = self.navigation.position(),
            "Restored session"
        );
        Ok(true)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Write the latest snapshot to the session file
    pub fn save(&self) -> Result<()> {
        self.session.save_latest()?;
        Ok(())
    }

    // === Navigation ===

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.navigation.current_page()
    }

    pub fn current_url(&self) -> Option<&Url> {
        self.navigation.current_url()
    }

    /// Resolve typed input and navigate to it
    pub fn navigate(&mut self, input: &str) -> Result<&Page> {
        let url = resolve_input(input)?;
        self.navigate_url(&url)
    }

    /// Fetch `url` (cache first) and push it onto the stack.
    ///
    /// History records the requested URL, and the final one when a
    /// redirect changed it. Nothing changes if the fetch fails.
    pub fn navigate_url(&mut self, url: &Url) -> Result<&Page> {
        let response = self.client.fetch(url, self.config.use_cache)?;
        let page = page_from(&response);

        self.data.record_visit(url.as_str());
        if response.url != *url {
            self.data.record_visit(response.url.as_str());
        }

        self.navigation.push(page);
        tracing::info!(
            url = %response.url,
            from_cache = response.from_cache,
            position = self.navigation.position(),
            "Navigated"
        );

        self.commit();
        self.current()
    }

    /// Fetch without touching the stack, history or bookmarks
    pub fn fetch(&self, url: &Url) -> Result<Page> {
        let response = self.client.fetch(url, self.config.use_cache)?;
        let mut page = page_from(&response);
        page.mark_links(|u| self.data.is_visited(u), |u| self.data.is_bookmarked(u));
        Ok(page)
    }

    pub fn go_back(&mut self) -> Result<&Page> {
        self.navigation.go_back()?;
        self.commit();
        self.current()
    }

    pub fn go_forward(&mut self) -> Result<&Page> {
        self.navigation.go_forward()?;
        self.commit();
        self.current()
    }

    /// Refetch the current page, bypassing the cache, and replace it in
    /// place. Forward pages are kept.
    pub fn refresh(&mut self) -> Result<&Page> {
        let url = self
            .navigation
            .current_url()
            .cloned()
            .ok_or(NavigationError::EmptyStack)?;

        let response = self.client.fetch(&url, false)?;
        self.navigation.replace_current(page_from(&response))?;
        tracing::info!(url = %response.url, "Refreshed");

        self.commit();
        self.current()
    }

    /// Absolute URL of link `ordinal` on the current page
    pub fn link_url(&self, ordinal: usize) -> Result<Url> {
        let page = self.current()?;
        let link = page.link(ordinal).ok_or(CoreError::LinkNotFound {
            ordinal,
            count: page.links.len(),
        })?;
        link.resolve(&page.url)
            .ok_or_else(|| NavigationError::InvalidUrl(link.target.clone()).into())
    }

    pub fn follow_link(&mut self, ordinal: usize) -> Result<&Page> {
        let url = self.link_url(ordinal)?;
        self.navigate_url(&url)
    }

    // === Stack ===

    pub fn jump_to(&mut self, index: usize) -> Result<&Page> {
        self.navigation.jump_to(index)?;
        self.commit();
        self.current()
    }

    pub fn close_below(&mut self) -> usize {
        let removed = self.navigation.close_below();
        self.commit();
        removed
    }

    pub fn compress_above(&mut self) -> usize {
        let removed = self.navigation.compress_above();
        self.commit();
        removed
    }

    pub fn empty_stack(&mut self) -> usize {
        let removed = self.navigation.empty();
        self.commit();
        removed
    }

    // === History ===

    pub fn data(&self) -> &BrowserData {
        &self.data
    }

    pub fn goto_history(&mut self, index: usize) -> Result<&Page> {
        let url = parse_stored(self.data.history_entry(index)?)?;
        self.navigate_url(&url)
    }

    pub fn remove_history(&mut self, index: usize) -> Result<String> {
        let removed = self.data.remove_history(index)?;
        self.commit();
        Ok(removed)
    }

    pub fn clear_history(&mut self) -> usize {
        let removed = self.data.clear_history();
        self.commit();
        removed
    }

    // === Bookmarks ===

    pub fn goto_bookmark(&mut self, index: usize) -> Result<&Page> {
        let url = parse_stored(self.data.bookmark(index)?)?;
        self.navigate_url(&url)
    }

    /// Returns false if the current page was already bookmarked
    pub fn bookmark_current(&mut self) -> Result<bool> {
        let url = self.current()?.url.to_string();
        let added = self.data.add_bookmark(&url);
        self.commit();
        Ok(added)
    }

    pub fn bookmark_link(&mut self, ordinal: usize) -> Result<bool> {
        let url = self.link_url(ordinal)?;
        let added = self.data.add_bookmark(url.as_str());
        self.commit();
        Ok(added)
    }

    pub fn remove_bookmark(&mut self, index: usize) -> Result<String> {
        let removed = self.data.remove_bookmark(index)?;
        self.commit();
        Ok(removed)
    }

    /// Returns false if the current page was not bookmarked
    pub fn remove_current_bookmark(&mut self) -> Result<bool> {
        let url = self.current()?.url.to_string();
        let removed = self.data.remove_bookmark_url(&url);
        self.commit();
        Ok(removed)
    }

    pub fn swap_bookmarks(&mut self, a: usize, b: usize) -> Result<()> {
        self.data.swap_bookmarks(a, b)?;
        self.commit();
        Ok(())
    }

    pub fn clear_bookmarks(&mut self) -> usize {
        let removed = self.data.clear_bookmarks();
        self.commit();
        removed
    }

    // === Trust ===

    /// Forget the pinned certificate for `host`
    pub fn forget_host(&self, host: &str) -> Result<bool> {
        Ok(self.known_hosts.forget(host)?)
    }

    pub fn pinned_fingerprint(&self, host: &str) -> Result<Option<String>> {
        Ok(self.known_hosts.fingerprint_of(host)?)
    }

    fn current(&self) -> Result<&Page> {
        self.navigation
            .current_page()
            .ok_or_else(|| NavigationError::EmptyStack.into())
    }

    /// Refresh derived link flags and publish a snapshot
    fn commit(&mut self) {
        let data = &self.data;
        self.navigation
            .mark_links(|u| data.is_visited(u), |u| data.is_bookmarked(u));
        self.session
            .publish(SavedState::capture(&self.data, &self.navigation));
    }
}

fn page_from(response: &Response) -> Page {
    Page::with_mime(
        response.url.clone(),
        response.text().into_owned(),
        response.mime(),
    )
}

fn parse_stored(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| NavigationError::InvalidUrl(format!("{url}: {e}")).into())
}
