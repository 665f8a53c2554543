//! Persisted session file layout

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use geode_navigation::{NavigationState, Page};

use crate::data::BrowserData;

/// Navigation stack as written to disk. Pages carry only URL and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    pub position: usize,
    #[serde(default)]
    pub current_url: String,
    #[serde(default)]
    pub stack: Vec<Page>,
}

/// Everything that survives a restart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: BrowserData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationSnapshot>,
}

impl SavedState {
    pub fn capture(data: &BrowserData, navigation: &NavigationState) -> Self {
        Self {
            saved_at: Utc::now(),
            data: data.clone(),
            navigation: Some(NavigationSnapshot {
                position: navigation.position(),
                current_url: navigation
                    .current_url()
                    .map(|u| u.to_string())
                    .unwrap_or_default(),
                stack: navigation.pages().to_vec(),
            }),
        }
    }

    /// Rebuild the navigation stack with links re-extracted.
    /// Flags are left for the caller to mark.
    pub fn restore_navigation(&self) -> NavigationState {
        match &self.navigation {
            Some(snapshot) => {
                let mut stack = snapshot.stack.clone();
                for page in &mut stack {
                    page.relink();
                }
                NavigationState::from_parts(stack, snapshot.position)
            }
            None => NavigationState::new(),
        }
    }
}
