//! Result presentation.

use crate::dispatch::ResolvedNavigation;
use crate::error::SearchResult;
use async_trait::async_trait;
use ctxsearch_types::{NavigationMode, NavigationPreference};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Host window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tab and window operations of the host.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// The window that currently has focus.
    async fn current_window(&self) -> SearchResult<WindowId>;

    /// Opens a window showing `url`.
    async fn create_window(&self, url: &str) -> SearchResult<WindowId>;

    /// Gives focus to `window`.
    async fn focus_window(&self, window: WindowId) -> SearchResult<()>;

    /// Opens a tab at `index` in the current window.
    async fn create_tab(&self, url: &str, index: u32, active: bool) -> SearchResult<()>;

    /// Navigates the active tab of the current window.
    async fn update_current_tab(&self, url: &str) -> SearchResult<()>;
}

/// Places a resolved destination according to the navigation preference.
pub struct Presenter {
    navigator: Arc<dyn Navigator>,
}

impl Presenter {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    /// Opens `nav` in the same tab, a new tab right after the origin, or a
    /// new window.
    ///
    /// A background window (`make_active == false`) hands focus back to the
    /// window that was current before; a failed refocus is logged only.
    pub async fn present(
        &self,
        nav: &ResolvedNavigation,
        pref: NavigationPreference,
    ) -> SearchResult<()> {
        match pref.mode {
            NavigationMode::NewWindow => {
                let previous = self.navigator.current_window().await?;
                self.navigator.create_window(&nav.url).await?;
                if !pref.make_active {
                    if let Err(e) = self.navigator.focus_window(previous).await {
                        warn!("Failed to refocus window {}: {}", previous, e);
                    }
                }
            }
            NavigationMode::NewTab => {
                self.navigator
                    .create_tab(&nav.url, nav.origin_tab_position.saturating_add(1), pref.make_active)
                    .await?;
            }
            NavigationMode::SameTab => {
                debug!("Opening search results in same tab");
                self.navigator.update_current_tab(&nav.url).await?;
            }
        }
        Ok(())
    }
}
