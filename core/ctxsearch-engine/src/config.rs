//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the context search engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Title shown on desktop notifications.
    pub notification_title: String,
    /// Label of the fixed "search this site" entry.
    pub site_search_title: String,
    /// Label of the fixed settings entry.
    pub settings_title: String,
    /// Favicon lookup prefix; the provider host is appended.
    pub favicon_service: String,
    /// Whether the host menu can show per-item icons.
    pub icons_supported: bool,
    /// Destination for "search this site". `{site}` receives the captured
    /// page host, `{search terms}` the encoded selection.
    pub site_search_template: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            notification_title: "Context Search".to_string(),
            site_search_title: "Search this site with Google".to_string(),
            settings_title: "Options...".to_string(),
            favicon_service: "https://s2.googleusercontent.com/s2/favicons?domain_url=".to_string(),
            icons_supported: true,
            site_search_template: "https://www.google.com/search?q=site:{site}+{search terms}"
                .to_string(),
        }
    }
}
