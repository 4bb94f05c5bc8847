//! Click dispatch.
//!
//! Maps a clicked menu key back to a destination. Provider keys carry a
//! position into the dispatch table that was current when the menu was
//! built; anything that does not resolve cleanly is a silent no-op.

use crate::menu::{DispatchTable, KEY_PREFIX, SETTINGS_KEY, SITE_SEARCH_KEY};
use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Placeholder preferred in provider templates.
pub const SEARCH_TERMS_TOKEN: &str = "{search terms}";
/// Legacy placeholder.
pub const PERCENT_S_TOKEN: &str = "%s";
/// Placeholder for the captured page host in the site search template.
pub const SITE_TOKEN: &str = "{site}";

/// A click on one of our menu items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub item_key: String,
    /// Selection text carried by the click itself, when the trigger
    /// context provides one.
    pub selection_text: Option<String>,
    /// Position of the tab the click came from within its window.
    pub origin_tab_position: u32,
}

impl ClickEvent {
    pub fn new(item_key: impl Into<String>, selection_text: impl Into<String>, origin_tab_position: u32) -> Self {
        Self {
            item_key: item_key.into(),
            selection_text: Some(selection_text.into()),
            origin_tab_position,
        }
    }
}

/// A destination ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNavigation {
    pub url: String,
    pub origin_tab_position: u32,
}

/// Why a click did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Clicks arrived while the handler was detached for a rebuild.
    HandlerDetached,
    /// "Search this site" without a captured page URL.
    NoCapturedPage,
    /// The captured page URL has no host.
    InvalidPageUrl(String),
    /// The key is not one of ours or its position does not parse.
    UnknownKey(String),
    /// The position is past the end of the current table.
    StalePosition { position: usize, table_len: usize },
}

/// Outcome of resolving a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Navigate(ResolvedNavigation),
    OpenSettings,
    Ignored(IgnoreReason),
}

/// Out-of-band values pushed by the content script.
#[derive(Debug, Default)]
pub struct Captures {
    selection: ArcSwapOption<String>,
    page_url: ArcSwapOption<String>,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached selection.
    pub fn set_selection(&self, selection: impl Into<String>) {
        self.selection.store(Some(Arc::new(selection.into())));
    }

    pub fn selection(&self) -> Option<String> {
        self.selection.load_full().map(|s| (*s).clone())
    }

    /// Replaces the cached page URL.
    pub fn set_page_url(&self, url: impl Into<String>) {
        self.page_url.store(Some(Arc::new(url.into())));
    }

    pub fn page_url(&self) -> Option<String> {
        self.page_url.load_full().map(|s| (*s).clone())
    }

    /// Removes and returns the cached page URL.
    pub fn take_page_url(&self) -> Option<String> {
        self.page_url.swap(None).map(|s| (*s).clone())
    }

    /// Clears the cached page URL.
    pub fn clear_page_url(&self) {
        self.page_url.store(None);
    }
}

/// Resolves clicks against a dispatch table.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    site_search_template: String,
}

impl Dispatcher {
    pub fn new(site_search_template: impl Into<String>) -> Self {
        Self {
            site_search_template: site_search_template.into(),
        }
    }

    /// Resolves a click.
    ///
    /// The click's own selection text wins over the cached one; the cache is
    /// consulted only when the click carries none. The cached page URL is
    /// consumed by any click that navigates.
    pub fn resolve(&self, click: &ClickEvent, table: &DispatchTable, captures: &Captures) -> Resolution {
        let selection = match click.selection_text.as_deref().filter(|s| !s.is_empty()) {
            Some(text) => {
                captures.set_selection(text);
                text.to_string()
            }
            None => captures.selection().unwrap_or_default(),
        };

        match click.item_key.as_str() {
            SITE_SEARCH_KEY => {
                let Some(page_url) = captures.take_page_url() else {
                    return Resolution::Ignored(IgnoreReason::NoCapturedPage);
                };
                match site_search_url(&self.site_search_template, &page_url, &selection) {
                    Some(url) => Resolution::Navigate(ResolvedNavigation {
                        url,
                        origin_tab_position: click.origin_tab_position,
                    }),
                    None => Resolution::Ignored(IgnoreReason::InvalidPageUrl(page_url)),
                }
            }
            SETTINGS_KEY => Resolution::OpenSettings,
            key => {
                let Some(position) = key
                    .strip_prefix(KEY_PREFIX)
                    .and_then(|rest| rest.parse::<usize>().ok())
                else {
                    return Resolution::Ignored(IgnoreReason::UnknownKey(key.to_string()));
                };
                let Some(entry) = table.get(position) else {
                    return Resolution::Ignored(IgnoreReason::StalePosition {
                        position,
                        table_len: table.len(),
                    });
                };

                captures.clear_page_url();
                Resolution::Navigate(ResolvedNavigation {
                    url: substitute_template(&entry.provider.url_template, &selection),
                    origin_tab_position: click.origin_tab_position,
                })
            }
        }
    }
}

/// Substitutes the percent-encoded selection into a provider template.
///
/// `{search terms}` takes precedence over `%s`; only the first occurrence is
/// replaced. With neither token the encoded selection is appended as is.
/// Everything outside the RFC 3986 unreserved set is escaped, `!'()*`
/// included.
pub fn substitute_template(template: &str, selection: &str) -> String {
    let encoded = urlencoding::encode(selection);
    if template.contains(SEARCH_TERMS_TOKEN) {
        template.replacen(SEARCH_TERMS_TOKEN, &encoded, 1)
    } else if template.contains(PERCENT_S_TOKEN) {
        template.replacen(PERCENT_S_TOKEN, &encoded, 1)
    } else {
        format!("{template}{encoded}")
    }
}

/// Builds a site-restricted search for the host of `page_url`.
pub fn site_search_url(template: &str, page_url: &str, selection: &str) -> Option<String> {
    let url = url::Url::parse(page_url).ok()?;
    let host = url.host_str()?;
    Some(substitute_template(&template.replacen(SITE_TOKEN, host, 1), selection))
}
