//! Navigation preferences.
//!
//! The device-local store keeps `{tabMode, tabActive}`. Older writers kept
//! two independent booleans instead; [`NavigationPreference::from_flags`]
//! folds those into a single mode.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a search result opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NavigationMode {
    /// Replace the page in the tab the click came from.
    #[serde(rename = "sameTab")]
    SameTab,
    /// Open a tab right after the origin tab.
    #[default]
    #[serde(rename = "openNewTab")]
    NewTab,
    /// Open a new window.
    #[serde(rename = "openNewWindow")]
    NewWindow,
}

impl NavigationMode {
    /// The stored `tabMode` string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SameTab => "sameTab",
            Self::NewTab => "openNewTab",
            Self::NewWindow => "openNewWindow",
        }
    }
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavigationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sameTab" => Ok(Self::SameTab),
            "openNewTab" => Ok(Self::NewTab),
            "openNewWindow" => Ok(Self::NewWindow),
            other => Err(Error::UnknownNavigationMode(other.to_string())),
        }
    }
}

/// The active navigation preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavigationPreference {
    pub mode: NavigationMode,
    /// Whether a new tab or window takes focus.
    pub make_active: bool,
}

impl NavigationPreference {
    #[must_use]
    pub const fn new(mode: NavigationMode, make_active: bool) -> Self {
        Self { mode, make_active }
    }

    /// Converts the legacy pair of flags. A new window wins over a new tab
    /// when both are set.
    #[must_use]
    pub const fn from_flags(open_in_new_tab: bool, open_in_new_window: bool, make_active: bool) -> Self {
        let mode = if open_in_new_window {
            NavigationMode::NewWindow
        } else if open_in_new_tab {
            NavigationMode::NewTab
        } else {
            NavigationMode::SameTab
        };
        Self { mode, make_active }
    }

    /// Applies a stored record on top of the current preference.
    ///
    /// An unrecognized or missing `tabMode` keeps the current mode. A
    /// missing `tabActive` reads as `false`.
    #[must_use]
    pub fn merged_with(self, stored: &StoredPreferences) -> Self {
        let mode = stored
            .tab_mode
            .as_deref()
            .and_then(|m| m.parse().ok())
            .unwrap_or(self.mode);
        Self {
            mode,
            make_active: stored.tab_active.unwrap_or(false),
        }
    }

    /// The record to persist for this preference.
    #[must_use]
    pub fn to_stored(&self) -> StoredPreferences {
        StoredPreferences {
            tab_mode: Some(self.mode.as_str().to_string()),
            tab_active: Some(self.make_active),
        }
    }
}

/// Preference record as kept in the device-local store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredPreferences {
    #[serde(rename = "tabMode", default, skip_serializing_if = "Option::is_none")]
    pub tab_mode: Option<String>,
    #[serde(rename = "tabActive", default, skip_serializing_if = "Option::is_none")]
    pub tab_active: Option<bool>,
}

impl StoredPreferences {
    /// Values written when the store holds no preference yet.
    #[must_use]
    pub fn defaults() -> Self {
        NavigationPreference::default().to_stored()
    }

    /// Whether neither field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tab_mode.is_none() && self.tab_active.is_none()
    }
}
