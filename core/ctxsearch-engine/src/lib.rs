//! Context menu search engine.
//!
//! Keeps a right-click menu in sync with a user-configured list of search
//! providers, resolves clicks on that menu into search URLs, and opens them
//! according to the user's navigation preference.
//!
//! # Architecture
//!
//! Storage, the menu, tabs and windows, notifications and the settings page
//! all belong to the host and are injected as traits. The engine owns only
//! derived, ephemeral state.
//!
//! ## Components
//!
//! - **Ordering**: turns the stored provider map into a stable sequence
//! - **Menu**: rebuilds the menu and publishes the position table clicks
//!   resolve against
//! - **Dispatch**: maps a clicked key back to a destination URL
//! - **Present**: opens the destination in the same tab, a new tab, or a new
//!   window
//! - **Engine**: wires store changes, messages and clicks together
//!
//! ## Flow
//!
//! 1. **Change**: the provider store reports a change
//! 2. **Order**: providers are ordered by display index
//! 3. **Rebuild**: the menu is recreated and a new dispatch table swapped in
//! 4. **Click**: the clicked position is looked up in the current table
//! 5. **Present**: the substituted URL is opened
//!
//! # Example
//!
//! ```
//! use ctxsearch_engine::dispatch::substitute_template;
//!
//! let url = substitute_template("https://duckduckgo.com/?q={search terms}", "rust lang");
//! assert_eq!(url, "https://duckduckgo.com/?q=rust%20lang");
//! ```

pub mod bootstrap;
mod config;
pub mod dispatch;
mod engine;
mod error;
pub mod memory;
pub mod menu;
pub mod notify;
pub mod ordering;
pub mod present;
pub mod protocol;
pub mod store;

pub use bootstrap::{DefaultProviderSource, JsonFileSource, StaticSource};
pub use config::EngineConfig;
pub use dispatch::{
    substitute_template, Captures, ClickEvent, Dispatcher, IgnoreReason, Resolution,
    ResolvedNavigation,
};
pub use engine::{Collaborators, ContextSearch, DEFAULTS_LOADED_MESSAGE, STORE_DISABLED_MESSAGE};
pub use error::{SearchError, SearchResult};
pub use menu::{
    provider_key, DispatchTable, MenuEntry, MenuItem, MenuItemKind, MenuSurface, MenuSynchronizer,
    SEPARATOR_KEY, SETTINGS_KEY, SITE_SEARCH_KEY,
};
pub use notify::{Notification, Notifier, SettingsPage};
pub use ordering::{order, OrderedSequence};
pub use present::{Navigator, Presenter, WindowId};
pub use protocol::{BackgroundEvent, InboundMessage, OutboundMessage};
pub use store::{PreferenceStore, ProviderStore, StorageArea};
