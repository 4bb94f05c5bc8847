//! Shared plumbing for the `ctxsearch` command-line front end.
//!
//! Wires the engine to in-memory collaborators so a provider file can be
//! turned into a menu, and a click on that menu into the navigation it
//! would trigger.

use anyhow::{Context, Result};
use ctxsearch_engine::memory::{
    MemoryPreferenceStore, MemoryProviderStore, NavigationAction, RecordingMenu,
    RecordingNavigator, RecordingNotifier, RecordingSettings,
};
use ctxsearch_engine::{
    ClickEvent, Collaborators, ContextSearch, DefaultProviderSource, EngineConfig, InboundMessage,
    JsonFileSource, MenuItem, MenuItemKind, Notification, Resolution, StaticSource,
};
use ctxsearch_types::{parse_provider_map, NavigationPreference, ProviderMap};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

/// Reads an engine config from a TOML file, or the defaults without one.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

/// Reads a provider map from a JSON file, or an empty map without one.
pub fn load_providers(path: Option<&Path>) -> Result<ProviderMap> {
    let Some(path) = path else {
        return Ok(ProviderMap::new());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read providers {}", path.display()))?;
    parse_provider_map(&text).with_context(|| format!("Failed to parse providers {}", path.display()))
}

/// An engine running against in-memory collaborators.
pub struct Session {
    pub engine: ContextSearch,
    pub store: Arc<MemoryProviderStore>,
    pub menu: Arc<RecordingMenu>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub settings: Arc<RecordingSettings>,
}

impl Session {
    /// Builds and starts a session. `defaults` is the list imported when the
    /// provider map is empty.
    pub async fn start(
        config: EngineConfig,
        providers: ProviderMap,
        preference: NavigationPreference,
        defaults: Option<&Path>,
    ) -> Self {
        let defaults: Arc<dyn DefaultProviderSource> = match defaults {
            Some(path) => Arc::new(JsonFileSource::new(path)),
            None => Arc::new(StaticSource::default()),
        };
        let store = Arc::new(MemoryProviderStore::new(providers));
        let menu = Arc::new(RecordingMenu::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let settings = Arc::new(RecordingSettings::new());

        let engine = ContextSearch::new(
            config,
            Collaborators {
                providers: store.clone(),
                preferences: Arc::new(MemoryPreferenceStore::new(preference.to_stored())),
                menu: menu.clone(),
                navigator: navigator.clone(),
                notifier: notifier.clone(),
                settings: settings.clone(),
                defaults,
            },
        );
        engine.start().await;

        Self {
            engine,
            store,
            menu,
            navigator,
            notifier,
            settings,
        }
    }

    /// Simulates a click, optionally after the content script reported the
    /// page URL.
    pub async fn click(&self, click: ClickEvent, page_url: Option<String>) -> ClickReport {
        if let Some(url) = page_url {
            self.engine
                .handle_message(InboundMessage::PageUrlCaptured(url))
                .await;
        }
        let resolution = self.engine.handle_click(click).await;
        ClickReport {
            outcome: describe(&resolution),
            settings_opened: self.settings.opened() > 0,
            actions: self.navigator.actions().await,
        }
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.notifier.shown().await
    }
}

/// What a simulated click did.
#[derive(Debug, Clone, Serialize)]
pub struct ClickReport {
    pub outcome: String,
    pub settings_opened: bool,
    pub actions: Vec<NavigationAction>,
}

fn describe(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Navigate(nav) => format!("navigate {}", nav.url),
        Resolution::OpenSettings => "open settings".to_string(),
        Resolution::Ignored(reason) => format!("ignored: {reason:?}"),
    }
}

/// Renders menu items one per line.
pub fn format_menu(items: &[MenuItem]) -> String {
    let mut out = String::new();
    for item in items {
        match item.kind {
            MenuItemKind::Separator => out.push_str("----------------\n"),
            MenuItemKind::Normal => {
                let title = item.title.as_deref().unwrap_or_default();
                let _ = write!(out, "{:<16} {}", item.id, title);
                if let Some(icon) = &item.icon {
                    let _ = write!(out, "  [{icon}]");
                }
                out.push('\n');
            }
        }
    }
    out
}
