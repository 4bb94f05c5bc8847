//! The background orchestrator.
//!
//! Owns the shared state (dispatch table, captured selection and page URL,
//! navigation preference) and routes store changes, inbound messages and
//! menu clicks to the components. Every collaborator failure ends here: it
//! is logged and the engine returns to idle.

use crate::bootstrap::DefaultProviderSource;
use crate::config::EngineConfig;
use crate::dispatch::{Captures, ClickEvent, Dispatcher, IgnoreReason, Resolution};
use crate::error::SearchError;
use crate::menu::{DispatchTable, MenuSurface, MenuSynchronizer};
use crate::notify::{Notification, Notifier, SettingsPage};
use crate::present::{Navigator, Presenter};
use crate::protocol::{BackgroundEvent, InboundMessage, OutboundMessage};
use crate::store::{PreferenceStore, ProviderStore, StorageArea};
use arc_swap::ArcSwap;
use ctxsearch_types::{NavigationPreference, StoredPreferences};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Shown once when the cross-device store is disabled.
pub const STORE_DISABLED_MESSAGE: &str = "Please enable storage sync by setting webextensions.storage.sync.enabled to true in about:config. Context Search will not work until you do so.";

/// Shown after the default providers were imported.
pub const DEFAULTS_LOADED_MESSAGE: &str = "Default list of search engines has been loaded.";

/// Host capabilities the engine is wired against.
#[derive(Clone)]
pub struct Collaborators {
    pub providers: Arc<dyn ProviderStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub menu: Arc<dyn MenuSurface>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub settings: Arc<dyn SettingsPage>,
    pub defaults: Arc<dyn DefaultProviderSource>,
}

/// The context search background engine.
pub struct ContextSearch {
    config: Arc<EngineConfig>,
    providers: Arc<dyn ProviderStore>,
    preferences: Arc<dyn PreferenceStore>,
    notifier: Arc<dyn Notifier>,
    settings: Arc<dyn SettingsPage>,
    defaults: Arc<dyn DefaultProviderSource>,
    menu: MenuSynchronizer,
    dispatcher: Dispatcher,
    presenter: Presenter,
    captures: Captures,
    preference: ArcSwap<NavigationPreference>,
    /// Set by a reset request until the reimport completes.
    reset_pending: AtomicBool,
    outbound: Option<mpsc::UnboundedSender<OutboundMessage>>,
}

impl ContextSearch {
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Self {
        let config = Arc::new(config);
        Self {
            menu: MenuSynchronizer::new(collaborators.menu, Arc::clone(&config)),
            dispatcher: Dispatcher::new(config.site_search_template.clone()),
            presenter: Presenter::new(collaborators.navigator),
            providers: collaborators.providers,
            preferences: collaborators.preferences,
            notifier: collaborators.notifier,
            settings: collaborators.settings,
            defaults: collaborators.defaults,
            captures: Captures::new(),
            preference: ArcSwap::from_pointee(NavigationPreference::default()),
            reset_pending: AtomicBool::new(false),
            outbound: None,
            config,
        }
    }

    /// Sets the channel `ProvidersLoaded` is published on.
    #[must_use]
    pub fn with_outbound(mut self, outbound: mpsc::UnboundedSender<OutboundMessage>) -> Self {
        self.outbound = Some(outbound);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The active navigation preference.
    pub fn preference(&self) -> NavigationPreference {
        **self.preference.load()
    }

    /// The dispatch table clicks currently resolve against.
    pub fn dispatch_table(&self) -> Arc<DispatchTable> {
        self.menu.table()
    }

    /// Values captured out-of-band by the content script.
    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    /// Whether a reset-triggered import is still outstanding.
    pub fn reset_pending(&self) -> bool {
        self.reset_pending.load(Ordering::Acquire)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Initial load: make sure the provider store is usable and populated,
    /// build the menu, then load preferences.
    pub async fn start(&self) {
        match self.providers.load_all().await {
            Ok(providers) => {
                if providers.is_empty() || self.reset_pending() {
                    self.load_default_providers().await;
                }
            }
            Err(SearchError::StoreUnsupported { reason }) => {
                warn!("Provider store unsupported: {}", reason);
                self.load_default_providers().await;
                self.notify(STORE_DISABLED_MESSAGE).await;
            }
            Err(e) => {
                warn!("Failed to read provider store: {}", e);
                self.load_default_providers().await;
            }
        }

        self.rebuild_menu().await;
        self.load_preferences().await;
    }

    /// Drains `events` until every sender is dropped.
    pub async fn run(&self, mut events: mpsc::Receiver<BackgroundEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        debug!("Background event channel closed");
    }

    pub async fn handle_event(&self, event: BackgroundEvent) {
        match event {
            BackgroundEvent::Message(message) => self.handle_message(message).await,
            BackgroundEvent::StorageChanged(area) => self.handle_storage_change(area).await,
            BackgroundEvent::MenuClicked(click) => {
                self.handle_click(click).await;
            }
        }
    }

    // ── Inbound signals ──────────────────────────────────────────

    pub async fn handle_message(&self, message: InboundMessage) {
        match message {
            InboundMessage::Notify(text) => self.notify(text).await,
            InboundMessage::SelectionCaptured(text) => {
                if !text.is_empty() {
                    self.captures.set_selection(text);
                }
            }
            InboundMessage::PageUrlCaptured(url) => {
                if !url.is_empty() {
                    self.captures.set_page_url(url);
                }
            }
            InboundMessage::Reset => {
                self.reset_pending.store(true, Ordering::Release);
                self.load_default_providers().await;
            }
        }
    }

    /// Provider changes rebuild the menu; preference changes reload the
    /// navigation preference.
    pub async fn handle_storage_change(&self, area: StorageArea) {
        match area {
            StorageArea::Sync => self.rebuild_menu().await,
            StorageArea::Local => match self.preferences.load().await {
                Ok(stored) => self.apply_preferences(&stored),
                Err(e) => warn!("Failed to reload preferences: {}", e),
            },
        }
    }

    /// Resolves a click and acts on it.
    pub async fn handle_click(&self, click: ClickEvent) -> Resolution {
        if !self.menu.is_listening() {
            debug!("Dropping click on {} while the menu rebuilds", click.item_key);
            return Resolution::Ignored(IgnoreReason::HandlerDetached);
        }

        let table = self.menu.table();
        let resolution = self.dispatcher.resolve(&click, &table, &self.captures);

        match &resolution {
            Resolution::Navigate(nav) => {
                if let Err(e) = self.presenter.present(nav, self.preference()).await {
                    warn!("Failed to open {}: {}", nav.url, e);
                }
            }
            Resolution::OpenSettings => {
                if let Err(e) = self.settings.open().await {
                    warn!("Failed to open settings: {}", e);
                }
            }
            Resolution::Ignored(reason) => {
                debug!(
                    "Ignoring click on {} (generation {}): {:?}",
                    click.item_key, table.generation, reason
                );
            }
        }
        resolution
    }

    // ── Operations ───────────────────────────────────────────────

    /// Rebuilds the menu from the provider store.
    pub async fn rebuild_menu(&self) {
        if let Err(e) = self.menu.refresh(self.providers.as_ref()).await {
            warn!("Menu not rebuilt, provider store unreadable: {}", e);
        }
    }

    /// Loads preferences, seeding the defaults when none are stored.
    pub async fn load_preferences(&self) {
        let stored = match self.preferences.load().await {
            Ok(stored) if !stored.is_empty() => stored,
            result => {
                if let Err(e) = result {
                    debug!("No stored preferences ({}), using defaults", e);
                }
                let defaults = StoredPreferences::defaults();
                if let Err(e) = self.preferences.save(&defaults).await {
                    warn!("Failed to store default preferences: {}", e);
                }
                defaults
            }
        };
        self.apply_preferences(&stored);
    }

    fn apply_preferences(&self, stored: &StoredPreferences) {
        let next = self.preference().merged_with(stored);
        debug!("Navigation preference: {:?}", next);
        self.preference.store(Arc::new(next));
    }

    /// Imports the default provider list into the provider store.
    pub async fn load_default_providers(&self) {
        let providers = match self.defaults.load().await {
            Ok(providers) => providers,
            Err(e) => {
                warn!("Failed to load default providers: {}", e);
                return;
            }
        };

        self.notify(DEFAULTS_LOADED_MESSAGE).await;
        if let Err(e) = self.providers.write_all(&providers).await {
            warn!("Failed to store default providers: {}", e);
            return;
        }
        info!("Imported {} default providers", providers.len());

        self.rebuild_menu().await;

        if self.reset_pending.swap(false, Ordering::AcqRel) {
            if let Some(outbound) = &self.outbound {
                if outbound.send(OutboundMessage::ProvidersLoaded(providers)).is_err() {
                    warn!("No listener for reloaded providers: {}", SearchError::ChannelClosed);
                }
            }
        }
    }

    /// Shows a desktop notification; failures are logged.
    pub async fn notify(&self, message: impl Into<String>) {
        let notification = Notification::new(self.config.notification_title.clone(), message);
        if let Err(e) = self.notifier.notify(notification).await {
            warn!("Failed to show notification: {}", e);
        }
    }
}
