//! Menu synchronization.
//!
//! Every rebuild tears the menu down and recreates it from scratch: the
//! fixed entries first, then one entry per visible provider keyed
//! `cs-<position>`. Positions count materialized entries only, so hidden
//! providers consume none and the survivors stay contiguous.
//!
//! The resulting position table is published through an [`ArcSwap`]: a
//! click resolves against whichever complete table was current when it
//! loaded, never a half-built one. The click handler stays detached from
//! teardown until the new table is published.

use crate::config::EngineConfig;
use crate::error::SearchResult;
use crate::ordering::{order, OrderedSequence};
use crate::store::ProviderStore;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use ctxsearch_types::{Provider, ProviderId, ProviderMap};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Prefix of every menu item key this engine creates.
pub const KEY_PREFIX: &str = "cs-";
/// Key of the fixed "search this site" entry.
pub const SITE_SEARCH_KEY: &str = "cs-google-site";
/// Key of the fixed settings entry.
pub const SETTINGS_KEY: &str = "cs-options";
/// Key of the separator below the fixed entries.
pub const SEPARATOR_KEY: &str = "cs-separator";

/// Key of the provider entry at `position`.
pub fn provider_key(position: usize) -> String {
    format!("{KEY_PREFIX}{position}")
}

/// Kind of a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemKind {
    Normal,
    Separator,
}

/// A menu item as handed to the host surface. All items apply to text
/// selections only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub kind: MenuItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// 18px icon URL, only set when the host supports per-item icons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl MenuItem {
    pub fn action(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: MenuItemKind::Normal,
            title: Some(title.into()),
            icon: None,
        }
    }

    pub fn separator(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: MenuItemKind::Separator,
            title: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }
}

/// The host's context menu.
#[async_trait]
pub trait MenuSurface: Send + Sync {
    /// Removes every item this extension created.
    async fn remove_all(&self) -> SearchResult<()>;

    /// Appends an item.
    async fn create(&self, item: MenuItem) -> SearchResult<()>;

    /// Stops delivering clicks.
    fn detach_click_handler(&self);

    /// Resumes delivering clicks.
    fn attach_click_handler(&self);
}

/// A materialized provider entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Offset among materialized entries; the `N` in `cs-N`.
    pub position: usize,
    pub provider_id: ProviderId,
    pub provider: Provider,
}

/// Snapshot mapping menu positions back to providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchTable {
    /// Rebuild counter; 0 is the empty table installed at construction.
    pub generation: u64,
    /// The full ordered sequence the entries were materialized from.
    pub sequence: OrderedSequence,
    /// Visible entries, `entries[n].position == n`.
    pub entries: Vec<MenuEntry>,
}

impl DispatchTable {
    /// Returns the entry at `position`, if this generation has one.
    pub fn get(&self, position: usize) -> Option<&MenuEntry> {
        self.entries.get(position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keeps the host menu and the dispatch table in step with the store.
pub struct MenuSynchronizer {
    surface: Arc<dyn MenuSurface>,
    config: Arc<EngineConfig>,
    table: ArcSwap<DispatchTable>,
    listening: AtomicBool,
    generation: AtomicU64,
    /// Serializes rebuilds so items from two rebuilds never interleave.
    rebuild_lock: Mutex<()>,
}

impl MenuSynchronizer {
    pub fn new(surface: Arc<dyn MenuSurface>, config: Arc<EngineConfig>) -> Self {
        Self {
            surface,
            config,
            table: ArcSwap::from_pointee(DispatchTable::default()),
            listening: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// The current dispatch table.
    pub fn table(&self) -> Arc<DispatchTable> {
        self.table.load_full()
    }

    /// Whether the click handler is attached.
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Acquire)
    }

    /// Reads the store and rebuilds from it.
    ///
    /// A failed read leaves the previous menu and table in place. When no
    /// menu was ever built, the fixed entries are still published so the
    /// settings page stays reachable; the read error is returned either way.
    pub async fn refresh(&self, store: &dyn ProviderStore) -> SearchResult<Arc<DispatchTable>> {
        let _guard = self.rebuild_lock.lock().await;
        let providers = match store.load_all().await {
            Ok(providers) => providers,
            Err(e) => {
                if self.generation.load(Ordering::Acquire) == 0 {
                    warn!("Provider store unreadable, building fixed entries only");
                    self.rebuild_locked(OrderedSequence::default(), &ProviderMap::new())
                        .await;
                }
                return Err(e);
            }
        };
        let sequence = order(&providers);
        Ok(self.rebuild_locked(sequence, &providers).await)
    }

    /// Rebuilds the menu from an ordered sequence.
    pub async fn rebuild(
        &self,
        sequence: OrderedSequence,
        providers: &ProviderMap,
    ) -> Arc<DispatchTable> {
        let _guard = self.rebuild_lock.lock().await;
        self.rebuild_locked(sequence, providers).await
    }

    async fn rebuild_locked(
        &self,
        sequence: OrderedSequence,
        providers: &ProviderMap,
    ) -> Arc<DispatchTable> {
        self.listening.store(false, Ordering::Release);
        self.surface.detach_click_handler();
        log_menu_error("remove all", self.surface.remove_all().await);

        for item in self.fixed_items() {
            let id = item.id.clone();
            log_menu_error(&id, self.surface.create(item).await);
        }

        let mut entries = Vec::with_capacity(sequence.len());
        for id in sequence.iter() {
            let Some(provider) = providers.get(id) else {
                debug!("Provider {} vanished before materialization", id);
                continue;
            };
            if !provider.visible {
                continue;
            }

            let position = entries.len();
            let item = MenuItem::action(provider_key(position), provider.name.clone())
                .with_icon(self.favicon_for(provider));
            let key = item.id.clone();
            log_menu_error(&key, self.surface.create(item).await);

            entries.push(MenuEntry {
                position,
                provider_id: id.clone(),
                provider: provider.clone(),
            });
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let table = Arc::new(DispatchTable {
            generation,
            sequence,
            entries,
        });
        self.table.store(Arc::clone(&table));

        self.surface.attach_click_handler();
        self.listening.store(true, Ordering::Release);

        info!(
            "Menu rebuilt (generation {}): {} entries",
            generation,
            table.len()
        );
        table
    }

    fn fixed_items(&self) -> [MenuItem; 3] {
        [
            MenuItem::action(SITE_SEARCH_KEY, self.config.site_search_title.clone()),
            MenuItem::action(SETTINGS_KEY, self.config.settings_title.clone()),
            MenuItem::separator(SEPARATOR_KEY),
        ]
    }

    fn favicon_for(&self, provider: &Provider) -> Option<String> {
        if !self.config.icons_supported {
            return None;
        }
        favicon_url(&self.config.favicon_service, &provider.url_template)
    }
}

/// Favicon lookup URL for a provider template, if its host can be parsed.
pub fn favicon_url(service: &str, url_template: &str) -> Option<String> {
    let url = url::Url::parse(url_template).ok()?;
    let host = url.host_str()?;
    Some(format!("{service}{host}"))
}

fn log_menu_error(item: &str, result: SearchResult<()>) {
    if let Err(e) = result {
        warn!("Menu operation '{}' failed: {}", item, e);
    }
}
