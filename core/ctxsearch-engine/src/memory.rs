//! In-memory collaborators.
//!
//! Working implementations of every host capability, backed by process
//! memory. They record what the engine asked of them, which makes them the
//! harness for tests and for the command-line front end.

use crate::error::{SearchError, SearchResult};
use crate::menu::{MenuItem, MenuSurface};
use crate::notify::{Notification, Notifier, SettingsPage};
use crate::present::{Navigator, WindowId};
use crate::store::{PreferenceStore, ProviderStore};
use async_trait::async_trait;
use ctxsearch_types::{ProviderMap, StoredPreferences};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock};

// ── Provider store ───────────────────────────────────────────────

/// A provider store held in memory.
#[derive(Debug, Default)]
pub struct MemoryProviderStore {
    providers: RwLock<ProviderMap>,
    unsupported: RwLock<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemoryProviderStore {
    pub fn new(providers: ProviderMap) -> Self {
        Self {
            providers: RwLock::new(providers),
            ..Self::default()
        }
    }

    /// Makes every read and write fail as if the platform had the store
    /// disabled.
    pub async fn set_unsupported(&self, reason: impl Into<String>) {
        *self.unsupported.write().await = Some(reason.into());
    }

    /// Makes writes fail with a transient store error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    /// Replaces the whole content, as an external writer would.
    pub async fn replace(&self, providers: ProviderMap) {
        *self.providers.write().await = providers;
    }

    pub async fn snapshot(&self) -> ProviderMap {
        self.providers.read().await.clone()
    }

    async fn check_supported(&self) -> SearchResult<()> {
        match self.unsupported.read().await.as_ref() {
            Some(reason) => Err(SearchError::StoreUnsupported {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProviderStore for MemoryProviderStore {
    async fn load_all(&self) -> SearchResult<ProviderMap> {
        self.check_supported().await?;
        Ok(self.snapshot().await)
    }

    async fn write_all(&self, providers: &ProviderMap) -> SearchResult<()> {
        self.check_supported().await?;
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(SearchError::Store("write rejected".into()));
        }
        let mut stored = self.providers.write().await;
        for (id, provider) in providers {
            stored.insert(id.clone(), provider.clone());
        }
        Ok(())
    }
}

// ── Preference store ─────────────────────────────────────────────

/// A preference store held in memory.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    stored: RwLock<StoredPreferences>,
    fail_reads: AtomicBool,
}

impl MemoryPreferenceStore {
    pub fn new(stored: StoredPreferences) -> Self {
        Self {
            stored: RwLock::new(stored),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Release);
    }

    pub async fn snapshot(&self) -> StoredPreferences {
        self.stored.read().await.clone()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self) -> SearchResult<StoredPreferences> {
        if self.fail_reads.load(Ordering::Acquire) {
            return Err(SearchError::Store("preferences unavailable".into()));
        }
        Ok(self.snapshot().await)
    }

    async fn save(&self, preferences: &StoredPreferences) -> SearchResult<()> {
        *self.stored.write().await = preferences.clone();
        Ok(())
    }
}

// ── Menu ─────────────────────────────────────────────────────────

/// A menu surface that keeps the items it was given.
#[derive(Debug, Default)]
pub struct RecordingMenu {
    items: Mutex<Vec<MenuItem>>,
    attached: AtomicBool,
    removals: AtomicUsize,
    failing: Mutex<HashSet<String>>,
}

impl RecordingMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes creation of the item with `id` fail.
    pub async fn fail_on(&self, id: impl Into<String>) {
        self.failing.lock().await.insert(id.into());
    }

    /// Items currently in the menu, in creation order.
    pub async fn items(&self) -> Vec<MenuItem> {
        self.items.lock().await.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// How many times the menu was cleared.
    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::Acquire)
    }
}

#[async_trait]
impl MenuSurface for RecordingMenu {
    async fn remove_all(&self) -> SearchResult<()> {
        self.items.lock().await.clear();
        self.removals.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn create(&self, item: MenuItem) -> SearchResult<()> {
        if self.failing.lock().await.contains(&item.id) {
            return Err(SearchError::Menu(format!("cannot create {}", item.id)));
        }
        self.items.lock().await.push(item);
        Ok(())
    }

    fn detach_click_handler(&self) {
        self.attached.store(false, Ordering::Release);
    }

    fn attach_click_handler(&self) {
        self.attached.store(true, Ordering::Release);
    }
}

// ── Navigator ────────────────────────────────────────────────────

/// A navigation request the engine issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavigationAction {
    CreateWindow { url: String },
    FocusWindow { window: WindowId },
    CreateTab { url: String, index: u32, active: bool },
    UpdateTab { url: String },
}

/// The window every recording navigator starts focused on.
pub const INITIAL_WINDOW: WindowId = WindowId(1);

/// A navigator that records requests instead of opening anything.
#[derive(Debug)]
pub struct RecordingNavigator {
    actions: Mutex<Vec<NavigationAction>>,
    next_window: AtomicI64,
    fail_focus: AtomicBool,
    fail_open: AtomicBool,
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            next_window: AtomicI64::new(INITIAL_WINDOW.0 + 1),
            fail_focus: AtomicBool::new(false),
            fail_open: AtomicBool::new(false),
        }
    }
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_focus(&self, fail: bool) {
        self.fail_focus.store(fail, Ordering::Release);
    }

    /// Makes window and tab creation fail.
    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::Release);
    }

    pub async fn actions(&self) -> Vec<NavigationAction> {
        self.actions.lock().await.clone()
    }

    async fn record(&self, action: NavigationAction) {
        self.actions.lock().await.push(action);
    }

    fn check_open(&self) -> SearchResult<()> {
        if self.fail_open.load(Ordering::Acquire) {
            return Err(SearchError::Navigation("open rejected".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn current_window(&self) -> SearchResult<WindowId> {
        Ok(INITIAL_WINDOW)
    }

    async fn create_window(&self, url: &str) -> SearchResult<WindowId> {
        self.check_open()?;
        self.record(NavigationAction::CreateWindow { url: url.to_string() })
            .await;
        Ok(WindowId(self.next_window.fetch_add(1, Ordering::AcqRel)))
    }

    async fn focus_window(&self, window: WindowId) -> SearchResult<()> {
        self.record(NavigationAction::FocusWindow { window }).await;
        if self.fail_focus.load(Ordering::Acquire) {
            return Err(SearchError::Navigation(format!("cannot focus {window}")));
        }
        Ok(())
    }

    async fn create_tab(&self, url: &str, index: u32, active: bool) -> SearchResult<()> {
        self.check_open()?;
        self.record(NavigationAction::CreateTab {
            url: url.to_string(),
            index,
            active,
        })
        .await;
        Ok(())
    }

    async fn update_current_tab(&self, url: &str) -> SearchResult<()> {
        self.check_open()?;
        self.record(NavigationAction::UpdateTab { url: url.to_string() })
            .await;
        Ok(())
    }
}

// ── Notifications & settings ─────────────────────────────────────

/// Keeps every notification it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn shown(&self) -> Vec<Notification> {
        self.shown.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> SearchResult<()> {
        self.shown.lock().await.push(notification);
        Ok(())
    }
}

/// Counts settings page requests.
#[derive(Debug, Default)]
pub struct RecordingSettings {
    opened: AtomicUsize,
}

impl RecordingSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::Acquire)
    }
}

#[async_trait]
impl SettingsPage for RecordingSettings {
    async fn open(&self) -> SearchResult<()> {
        self.opened.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
