#![allow(dead_code)]

use ctxsearch_engine::memory::{
    MemoryPreferenceStore, MemoryProviderStore, RecordingMenu, RecordingNavigator,
    RecordingNotifier, RecordingSettings,
};
use ctxsearch_engine::{Collaborators, ContextSearch, EngineConfig, StaticSource};
use ctxsearch_types::{Provider, ProviderId, ProviderMap, StoredPreferences};
use std::sync::Arc;

pub fn provider(name: &str, url: &str, index: Option<i64>) -> Provider {
    let mut p = Provider::new(name, url);
    p.index = index;
    p
}

pub fn providers(entries: Vec<(&str, Provider)>) -> ProviderMap {
    entries
        .into_iter()
        .map(|(id, p)| (ProviderId::from(id), p))
        .collect()
}

pub fn sample_providers() -> ProviderMap {
    providers(vec![
        ("google", provider("Google", "https://www.google.com/search?q={search terms}", Some(0))),
        ("ddg", provider("DuckDuckGo", "https://duckduckgo.com/?q=%s", Some(1))),
        ("wiki", provider("Wikipedia", "https://en.wikipedia.org/wiki/", Some(2))),
    ])
}

pub fn default_providers() -> ProviderMap {
    providers(vec![
        ("bing", provider("Bing", "https://www.bing.com/search?q={search terms}", Some(0))),
        ("yahoo", provider("Yahoo", "https://search.yahoo.com/search?p=%s", Some(1))),
    ])
}

pub struct Harness {
    pub store: Arc<MemoryProviderStore>,
    pub preferences: Arc<MemoryPreferenceStore>,
    pub menu: Arc<RecordingMenu>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub settings: Arc<RecordingSettings>,
    pub defaults: ProviderMap,
}

impl Harness {
    pub fn new(stored: ProviderMap) -> Self {
        Self::with_preferences(stored, StoredPreferences::default())
    }

    pub fn with_preferences(stored: ProviderMap, preferences: StoredPreferences) -> Self {
        Self {
            store: Arc::new(MemoryProviderStore::new(stored)),
            preferences: Arc::new(MemoryPreferenceStore::new(preferences)),
            menu: Arc::new(RecordingMenu::new()),
            navigator: Arc::new(RecordingNavigator::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            settings: Arc::new(RecordingSettings::new()),
            defaults: default_providers(),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            providers: self.store.clone(),
            preferences: self.preferences.clone(),
            menu: self.menu.clone(),
            navigator: self.navigator.clone(),
            notifier: self.notifier.clone(),
            settings: self.settings.clone(),
            defaults: Arc::new(StaticSource(self.defaults.clone())),
        }
    }

    pub fn engine(&self) -> ContextSearch {
        ContextSearch::new(EngineConfig::default(), self.collaborators())
    }

    pub fn engine_with_config(&self, config: EngineConfig) -> ContextSearch {
        ContextSearch::new(config, self.collaborators())
    }
}
