mod common;

use common::{default_providers, provider, providers, sample_providers, Harness};
use ctxsearch_engine::memory::NavigationAction;
use ctxsearch_engine::{
    BackgroundEvent, ClickEvent, EngineConfig, IgnoreReason, InboundMessage, OutboundMessage,
    PreferenceStore, Resolution, StorageArea, DEFAULTS_LOADED_MESSAGE, SETTINGS_KEY, SITE_SEARCH_KEY,
    STORE_DISABLED_MESSAGE,
};
use ctxsearch_types::{NavigationMode, NavigationPreference, ProviderMap, StoredPreferences};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

fn stored(mode: &str, active: bool) -> StoredPreferences {
    StoredPreferences {
        tab_mode: Some(mode.to_string()),
        tab_active: Some(active),
    }
}

// ── Startup ──────────────────────────────────────────────────────

#[tokio::test]
async fn start_with_populated_store_builds_menu() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;

    assert_eq!(engine.dispatch_table().len(), 3);
    assert_eq!(h.menu.items().await.len(), 6);
    assert!(h.notifier.shown().await.is_empty());
    assert_eq!(h.store.snapshot().await, sample_providers());
}

#[tokio::test]
async fn start_with_empty_store_imports_defaults() {
    let h = Harness::new(ProviderMap::new());
    let engine = h.engine();
    engine.start().await;

    assert_eq!(h.store.snapshot().await, default_providers());
    assert_eq!(engine.dispatch_table().len(), 2);

    let shown = h.notifier.shown().await;
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].message, DEFAULTS_LOADED_MESSAGE);
    assert_eq!(shown[0].title, "Context Search");
    assert_eq!(shown[0].id, "Default list of sear");
}

#[tokio::test]
async fn unsupported_store_notifies_user() {
    let h = Harness::new(ProviderMap::new());
    h.store.set_unsupported("storage.sync is disabled").await;
    let engine = h.engine();
    engine.start().await;

    let messages: Vec<_> = h.notifier.shown().await.into_iter().map(|n| n.message).collect();
    assert_eq!(
        messages,
        vec![DEFAULTS_LOADED_MESSAGE.to_string(), STORE_DISABLED_MESSAGE.to_string()]
    );
    // No providers could be read, but the fixed entries are live.
    let ids: Vec<String> = h.menu.items().await.into_iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![SITE_SEARCH_KEY, SETTINGS_KEY, "cs-separator"]);
    assert!(engine.dispatch_table().is_empty());

    let resolution = engine.handle_click(ClickEvent::new(SETTINGS_KEY, "x", 0)).await;
    assert_eq!(resolution, Resolution::OpenSettings);
    assert_eq!(h.settings.opened(), 1);
}

#[tokio::test]
async fn start_seeds_default_preferences() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;

    assert_eq!(h.preferences.snapshot().await, StoredPreferences::defaults());
    assert_eq!(engine.preference(), NavigationPreference::default());
}

#[tokio::test]
async fn start_applies_stored_preferences() {
    let h = Harness::with_preferences(sample_providers(), stored("openNewWindow", true));
    let engine = h.engine();
    engine.start().await;

    assert_eq!(
        engine.preference(),
        NavigationPreference::new(NavigationMode::NewWindow, true)
    );
    assert_eq!(h.preferences.snapshot().await, stored("openNewWindow", true));
}

#[tokio::test]
async fn unreadable_preferences_fall_back_to_defaults() {
    let h = Harness::with_preferences(sample_providers(), stored("sameTab", true));
    h.preferences.set_fail_reads(true);
    let engine = h.engine();
    engine.start().await;

    assert_eq!(engine.preference(), NavigationPreference::default());
}

// ── Storage changes ──────────────────────────────────────────────

#[tokio::test]
async fn sync_change_rebuilds_menu() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;

    h.store
        .replace(providers(vec![("solo", provider("Solo", "https://solo/?q=", Some(0)))]))
        .await;
    engine.handle_storage_change(StorageArea::Sync).await;

    let table = engine.dispatch_table();
    assert_eq!(table.len(), 1);
    assert_eq!(table.generation, 2);
    assert_eq!(h.menu.items().await[3].title.as_deref(), Some("Solo"));
}

#[tokio::test]
async fn local_change_reloads_preferences_only() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;
    let removals = h.menu.removals();

    h.preferences.save(&stored("sameTab", false)).await.unwrap();
    engine.handle_storage_change(StorageArea::Local).await;

    assert_eq!(engine.preference().mode, NavigationMode::SameTab);
    assert_eq!(h.menu.removals(), removals);
}

// ── Clicks ───────────────────────────────────────────────────────

#[tokio::test]
async fn click_before_first_rebuild_is_dropped() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();

    let resolution = engine.handle_click(ClickEvent::new("cs-0", "x", 0)).await;
    assert_eq!(resolution, Resolution::Ignored(IgnoreReason::HandlerDetached));
    assert!(h.navigator.actions().await.is_empty());
}

#[tokio::test]
async fn provider_click_opens_new_tab_by_default() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;

    engine.handle_click(ClickEvent::new("cs-1", "a b", 4)).await;

    assert_eq!(
        h.navigator.actions().await,
        vec![NavigationAction::CreateTab {
            url: "https://duckduckgo.com/?q=a%20b".into(),
            index: 5,
            active: false,
        }]
    );
}

#[tokio::test]
async fn stale_click_after_shrink_is_noop() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;

    h.store
        .replace(providers(vec![("solo", provider("Solo", "https://solo/?q=", Some(0)))]))
        .await;
    engine.handle_storage_change(StorageArea::Sync).await;

    let resolution = engine.handle_click(ClickEvent::new("cs-2", "x", 0)).await;
    assert_eq!(
        resolution,
        Resolution::Ignored(IgnoreReason::StalePosition {
            position: 2,
            table_len: 1
        })
    );
    assert!(h.navigator.actions().await.is_empty());
}

#[tokio::test]
async fn settings_click_opens_settings() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;

    engine.handle_click(ClickEvent::new(SETTINGS_KEY, "x", 0)).await;
    assert_eq!(h.settings.opened(), 1);
    assert!(h.navigator.actions().await.is_empty());
}

#[tokio::test]
async fn site_search_uses_captured_page_once() {
    let h = Harness::with_preferences(sample_providers(), stored("sameTab", false));
    let engine = h.engine();
    engine.start().await;

    engine
        .handle_message(InboundMessage::PageUrlCaptured("https://docs.rs/serde".into()))
        .await;
    engine.handle_click(ClickEvent::new(SITE_SEARCH_KEY, "derive", 0)).await;
    let second = engine.handle_click(ClickEvent::new(SITE_SEARCH_KEY, "derive", 0)).await;

    assert_eq!(
        h.navigator.actions().await,
        vec![NavigationAction::UpdateTab {
            url: "https://www.google.com/search?q=site:docs.rs+derive".into()
        }]
    );
    assert_eq!(second, Resolution::Ignored(IgnoreReason::NoCapturedPage));
}

#[tokio::test]
async fn cached_selection_fills_in_for_missing_click_selection() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;

    engine
        .handle_message(InboundMessage::SelectionCaptured("from page".into()))
        .await;
    engine
        .handle_click(ClickEvent {
            item_key: "cs-0".into(),
            selection_text: None,
            origin_tab_position: 0,
        })
        .await;

    assert_eq!(
        h.navigator.actions().await,
        vec![NavigationAction::CreateTab {
            url: "https://www.google.com/search?q=from%20page".into(),
            index: 1,
            active: false,
        }]
    );
}

#[tokio::test]
async fn empty_captures_do_not_replace_cached_values() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();

    engine.handle_message(InboundMessage::SelectionCaptured("kept".into())).await;
    engine.handle_message(InboundMessage::SelectionCaptured(String::new())).await;
    engine.handle_message(InboundMessage::PageUrlCaptured(String::new())).await;

    assert_eq!(engine.captures().selection().as_deref(), Some("kept"));
    assert_eq!(engine.captures().page_url(), None);
}

#[tokio::test]
async fn background_window_mode_refocuses() {
    let h = Harness::with_preferences(sample_providers(), stored("openNewWindow", false));
    let engine = h.engine();
    engine.start().await;

    engine.handle_click(ClickEvent::new("cs-2", "Rust", 0)).await;

    assert_eq!(
        h.navigator.actions().await,
        vec![
            NavigationAction::CreateWindow {
                url: "https://en.wikipedia.org/wiki/Rust".into()
            },
            NavigationAction::FocusWindow {
                window: ctxsearch_engine::memory::INITIAL_WINDOW
            },
        ]
    );
}

#[tokio::test]
async fn navigation_failure_is_swallowed() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;
    h.navigator.set_fail_open(true);

    let resolution = engine.handle_click(ClickEvent::new("cs-0", "x", 0)).await;
    assert!(matches!(resolution, Resolution::Navigate(_)));
}

// ── Concurrency ──────────────────────────────────────────────────

#[tokio::test]
async fn click_during_rebuild_sees_a_complete_table() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;

    h.store
        .replace(providers(vec![("solo", provider("Solo", "https://solo/?q=", Some(0)))]))
        .await;

    let (_, resolution) = tokio::join!(
        engine.handle_storage_change(StorageArea::Sync),
        engine.handle_click(ClickEvent::new("cs-1", "x", 0)),
    );

    // Either the old table (DuckDuckGo at 1), the new one (nothing at 1),
    // or a detached handler. Never a mixture.
    match resolution {
        Resolution::Navigate(nav) => assert_eq!(nav.url, "https://duckduckgo.com/?q=x"),
        Resolution::Ignored(IgnoreReason::StalePosition { table_len: 1, .. })
        | Resolution::Ignored(IgnoreReason::HandlerDetached) => {}
        other => panic!("unexpected resolution: {other:?}"),
    }
    assert_eq!(engine.dispatch_table().len(), 1);
}

// ── Reset ────────────────────────────────────────────────────────

#[tokio::test]
async fn reset_reimports_and_announces_providers() {
    let h = Harness::new(sample_providers());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let engine = h.engine().with_outbound(tx);
    engine.start().await;

    engine.handle_message(InboundMessage::Reset).await;

    assert_eq!(
        rx.recv().await,
        Some(OutboundMessage::ProvidersLoaded(default_providers()))
    );
    assert!(!engine.reset_pending());
    // Defaults are written on top of the existing providers.
    assert_eq!(h.store.snapshot().await.len(), 5);
    assert_eq!(engine.dispatch_table().len(), 5);
}

#[tokio::test]
async fn plain_import_does_not_announce() {
    let h = Harness::new(ProviderMap::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let engine = h.engine().with_outbound(tx);
    engine.start().await;
    drop(engine);

    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn failed_reset_write_keeps_reset_pending() {
    let h = Harness::new(sample_providers());
    let engine = h.engine();
    engine.start().await;
    h.store.set_fail_writes(true);

    engine.handle_message(InboundMessage::Reset).await;

    assert!(engine.reset_pending());
    assert_eq!(h.store.snapshot().await, sample_providers());
}

// ── Event loop ───────────────────────────────────────────────────

#[tokio::test]
async fn run_drains_events_until_closed() {
    let h = Harness::new(sample_providers());
    let engine = h.engine_with_config(EngineConfig {
        notification_title: "Search".into(),
        ..EngineConfig::default()
    });
    engine.start().await;

    let (tx, rx) = mpsc::channel(8);
    tx.send(BackgroundEvent::Message(InboundMessage::Notify("hello".into())))
        .await
        .unwrap();
    tx.send(BackgroundEvent::MenuClicked(ClickEvent::new("cs-0", "q", 0)))
        .await
        .unwrap();
    tx.send(BackgroundEvent::StorageChanged(StorageArea::Sync))
        .await
        .unwrap();
    drop(tx);

    engine.run(rx).await;

    let shown = h.notifier.shown().await;
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Search");
    assert_eq!(h.navigator.actions().await.len(), 1);
    assert_eq!(engine.dispatch_table().generation, 2);
}
