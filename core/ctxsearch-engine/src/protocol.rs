//! Messages exchanged with collaborators.
//!
//! Content scripts and the settings page talk to the engine with small JSON
//! messages of the form `{"action": ..., "data": ...}`.

use crate::dispatch::ClickEvent;
use crate::store::StorageArea;
use ctxsearch_types::ProviderMap;
use serde::{Deserialize, Serialize};

/// A message from a content script or the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data")]
pub enum InboundMessage {
    /// Show a desktop notification with this text.
    #[serde(rename = "notify")]
    Notify(String),

    /// The current selection, as seen by the content script.
    #[serde(rename = "getSelectionText")]
    SelectionCaptured(String),

    /// The URL of the page the selection was made on.
    #[serde(rename = "sendCurrentTabUrl")]
    PageUrlCaptured(String),

    /// Reimport the default providers.
    #[serde(rename = "reset")]
    Reset,
}

/// A message the engine emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data")]
pub enum OutboundMessage {
    /// A reset-triggered import finished; carries the imported set.
    #[serde(rename = "searchEnginesLoaded")]
    ProvidersLoaded(ProviderMap),
}

/// Anything the background event loop reacts to.
#[derive(Debug, Clone)]
pub enum BackgroundEvent {
    Message(InboundMessage),
    StorageChanged(StorageArea),
    MenuClicked(ClickEvent),
}
