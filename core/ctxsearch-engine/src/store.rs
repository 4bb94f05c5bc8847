//! Store abstractions.
//!
//! Persistence belongs to the host. The engine only needs to read the
//! provider set, write a freshly imported default list, and read or seed the
//! device-local navigation preference.

use crate::error::SearchResult;
use async_trait::async_trait;
use ctxsearch_types::{ProviderMap, StoredPreferences};
use serde::{Deserialize, Serialize};

/// Which store a change notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageArea {
    /// The cross-device provider store.
    Sync,
    /// The device-local preference store.
    Local,
}

/// The cross-device provider store.
#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// Reads every provider, in the store's enumeration order.
    ///
    /// Fails with `StoreUnsupported` when the platform has the store
    /// disabled.
    async fn load_all(&self) -> SearchResult<ProviderMap>;

    /// Writes every record in `providers`. Keys not in the map are left
    /// untouched.
    async fn write_all(&self, providers: &ProviderMap) -> SearchResult<()>;
}

/// The device-local preference store.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Reads the `{tabMode, tabActive}` record; missing fields stay `None`.
    async fn load(&self) -> SearchResult<StoredPreferences>;

    /// Persists the record.
    async fn save(&self, preferences: &StoredPreferences) -> SearchResult<()>;
}
