//! Persisted data model for ctxsearch.
//!
//! This crate defines the records the core reads from its two stores:
//! - Search providers, keyed by an opaque [`ProviderId`] and kept in the
//!   store's own enumeration order ([`ProviderMap`])
//! - Device-local navigation preferences and the enumerated
//!   [`NavigationMode`] they resolve to
//!
//! Nothing here performs I/O. Ordering, menu building and dispatch live in
//! `ctxsearch-engine`.

mod ids;
mod preferences;
mod provider;

pub use ids::ProviderId;
pub use preferences::{NavigationMode, NavigationPreference, StoredPreferences};
pub use provider::{parse_provider_map, Provider, ProviderMap};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when decoding persisted records.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown navigation mode: {0}")]
    UnknownNavigationMode(String),
}
