//! Error types for the engine.

use thiserror::Error;

/// Result type for engine and collaborator operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while talking to collaborators.
///
/// None of these cross the orchestrator: it logs them and returns to idle.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider store failed a read or write.
    #[error("store error: {0}")]
    Store(String),

    /// The cross-device store is disabled or missing on this platform.
    #[error("store unsupported: {reason}")]
    StoreUnsupported { reason: String },

    /// The menu surface rejected an operation.
    #[error("menu error: {0}")]
    Menu(String),

    /// A tab or window operation failed.
    #[error("navigation error: {0}")]
    Navigation(String),

    /// A desktop notification could not be shown.
    #[error("notification error: {0}")]
    Notification(String),

    /// The settings page could not be opened.
    #[error("settings error: {0}")]
    Settings(String),

    /// The default provider list could not be loaded.
    #[error("bootstrap error: {0}")]
    Bootstrap(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel closed.
    #[error("channel closed")]
    ChannelClosed,
}

impl From<ctxsearch_types::Error> for SearchError {
    fn from(err: ctxsearch_types::Error) -> Self {
        match err {
            ctxsearch_types::Error::Serialization(e) => Self::Serialization(e),
            other => Self::Bootstrap(other.to_string()),
        }
    }
}
