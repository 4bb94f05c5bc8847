//! Identifier types.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Key of a provider record in the cross-device store.
///
/// The value is opaque: the settings collaborator chooses it and the store
/// guarantees uniqueness. The core never parses it, which is why menu items
/// are keyed by position instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Wraps a store key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ProviderId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for ProviderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
