//! Provider records as persisted in the cross-device store.

use crate::ids::ProviderId;
use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Every provider in the store, in the store's native enumeration order.
///
/// Enumeration order matters: index backfill and tie-breaking both follow
/// it, so a hash map would make ordering nondeterministic.
pub type ProviderMap = IndexMap<ProviderId, Provider>;

/// One configured search engine.
///
/// Field names on the wire are `name`, `url`, `show` and `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Display label.
    #[serde(default)]
    pub name: String,
    /// URL template containing `{search terms}`, `%s`, or neither.
    #[serde(rename = "url", default)]
    pub url_template: String,
    /// Hidden providers stay in the store but never get a menu entry.
    #[serde(rename = "show", default)]
    pub visible: bool,
    /// Intended display order. External writers may omit it, repeat it, or
    /// leave gaps; anything that is not a whole number reads as absent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_index"
    )]
    pub index: Option<i64>,
}

impl Provider {
    /// Creates a visible provider without an index.
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            visible: true,
            index: None,
        }
    }

    /// Sets the display index.
    #[must_use]
    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    /// Marks the provider as hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Decodes a JSON object of `id -> provider` preserving key order.
pub fn parse_provider_map(json: &str) -> Result<ProviderMap> {
    Ok(serde_json::from_str(json)?)
}

fn lenient_index<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    }))
}
