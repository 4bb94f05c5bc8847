//! Default provider list.

use crate::error::SearchResult;
use async_trait::async_trait;
use ctxsearch_types::{parse_provider_map, ProviderMap};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the default provider list comes from.
#[async_trait]
pub trait DefaultProviderSource: Send + Sync {
    async fn load(&self) -> SearchResult<ProviderMap>;
}

/// Reads the list from a JSON file shaped like the provider store.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DefaultProviderSource for JsonFileSource {
    async fn load(&self) -> SearchResult<ProviderMap> {
        let json = tokio::fs::read_to_string(&self.path).await.inspect_err(|e| {
            debug!("Default provider list {} unreadable: {}", self.path.display(), e);
        })?;
        Ok(parse_provider_map(&json)?)
    }
}

/// A fixed in-memory list.
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub ProviderMap);

#[async_trait]
impl DefaultProviderSource for StaticSource {
    async fn load(&self) -> SearchResult<ProviderMap> {
        Ok(self.0.clone())
    }
}
