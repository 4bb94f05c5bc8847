//! Provider ordering.
//!
//! Turns the store's provider map into the sequence the menu is built
//! from. Two passes:
//!
//! 1. **Backfill**: walking the map in enumeration order, providers with no
//!    `index` get their enumeration offset as index, until the first
//!    provider that has one. Only that leading run is backfilled; a missing
//!    index further down stays missing.
//! 2. **Collect**: providers are emitted by ascending index over
//!    `0..count`, ties in enumeration order. An index outside that range
//!    (or still missing) drops the provider from the sequence.
//!
//! The leading-run-only backfill reproduces long-standing behavior of the
//! stored data format. Whether later gaps should also be backfilled is an
//! open policy question, so they are deliberately left alone here.

use ctxsearch_types::{ProviderId, ProviderMap};

/// Provider ids in display order.
///
/// Recomputed in full on every store change; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSequence(Vec<ProviderId>);

impl OrderedSequence {
    /// Returns the ids in order.
    pub fn ids(&self) -> &[ProviderId] {
        &self.0
    }

    /// Iterates the ids in order.
    pub fn iter(&self) -> impl Iterator<Item = &ProviderId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ProviderId>> for OrderedSequence {
    fn from(ids: Vec<ProviderId>) -> Self {
        Self(ids)
    }
}

/// Orders providers by their display index.
///
/// Deterministic: the same map always yields the same sequence.
pub fn order(providers: &ProviderMap) -> OrderedSequence {
    let count = providers.len() as i64;
    let mut backfilling = true;

    let mut ranked: Vec<(i64, &ProviderId)> = providers
        .iter()
        .enumerate()
        .filter_map(|(offset, (id, provider))| {
            let index = match provider.index {
                None if backfilling => Some(offset as i64),
                index => {
                    backfilling = false;
                    index
                }
            };
            index.filter(|i| (0..count).contains(i)).map(|i| (i, id))
        })
        .collect();

    // Stable: ties keep enumeration order.
    ranked.sort_by_key(|(index, _)| *index);

    OrderedSequence(ranked.into_iter().map(|(_, id)| id.clone()).collect())
}
