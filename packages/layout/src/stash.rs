//! # Stash Store
//!
//! Removed items can be parked under an opaque id and re-inserted later
//! without re-specifying their content. An entry is consumed exactly once.
//!
//! The store is part of the same snapshot as the layout: the pipeline clones
//! both, mutates the clones and swaps them in together.

use crate::error::{LayoutError, LayoutResult};
use crate::layout::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StashId(pub String);

impl StashId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for StashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of looking up several stash ids at once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StashResolution {
    pub existing: Vec<(StashId, Vec<Item>)>,
    pub missing: Vec<StashId>,
}

impl StashResolution {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StashStore {
    entries: BTreeMap<StashId, Vec<Item>>,
}

impl StashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park items under `id`, replacing any previous entry with that id
    pub fn put(&mut self, id: StashId, items: Vec<Item>) {
        self.entries.insert(id, items);
    }

    pub fn get(&self, id: &StashId) -> Option<&[Item]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &StashId) -> bool {
        self.entries.contains_key(id)
    }

    /// Look up every id without consuming anything. Missing ids are reported
    /// all together, in request order.
    pub fn resolve<'a>(&self, ids: impl IntoIterator<Item = &'a StashId>) -> StashResolution {
        let mut resolution = StashResolution::default();
        for id in ids {
            match self.entries.get(id) {
                Some(items) => resolution.existing.push((id.clone(), items.clone())),
                None => resolution.missing.push(id.clone()),
            }
        }
        resolution
    }

    /// Remove and return the entry
    pub fn consume(&mut self, id: &StashId) -> LayoutResult<Vec<Item>> {
        self.entries
            .remove(id)
            .ok_or_else(|| LayoutError::StashNotFound(id.clone()))
    }

    /// Mutable access to stashed items, for identity updates
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.entries.values_mut().flatten()
    }

    pub fn ids(&self) -> impl Iterator<Item = &StashId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
