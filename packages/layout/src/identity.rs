//! # Widget Identity
//!
//! Widgets added during editing get a temporary id immediately so later
//! commands can address them before the host has persisted anything. Once the
//! host confirms persistence it hands back a durable id; both ids stay
//! addressable from then on, so references taken during the transition window
//! keep working.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Locally unique id assigned before persistence
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TempId(pub String);

/// Id confirmed by the host after persistence
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurableId(pub String);

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DurableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Temporary → durable id mapping returned by the host after a save
pub type IdentityMapping = HashMap<TempId, DurableId>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary: Option<TempId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durable: Option<DurableId>,
}

impl WidgetIdentity {
    pub fn durable(id: impl Into<String>) -> Self {
        Self {
            temporary: None,
            durable: Some(DurableId(id.into())),
        }
    }

    pub fn temporary(id: TempId) -> Self {
        Self {
            temporary: Some(id),
            durable: None,
        }
    }

    /// Whether any id has been assigned yet
    pub fn is_assigned(&self) -> bool {
        self.temporary.is_some() || self.durable.is_some()
    }

    pub fn is_durable(&self) -> bool {
        self.durable.is_some()
    }

    /// True if `id` is either the temporary or the durable id
    pub fn matches(&self, id: &str) -> bool {
        self.temporary.as_ref().is_some_and(|t| t.0 == id)
            || self.durable.as_ref().is_some_and(|d| d.0 == id)
    }

    /// Preferred id for display and lookups
    pub fn key(&self) -> Option<&str> {
        self.durable
            .as_ref()
            .map(|d| d.0.as_str())
            .or_else(|| self.temporary.as_ref().map(|t| t.0.as_str()))
    }

    /// Attach the durable id if this identity's temporary id is mapped.
    /// Returns true when the identity changed.
    pub fn reconcile(&mut self, mapping: &IdentityMapping) -> bool {
        if self.durable.is_some() {
            return false;
        }

        match self.temporary.as_ref().and_then(|t| mapping.get(t)) {
            Some(durable) => {
                self.durable = Some(durable.clone());
                true
            }
            None => false,
        }
    }
}
