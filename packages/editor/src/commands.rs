//! # Layout Commands
//!
//! Structural intents against a dashboard layout.
//!
//! ## Command Semantics
//!
//! ### AddItems / AddSection / ReplaceItem
//! - Item definitions are inline items or stash ids, expanded in the order
//!   they are listed
//! - Every referenced stash must exist; all missing ids are reported at once
//! - Each stash is consumed exactly once
//!
//! ### MoveItem / MoveSection
//! - The source is taken out first; the target index is read against the
//!   layout without the source
//!
//! ### RemoveItem / RemoveSection / ReplaceItem
//! - Removed items may be parked under `stash_as`
//! - An `eager` `RemoveItem` also removes the section it empties
//! - `ReplaceItem` may reuse the id of a stash it consumes
//!
//! Commands are not retained after they are applied.

use dashgrid_layout::{
    ContentRef, Direction, Item, ItemSize, LayoutError, LayoutPath, SectionHeader, StashId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Item to place: inline, or taken from the stash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemDefinition {
    Item { item: Item },
    Stash { id: StashId },
}

impl ItemDefinition {
    pub fn stash(id: impl Into<String>) -> Self {
        ItemDefinition::Stash {
            id: StashId::new(id),
        }
    }
}

impl From<Item> for ItemDefinition {
    fn from(item: Item) -> Self {
        ItemDefinition::Item { item }
    }
}

/// Structural layout commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Insert items at an item path; an index equal to the section length
    /// appends
    AddItems {
        path: LayoutPath,
        items: Vec<ItemDefinition>,
    },

    MoveItem {
        from: LayoutPath,
        to: LayoutPath,
    },

    /// Remove an item; with `eager`, a section left empty goes too
    RemoveItem {
        path: LayoutPath,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_as: Option<StashId>,
        #[serde(default)]
        eager: bool,
    },

    ResizeItem {
        path: LayoutPath,
        size: ItemSize,
    },

    ChangeSectionHeader {
        path: LayoutPath,
        header: SectionHeader,
    },

    /// Insert a section at a section path
    AddSection {
        path: LayoutPath,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        header: Option<SectionHeader>,
        #[serde(default)]
        items: Vec<ItemDefinition>,
    },

    MoveSection {
        from: LayoutPath,
        to: LayoutPath,
    },

    RemoveSection {
        path: LayoutPath,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_as: Option<StashId>,
    },

    ReplaceItem {
        path: LayoutPath,
        items: Vec<ItemDefinition>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_as: Option<StashId>,
    },

    ChangeContainerDirection {
        path: LayoutPath,
        direction: Direction,
    },
}

impl Command {
    /// Add items, some of which may come from the stash
    pub fn add_items(path: LayoutPath, items: impl IntoIterator<Item = ItemDefinition>) -> Self {
        Command::AddItems {
            path,
            items: items.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddItems { .. } => "AddItems",
            Command::MoveItem { .. } => "MoveItem",
            Command::RemoveItem { .. } => "RemoveItem",
            Command::ResizeItem { .. } => "ResizeItem",
            Command::ChangeSectionHeader { .. } => "ChangeSectionHeader",
            Command::AddSection { .. } => "AddSection",
            Command::MoveSection { .. } => "MoveSection",
            Command::RemoveSection { .. } => "RemoveSection",
            Command::ReplaceItem { .. } => "ReplaceItem",
            Command::ChangeContainerDirection { .. } => "ChangeContainerDirection",
        }
    }

    /// Item definitions the command places
    pub fn definitions(&self) -> &[ItemDefinition] {
        match self {
            Command::AddItems { items, .. }
            | Command::AddSection { items, .. }
            | Command::ReplaceItem { items, .. } => items,
            _ => &[],
        }
    }

    /// Stash ids the command consumes, in listing order
    pub fn stash_ids(&self) -> Vec<&StashId> {
        self.definitions()
            .iter()
            .filter_map(|d| match d {
                ItemDefinition::Stash { id } => Some(id),
                ItemDefinition::Item { .. } => None,
            })
            .collect()
    }

    /// Stash id the command parks removed items under
    pub fn stash_as(&self) -> Option<&StashId> {
        match self {
            Command::RemoveItem { stash_as, .. }
            | Command::RemoveSection { stash_as, .. }
            | Command::ReplaceItem { stash_as, .. } => stash_as.as_ref(),
            _ => None,
        }
    }

    /// The location the command primarily targets
    pub fn target(&self) -> &LayoutPath {
        match self {
            Command::AddItems { path, .. }
            | Command::RemoveItem { path, .. }
            | Command::ResizeItem { path, .. }
            | Command::ChangeSectionHeader { path, .. }
            | Command::AddSection { path, .. }
            | Command::RemoveSection { path, .. }
            | Command::ReplaceItem { path, .. }
            | Command::ChangeContainerDirection { path, .. } => path,
            Command::MoveItem { to, .. } | Command::MoveSection { to, .. } => to,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("section {path} does not exist")]
    SectionNotFound { path: LayoutPath },

    #[error("item {path} does not exist")]
    ItemNotFound { path: LayoutPath },

    #[error("cannot insert at position {index}: section {path} has only {len} items")]
    InvalidItemIndex {
        path: LayoutPath,
        index: usize,
        len: usize,
    },

    #[error("cannot place a section at position {index}: layout has only {len} sections")]
    InvalidSectionIndex { index: usize, len: usize },

    #[error("missing stashes: {}", join_ids(.0))]
    MissingStash(Vec<StashId>),

    #[error("could not resolve content {}: {reason}", join_refs(.refs))]
    ContentResolutionFailed { refs: Vec<ContentRef>, reason: String },

    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: LayoutPath, reason: String },

    #[error("stash '{0}' does not exist")]
    StashNotFound(StashId),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("the layout engine has stopped")]
    EngineStopped,
}

fn join_ids(ids: &[StashId]) -> String {
    ids.iter().map(|id| id.0.as_str()).collect::<Vec<_>>().join(", ")
}

fn join_refs(refs: &[ContentRef]) -> String {
    refs.iter().map(ContentRef::as_str).collect::<Vec<_>>().join(", ")
}

impl From<LayoutError> for CommandError {
    fn from(e: LayoutError) -> Self {
        match e {
            LayoutError::SectionNotFound { path } => CommandError::SectionNotFound { path },
            LayoutError::ItemNotFound { path } => CommandError::ItemNotFound { path },
            LayoutError::InvalidPath { path, reason } => CommandError::InvalidPath { path, reason },
            LayoutError::StashNotFound(id) => CommandError::StashNotFound(id),
            other => CommandError::InvalidCommand(other.to_string()),
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let command = Command::RemoveItem {
            path: LayoutPath::item(0, 2),
            stash_as: Some(StashId::new("s1")),
            eager: false,
        };

        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["type"], "removeItem");
        assert_eq!(json["stashAs"], "s1");

        let deserialized: Command = serde_json::from_value(json).unwrap();
        assert_eq!(command, deserialized);
    }

    #[test]
    fn test_eager_defaults_to_false() {
        let command: Command =
            serde_json::from_str(r#"{ "type": "removeItem", "path": "0_1", "eager": true }"#).unwrap();
        assert!(matches!(command, Command::RemoveItem { eager: true, .. }));

        let command: Command = serde_json::from_str(r#"{ "type": "removeItem", "path": "0_1" }"#).unwrap();
        assert!(matches!(command, Command::RemoveItem { eager: false, .. }));
    }

    #[test]
    fn test_stash_ids_in_listing_order() {
        let command = Command::add_items(
            LayoutPath::item(0, 0),
            [ItemDefinition::stash("b"), ItemDefinition::stash("a")],
        );
        assert_eq!(command.stash_ids(), vec![&StashId::new("b"), &StashId::new("a")]);
    }

    #[test]
    fn test_diagnostics_read_naturally() {
        let err = CommandError::InvalidItemIndex {
            path: LayoutPath::section(0),
            index: 7,
            len: 3,
        };
        assert_eq!(err.to_string(), "cannot insert at position 7: section 0 has only 3 items");

        let err = CommandError::MissingStash(vec![StashId::new("s2"), StashId::new("s3")]);
        assert_eq!(err.to_string(), "missing stashes: s2, s3");
    }

    #[test]
    fn test_layout_errors_map_onto_taxonomy() {
        let err: CommandError = LayoutError::SectionNotFound {
            path: LayoutPath::section(2),
        }
        .into();
        assert_eq!(
            err,
            CommandError::SectionNotFound {
                path: LayoutPath::section(2)
            }
        );
    }
}
