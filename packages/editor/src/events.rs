//! Events emitted after a command is applied, in acceptance order.

use dashgrid_layout::{Item, LayoutPath, StashId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    ItemsAdded,
    ItemMoved,
    ItemRemoved,
    ItemResized,
    SectionHeaderChanged,
    SectionAdded,
    SectionMoved,
    SectionRemoved,
    ItemReplaced,
    ContainerDirectionChanged,
    Undo,
    Redo,
}

/// What a command changed, with post-mutation locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutChanged {
    pub kind: ChangeKind,

    /// Section index of `path`'s last step
    pub section_index: Option<usize>,

    /// Item index of `path`'s last step
    pub item_index: Option<usize>,

    /// Primary location after the change
    pub path: Option<LayoutPath>,

    /// Every location the command placed or touched, after the change
    pub paths: Vec<LayoutPath>,

    /// Items placed, moved or removed, as they ended up
    pub items: Vec<Item>,

    pub used_stash_ids: Vec<StashId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stashed_as: Option<StashId>,

    /// Leaf items whose size the engine changed
    pub resized_paths: Vec<LayoutPath>,

    /// Section dropped because an eager removal emptied it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_section: Option<LayoutPath>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    /// Document version after the change
    pub version: u64,
}

impl LayoutChanged {
    pub fn new(kind: ChangeKind, paths: Vec<LayoutPath>) -> Self {
        let path = paths.first().cloned();
        let last = path.as_ref().and_then(|p| p.last().copied());
        Self {
            kind,
            section_index: last.map(|s| s.section_index),
            item_index: last.and_then(|s| s.item_index),
            path,
            paths,
            items: Vec::new(),
            used_stash_ids: Vec::new(),
            stashed_as: None,
            resized_paths: Vec::new(),
            removed_section: None,
            correlation_id: None,
            version: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_come_from_primary_path() {
        let nested = LayoutPath::item(0, 3).child_item(1, 4).unwrap();
        let event = LayoutChanged::new(ChangeKind::ItemsAdded, vec![nested.clone(), LayoutPath::item(0, 0)]);

        assert_eq!(event.section_index, Some(1));
        assert_eq!(event.item_index, Some(4));
        assert_eq!(event.path, Some(nested));
    }

    #[test]
    fn test_section_event_has_no_item_index() {
        let event = LayoutChanged::new(ChangeKind::SectionAdded, vec![LayoutPath::section(2)]);
        assert_eq!(event.section_index, Some(2));
        assert_eq!(event.item_index, None);
    }
}
