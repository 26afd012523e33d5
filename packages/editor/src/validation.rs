//! Placement checks run against the read-only snapshot before anything is
//! resolved or applied.

use crate::commands::{Command, CommandError, CommandResult, ItemDefinition};
use crate::edits::{take_item, take_section};
use crate::snapshot::Snapshot;
use dashgrid_layout::{find_item, find_section, find_sections, Layout, LayoutPath};
use std::collections::HashSet;

impl Command {
    /// Validate without applying.
    ///
    /// Stash existence is checked separately so that every missing id can be
    /// reported together.
    pub fn validate(&self, snapshot: &Snapshot) -> CommandResult<()> {
        let layout = &snapshot.layout;

        match self {
            Command::AddItems { path, items } => {
                require_items(items)?;
                check_item_slot(layout, path)?;
            }

            Command::MoveItem { from, to } => {
                find_item(layout, from)?;
                let mut without = layout.clone();
                take_item(&mut without, from)?;
                check_item_slot(&without, to)?;
            }

            Command::RemoveItem { path, .. } | Command::ResizeItem { path, .. } => {
                find_item(layout, path)?;
            }

            Command::ReplaceItem { path, items, .. } => {
                require_items(items)?;
                find_item(layout, path)?;
            }

            Command::ChangeSectionHeader { path, .. } | Command::RemoveSection { path, .. } => {
                require_section_path(path)?;
                find_section(layout, path)?;
            }

            Command::AddSection { path, .. } => {
                check_section_slot(layout, path)?;
            }

            Command::MoveSection { from, to } => {
                require_section_path(from)?;
                find_section(layout, from)?;
                let mut without = layout.clone();
                take_section(&mut without, from)?;
                check_section_slot(&without, to)?;
            }

            Command::ChangeContainerDirection { path, .. } => {
                if !find_item(layout, path)?.is_container() {
                    return Err(CommandError::InvalidPath {
                        path: path.clone(),
                        reason: "item is not a container".to_string(),
                    });
                }
            }
        }

        check_stash_ids(self)
    }
}

fn require_items(items: &[ItemDefinition]) -> CommandResult<()> {
    if items.is_empty() {
        return Err(CommandError::InvalidCommand("no items to place".to_string()));
    }
    Ok(())
}

fn require_section_path(path: &LayoutPath) -> CommandResult<()> {
    if !path.addresses_section() {
        return Err(CommandError::InvalidPath {
            path: path.clone(),
            reason: "expected a section path".to_string(),
        });
    }
    Ok(())
}

/// The section must exist and the index must lie in `[0, len]`
fn check_item_slot(layout: &Layout, path: &LayoutPath) -> CommandResult<()> {
    if !path.addresses_item() {
        return Err(CommandError::InvalidPath {
            path: path.clone(),
            reason: "expected an item path".to_string(),
        });
    }

    let section = find_section(layout, path)?;
    let index = path.item_index()?;
    if index > section.items.len() {
        return Err(CommandError::InvalidItemIndex {
            path: path.section_path().unwrap_or_default(),
            index,
            len: section.items.len(),
        });
    }
    Ok(())
}

/// The holding layout must exist and the index must lie in `[0, len]`
fn check_section_slot(layout: &Layout, path: &LayoutPath) -> CommandResult<()> {
    require_section_path(path)?;

    let sections = find_sections(layout, path)?;
    let index = path.section_index()?;
    if index > sections.len() {
        return Err(CommandError::InvalidSectionIndex {
            index,
            len: sections.len(),
        });
    }
    Ok(())
}

/// A stash can only be consumed once, so listing it twice is a mistake
fn check_stash_ids(command: &Command) -> CommandResult<()> {
    let mut seen = HashSet::new();
    for id in command.stash_ids() {
        if !seen.insert(id) {
            return Err(CommandError::InvalidCommand(format!(
                "stash '{}' is listed more than once",
                id
            )));
        }
    }
    Ok(())
}
