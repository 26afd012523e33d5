//! Structural edits shared by validation and the pipeline.
//!
//! Every function here assumes the target was validated against the same
//! layout value; lookups still return errors rather than panicking.

use crate::commands::{CommandError, CommandResult};
use dashgrid_layout::{find_section, find_section_mut, find_sections_mut, Item, Layout, LayoutPath, Section};

/// Remove and return the item at `path`
pub(crate) fn take_item(layout: &mut Layout, path: &LayoutPath) -> CommandResult<Item> {
    let index = path.item_index()?;
    let section = find_section_mut(layout, path)?;
    if index >= section.items.len() {
        return Err(CommandError::ItemNotFound { path: path.clone() });
    }
    Ok(section.items.remove(index))
}

/// Insert `items` starting at `path`; returns the paths they now occupy
pub(crate) fn insert_items(
    layout: &mut Layout,
    path: &LayoutPath,
    items: Vec<Item>,
) -> CommandResult<Vec<LayoutPath>> {
    let index = path.item_index()?;
    let section = find_section_mut(layout, path)?;
    if index > section.items.len() {
        return Err(CommandError::InvalidItemIndex {
            path: path.section_path().unwrap_or_default(),
            index,
            len: section.items.len(),
        });
    }

    let count = items.len();
    section.items.splice(index..index, items);
    (index..index + count)
        .map(|i| path.with_item_index(i).map_err(CommandError::from))
        .collect()
}

pub(crate) fn take_section(layout: &mut Layout, path: &LayoutPath) -> CommandResult<Section> {
    let index = path.section_index()?;
    let sections = find_sections_mut(layout, path)?;
    if index >= sections.len() {
        return Err(CommandError::SectionNotFound { path: path.clone() });
    }
    Ok(sections.remove(index))
}

pub(crate) fn insert_section(layout: &mut Layout, path: &LayoutPath, section: Section) -> CommandResult<()> {
    let index = path.section_index()?;
    let sections = find_sections_mut(layout, path)?;
    if index > sections.len() {
        return Err(CommandError::InvalidSectionIndex {
            index,
            len: sections.len(),
        });
    }
    sections.insert(index, section);
    Ok(())
}

/// Paths of every item directly inside the section at `section_path`
pub(crate) fn section_item_paths(layout: &Layout, section_path: &LayoutPath) -> CommandResult<Vec<LayoutPath>> {
    let len = find_section(layout, section_path)?.items.len();
    (0..len)
        .map(|i| section_path.with_item_index(i).map_err(CommandError::from))
        .collect()
}
