//! # Grid Sizing
//!
//! Sizes are normalized against the capacity of the layout that holds them:
//!
//! ```text
//! root grid (settings.columns(bp))
//!   └─ container item, width 8      capacity for its children = 8
//!        └─ container item, width 4  capacity for its children = 4
//! ```
//!
//! Rows are not stored. A section's items flow left to right and wrap when
//! the running width would exceed the capacity; [`rendered_rows`] reproduces
//! that split so heights can be unified per visible row.

use crate::breakpoint::Breakpoint;
use crate::content::{ResolvedContent, SizeProfile};
use crate::error::{LayoutError, LayoutResult};
use crate::layout::{Direction, Item, Layout, Section};
use crate::path::{find_item, find_item_mut, find_layout, LayoutPath};
use crate::settings::SettingsProvider;
use crate::size::GridSize;
use std::ops::Range;

/// Item after normalization, and whether its size differs from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub item: Item,
    pub resized: bool,
}

/// Columns available to the children of the layout at `container`
pub fn container_capacity(
    layout: &Layout,
    container: &LayoutPath,
    settings: &dyn SettingsProvider,
    breakpoint: Breakpoint,
) -> LayoutResult<u32> {
    let mut capacity = settings.columns(breakpoint);
    let mut prefix = LayoutPath::root();
    for step in container.steps() {
        prefix = prefix.push_unchecked(*step);
        let item = find_item(layout, &prefix)?;
        capacity = capacity.min(item.size.get(breakpoint).grid_width);
    }
    Ok(capacity)
}

/// Fit `item` into the layout that would hold it at `path`.
///
/// Width is clamped into `[min_width, capacity]` (a zero width takes the
/// content's default) or forced to the full capacity in column containers.
/// Explicit heights are clamped into the content's height bounds; auto
/// heights become the default height only when custom height is enabled.
pub fn normalize_size_to_parent(
    item: &Item,
    path: &LayoutPath,
    layout: &Layout,
    settings: &dyn SettingsProvider,
    resolved: &ResolvedContent,
    breakpoint: Breakpoint,
) -> LayoutResult<Normalized> {
    let container = path.container_path();
    let parent = find_layout(layout, &container)?;
    let capacity = container_capacity(layout, &container, settings, breakpoint)?;
    let profile = SizeProfile::for_item(item, resolved);
    let requested = item.size.get(breakpoint);

    let width = match requested.grid_width {
        0 => profile.default_width,
        w => w,
    };
    let mut normalized = validate_widget_size(width, requested.grid_height, &profile, capacity);

    if parent.direction() == Direction::Column {
        normalized.grid_width = capacity;
    }
    if normalized.grid_height.is_none() && settings.custom_height_enabled() {
        normalized.grid_height = Some(profile.default_height);
    }

    let mut item = item.clone();
    if normalized != requested {
        item.size.set(breakpoint, normalized);
    }
    Ok(Normalized {
        resized: normalized != requested,
        item,
    })
}

/// Split items into the rows the grid renders at `breakpoint`
pub fn rendered_rows(items: &[Item], breakpoint: Breakpoint, capacity: u32) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut width = 0;

    for (index, item) in items.iter().enumerate() {
        let item_width = item.size.get(breakpoint).grid_width;
        if index > start && width + item_width > capacity {
            rows.push(start..index);
            start = index;
            width = 0;
        }
        width += item_width;
    }

    if start < items.len() {
        rows.push(start..items.len());
    }
    rows
}

/// Give every item in a rendered row the height of the row's tallest item.
///
/// A no-op when custom height is enabled. Rows whose tallest item has no
/// height (all auto or zero width) are left as they are.
pub fn unify_row_heights(
    section: &Section,
    breakpoint: Breakpoint,
    capacity: u32,
    settings: &dyn SettingsProvider,
) -> Section {
    let mut section = section.clone();
    if settings.custom_height_enabled() {
        return section;
    }

    for row in rendered_rows(&section.items, breakpoint, capacity) {
        let row_items = &mut section.items[row];
        let tallest = row_items
            .iter()
            .map(|item| item.size.get(breakpoint))
            .filter(|size| size.grid_width > 0)
            .map(|size| size.height_or_zero())
            .max()
            .unwrap_or(0);

        if tallest == 0 {
            continue;
        }

        for item in row_items.iter_mut() {
            let size = item.size.get(breakpoint);
            if size.grid_width > 0 && size.grid_height != Some(tallest) {
                item.size.set(breakpoint, size.with_height(Some(tallest)));
            }
        }
    }
    section
}

/// Height an item occupies; auto-height containers take their content height
fn effective_height(item: &Item, breakpoint: Breakpoint, capacity: u32) -> u32 {
    let size = item.size.get(breakpoint);
    match (size.grid_height, item.as_container()) {
        (Some(h), _) => h,
        (None, Some(nested)) => content_height(nested, breakpoint, size.grid_width.min(capacity)),
        (None, None) => 0,
    }
}

/// Rows needed to render every section of `layout` without clipping
pub fn content_height(layout: &Layout, breakpoint: Breakpoint, capacity: u32) -> u32 {
    layout
        .sections
        .iter()
        .map(|section| {
            rendered_rows(&section.items, breakpoint, capacity)
                .into_iter()
                .map(|row| {
                    section.items[row]
                        .iter()
                        .map(|item| effective_height(item, breakpoint, capacity))
                        .max()
                        .unwrap_or(0)
                })
                .sum::<u32>()
        })
        .sum()
}

/// Grow explicitly sized containers from `parent_path` up to the root until
/// each one fits its content.
///
/// Auto-height containers grow with their content and are not touched, but
/// their ancestors are still checked. Propagation stops at the first
/// explicitly sized ancestor that already fits at every breakpoint.
/// Containers never shrink.
pub fn resize_parent_containers(
    layout: &Layout,
    parent_path: &LayoutPath,
    settings: &dyn SettingsProvider,
) -> LayoutResult<Layout> {
    let mut updated = layout.clone();
    let mut current = Some(parent_path.clone()).filter(|p| !p.is_root());

    while let Some(container_path) = current {
        let mut grew = false;
        let mut auto_height = false;

        // xl first so implicit breakpoints inherit the new height
        for breakpoint in Breakpoint::ALL.iter().rev().copied() {
            let capacity = container_capacity(&updated, &container_path, settings, breakpoint)?;
            let item = find_item(&updated, &container_path)?;
            let nested = item.as_container().ok_or_else(|| {
                LayoutError::invalid_path(&container_path, "item is not a container")
            })?;

            let size = item.size.get(breakpoint);
            let Some(height) = size.grid_height else {
                auto_height = true;
                continue;
            };

            let required = content_height(nested, breakpoint, capacity);
            if required > height {
                tracing::debug!(
                    "[Sizing] growing container {} at {} from {} to {}",
                    container_path,
                    breakpoint,
                    height,
                    required
                );
                find_item_mut(&mut updated, &container_path)?
                    .size
                    .set(breakpoint, size.with_height(Some(required)));
                grew = true;
            }
        }

        if !grew && !auto_height {
            break;
        }
        current = container_path.parent_path();
    }

    Ok(updated)
}

/// Paths of leaf widgets whose size differs between two aligned layouts
pub fn resized_item_paths(original: &Layout, updated: &Layout) -> Vec<LayoutPath> {
    let mut paths = Vec::new();
    collect_resized(original, updated, &LayoutPath::root(), &mut paths);
    paths
}

fn collect_resized(original: &Layout, updated: &Layout, prefix: &LayoutPath, out: &mut Vec<LayoutPath>) {
    for (section_index, (before, after)) in original.sections.iter().zip(&updated.sections).enumerate() {
        for (item_index, (old, new)) in before.items.iter().zip(&after.items).enumerate() {
            let path = prefix.push_unchecked(crate::path::PathStep::item(section_index, item_index));
            match (old.as_container(), new.as_container()) {
                (Some(old_nested), Some(new_nested)) => collect_resized(old_nested, new_nested, &path, out),
                _ if new.as_widget().is_some() && old.size != new.size => out.push(path),
                _ => {}
            }
        }
    }
}

/// Clamp a requested widget size into its content bounds and `max_width`
/// columns. Auto heights stay auto.
pub fn validate_widget_size(width: u32, height: Option<u32>, profile: &SizeProfile, max_width: u32) -> GridSize {
    GridSize {
        grid_width: width.clamp(profile.min_width.min(max_width), max_width),
        grid_height: height.map(|h| h.clamp(profile.min_height, profile.max_height)),
    }
}
