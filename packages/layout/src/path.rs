//! # Layout Paths
//!
//! A path is an ordered chain of `(section, item)` steps from the root layout
//! down to a location. Every step except the last must address an item (the
//! container to descend into); the last step may omit its item index to
//! address a section. The empty path addresses the root layout itself.
//!
//! Paths are plain values. They are never kept across mutations because an
//! insertion or removal shifts the indices of later siblings.
//!
//! ## Serialized form
//!
//! ```text
//! root            the root layout
//! 3               section 3
//! 3_2             item 2 of section 3
//! 3_2-1_6-4       section 4 of the container at 3_2-1_6
//! ```

use crate::error::{LayoutError, LayoutResult};
use crate::layout::{Item, Layout, Section};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ROOT_KEY: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStep {
    pub section_index: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
}

impl PathStep {
    pub fn item(section_index: usize, item_index: usize) -> Self {
        Self {
            section_index,
            item_index: Some(item_index),
        }
    }

    pub fn section(section_index: usize) -> Self {
        Self {
            section_index,
            item_index: None,
        }
    }
}

/// Location of a section or item in a (possibly nested) layout
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<PathStep>", into = "Vec<PathStep>")]
pub struct LayoutPath {
    steps: Vec<PathStep>,
}

impl LayoutPath {
    /// The root layout
    pub fn root() -> Self {
        Self { steps: Vec::new() }
    }

    /// Item in the root layout
    pub fn item(section_index: usize, item_index: usize) -> Self {
        Self {
            steps: vec![PathStep::item(section_index, item_index)],
        }
    }

    /// Section in the root layout
    pub fn section(section_index: usize) -> Self {
        Self {
            steps: vec![PathStep::section(section_index)],
        }
    }

    /// Build a path, checking that only the last step addresses a section
    pub fn from_steps(steps: Vec<PathStep>) -> LayoutResult<Self> {
        let path = Self { steps };
        let inner = path.steps.len().saturating_sub(1);
        if path.steps[..inner].iter().any(|s| s.item_index.is_none()) {
            return Err(LayoutError::invalid_path(
                &path,
                "only the last step may address a section",
            ));
        }
        Ok(path)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn addresses_item(&self) -> bool {
        self.last().is_some_and(|s| s.item_index.is_some())
    }

    pub fn addresses_section(&self) -> bool {
        self.last().is_some_and(|s| s.item_index.is_none())
    }

    /// Item index of the last step
    pub fn item_index(&self) -> LayoutResult<usize> {
        match self.last() {
            None => Err(LayoutError::invalid_path(self, "the root path addresses the layout itself")),
            Some(step) => step
                .item_index
                .ok_or_else(|| LayoutError::invalid_path(self, "path addresses a section, not an item")),
        }
    }

    /// Section index of the last step
    pub fn section_index(&self) -> LayoutResult<usize> {
        self.last()
            .map(|s| s.section_index)
            .ok_or_else(|| LayoutError::invalid_path(self, "the root path has no section"))
    }

    /// Path to the enclosing container item; `None` for the root and for
    /// locations directly in the root layout
    pub fn parent_path(&self) -> Option<LayoutPath> {
        if self.steps.len() <= 1 {
            return None;
        }
        Some(Self {
            steps: self.steps[..self.steps.len() - 1].to_vec(),
        })
    }

    /// Path of the layout that holds this location (root when not nested)
    pub fn container_path(&self) -> LayoutPath {
        self.parent_path().unwrap_or_default()
    }

    /// Path to the section this location lives in
    pub fn section_path(&self) -> Option<LayoutPath> {
        let mut path = self.clone();
        path.steps.last_mut()?.item_index = None;
        Some(path)
    }

    /// Same location with a different item index on the last step
    pub fn with_item_index(&self, item_index: usize) -> LayoutResult<LayoutPath> {
        let mut path = self.clone();
        match path.steps.last_mut() {
            Some(step) => {
                step.item_index = Some(item_index);
                Ok(path)
            }
            None => Err(LayoutError::invalid_path(self, "the root path has no items")),
        }
    }

    /// Same location with a different section index on the last step
    pub fn with_section_index(&self, section_index: usize) -> LayoutResult<LayoutPath> {
        let mut path = self.clone();
        match path.steps.last_mut() {
            Some(step) => {
                step.section_index = section_index;
                Ok(path)
            }
            None => Err(LayoutError::invalid_path(self, "the root path has no section")),
        }
    }

    /// Section inside the container this path addresses
    pub fn child_section(&self, section_index: usize) -> LayoutResult<LayoutPath> {
        if self.addresses_section() {
            return Err(LayoutError::invalid_path(self, "a section cannot contain sections"));
        }
        Ok(self.push_unchecked(PathStep::section(section_index)))
    }

    /// Item inside the container this path addresses
    pub fn child_item(&self, section_index: usize, item_index: usize) -> LayoutResult<LayoutPath> {
        if self.addresses_section() {
            return Err(LayoutError::invalid_path(self, "a section cannot contain sections"));
        }
        Ok(self.push_unchecked(PathStep::item(section_index, item_index)))
    }

    pub(crate) fn push_unchecked(&self, step: PathStep) -> LayoutPath {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// True if `other` lies inside the container this path addresses
    pub fn is_ancestor_of(&self, other: &LayoutPath) -> bool {
        self.addresses_item()
            && other.steps.len() > self.steps.len()
            && other.steps.starts_with(&self.steps)
    }

    /// This path after `count` items were inserted at the item path `at`
    pub fn after_item_insert(&self, at: &LayoutPath, count: usize) -> LayoutPath {
        let mut path = self.clone();
        if let (Some(depth), Some(inserted)) = (shared_depth(self, at), at.last().and_then(|s| s.item_index)) {
            if let Some(index) = path.steps[depth].item_index.as_mut() {
                if *index >= inserted {
                    *index += count;
                }
            }
        }
        path
    }

    /// This path after the item at `removed` was taken out; `None` if this
    /// path pointed at or into the removed item
    pub fn after_item_removal(&self, removed: &LayoutPath) -> Option<LayoutPath> {
        let mut path = self.clone();
        if let (Some(depth), Some(gone)) = (shared_depth(self, removed), removed.last().and_then(|s| s.item_index)) {
            if let Some(index) = path.steps[depth].item_index.as_mut() {
                match (*index).cmp(&gone) {
                    std::cmp::Ordering::Equal => return None,
                    std::cmp::Ordering::Greater => *index -= 1,
                    std::cmp::Ordering::Less => {}
                }
            }
        }
        Some(path)
    }

    /// This path after a section was inserted at the section path `at`
    pub fn after_section_insert(&self, at: &LayoutPath) -> LayoutPath {
        let mut path = self.clone();
        if let Some(depth) = sibling_layout_depth(self, at) {
            if path.steps[depth].section_index >= at.steps[depth].section_index {
                path.steps[depth].section_index += 1;
            }
        }
        path
    }

    /// This path after the section at `removed` was taken out; `None` if
    /// this path pointed into the removed section
    pub fn after_section_removal(&self, removed: &LayoutPath) -> Option<LayoutPath> {
        let mut path = self.clone();
        if let Some(depth) = sibling_layout_depth(self, removed) {
            let gone = removed.steps[depth].section_index;
            let step = &mut path.steps[depth];
            match step.section_index.cmp(&gone) {
                std::cmp::Ordering::Equal => return None,
                std::cmp::Ordering::Greater => step.section_index -= 1,
                std::cmp::Ordering::Less => {}
            }
        }
        Some(path)
    }

    /// Deterministic, collision-free key
    pub fn serialize(&self) -> String {
        if self.steps.is_empty() {
            return ROOT_KEY.to_string();
        }
        self.steps
            .iter()
            .map(|step| match step.item_index {
                Some(item) => format!("{}_{}", step.section_index, item),
                None => step.section_index.to_string(),
            })
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for LayoutPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for LayoutPath {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ROOT_KEY {
            return Ok(Self::root());
        }

        let malformed = || LayoutError::Malformed(format!("'{}' is not a layout path", s));
        let steps = s
            .split('-')
            .map(|part| {
                let mut pieces = part.splitn(2, '_');
                let section_index = pieces
                    .next()
                    .and_then(|p| p.parse::<usize>().ok())
                    .ok_or_else(malformed)?;
                let item_index = match pieces.next() {
                    Some(p) => Some(p.parse::<usize>().map_err(|_| malformed())?),
                    None => None,
                };
                Ok(PathStep {
                    section_index,
                    item_index,
                })
            })
            .collect::<LayoutResult<Vec<_>>>()?;

        Self::from_steps(steps)
    }
}

impl TryFrom<Vec<PathStep>> for LayoutPath {
    type Error = LayoutError;

    fn try_from(steps: Vec<PathStep>) -> Result<Self, Self::Error> {
        Self::from_steps(steps)
    }
}

impl From<LayoutPath> for Vec<PathStep> {
    fn from(path: LayoutPath) -> Self {
        path.steps
    }
}

/// Depth of `at`'s last step if `path` runs through the same section
fn shared_depth(path: &LayoutPath, at: &LayoutPath) -> Option<usize> {
    let depth = at.depth().checked_sub(1)?;
    (path.depth() > depth
        && path.steps[..depth] == at.steps[..depth]
        && path.steps[depth].section_index == at.steps[depth].section_index)
        .then_some(depth)
}

/// Depth of `at`'s last step if `path` runs through the same layout
fn sibling_layout_depth(path: &LayoutPath, at: &LayoutPath) -> Option<usize> {
    let depth = at.depth().checked_sub(1)?;
    (path.depth() > depth && path.steps[..depth] == at.steps[..depth]).then_some(depth)
}

fn prefix(path: &LayoutPath, len: usize) -> LayoutPath {
    LayoutPath {
        steps: path.steps[..len].to_vec(),
    }
}

fn section_prefix(path: &LayoutPath, len: usize) -> LayoutPath {
    let mut p = prefix(path, len);
    if let Some(step) = p.steps.last_mut() {
        step.item_index = None;
    }
    p
}

/// Layout addressed by a container path (the root for the empty path)
pub fn find_layout<'a>(root: &'a Layout, container: &LayoutPath) -> LayoutResult<&'a Layout> {
    let mut layout = root;
    for (depth, step) in container.steps.iter().enumerate() {
        let item_index = step
            .item_index
            .ok_or_else(|| LayoutError::invalid_path(container, "expected a container item"))?;
        let section = layout
            .sections
            .get(step.section_index)
            .ok_or_else(|| LayoutError::SectionNotFound {
                path: section_prefix(container, depth + 1),
            })?;
        let item = section
            .items
            .get(item_index)
            .ok_or_else(|| LayoutError::ItemNotFound {
                path: prefix(container, depth + 1),
            })?;
        layout = item.as_container().ok_or_else(|| {
            LayoutError::invalid_path(&prefix(container, depth + 1), "item is not a container")
        })?;
    }
    Ok(layout)
}

pub fn find_layout_mut<'a>(root: &'a mut Layout, container: &LayoutPath) -> LayoutResult<&'a mut Layout> {
    let mut layout = root;
    for (depth, step) in container.steps.iter().enumerate() {
        let item_index = step
            .item_index
            .ok_or_else(|| LayoutError::invalid_path(container, "expected a container item"))?;
        let section = layout
            .sections
            .get_mut(step.section_index)
            .ok_or_else(|| LayoutError::SectionNotFound {
                path: section_prefix(container, depth + 1),
            })?;
        let item = section
            .items
            .get_mut(item_index)
            .ok_or_else(|| LayoutError::ItemNotFound {
                path: prefix(container, depth + 1),
            })?;
        layout = item.as_container_mut().ok_or_else(|| {
            LayoutError::invalid_path(&prefix(container, depth + 1), "item is not a container")
        })?;
    }
    Ok(layout)
}

/// Sections of the layout that holds the path's last step
pub fn find_sections<'a>(root: &'a Layout, path: &LayoutPath) -> LayoutResult<&'a Vec<Section>> {
    Ok(&find_layout(root, &path.container_path())?.sections)
}

pub fn find_sections_mut<'a>(root: &'a mut Layout, path: &LayoutPath) -> LayoutResult<&'a mut Vec<Section>> {
    Ok(&mut find_layout_mut(root, &path.container_path())?.sections)
}

/// Section addressed by the path (or the section holding the addressed item)
pub fn find_section<'a>(root: &'a Layout, path: &LayoutPath) -> LayoutResult<&'a Section> {
    let section_index = path.section_index()?;
    find_sections(root, path)?
        .get(section_index)
        .ok_or_else(|| LayoutError::SectionNotFound {
            path: path.section_path().unwrap_or_default(),
        })
}

pub fn find_section_mut<'a>(root: &'a mut Layout, path: &LayoutPath) -> LayoutResult<&'a mut Section> {
    let section_index = path.section_index()?;
    find_sections_mut(root, path)?
        .get_mut(section_index)
        .ok_or_else(|| LayoutError::SectionNotFound {
            path: path.section_path().unwrap_or_default(),
        })
}

pub fn section_exists(root: &Layout, path: &LayoutPath) -> bool {
    find_section(root, path).is_ok()
}

pub fn find_item<'a>(root: &'a Layout, path: &LayoutPath) -> LayoutResult<&'a Item> {
    let item_index = path.item_index()?;
    find_section(root, path)?
        .items
        .get(item_index)
        .ok_or_else(|| LayoutError::ItemNotFound { path: path.clone() })
}

pub fn find_item_mut<'a>(root: &'a mut Layout, path: &LayoutPath) -> LayoutResult<&'a mut Item> {
    let item_index = path.item_index()?;
    find_section_mut(root, path)?
        .items
        .get_mut(item_index)
        .ok_or_else(|| LayoutError::ItemNotFound { path: path.clone() })
}

pub fn item_exists(root: &Layout, path: &LayoutPath) -> bool {
    find_item(root, path).is_ok()
}
