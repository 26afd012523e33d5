//! # Layout Tree
//!
//! A layout is a tree of values: sections hold items, items hold either a
//! leaf widget or a nested layout (container). There are no parent links;
//! locations are addressed by [`LayoutPath`](crate::LayoutPath) and every
//! mutation produces a new tree.

use crate::content::WidgetKind;
use crate::identity::WidgetIdentity;
use crate::size::ItemSize;
use serde::{Deserialize, Serialize};

/// Flow direction of a container's sections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[default]
    Row,
    /// Children stack vertically and take the container's full width
    Column,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfiguration {
    pub direction: Direction,
    pub section_headers: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<LayoutConfiguration>,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sections(sections: Vec<Section>) -> Self {
        Self {
            configuration: None,
            sections,
        }
    }

    pub fn direction(&self) -> Direction {
        self.configuration
            .as_ref()
            .map(|c| c.direction)
            .unwrap_or_default()
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.configuration.get_or_insert_with(Default::default).direction = direction;
    }

    /// Number of items across all sections, including nested layouts
    pub fn item_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.items)
            .map(|item| match &item.content {
                ItemContent::Container(nested) => 1 + nested.item_count(),
                ItemContent::Widget(_) => 1,
            })
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SectionHeader {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }
}

/// Ordered row-group of items. Empty sections are legal placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SectionHeader>,

    #[serde(default)]
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            header: None,
            items,
        }
    }

    pub fn with_header(mut self, header: SectionHeader) -> Self {
        self.header = Some(header);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub size: ItemSize,
    pub content: ItemContent,
}

impl Item {
    pub fn widget(size: ItemSize, widget: Widget) -> Self {
        Self {
            size,
            content: ItemContent::Widget(widget),
        }
    }

    pub fn container(size: ItemSize, layout: Layout) -> Self {
        Self {
            size,
            content: ItemContent::Container(layout),
        }
    }

    pub fn as_widget(&self) -> Option<&Widget> {
        match &self.content {
            ItemContent::Widget(widget) => Some(widget),
            ItemContent::Container(_) => None,
        }
    }

    pub fn as_widget_mut(&mut self) -> Option<&mut Widget> {
        match &mut self.content {
            ItemContent::Widget(widget) => Some(widget),
            ItemContent::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&Layout> {
        match &self.content {
            ItemContent::Container(layout) => Some(layout),
            ItemContent::Widget(_) => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Layout> {
        match &mut self.content {
            ItemContent::Container(layout) => Some(layout),
            ItemContent::Widget(_) => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.content, ItemContent::Container(_))
    }
}

/// What an item holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemContent {
    Widget(Widget),
    Container(Layout),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(default)]
    pub identity: WidgetIdentity,

    #[serde(default)]
    pub title: String,

    pub kind: WidgetKind,
}

impl Widget {
    pub fn new(title: impl Into<String>, kind: WidgetKind) -> Self {
        Self {
            identity: WidgetIdentity::default(),
            title: title.into(),
            kind,
        }
    }

    pub fn with_identity(mut self, identity: WidgetIdentity) -> Self {
        self.identity = identity;
        self
    }
}
