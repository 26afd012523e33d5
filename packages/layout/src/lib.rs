//! # Dashgrid Layout
//!
//! Data model for nested, responsive dashboard layouts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ layout: Layout → Section → Item             │
//! │         Item = Widget | Container(Layout)   │
//! └─────────────────────────────────────────────┘
//!            ↑ addressed by          ↑ sized by
//! ┌──────────────────────┐  ┌──────────────────────────┐
//! │ path: LayoutPath     │  │ sizing: normalize, unify │
//! │  find_*, serialize   │  │  rows, resize containers │
//! └──────────────────────┘  └──────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ stash: removed items kept for re-insertion  │
//! │ persisted: versioned JSON form              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree of values**: no parent links; every edit produces a new tree
//! 2. **Paths are recomputed**: indices shift on insert/remove, so paths are
//!    never held across mutations
//! 3. **Pure functions**: lookups and sizing take an explicit snapshot
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dashgrid_layout::{find_item, Breakpoint, LayoutPath, PersistedLayout};
//!
//! let layout = PersistedLayout::from_json(&json)?.into_layout();
//! let path: LayoutPath = "0_1-0_0".parse()?;
//! let item = find_item(&layout, &path)?;
//! println!("{}", item.size.get(Breakpoint::Md).grid_width);
//! ```

mod breakpoint;
mod content;
mod error;
mod identity;
mod layout;
mod path;
mod persisted;
mod settings;
mod size;
mod stash;

pub mod sizing;
pub mod visitor;

pub use breakpoint::Breakpoint;
pub use content::{
    ContentRef, InsightContent, ResolvedContent, SizeProfile, VisType, VisualizationDefinition,
    WidgetKind,
};
pub use error::{LayoutError, LayoutResult};
pub use identity::{DurableId, IdentityMapping, TempId, WidgetIdentity};
pub use layout::{
    Direction, Item, ItemContent, Layout, LayoutConfiguration, Section, SectionHeader, Widget,
};
pub use path::{
    find_item, find_item_mut, find_layout, find_layout_mut, find_section, find_section_mut,
    find_sections, find_sections_mut, item_exists, section_exists, LayoutPath, PathStep,
};
pub use persisted::{PersistedLayout, FORMAT_VERSION};
pub use settings::{Settings, SettingsProvider};
pub use size::{implicit_size_from_xl, GridSize, ItemSize, GRID_COLUMNS};
pub use sizing::{
    container_capacity, content_height, normalize_size_to_parent, rendered_rows,
    resize_parent_containers, resized_item_paths, unify_row_heights, validate_widget_size,
    Normalized,
};
pub use stash::{StashId, StashResolution, StashStore};
pub use visitor::{
    all_item_paths, find_widget, reconcile_identities, reconcile_item_identities, Visitor,
    VisitorMut,
};
