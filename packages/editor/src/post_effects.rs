//! # Post-Effect System
//!
//! Structural commands trigger follow-up sizing passes that keep the grid
//! consistent:
//! - Row membership changed → unify row heights in the touched sections
//! - A child grew → grow the ancestor containers that would clip it
//!
//! Effects are deterministic and only touch the sections and ancestor
//! chains named in their [`EffectScope`].

use dashgrid_layout::{
    container_capacity, find_section, find_section_mut, resize_parent_containers, unify_row_heights,
    Breakpoint, Layout, LayoutPath, LayoutResult, SettingsProvider,
};

/// Locations a command touched, after the command was applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectScope {
    /// Section paths whose rows may have changed
    pub sections: Vec<LayoutPath>,

    /// Container item paths to start parent resizing from
    pub containers: Vec<LayoutPath>,
}

impl EffectScope {
    pub fn touch_section(&mut self, path: LayoutPath) {
        if !self.sections.contains(&path) {
            self.sections.push(path);
        }
    }

    pub fn touch_container(&mut self, path: LayoutPath) {
        if !path.is_root() && !self.containers.contains(&path) {
            self.containers.push(path);
        }
    }
}

/// Post-effect run after a structural command
pub trait PostEffect: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Produce the layout with this effect applied
    fn apply(&self, layout: Layout, scope: &EffectScope, settings: &dyn SettingsProvider) -> LayoutResult<Layout>;
}

/// Match item heights within each rendered row
#[derive(Debug)]
pub struct UnifyRowHeights;

impl PostEffect for UnifyRowHeights {
    fn name(&self) -> &'static str {
        "UnifyRowHeights"
    }

    fn apply(&self, mut layout: Layout, scope: &EffectScope, settings: &dyn SettingsProvider) -> LayoutResult<Layout> {
        if settings.custom_height_enabled() {
            return Ok(layout);
        }

        for section_path in &scope.sections {
            // xl first so implicit breakpoints inherit unified heights
            for breakpoint in Breakpoint::ALL.iter().rev().copied() {
                let capacity = container_capacity(&layout, &section_path.container_path(), settings, breakpoint)?;
                let unified = unify_row_heights(find_section(&layout, section_path)?, breakpoint, capacity, settings);
                *find_section_mut(&mut layout, section_path)? = unified;
            }
        }
        Ok(layout)
    }
}

/// Grow ancestor containers so nested content is never clipped
#[derive(Debug)]
pub struct ResizeParentContainers;

impl PostEffect for ResizeParentContainers {
    fn name(&self) -> &'static str {
        "ResizeParentContainers"
    }

    fn apply(&self, mut layout: Layout, scope: &EffectScope, settings: &dyn SettingsProvider) -> LayoutResult<Layout> {
        for container in &scope.containers {
            layout = resize_parent_containers(&layout, container, settings)?;
        }
        Ok(layout)
    }
}

/// Post-effect engine that applies all registered effects in order
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(UnifyRowHeights), Box::new(ResizeParentContainers)],
        }
    }

    pub fn run(&self, layout: Layout, scope: &EffectScope, settings: &dyn SettingsProvider) -> LayoutResult<Layout> {
        self.effects.iter().try_fold(layout, |layout, effect| {
            tracing::debug!("[PostEffects] {} over {} sections", effect.name(), scope.sections.len());
            effect.apply(layout, scope, settings)
        })
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}
