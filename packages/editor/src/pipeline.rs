//! # Command Pipeline
//!
//! Runs one command from intent to event.
//!
//! ```text
//! Received → Validated → ContentResolved → SizeNormalized → Applied → Emitted
//!     └──────────┴──────────────┴──→ Rejected
//! ```
//!
//! Everything up to `SizeNormalized` works on a clone of the current
//! snapshot; the caller swaps the result in as one step. A rejected command
//! leaves no trace.

use crate::commands::{Command, CommandError, CommandResult, ItemDefinition};
use crate::edits::{insert_items, insert_section, section_item_paths, take_item, take_section};
use crate::events::{ChangeKind, LayoutChanged};
use crate::id_generator::TempIdGenerator;
use crate::post_effects::{EffectScope, PostEffectEngine};
use crate::resolver::{ContentResolver, ScreenProvider};
use crate::snapshot::Snapshot;
use dashgrid_layout::{
    find_item, find_item_mut, find_section, find_section_mut, normalize_size_to_parent, resized_item_paths,
    Breakpoint, ContentRef, Item, Layout, LayoutPath, ResolvedContent, Section, SettingsProvider, StashResolution,
    Visitor, VisitorMut, Widget, WidgetIdentity,
};
use std::fmt;
use std::sync::Arc;

/// Pipeline stage, used in log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    ContentResolved,
    SizeNormalized,
    Applied,
    Emitted,
    Rejected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::ContentResolved => "content resolved",
            Stage::SizeNormalized => "size normalized",
            Stage::Applied => "applied",
            Stage::Emitted => "emitted",
            Stage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// New snapshot plus the event describing it. The event's version and
/// correlation id are filled in once the snapshot is swapped in.
#[derive(Debug, Clone)]
pub struct Processed {
    pub snapshot: Snapshot,
    pub event: LayoutChanged,
}

/// Structural outcome of one command on the working snapshot
struct Placement {
    kind: ChangeKind,
    paths: Vec<LayoutPath>,
    normalize: Vec<LayoutPath>,
    scope: EffectScope,
    removed: Vec<Item>,
    removed_section: Option<LayoutPath>,
}

impl Placement {
    fn new(kind: ChangeKind, paths: Vec<LayoutPath>) -> Self {
        Self {
            kind,
            paths,
            normalize: Vec::new(),
            scope: EffectScope::default(),
            removed: Vec::new(),
            removed_section: None,
        }
    }

    /// Normalize the given items and run effects around them
    fn placed(mut self, placed: &[LayoutPath]) -> Self {
        for path in placed {
            if let Some(section) = path.section_path() {
                self.scope.touch_section(section);
            }
            self.scope.touch_container(path.container_path());
            self.normalize.push(path.clone());
        }
        self
    }
}

pub struct Pipeline {
    settings: Arc<dyn SettingsProvider>,
    resolver: Arc<dyn ContentResolver>,
    screen: Arc<dyn ScreenProvider>,
    ids: TempIdGenerator,
    effects: PostEffectEngine,
}

impl Pipeline {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        resolver: Arc<dyn ContentResolver>,
        screen: Arc<dyn ScreenProvider>,
        ids: TempIdGenerator,
    ) -> Self {
        Self {
            settings,
            resolver,
            screen,
            ids,
            effects: PostEffectEngine::new(),
        }
    }

    pub fn settings(&self) -> &dyn SettingsProvider {
        &*self.settings
    }

    /// Run `command` against `snapshot`, returning the replacement snapshot.
    ///
    /// The content resolver is the only await point.
    pub async fn process(&mut self, snapshot: &Snapshot, command: &Command) -> CommandResult<Processed> {
        tracing::debug!("[Pipeline] {} {} at {}", command.name(), Stage::Received, command.target());

        command.validate(snapshot)?;
        let used_stash_ids: Vec<_> = command.stash_ids().into_iter().cloned().collect();
        let resolution = snapshot.stash.resolve(&used_stash_ids);
        if !resolution.is_complete() {
            return Err(CommandError::MissingStash(resolution.missing));
        }
        tracing::debug!("[Pipeline] {} {}", command.name(), Stage::Validated);

        // identities are fixed before the first await
        let mut new_items = expand_definitions(command.definitions(), resolution);
        for item in &mut new_items {
            IdentityAssigner { ids: &mut self.ids }.visit_item_mut(item, &LayoutPath::root());
        }

        let mut refs = Vec::new();
        for item in new_items.iter().chain(sized_existing_items(&snapshot.layout, command)) {
            RefCollector { refs: &mut refs }.visit_item(item, &LayoutPath::root());
        }
        let resolved = self.resolve_content(refs).await?;
        for item in &mut new_items {
            ContentSubstituter { resolved: &resolved }.visit_item_mut(item, &LayoutPath::root());
        }
        tracing::debug!("[Pipeline] {} {} ({} refs)", command.name(), Stage::ContentResolved, resolved.len());

        let mut next = snapshot.clone();
        for id in &used_stash_ids {
            next.stash.consume(id)?;
        }
        let placement = apply_structure(&mut next, command, new_items)?;

        let mut resized_paths = self.normalize(&mut next.layout, &placement.normalize, &resolved)?;
        let before_effects = next.layout.clone();
        next.layout = self.effects.run(next.layout, &placement.scope, self.settings())?;
        for path in resized_item_paths(&before_effects, &next.layout) {
            if !resized_paths.contains(&path) {
                resized_paths.push(path);
            }
        }
        tracing::debug!(
            "[Pipeline] {} {} ({} resized)",
            command.name(),
            Stage::SizeNormalized,
            resized_paths.len()
        );

        let mut event = LayoutChanged::new(placement.kind, placement.paths);
        if placement.removed.is_empty() {
            for path in &placement.normalize {
                event.items.push(find_item(&next.layout, path)?.clone());
            }
        } else {
            event.items = placement.removed;
        }
        event.used_stash_ids = used_stash_ids;
        event.stashed_as = command.stash_as().cloned();
        event.resized_paths = resized_paths;
        event.removed_section = placement.removed_section;

        Ok(Processed { snapshot: next, event })
    }

    async fn resolve_content(&self, refs: Vec<ContentRef>) -> CommandResult<ResolvedContent> {
        if refs.is_empty() {
            return Ok(ResolvedContent::new());
        }

        let resolved = self
            .resolver
            .resolve(&refs)
            .await
            .map_err(|e| CommandError::ContentResolutionFailed {
                refs: refs.clone(),
                reason: e.to_string(),
            })?;

        let missing: Vec<_> = refs.iter().filter(|r| !resolved.contains_key(*r)).cloned().collect();
        if !missing.is_empty() {
            return Err(CommandError::ContentResolutionFailed {
                refs: missing,
                reason: "no definition returned".to_string(),
            });
        }
        Ok(resolved)
    }

    /// Fit each item to its parent at xl, and at the active breakpoint when
    /// the flexible layout is enabled
    fn normalize(
        &self,
        layout: &mut Layout,
        paths: &[LayoutPath],
        resolved: &ResolvedContent,
    ) -> CommandResult<Vec<LayoutPath>> {
        let mut breakpoints = vec![Breakpoint::Xl];
        let active = self.screen.breakpoint();
        if active != Breakpoint::Xl && self.settings.flexible_layout_enabled() {
            breakpoints.push(active);
        }

        let mut resized = Vec::new();
        for path in paths {
            for breakpoint in &breakpoints {
                let item = find_item(layout, path)?;
                let normalized = normalize_size_to_parent(item, path, layout, self.settings(), resolved, *breakpoint)?;
                if normalized.resized {
                    *find_item_mut(layout, path)? = normalized.item;
                    if !resized.contains(path) {
                        resized.push(path.clone());
                    }
                }
            }
        }
        Ok(resized)
    }
}

/// Inline items and stashed items, in the order they were listed
fn expand_definitions(definitions: &[ItemDefinition], resolution: StashResolution) -> Vec<Item> {
    let mut stashed = resolution.existing.into_iter();
    let mut items = Vec::new();
    for definition in definitions {
        match definition {
            ItemDefinition::Item { item } => items.push(item.clone()),
            ItemDefinition::Stash { .. } => {
                if let Some((_, entry)) = stashed.next() {
                    items.extend(entry);
                }
            }
        }
    }
    items
}

/// Existing items the command re-sizes, whose content profile is needed
fn sized_existing_items<'a>(layout: &'a Layout, command: &Command) -> Vec<&'a Item> {
    match command {
        Command::MoveItem { from: path, .. } | Command::ResizeItem { path, .. } => {
            find_item(layout, path).into_iter().collect()
        }
        Command::MoveSection { from, .. } => find_section(layout, from)
            .map(|s| s.items.iter().collect())
            .unwrap_or_default(),
        Command::ChangeContainerDirection { path, .. } => find_item(layout, path)
            .ok()
            .and_then(Item::as_container)
            .map(|nested| nested.sections.iter().flat_map(|s| &s.items).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn apply_structure(next: &mut Snapshot, command: &Command, new_items: Vec<Item>) -> CommandResult<Placement> {
    let layout = &mut next.layout;

    let placement = match command {
        Command::AddItems { path, .. } => {
            let placed = insert_items(layout, path, new_items)?;
            Placement::new(ChangeKind::ItemsAdded, placed.clone()).placed(&placed)
        }

        Command::MoveItem { from, to } => {
            let item = take_item(layout, from)?;
            let placed = insert_items(layout, to, vec![item])?;
            let mut placement = Placement::new(ChangeKind::ItemMoved, placed.clone()).placed(&placed);
            // the source row lost a member
            if let Some(source) = from.section_path() {
                placement.scope.touch_section(source.after_item_insert(to, 1));
            }
            placement
        }

        Command::RemoveItem { path, stash_as, eager } => {
            let item = take_item(layout, path)?;
            if let Some(id) = stash_as {
                next.stash.put(id.clone(), vec![item.clone()]);
            }
            let mut placement = Placement::new(ChangeKind::ItemRemoved, vec![path.clone()]);
            if let Some(section) = path.section_path() {
                if *eager && find_section(layout, &section)?.items.is_empty() {
                    take_section(layout, &section)?;
                    placement.scope.touch_container(section.container_path());
                    placement.removed_section = Some(section);
                } else {
                    placement.scope.touch_section(section);
                }
            }
            placement.removed.push(item);
            placement
        }

        Command::ResizeItem { path, size } => {
            let item = find_item_mut(layout, path)?;
            item.size = size.clone();
            let is_container = item.is_container();

            // a resized container is checked before its ancestors
            let mut placement = Placement::new(ChangeKind::ItemResized, vec![path.clone()]);
            if is_container {
                placement.scope.touch_container(path.clone());
            }
            placement.placed(&[path.clone()])
        }

        Command::ChangeSectionHeader { path, header } => {
            find_section_mut(layout, path)?.header = Some(header.clone());
            Placement::new(ChangeKind::SectionHeaderChanged, vec![path.clone()])
        }

        Command::AddSection { path, header, .. } => {
            let section = Section {
                header: header.clone(),
                items: new_items,
            };
            insert_section(layout, path, section)?;
            section_placement(layout, ChangeKind::SectionAdded, path)?
        }

        Command::MoveSection { from, to } => {
            let section = take_section(layout, from)?;
            insert_section(layout, to, section)?;
            section_placement(layout, ChangeKind::SectionMoved, to)?
        }

        Command::RemoveSection { path, stash_as } => {
            let section = take_section(layout, path)?;
            if let Some(id) = stash_as {
                next.stash.put(id.clone(), section.items.clone());
            }
            let mut placement = Placement::new(ChangeKind::SectionRemoved, vec![path.clone()]);
            placement.removed = section.items;
            placement
        }

        Command::ReplaceItem { path, stash_as, .. } => {
            let old = take_item(layout, path)?;
            // consumed stashes are already gone, so `stash_as` may reuse one of their ids
            if let Some(id) = stash_as {
                next.stash.put(id.clone(), vec![old.clone()]);
            }
            let placed = insert_items(layout, path, new_items)?;
            let mut placement = Placement::new(ChangeKind::ItemReplaced, placed.clone()).placed(&placed);
            placement.removed.push(old);
            placement
        }

        Command::ChangeContainerDirection { path, direction } => {
            let nested = find_item_mut(layout, path)?
                .as_container_mut()
                .ok_or_else(|| CommandError::InvalidPath {
                    path: path.clone(),
                    reason: "item is not a container".to_string(),
                })?;
            nested.set_direction(*direction);

            let mut children = Vec::new();
            for (section_index, section) in nested.sections.iter().enumerate() {
                for item_index in 0..section.items.len() {
                    children.push(path.child_item(section_index, item_index)?);
                }
            }

            let mut placement = Placement::new(ChangeKind::ContainerDirectionChanged, vec![path.clone()]);
            placement.scope.touch_container(path.clone());
            placement.placed(&children)
        }
    };

    Ok(placement)
}

fn section_placement(layout: &Layout, kind: ChangeKind, path: &LayoutPath) -> CommandResult<Placement> {
    let placed = section_item_paths(layout, path)?;
    let mut placement = Placement::new(kind, vec![path.clone()]).placed(&placed);
    placement.scope.touch_section(path.clone());
    placement.scope.touch_container(path.container_path());
    Ok(placement)
}

struct IdentityAssigner<'a> {
    ids: &'a mut TempIdGenerator,
}

impl VisitorMut for IdentityAssigner<'_> {
    fn visit_widget_mut(&mut self, widget: &mut Widget, _path: &LayoutPath) {
        if !widget.identity.is_assigned() {
            widget.identity = WidgetIdentity::temporary(self.ids.new_id());
        }
    }
}

struct RefCollector<'a> {
    refs: &'a mut Vec<ContentRef>,
}

impl Visitor for RefCollector<'_> {
    fn visit_widget(&mut self, widget: &Widget, _path: &LayoutPath) {
        for content_ref in widget.kind.unresolved_refs() {
            if !self.refs.contains(content_ref) {
                self.refs.push(content_ref.clone());
            }
        }
    }
}

struct ContentSubstituter<'a> {
    resolved: &'a ResolvedContent,
}

impl VisitorMut for ContentSubstituter<'_> {
    fn visit_widget_mut(&mut self, widget: &mut Widget, _path: &LayoutPath) {
        widget.kind.substitute(self.resolved);
    }
}
