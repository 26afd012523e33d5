use crate::identity::IdentityMapping;
use crate::layout::{Item, ItemContent, Layout, Section, Widget};
use crate::path::{find_item, LayoutPath, PathStep};

/// Visitor for walking a layout tree immutably
///
/// Every callback receives the path of the node it is handed: the container
/// path for layouts, a section path for sections and an item path for items
/// and widgets. Override specific visit_* methods; the defaults walk the
/// whole tree.
pub trait Visitor: Sized {
    fn visit_layout(&mut self, layout: &Layout, path: &LayoutPath) {
        walk_layout(self, layout, path);
    }

    fn visit_section(&mut self, section: &Section, path: &LayoutPath) {
        walk_section(self, section, path);
    }

    fn visit_item(&mut self, item: &Item, path: &LayoutPath) {
        walk_item(self, item, path);
    }

    fn visit_widget(&mut self, _widget: &Widget, _path: &LayoutPath) {
        // Leaf node, no children to walk
    }
}

/// Mutable visitor for rewriting a layout tree in place
pub trait VisitorMut: Sized {
    fn visit_layout_mut(&mut self, layout: &mut Layout, path: &LayoutPath) {
        walk_layout_mut(self, layout, path);
    }

    fn visit_section_mut(&mut self, section: &mut Section, path: &LayoutPath) {
        walk_section_mut(self, section, path);
    }

    fn visit_item_mut(&mut self, item: &mut Item, path: &LayoutPath) {
        walk_item_mut(self, item, path);
    }

    fn visit_widget_mut(&mut self, _widget: &mut Widget, _path: &LayoutPath) {
        // Leaf node, no children to walk
    }
}

fn item_path(section_path: &LayoutPath, item_index: usize) -> LayoutPath {
    let container = section_path.container_path();
    let section_index = section_path.last().map(|s| s.section_index).unwrap_or_default();
    container.push_unchecked(PathStep::item(section_index, item_index))
}

// Default walk implementations for immutable visitor

pub fn walk_layout<V: Visitor>(visitor: &mut V, layout: &Layout, path: &LayoutPath) {
    for (index, section) in layout.sections.iter().enumerate() {
        visitor.visit_section(section, &path.push_unchecked(PathStep::section(index)));
    }
}

pub fn walk_section<V: Visitor>(visitor: &mut V, section: &Section, path: &LayoutPath) {
    for (index, item) in section.items.iter().enumerate() {
        visitor.visit_item(item, &item_path(path, index));
    }
}

pub fn walk_item<V: Visitor>(visitor: &mut V, item: &Item, path: &LayoutPath) {
    match &item.content {
        ItemContent::Widget(widget) => visitor.visit_widget(widget, path),
        ItemContent::Container(layout) => visitor.visit_layout(layout, path),
    }
}

// Default walk implementations for mutable visitor

pub fn walk_layout_mut<V: VisitorMut>(visitor: &mut V, layout: &mut Layout, path: &LayoutPath) {
    for (index, section) in layout.sections.iter_mut().enumerate() {
        visitor.visit_section_mut(section, &path.push_unchecked(PathStep::section(index)));
    }
}

pub fn walk_section_mut<V: VisitorMut>(visitor: &mut V, section: &mut Section, path: &LayoutPath) {
    for (index, item) in section.items.iter_mut().enumerate() {
        visitor.visit_item_mut(item, &item_path(path, index));
    }
}

pub fn walk_item_mut<V: VisitorMut>(visitor: &mut V, item: &mut Item, path: &LayoutPath) {
    match &mut item.content {
        ItemContent::Widget(widget) => visitor.visit_widget_mut(widget, path),
        ItemContent::Container(layout) => visitor.visit_layout_mut(layout, path),
    }
}

struct ItemPaths(Vec<LayoutPath>);

impl Visitor for ItemPaths {
    fn visit_item(&mut self, item: &Item, path: &LayoutPath) {
        self.0.push(path.clone());
        walk_item(self, item, path);
    }
}

/// Paths of every item in the tree, depth first in document order
pub fn all_item_paths(layout: &Layout) -> Vec<LayoutPath> {
    let mut collector = ItemPaths(Vec::new());
    collector.visit_layout(layout, &LayoutPath::root());
    collector.0
}

struct WidgetFinder<'a> {
    id: &'a str,
    found: Option<LayoutPath>,
}

impl Visitor for WidgetFinder<'_> {
    fn visit_item(&mut self, item: &Item, path: &LayoutPath) {
        if self.found.is_none() {
            walk_item(self, item, path);
        }
    }

    fn visit_widget(&mut self, widget: &Widget, path: &LayoutPath) {
        if widget.identity.matches(self.id) {
            self.found = Some(path.clone());
        }
    }
}

/// Locate a widget by its temporary or durable id
pub fn find_widget<'a>(layout: &'a Layout, id: &str) -> Option<(LayoutPath, &'a Widget)> {
    let mut finder = WidgetFinder { id, found: None };
    finder.visit_layout(layout, &LayoutPath::root());
    let path = finder.found?;
    let widget = find_item(layout, &path).ok()?.as_widget()?;
    Some((path, widget))
}

struct IdentityReconciler<'a> {
    mapping: &'a IdentityMapping,
    updated: usize,
}

impl VisitorMut for IdentityReconciler<'_> {
    fn visit_widget_mut(&mut self, widget: &mut Widget, _path: &LayoutPath) {
        if widget.identity.reconcile(self.mapping) {
            self.updated += 1;
        }
    }
}

/// Attach durable ids to every widget whose temporary id is mapped.
/// Returns the number of widgets updated.
pub fn reconcile_identities(layout: &mut Layout, mapping: &IdentityMapping) -> usize {
    let mut reconciler = IdentityReconciler { mapping, updated: 0 };
    reconciler.visit_layout_mut(layout, &LayoutPath::root());
    reconciler.updated
}

/// Same as [`reconcile_identities`] for an item outside any layout
pub fn reconcile_item_identities(item: &mut Item, mapping: &IdentityMapping) -> usize {
    let mut reconciler = IdentityReconciler { mapping, updated: 0 };
    reconciler.visit_item_mut(item, &LayoutPath::root());
    reconciler.updated
}
