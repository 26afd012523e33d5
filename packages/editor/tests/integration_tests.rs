// Integration tests for the layout engine: commands submitted through a
// spawned engine, observed through replies, events and snapshots.

use dashgrid_editor::dashgrid_layout::{
    find_item, find_widget, Breakpoint, ContentRef, Direction, DurableId, IdentityMapping, InsightContent, Item,
    ItemSize, Layout, LayoutPath, ResolvedContent, Section, SectionHeader, StashId, VisType, VisualizationDefinition,
    Widget, WidgetKind,
};
use dashgrid_editor::{
    ChangeKind, Command, CommandError, ContentResolver, DashboardDocument, EditSession, EngineConfig, EngineHandle,
    FixedScreen, InMemoryResolver, ItemDefinition, LayoutEngine, ResolveError,
};
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::Notify;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn kpi(title: &str) -> Item {
    Item::widget(
        ItemSize::from_xl(2, Some(11)),
        Widget::new(
            title,
            WidgetKind::Kpi {
                measure: "m".to_string(),
            },
        ),
    )
}

fn text(title: &str, width: u32, height: u32) -> Item {
    Item::widget(
        ItemSize::from_xl(width, Some(height)),
        Widget::new(
            title,
            WidgetKind::RichText {
                markdown: String::new(),
            },
        ),
    )
}

fn insight(reference: &str) -> Item {
    Item::widget(
        ItemSize::from_xl(6, Some(22)),
        Widget::new(
            reference,
            WidgetKind::Insight {
                insight: InsightContent::reference(reference),
            },
        ),
    )
}

fn definition(reference: &str, vis_type: VisType) -> VisualizationDefinition {
    VisualizationDefinition {
        reference: ContentRef::new(reference),
        title: reference.to_string(),
        vis_type,
    }
}

fn spawn_with(layout: Layout, resolver: Arc<dyn ContentResolver>) -> EngineHandle {
    init_tracing();
    LayoutEngine::new(
        DashboardDocument::from_layout(layout),
        &EngineConfig::default(),
        resolver,
        Arc::new(FixedScreen(Breakpoint::Xl)),
    )
    .spawn()
}

fn spawn(layout: Layout) -> EngineHandle {
    spawn_with(layout, Arc::new(InMemoryResolver::new()))
}

fn titles(layout: &Layout, section: usize) -> Vec<String> {
    layout.sections[section]
        .items
        .iter()
        .filter_map(|i| i.as_widget().map(|w| w.title.clone()))
        .collect()
}

fn height(layout: &Layout, path: &LayoutPath) -> Option<u32> {
    find_item(layout, path).unwrap().size.get(Breakpoint::Xl).grid_height
}

/// Holds every resolution until released
struct GatedResolver {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl ContentResolver for GatedResolver {
    fn resolve<'a>(&'a self, refs: &'a [ContentRef]) -> BoxFuture<'a, Result<ResolvedContent, ResolveError>> {
        Box::pin(async move {
            self.entered.notify_one();
            self.release.notified().await;
            let resolved: ResolvedContent = refs
                .iter()
                .map(|r| (r.clone(), definition(r.as_str(), VisType::Bar)))
                .collect();
            Ok(resolved)
        })
    }
}

struct FailingResolver;

impl ContentResolver for FailingResolver {
    fn resolve<'a>(&'a self, _refs: &'a [ContentRef]) -> BoxFuture<'a, Result<ResolvedContent, ResolveError>> {
        Box::pin(async { Err::<ResolvedContent, _>(ResolveError("backend unavailable".to_string())) })
    }
}

#[tokio::test]
async fn test_insert_reports_post_mutation_index() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![kpi("A"), kpi("B"), kpi("C")])]));

    let event = engine
        .submit(Command::add_items(LayoutPath::item(0, 1), [kpi("NEW").into()]))
        .await
        .unwrap();

    assert_eq!(event.kind, ChangeKind::ItemsAdded);
    assert_eq!(event.section_index, Some(0));
    assert_eq!(event.item_index, Some(1));
    assert_eq!(event.items.len(), 1);

    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(titles(&snapshot.layout, 0), vec!["A", "NEW", "B", "C"]);
}

#[tokio::test]
async fn test_added_items_occupy_consecutive_indices() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![kpi("A"), kpi("B")])]));

    let event = engine
        .submit(Command::add_items(
            LayoutPath::item(0, 1),
            [kpi("X").into(), kpi("Y").into(), kpi("Z").into()],
        ))
        .await
        .unwrap();

    let indices: Vec<_> = event.paths.iter().map(|p| p.item_index().unwrap()).collect();
    assert_eq!(indices, vec![1, 2, 3]);

    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(titles(&snapshot.layout, 0), vec!["A", "X", "Y", "Z", "B"]);
}

#[tokio::test]
async fn test_add_into_missing_section_is_rejected() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![kpi("A")])]));
    let mut events = engine.subscribe();

    let err = engine
        .submit(Command::add_items(LayoutPath::item(2, 0), [kpi("NEW").into()]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CommandError::SectionNotFound {
            path: LayoutPath::section(2)
        }
    );
    let (version, _) = engine.snapshot().await.unwrap();
    assert_eq!(version, 0);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_index_past_end_is_rejected_with_bounds() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![kpi("A"), kpi("B"), kpi("C")])]));

    let err = engine
        .submit(Command::add_items(LayoutPath::item(0, 7), [kpi("NEW").into()]))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "cannot insert at position 7: section 0 has only 3 items");
}

#[tokio::test]
async fn test_missing_stash_has_no_partial_effect() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![kpi("A"), kpi("B")])]));

    engine
        .submit(Command::RemoveItem {
            path: LayoutPath::item(0, 1),
            stash_as: Some(StashId::new("s1")),
            eager: false,
        })
        .await
        .unwrap();

    let err = engine
        .submit(Command::add_items(
            LayoutPath::item(0, 0),
            [ItemDefinition::stash("s1"), ItemDefinition::stash("s2")],
        ))
        .await
        .unwrap_err();

    assert_eq!(err, CommandError::MissingStash(vec![StashId::new("s2")]));

    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert!(snapshot.stash.contains(&StashId::new("s1")));
    assert_eq!(titles(&snapshot.layout, 0), vec!["A"]);
}

#[tokio::test]
async fn test_stash_is_consumed_once() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![kpi("A"), kpi("B")])]));

    engine
        .submit(Command::RemoveItem {
            path: LayoutPath::item(0, 0),
            stash_as: Some(StashId::new("s1")),
            eager: false,
        })
        .await
        .unwrap();

    let restore = || Command::add_items(LayoutPath::item(0, 1), [ItemDefinition::stash("s1")]);
    let event = engine.submit(restore()).await.unwrap();
    assert_eq!(event.used_stash_ids, vec![StashId::new("s1")]);

    let err = engine.submit(restore()).await.unwrap_err();
    assert_eq!(err, CommandError::MissingStash(vec![StashId::new("s1")]));

    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(titles(&snapshot.layout, 0), vec!["B", "A"]);
}

#[tokio::test]
async fn test_racing_stash_consumers_have_one_winner() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![kpi("A"), kpi("B")])]));
    engine
        .submit(Command::RemoveItem {
            path: LayoutPath::item(0, 0),
            stash_as: Some(StashId::new("s1")),
            eager: false,
        })
        .await
        .unwrap();

    let restore = || Command::add_items(LayoutPath::item(0, 0), [ItemDefinition::stash("s1")]);
    let (first, second) = tokio::join!(engine.submit(restore()), engine.submit(restore()));

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(CommandError::MissingStash(ids)) if ids == &vec![StashId::new("s1")])));
}

#[tokio::test]
async fn test_row_heights_unify_to_tallest() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![
        text("a", 4, 3),
        text("b", 4, 5),
    ])]));

    let event = engine
        .submit(Command::add_items(LayoutPath::item(0, 2), [text("c", 4, 2).into()]))
        .await
        .unwrap();

    let (_, snapshot) = engine.snapshot().await.unwrap();
    for index in 0..3 {
        assert_eq!(height(&snapshot.layout, &LayoutPath::item(0, index)), Some(5));
    }
    assert!(event.resized_paths.contains(&LayoutPath::item(0, 0)));
    assert!(event.resized_paths.contains(&LayoutPath::item(0, 2)));
    assert!(!event.resized_paths.contains(&LayoutPath::item(0, 1)));
}

#[tokio::test]
async fn test_custom_height_keeps_own_heights() {
    init_tracing();
    let mut config = EngineConfig::default();
    config.settings.custom_height_enabled = true;
    let engine = LayoutEngine::new(
        DashboardDocument::from_layout(Layout::with_sections(vec![Section::new(vec![text("a", 4, 3)])])),
        &config,
        Arc::new(InMemoryResolver::new()),
        Arc::new(FixedScreen(Breakpoint::Xl)),
    )
    .spawn();

    engine
        .submit(Command::add_items(LayoutPath::item(0, 1), [text("b", 4, 6).into()]))
        .await
        .unwrap();

    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(height(&snapshot.layout, &LayoutPath::item(0, 0)), Some(3));
    assert_eq!(height(&snapshot.layout, &LayoutPath::item(0, 1)), Some(6));
}

#[tokio::test]
async fn test_nested_growth_stops_at_roomy_ancestors() {
    // root ─ outer(h6) ─ inner(h5) ─ leaf(h4)
    //      └ sibling(h3) ─ note(h3)
    let inner = Item::container(
        ItemSize::from_xl(12, Some(5)),
        Layout::with_sections(vec![Section::new(vec![text("leaf", 12, 4)])]),
    );
    let outer = Item::container(
        ItemSize::from_xl(12, Some(6)),
        Layout::with_sections(vec![Section::new(vec![inner])]),
    );
    let sibling = Item::container(
        ItemSize::from_xl(12, Some(3)),
        Layout::with_sections(vec![Section::new(vec![text("note", 12, 3)])]),
    );
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![outer, sibling])]));

    let outer_path = LayoutPath::item(0, 0);
    let inner_path = outer_path.child_item(0, 0).unwrap();
    let leaf_path = inner_path.child_item(0, 0).unwrap();

    let event = engine
        .submit(Command::ResizeItem {
            path: leaf_path.clone(),
            size: ItemSize::from_xl(12, Some(8)),
        })
        .await
        .unwrap();
    assert_eq!(event.kind, ChangeKind::ItemResized);

    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(height(&snapshot.layout, &leaf_path), Some(8));
    assert_eq!(height(&snapshot.layout, &inner_path), Some(8));
    assert_eq!(height(&snapshot.layout, &outer_path), Some(8));
    assert_eq!(height(&snapshot.layout, &LayoutPath::item(0, 1)), Some(3));

    // shrinking the leaf never shrinks its containers
    engine
        .submit(Command::ResizeItem {
            path: leaf_path.clone(),
            size: ItemSize::from_xl(12, Some(2)),
        })
        .await
        .unwrap();
    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(height(&snapshot.layout, &inner_path), Some(8));
}

#[tokio::test]
async fn test_growth_passes_through_auto_height_container() {
    // root ─ outer(h6) ─ middle(auto) ─ leaf(h4)
    let middle = Item::container(
        ItemSize::from_xl(12, None),
        Layout::with_sections(vec![Section::new(vec![text("leaf", 12, 4)])]),
    );
    let outer = Item::container(
        ItemSize::from_xl(12, Some(6)),
        Layout::with_sections(vec![Section::new(vec![middle])]),
    );
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![outer])]));

    let outer_path = LayoutPath::item(0, 0);
    let middle_path = outer_path.child_item(0, 0).unwrap();
    let leaf_path = middle_path.child_item(0, 0).unwrap();

    engine
        .submit(Command::ResizeItem {
            path: leaf_path.clone(),
            size: ItemSize::from_xl(12, Some(9)),
        })
        .await
        .unwrap();

    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(height(&snapshot.layout, &leaf_path), Some(9));
    assert_eq!(height(&snapshot.layout, &middle_path), None);
    assert_eq!(height(&snapshot.layout, &outer_path), Some(9));
}

#[tokio::test]
async fn test_column_container_children_take_full_width() {
    let container = Item::container(
        ItemSize::from_xl(8, None),
        Layout::with_sections(vec![Section::new(vec![text("a", 3, 4), text("b", 3, 4)])]),
    );
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![container])]));

    engine
        .submit(Command::ChangeContainerDirection {
            path: LayoutPath::item(0, 0),
            direction: Direction::Column,
        })
        .await
        .unwrap();

    let (_, snapshot) = engine.snapshot().await.unwrap();
    for index in 0..2 {
        let child = LayoutPath::item(0, 0).child_item(0, index).unwrap();
        let size = find_item(&snapshot.layout, &child).unwrap().size.get(Breakpoint::Xl);
        assert_eq!(size.grid_width, 8);
    }
}

#[tokio::test]
async fn test_content_is_resolved_before_sizing() {
    let resolver = InMemoryResolver::new().with_definition(definition("table-1", VisType::Table));
    let engine = spawn_with(Layout::with_sections(vec![Section::default()]), Arc::new(resolver));

    let mut item = insight("table-1");
    item.size = ItemSize::from_xl(1, Some(10));
    let event = engine
        .submit(Command::add_items(LayoutPath::item(0, 0), [item.into()]))
        .await
        .unwrap();

    // table bounds: width >= 3, height >= 14
    let size = event.items[0].size.get(Breakpoint::Xl);
    assert_eq!(size.grid_width, 3);
    assert_eq!(size.grid_height, Some(14));
    assert_eq!(event.resized_paths, vec![LayoutPath::item(0, 0)]);
}

#[tokio::test]
async fn test_resolution_failure_aborts_command() {
    let engine = spawn_with(
        Layout::with_sections(vec![Section::new(vec![kpi("A")])]),
        Arc::new(FailingResolver),
    );

    let err = engine
        .submit(Command::add_items(LayoutPath::item(0, 0), [insight("vis-9").into()]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CommandError::ContentResolutionFailed {
            refs: vec![ContentRef::new("vis-9")],
            reason: "backend unavailable".to_string(),
        }
    );
    let (version, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(version, 0);
    assert_eq!(titles(&snapshot.layout, 0), vec!["A"]);
}

#[tokio::test]
async fn test_unknown_reference_is_a_failure() {
    let engine = spawn(Layout::with_sections(vec![Section::default()]));

    let err = engine
        .submit(Command::add_items(LayoutPath::item(0, 0), [insight("nope").into()]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CommandError::ContentResolutionFailed { ref refs, .. } if refs == &vec![ContentRef::new("nope")]
    ));
}

#[tokio::test]
async fn test_commands_queue_behind_suspended_resolution() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let engine = spawn_with(
        Layout::with_sections(vec![Section::new(vec![kpi("A")])]),
        Arc::new(GatedResolver {
            entered: entered.clone(),
            release: release.clone(),
        }),
    );
    let mut events = engine.subscribe();

    let first = tokio::spawn({
        let engine = engine.clone();
        async move {
            engine
                .submit_correlated(Command::add_items(LayoutPath::item(0, 1), [insight("v").into()]), "first")
                .await
        }
    });
    entered.notified().await;

    let second = tokio::spawn({
        let engine = engine.clone();
        async move {
            engine
                .submit_correlated(
                    Command::ChangeSectionHeader {
                        path: LayoutPath::section(0),
                        header: SectionHeader::titled("Sales"),
                    },
                    "second",
                )
                .await
        }
    });

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(!second.is_finished());

    release.notify_one();
    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    assert_eq!((first.version, second.version), (1, 2));

    let ordered: Vec<_> = [events.recv().await.unwrap(), events.recv().await.unwrap()]
        .into_iter()
        .map(|e| e.correlation_id.unwrap())
        .collect();
    assert_eq!(ordered, vec!["first", "second"]);
}

#[tokio::test]
async fn test_abandoned_caller_still_completes() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let engine = spawn_with(
        Layout::with_sections(vec![Section::default()]),
        Arc::new(GatedResolver {
            entered: entered.clone(),
            release: release.clone(),
        }),
    );
    let mut events = engine.subscribe();

    let caller = tokio::spawn({
        let engine = engine.clone();
        async move {
            engine
                .submit(Command::add_items(LayoutPath::item(0, 0), [insight("v").into()]))
                .await
        }
    });
    entered.notified().await;
    caller.abort();
    release.notify_one();

    let event = events.recv().await.unwrap();
    assert_eq!(event.kind, ChangeKind::ItemsAdded);

    let (version, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(version, 1);
    assert_eq!(snapshot.layout.item_count(), 1);
}

#[tokio::test]
async fn test_undo_redo_restore_layout_and_stash() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![kpi("A"), kpi("B")])]));
    let mut events = engine.subscribe();

    engine
        .submit(Command::RemoveItem {
            path: LayoutPath::item(0, 0),
            stash_as: Some(StashId::new("s1")),
            eager: false,
        })
        .await
        .unwrap();

    let undo = engine.undo().await.unwrap().unwrap();
    assert_eq!(undo.kind, ChangeKind::Undo);
    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(titles(&snapshot.layout, 0), vec!["A", "B"]);
    assert!(snapshot.stash.is_empty());

    let redo = engine.redo().await.unwrap().unwrap();
    assert_eq!(redo.kind, ChangeKind::Redo);
    let (version, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(version, 3);
    assert_eq!(titles(&snapshot.layout, 0), vec!["B"]);
    assert!(snapshot.stash.contains(&StashId::new("s1")));

    let kinds: Vec<_> = [
        events.recv().await.unwrap(),
        events.recv().await.unwrap(),
        events.recv().await.unwrap(),
    ]
    .into_iter()
    .map(|e| e.kind)
    .collect();
    assert_eq!(kinds, vec![ChangeKind::ItemRemoved, ChangeKind::Undo, ChangeKind::Redo]);

    assert_eq!(engine.redo().await.unwrap(), None);
}

#[tokio::test]
async fn test_batched_commands_undo_together() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![kpi("A")])]));

    engine.begin_batch(Some("fill row".to_string())).await.unwrap();
    engine
        .submit(Command::add_items(LayoutPath::item(0, 1), [kpi("B").into()]))
        .await
        .unwrap();
    engine
        .submit(Command::add_items(LayoutPath::item(0, 2), [kpi("C").into()]))
        .await
        .unwrap();
    engine.end_batch().await.unwrap();

    engine.undo().await.unwrap().unwrap();
    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(titles(&snapshot.layout, 0), vec!["A"]);
}

#[tokio::test]
async fn test_sections_move_and_remove() {
    let engine = spawn(Layout::with_sections(vec![
        Section::new(vec![kpi("A")]).with_header(SectionHeader::titled("first")),
        Section::new(vec![kpi("B")]).with_header(SectionHeader::titled("second")),
    ]));

    let event = engine
        .submit(Command::MoveSection {
            from: LayoutPath::section(0),
            to: LayoutPath::section(1),
        })
        .await
        .unwrap();
    assert_eq!(event.section_index, Some(1));

    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(titles(&snapshot.layout, 0), vec!["B"]);
    assert_eq!(titles(&snapshot.layout, 1), vec!["A"]);

    let event = engine
        .submit(Command::RemoveSection {
            path: LayoutPath::section(0),
            stash_as: Some(StashId::new("old")),
        })
        .await
        .unwrap();
    assert_eq!(event.stashed_as, Some(StashId::new("old")));

    let event = engine
        .submit(Command::AddSection {
            path: LayoutPath::section(1),
            header: Some(SectionHeader::titled("restored")),
            items: vec![ItemDefinition::stash("old")],
        })
        .await
        .unwrap();
    assert_eq!(event.kind, ChangeKind::SectionAdded);

    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.layout.sections.len(), 2);
    assert_eq!(titles(&snapshot.layout, 1), vec!["B"]);
    assert!(snapshot.stash.is_empty());
}

#[tokio::test]
async fn test_eager_remove_takes_emptied_section_along() {
    let engine = spawn(Layout::with_sections(vec![
        Section::new(vec![kpi("A")]),
        Section::new(vec![kpi("B")]),
    ]));

    let event = engine
        .submit(Command::RemoveItem {
            path: LayoutPath::item(0, 0),
            stash_as: Some(StashId::new("s1")),
            eager: true,
        })
        .await
        .unwrap();
    assert_eq!(event.kind, ChangeKind::ItemRemoved);
    assert_eq!(event.removed_section, Some(LayoutPath::section(0)));

    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.layout.sections.len(), 1);
    assert_eq!(titles(&snapshot.layout, 0), vec!["B"]);
    assert!(snapshot.stash.get(&StashId::new("s1")).is_some());

    engine.undo().await.unwrap();
    let (_, snapshot) = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.layout.sections.len(), 2);
    assert_eq!(titles(&snapshot.layout, 0), vec!["A"]);
}

#[tokio::test]
async fn test_temporary_ids_reconcile_to_durable() {
    let engine = spawn(Layout::with_sections(vec![Section::default()]));

    let event = engine
        .submit(Command::add_items(LayoutPath::item(0, 0), [kpi("A").into()]))
        .await
        .unwrap();
    let temp = event.items[0]
        .as_widget()
        .and_then(|w| w.identity.temporary.clone())
        .unwrap();

    let mut mapping = IdentityMapping::new();
    mapping.insert(temp.clone(), DurableId("w-1".to_string()));
    assert_eq!(engine.reconcile_identities(mapping).await.unwrap(), 1);

    // undo/redo brings back history recorded before reconciliation
    engine.undo().await.unwrap();
    engine.redo().await.unwrap();

    let (_, snapshot) = engine.snapshot().await.unwrap();
    let (by_temp, _) = find_widget(&snapshot.layout, &temp.0).unwrap();
    let (by_durable, widget) = find_widget(&snapshot.layout, "w-1").unwrap();
    assert_eq!(by_temp, by_durable);
    assert!(widget.identity.is_durable());
}

#[tokio::test]
async fn test_session_tracks_submissions() {
    let engine = spawn(Layout::with_sections(vec![Section::new(vec![kpi("A")])]));
    let mut session = EditSession::new("client-1");

    let event = session
        .submit(
            &engine,
            Command::ChangeSectionHeader {
                path: LayoutPath::section(0),
                header: SectionHeader::titled("KPIs"),
            },
        )
        .await
        .unwrap();
    assert_eq!(event.correlation_id.as_deref(), Some("client-1-0"));

    let rejected = session
        .submit(
            &engine,
            Command::RemoveItem {
                path: LayoutPath::item(0, 9),
                stash_as: None,
                eager: false,
            },
        )
        .await;
    assert!(rejected.is_err());
    assert_eq!(session.pending_count(), 0);
}

#[tokio::test]
async fn test_saved_document_reloads() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dashboard.json");

    let mut document = DashboardDocument::from_layout(Layout::with_sections(vec![Section::new(vec![kpi("A")])]));
    document.save_as(&path)?;

    let engine = LayoutEngine::new(
        DashboardDocument::load(&path)?,
        &EngineConfig::default(),
        Arc::new(InMemoryResolver::new()),
        Arc::new(FixedScreen(Breakpoint::Xl)),
    )
    .spawn();
    engine
        .submit(Command::add_items(LayoutPath::item(0, 1), [kpi("B").into()]))
        .await?;
    engine.save().await?;

    let reloaded = DashboardDocument::load(&path)?;
    assert_eq!(titles(reloaded.layout(), 0), vec!["A", "B"]);
    Ok(())
}

#[tokio::test]
async fn test_stopped_engine_rejects_requests() {
    let engine = spawn(Layout::new());
    engine.shutdown().await.unwrap();

    let err = engine
        .submit(Command::AddSection {
            path: LayoutPath::section(0),
            header: None,
            items: Vec::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, CommandError::EngineStopped);
}
