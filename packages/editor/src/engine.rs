//! # Layout Engine
//!
//! Owns the dashboard document and is the only place that mutates it.
//!
//! ```text
//! EngineHandle ──mpsc──→ run loop ──→ Pipeline ──→ document.replace
//!      ↑                    │                            │
//!      └──── oneshot ───────┘        broadcast ←─────────┘
//! ```
//!
//! Requests are processed one at a time in arrival order, so a command always
//! observes the effects of every command accepted before it. A caller that
//! drops its reply receiver does not cancel the command; the engine finishes
//! it and the reply is discarded.

use crate::commands::{Command, CommandError, CommandResult};
use crate::config::EngineConfig;
use crate::document::DashboardDocument;
use crate::events::{ChangeKind, LayoutChanged};
use crate::id_generator::TempIdGenerator;
use crate::pipeline::{Pipeline, Processed, Stage};
use crate::resolver::{ContentResolver, ScreenProvider};
use crate::snapshot::Snapshot;
use crate::undo_stack::UndoStack;
use crate::EditorError;
use dashgrid_layout::{reconcile_identities, reconcile_item_identities, IdentityMapping};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::Instrument;

const EVENT_CAPACITY: usize = 256;

enum Request {
    Command {
        command: Command,
        correlation_id: Option<String>,
        reply: oneshot::Sender<CommandResult<LayoutChanged>>,
    },
    Undo {
        reply: oneshot::Sender<Option<LayoutChanged>>,
    },
    Redo {
        reply: oneshot::Sender<Option<LayoutChanged>>,
    },
    BeginBatch {
        description: Option<String>,
        reply: oneshot::Sender<()>,
    },
    EndBatch {
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<(u64, Snapshot)>,
    },
    ReconcileIdentities {
        mapping: IdentityMapping,
        reply: oneshot::Sender<usize>,
    },
    Save {
        reply: oneshot::Sender<Result<(), EditorError>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

pub struct LayoutEngine {
    document: DashboardDocument,
    pipeline: Pipeline,
    undo: UndoStack,
    events: broadcast::Sender<LayoutChanged>,
    identities: IdentityMapping,
    queue_capacity: usize,
}

impl LayoutEngine {
    pub fn new(
        document: DashboardDocument,
        config: &EngineConfig,
        resolver: Arc<dyn ContentResolver>,
        screen: Arc<dyn ScreenProvider>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let pipeline = Pipeline::new(
            Arc::new(config.settings.clone()),
            resolver,
            screen,
            TempIdGenerator::new(&config.id_seed),
        );

        Self {
            document,
            pipeline,
            undo: UndoStack::with_max_levels(config.undo_levels),
            events,
            identities: IdentityMapping::new(),
            queue_capacity: config.queue_capacity.max(1),
        }
    }

    pub fn document(&self) -> &DashboardDocument {
        &self.document
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LayoutChanged> {
        self.events.subscribe()
    }

    /// Run one command to completion and publish its event
    pub async fn execute(&mut self, command: Command, correlation_id: Option<String>) -> CommandResult<LayoutChanged> {
        let span = tracing::info_span!(
            "command",
            kind = command.name(),
            correlation_id = correlation_id.as_deref().unwrap_or_default()
        );

        async {
            let processed = match self.pipeline.process(self.document.snapshot(), &command).await {
                Ok(processed) => processed,
                Err(e) => {
                    tracing::warn!("[Pipeline] {} {}: {}", command.name(), Stage::Rejected, e);
                    return Err(e);
                }
            };

            let Processed { snapshot, mut event } = processed;
            let before = self.document.snapshot().clone();
            event.version = self.document.replace(snapshot);
            event.correlation_id = correlation_id;
            self.undo.record(&command, &before, self.document.snapshot());
            tracing::info!(
                "[Pipeline] {} {} at {} (version {})",
                command.name(),
                Stage::Applied,
                command.target(),
                event.version
            );

            self.publish(event.clone());
            Ok(event)
        }
        .instrument(span)
        .await
    }

    pub fn undo(&mut self) -> Option<LayoutChanged> {
        let snapshot = self.undo.undo()?;
        Some(self.restore(ChangeKind::Undo, snapshot))
    }

    pub fn redo(&mut self) -> Option<LayoutChanged> {
        let snapshot = self.undo.redo()?;
        Some(self.restore(ChangeKind::Redo, snapshot))
    }

    pub fn begin_batch(&mut self, description: Option<String>) {
        self.undo.begin_batch();
        if let Some(description) = description {
            self.undo.set_batch_description(description);
        }
    }

    pub fn end_batch(&mut self) {
        self.undo.end_batch();
    }

    /// Attach durable ids to temporary widget ids everywhere the engine
    /// keeps widgets: the live snapshot, its stash and the undo history
    pub fn reconcile_identities(&mut self, mapping: IdentityMapping) -> usize {
        let updated = reconcile_snapshot(self.document.snapshot_mut(), &mapping);
        self.undo.update_snapshots(|snapshot| {
            reconcile_snapshot(snapshot, &mapping);
        });
        self.identities.extend(mapping);

        tracing::info!("[Engine] reconciled {} widget identities", updated);
        updated
    }

    pub fn save(&mut self) -> Result<(), EditorError> {
        self.document.save()
    }

    fn restore(&mut self, kind: ChangeKind, mut snapshot: Snapshot) -> LayoutChanged {
        // history may predate the latest reconciliation
        reconcile_snapshot(&mut snapshot, &self.identities);

        let mut event = LayoutChanged::new(kind, Vec::new());
        event.version = self.document.replace(snapshot);
        tracing::info!("[Engine] {:?} to version {}", kind, event.version);

        self.publish(event.clone());
        event
    }

    fn publish(&self, event: LayoutChanged) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Move the engine onto a tokio task and return a handle to it
    pub fn spawn(self) -> EngineHandle {
        let (requests, queue) = mpsc::channel(self.queue_capacity);
        let events = self.events.clone();
        tokio::spawn(self.run(queue));
        EngineHandle { requests, events }
    }

    async fn run(mut self, mut queue: mpsc::Receiver<Request>) {
        tracing::info!("[Engine] started at version {}", self.document.version);

        while let Some(request) = queue.recv().await {
            match request {
                Request::Command {
                    command,
                    correlation_id,
                    reply,
                } => {
                    let result = self.execute(command, correlation_id).await;
                    let _ = reply.send(result);
                }
                Request::Undo { reply } => {
                    let _ = reply.send(self.undo());
                }
                Request::Redo { reply } => {
                    let _ = reply.send(self.redo());
                }
                Request::BeginBatch { description, reply } => {
                    self.begin_batch(description);
                    let _ = reply.send(());
                }
                Request::EndBatch { reply } => {
                    self.end_batch();
                    let _ = reply.send(());
                }
                Request::Snapshot { reply } => {
                    let _ = reply.send((self.document.version, self.document.snapshot().clone()));
                }
                Request::ReconcileIdentities { mapping, reply } => {
                    let _ = reply.send(self.reconcile_identities(mapping));
                }
                Request::Save { reply } => {
                    let _ = reply.send(self.save());
                }
                Request::Shutdown { reply } => {
                    // queued requests are dropped and their callers see EngineStopped
                    queue.close();
                    let _ = reply.send(());
                    break;
                }
            }
        }

        tracing::info!("[Engine] stopped at version {}", self.document.version);
    }
}

fn reconcile_snapshot(snapshot: &mut Snapshot, mapping: &IdentityMapping) -> usize {
    let mut updated = reconcile_identities(&mut snapshot.layout, mapping);
    for item in snapshot.stash.items_mut() {
        updated += reconcile_item_identities(item, mapping);
    }
    updated
}

/// Cloneable entry point to a spawned engine
#[derive(Clone)]
pub struct EngineHandle {
    requests: mpsc::Sender<Request>,
    events: broadcast::Sender<LayoutChanged>,
}

impl EngineHandle {
    pub async fn submit(&self, command: Command) -> CommandResult<LayoutChanged> {
        self.dispatch(command, None).await
    }

    /// Submit with an id that is echoed back on the event
    pub async fn submit_correlated(
        &self,
        command: Command,
        correlation_id: impl Into<String>,
    ) -> CommandResult<LayoutChanged> {
        self.dispatch(command, Some(correlation_id.into())).await
    }

    async fn dispatch(&self, command: Command, correlation_id: Option<String>) -> CommandResult<LayoutChanged> {
        self.request(|reply| Request::Command {
            command,
            correlation_id,
            reply,
        })
        .await?
    }

    /// Events of every applied command, undo and redo, in order
    pub fn subscribe(&self) -> broadcast::Receiver<LayoutChanged> {
        self.events.subscribe()
    }

    pub async fn undo(&self) -> CommandResult<Option<LayoutChanged>> {
        self.request(|reply| Request::Undo { reply }).await
    }

    pub async fn redo(&self) -> CommandResult<Option<LayoutChanged>> {
        self.request(|reply| Request::Redo { reply }).await
    }

    pub async fn begin_batch(&self, description: Option<String>) -> CommandResult<()> {
        self.request(|reply| Request::BeginBatch { description, reply }).await
    }

    pub async fn end_batch(&self) -> CommandResult<()> {
        self.request(|reply| Request::EndBatch { reply }).await
    }

    /// Document version and a copy of the current snapshot
    pub async fn snapshot(&self) -> CommandResult<(u64, Snapshot)> {
        self.request(|reply| Request::Snapshot { reply }).await
    }

    pub async fn reconcile_identities(&self, mapping: IdentityMapping) -> CommandResult<usize> {
        self.request(|reply| Request::ReconcileIdentities { mapping, reply }).await
    }

    pub async fn save(&self) -> Result<(), EditorError> {
        self.request(|reply| Request::Save { reply }).await?
    }

    /// Stop the engine after the requests ahead of this one
    pub async fn shutdown(&self) -> CommandResult<()> {
        self.request(|reply| Request::Shutdown { reply }).await
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Request) -> CommandResult<T> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(make(reply))
            .await
            .map_err(|_| CommandError::EngineStopped)?;
        response.await.map_err(|_| CommandError::EngineStopped)
    }
}
