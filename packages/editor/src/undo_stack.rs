//! # Undo/Redo Stack
//!
//! Tracks command history and enables undo/redo.
//!
//! ## Design
//!
//! - Each applied command records the snapshot before and after it
//! - Undo restores the `before` snapshot and moves the batch to redo
//! - Redo restores the `after` snapshot
//! - New commands clear the redo stack
//! - Several commands can be grouped into one undo step
//!
//! Snapshots hold the stash store too, so undoing a removal that stashed an
//! item also drops the stash entry.

use crate::commands::Command;
use crate::snapshot::Snapshot;

/// A group of commands undone/redone together
#[derive(Debug, Clone)]
pub struct CommandBatch {
    /// The commands in this batch (in application order)
    pub commands: Vec<Command>,

    /// Snapshot before the first command
    pub before: Snapshot,

    /// Snapshot after the last command
    pub after: Snapshot,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl CommandBatch {
    /// Create a single-command batch
    pub fn single(command: Command, before: Snapshot, after: Snapshot) -> Self {
        Self {
            commands: vec![command],
            before,
            after,
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack for layout editing
#[derive(Debug)]
pub struct UndoStack {
    /// Applied batches (most recent last)
    undo_stack: Vec<CommandBatch>,

    /// Undone batches (most recent last)
    redo_stack: Vec<CommandBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<PendingBatch>,
}

#[derive(Debug)]
struct PendingBatch {
    batch: Option<CommandBatch>,
    description: Option<String>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record an applied command
    pub fn record(&mut self, command: &Command, before: &Snapshot, after: &Snapshot) {
        match &mut self.current_batch {
            Some(pending) => match &mut pending.batch {
                Some(batch) => {
                    batch.commands.push(command.clone());
                    batch.after = after.clone();
                }
                None => {
                    let mut batch = CommandBatch::single(command.clone(), before.clone(), after.clone());
                    batch.description = pending.description.clone();
                    pending.batch = Some(batch);
                }
            },
            None => self.push_batch(CommandBatch::single(command.clone(), before.clone(), after.clone())),
        }
    }

    /// Start a batch of commands (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(PendingBatch {
            batch: None,
            description: None,
        });
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(PendingBatch { batch: Some(batch), .. }) = self.current_batch.take() {
            self.push_batch(batch);
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(pending) = &mut self.current_batch {
            let description = description.into();
            if let Some(batch) = &mut pending.batch {
                batch.description = Some(description.clone());
            }
            pending.description = Some(description);
        }
    }

    /// Push a batch to the undo stack
    fn push_batch(&mut self, batch: CommandBatch) {
        self.undo_stack.push(batch);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Undo the most recent batch, returning the snapshot to restore
    pub fn undo(&mut self) -> Option<Snapshot> {
        // an open batch is closed first so it can be undone as a unit
        self.end_batch();
        let batch = self.undo_stack.pop()?;
        let restore = batch.before.clone();
        self.redo_stack.push(batch);
        Some(restore)
    }

    /// Redo the most recently undone batch, returning the snapshot to restore
    pub fn redo(&mut self) -> Option<Snapshot> {
        let batch = self.redo_stack.pop()?;
        let restore = batch.after.clone();
        self.undo_stack.push(batch);
        Some(restore)
    }

    /// Rewrite every recorded snapshot, e.g. to carry identity updates
    pub fn update_snapshots(&mut self, mut f: impl FnMut(&mut Snapshot)) {
        let pending = self
            .current_batch
            .as_mut()
            .and_then(|p| p.batch.as_mut())
            .into_iter();
        for batch in self.undo_stack.iter_mut().chain(self.redo_stack.iter_mut()).chain(pending) {
            f(&mut batch.before);
            f(&mut batch.after);
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.current_batch.as_ref().is_some_and(|p| p.batch.is_some())
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
