//! # Edit Session
//!
//! Host-side state for one editing client: which section and item the user
//! is working on, and which submitted commands are still waiting for an
//! answer from the engine.
//!
//! Selection is stored by serialized path so it survives snapshot swaps.

use crate::commands::{Command, CommandResult};
use crate::engine::EngineHandle;
use crate::events::{ChangeKind, LayoutChanged};
use dashgrid_layout::LayoutPath;
use std::time::{SystemTime, UNIX_EPOCH};

/// Single edit session
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    active_section: Option<String>,
    active_item: Option<String>,

    /// Commands submitted but not yet answered
    pub pending_commands: Vec<PendingCommand>,

    next_sequence: u64,
}

/// Command waiting for the engine's reply
#[derive(Debug, Clone)]
pub struct PendingCommand {
    pub correlation_id: String,
    pub command: Command,

    /// When it was submitted
    pub timestamp: u64,
}

impl EditSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active_section: None,
            active_item: None,
            pending_commands: Vec::new(),
            next_sequence: 0,
        }
    }

    pub fn set_active_section(&mut self, path: &LayoutPath) {
        self.active_section = Some(path.serialize());
    }

    pub fn active_section(&self) -> Option<LayoutPath> {
        self.active_section.as_deref().and_then(|key| key.parse().ok())
    }

    pub fn is_active_section(&self, path: &LayoutPath) -> bool {
        self.active_section.as_deref() == Some(path.serialize().as_str())
    }

    pub fn set_active_item(&mut self, path: &LayoutPath) {
        self.active_item = Some(path.serialize());
    }

    pub fn active_item(&self) -> Option<LayoutPath> {
        self.active_item.as_deref().and_then(|key| key.parse().ok())
    }

    pub fn clear_selection(&mut self) {
        self.active_section = None;
        self.active_item = None;
    }

    /// Remember a command about to be submitted; returns its correlation id
    pub fn track(&mut self, command: Command) -> String {
        let correlation_id = format!("{}-{}", self.id, self.next_sequence);
        self.next_sequence += 1;

        self.pending_commands.push(PendingCommand {
            correlation_id: correlation_id.clone(),
            command,
            timestamp: current_timestamp(),
        });
        correlation_id
    }

    /// The engine applied the command
    pub fn confirm(&mut self, correlation_id: &str) {
        self.pending_commands.retain(|c| c.correlation_id != correlation_id);
    }

    /// The engine rejected the command
    pub fn reject(&mut self, correlation_id: &str) {
        self.pending_commands.retain(|c| c.correlation_id != correlation_id);
    }

    /// Follow an engine event: settle our own commands and drop selection
    /// that no longer points anywhere meaningful
    pub fn on_event(&mut self, event: &LayoutChanged) {
        if let Some(correlation_id) = &event.correlation_id {
            self.confirm(correlation_id);
        }

        match event.kind {
            ChangeKind::SectionRemoved | ChangeKind::SectionMoved | ChangeKind::Undo | ChangeKind::Redo => {
                self.clear_selection();
            }
            ChangeKind::ItemRemoved | ChangeKind::ItemMoved | ChangeKind::ItemReplaced => {
                self.active_item = None;
            }
            _ => {}
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending_commands.len()
    }

    /// Submit through the engine and settle the pending entry with the reply
    pub async fn submit(&mut self, engine: &EngineHandle, command: Command) -> CommandResult<LayoutChanged> {
        let correlation_id = self.track(command.clone());
        let result = engine.submit_correlated(command, correlation_id.clone()).await;

        match &result {
            Ok(_) => self.confirm(&correlation_id),
            Err(e) => {
                tracing::debug!("[Session] {} rejected: {}", correlation_id, e);
                self.reject(&correlation_id);
            }
        }
        result
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
