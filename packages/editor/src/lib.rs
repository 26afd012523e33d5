//! # Dashgrid Editor
//!
//! Command engine for editing dashboard layouts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: EditSession → EngineHandle::submit    │
//! └─────────────────────────────────────────────┘
//!                     ↓ serial queue
//! ┌─────────────────────────────────────────────┐
//! │ engine: one command at a time               │
//! │  - validate against the current snapshot    │
//! │  - resolve stashes and referenced content   │
//! │  - normalize sizes, run post-effects        │
//! │  - swap the snapshot, record undo           │
//! └─────────────────────────────────────────────┘
//!                     ↓ broadcast
//! ┌─────────────────────────────────────────────┐
//! │ subscribers: LayoutChanged events in order  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are values**: a command works on a copy and the result
//!    replaces the current snapshot in one step
//! 2. **All or nothing**: rejected commands leave no trace and emit nothing
//! 3. **Serial processing**: content resolution is the only await point, and
//!    no other command runs while one is suspended there
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dashgrid_editor::{Command, DashboardDocument, EngineConfig, LayoutEngine};
//!
//! let config = EngineConfig::load(".")?;
//! let document = DashboardDocument::load("dashboard.json")?;
//! let engine = LayoutEngine::new(document, &config, resolver, screen).spawn();
//!
//! let mut events = engine.subscribe();
//! let event = engine.submit(Command::add_items(path, items)).await?;
//! println!("placed at {:?}", event.path);
//! ```

mod commands;
mod config;
mod document;
mod edits;
mod engine;
mod errors;
mod events;
mod id_generator;
mod pipeline;
mod post_effects;
mod resolver;
mod session;
mod snapshot;
mod undo_stack;
mod validation;

pub use commands::{Command, CommandError, CommandResult, ItemDefinition};
pub use config::{EngineConfig, DEFAULT_CONFIG_NAME};
pub use document::{DashboardDocument, DocumentStorage};
pub use engine::{EngineHandle, LayoutEngine};
pub use errors::EditorError;
pub use events::{ChangeKind, LayoutChanged};
pub use id_generator::{get_seed, TempIdGenerator};
pub use pipeline::{Pipeline, Processed, Stage};
pub use post_effects::{EffectScope, PostEffect, PostEffectEngine, ResizeParentContainers, UnifyRowHeights};
pub use resolver::{ContentResolver, FixedScreen, InMemoryResolver, ResolveError, ScreenProvider};
pub use session::{EditSession, PendingCommand};
pub use snapshot::Snapshot;
pub use undo_stack::{CommandBatch, UndoStack};

// Re-export the layout model for convenience
pub use dashgrid_layout;
