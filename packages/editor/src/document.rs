//! # Dashboard Document
//!
//! Owns the current snapshot of one dashboard layout. Documents can be:
//! - **Memory-backed**: temporary, for tests or unsaved dashboards
//! - **File-backed**: loaded from and saved to the persisted JSON form
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Save
//!   ↓      ↓      ↓
//! File  Snapshot File
//! ```
//!
//! Only the layout is persisted. Stash entries live for the editing session.

use crate::snapshot::Snapshot;
use crate::EditorError;
use dashgrid_layout::{Layout, PersistedLayout};
use std::path::{Path, PathBuf};

/// Editable dashboard layout
#[derive(Debug)]
pub struct DashboardDocument {
    /// Current version number (increments on each applied change)
    pub version: u64,

    /// Current layout and stash
    snapshot: Snapshot,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStorage {
    /// In-memory only
    Memory,

    /// File-backed
    File { path: PathBuf, dirty: bool },
}

impl DashboardDocument {
    /// Create a memory-backed document
    pub fn from_layout(layout: Layout) -> Self {
        Self {
            version: 0,
            snapshot: Snapshot::new(layout),
            storage: DocumentStorage::Memory,
        }
    }

    /// Load a document from its persisted JSON form (file-backed)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref().to_path_buf();
        let source = std::fs::read_to_string(&path)?;
        let layout = PersistedLayout::from_json(&source)?.into_layout();

        tracing::info!("[Document] loaded {} ({} items)", path.display(), layout.item_count());

        Ok(Self {
            version: 0,
            snapshot: Snapshot::new(layout),
            storage: DocumentStorage::File { path, dirty: false },
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn layout(&self) -> &Layout {
        &self.snapshot.layout
    }

    pub fn storage(&self) -> &DocumentStorage {
        &self.storage
    }

    /// Swap in a new snapshot as one step; returns the new version
    pub fn replace(&mut self, snapshot: Snapshot) -> u64 {
        self.snapshot = snapshot;
        self.version += 1;

        if let DocumentStorage::File { dirty, .. } = &mut self.storage {
            *dirty = true;
        }
        self.version
    }

    /// Edit the snapshot in place without counting a new version
    pub(crate) fn snapshot_mut(&mut self) -> &mut Snapshot {
        if let DocumentStorage::File { dirty, .. } = &mut self.storage {
            *dirty = true;
        }
        &mut self.snapshot
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            DocumentStorage::Memory => false,
        }
    }

    pub fn to_persisted(&self) -> PersistedLayout {
        PersistedLayout::new(self.snapshot.layout.clone())
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let json = self.to_persisted().to_json_pretty()?;
        match &mut self.storage {
            DocumentStorage::File { path, dirty } => {
                std::fs::write(path.as_path(), json)?;
                *dirty = false;
                tracing::info!("[Document] saved {} at version {}", path.display(), self.version);
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }

    /// Attach a file path so a memory document can be saved
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), EditorError> {
        self.storage = DocumentStorage::File {
            path: path.into(),
            dirty: true,
        };
        self.save()
    }
}
