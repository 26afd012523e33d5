//! Error types for layout lookups and the stash store

use crate::path::LayoutPath;
use crate::stash::StashId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("section {path} does not exist")]
    SectionNotFound { path: LayoutPath },

    #[error("item {path} does not exist")]
    ItemNotFound { path: LayoutPath },

    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: LayoutPath, reason: String },

    #[error("stash '{0}' does not exist")]
    StashNotFound(StashId),

    #[error("malformed persisted layout: {0}")]
    Malformed(String),

    #[error("unsupported persisted layout version {found} (newest known is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl LayoutError {
    pub(crate) fn invalid_path(path: &LayoutPath, reason: impl Into<String>) -> Self {
        LayoutError::InvalidPath {
            path: path.clone(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::Malformed(e.to_string())
    }
}

/// Result alias for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
