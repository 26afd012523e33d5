//! Error types for the editor

use crate::commands::CommandError;
use dashgrid_layout::LayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Command rejected: {0}")]
    Command(#[from] CommandError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document is not file-backed")]
    NotFileBacked,
}
