//! # External Collaborators
//!
//! Contracts the pipeline consumes from the host: fetching referenced
//! content and reporting the active breakpoint. Implementations live in the
//! host; the in-memory versions here back tests and offline editing.

use dashgrid_layout::{Breakpoint, ContentRef, ResolvedContent, VisualizationDefinition};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Failure reported by a content resolver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ResolveError(pub String);

/// Fetches definitions for content references.
///
/// References missing from the returned map are treated as failures by the
/// pipeline.
pub trait ContentResolver: Send + Sync {
    fn resolve<'a>(&'a self, refs: &'a [ContentRef]) -> BoxFuture<'a, Result<ResolvedContent, ResolveError>>;
}

/// Resolver backed by a fixed set of definitions
#[derive(Debug, Default)]
pub struct InMemoryResolver {
    definitions: ResolvedContent,
    requests: AtomicUsize,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definition(mut self, definition: VisualizationDefinition) -> Self {
        self.definitions.insert(definition.reference.clone(), definition);
        self
    }

    /// Number of resolve calls served so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl ContentResolver for InMemoryResolver {
    fn resolve<'a>(&'a self, refs: &'a [ContentRef]) -> BoxFuture<'a, Result<ResolvedContent, ResolveError>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let found: ResolvedContent = refs
            .iter()
            .filter_map(|r| self.definitions.get(r).map(|d| (r.clone(), d.clone())))
            .collect();
        Box::pin(async move { Ok(found) })
    }
}

/// Reports the breakpoint sizes are normalized for interactively
pub trait ScreenProvider: Send + Sync {
    fn breakpoint(&self) -> Breakpoint;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedScreen(pub Breakpoint);

impl ScreenProvider for FixedScreen {
    fn breakpoint(&self) -> Breakpoint {
        self.0
    }
}
