//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::LineLocks;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Serializes section changes per line
    pub line_locks: LineLocks,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            line_locks: LineLocks::new(),
        }
    }
}
