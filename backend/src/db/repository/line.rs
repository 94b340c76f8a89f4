//! Line definitions storage.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Line, LineId, NewLine};

/// Repository trait for line CRUD operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait LineRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store a new line and assign it an id.
    ///
    /// # Returns
    /// * `Ok(Line)` - The stored line
    /// * `Err(RepositoryError::Conflict)` - A line with the same name exists
    async fn insert_line(&self, line: &NewLine) -> RepositoryResult<Line>;

    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the line doesn't exist
    async fn get_line(&self, line_id: LineId) -> RepositoryResult<Line>;

    /// All lines, ordered by id.
    async fn list_lines(&self) -> RepositoryResult<Vec<Line>>;

    /// Delete a line together with all of its segments.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the line doesn't exist
    async fn delete_line(&self, line_id: LineId) -> RepositoryResult<()>;
}
