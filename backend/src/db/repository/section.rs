//! Per-line segment storage.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{LineId, Segment};

/// Repository trait for the segments ("sections") of each line.
#[async_trait]
pub trait SectionRepository: Send + Sync {
    /// Snapshot of every segment stored for the line, in storage order.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the line doesn't exist
    async fn sections_for_line(&self, line_id: LineId) -> RepositoryResult<Vec<Segment>>;

    /// Delete `removed` and insert `added` as one atomic write.
    ///
    /// Each removed segment must match a stored segment exactly; otherwise the
    /// whole diff is rejected and storage is left unchanged.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the line doesn't exist
    /// * `Err(RepositoryError::Conflict)` - If a removed segment is not stored
    async fn apply_section_diff(
        &self,
        line_id: LineId,
        removed: &[Segment],
        added: &[Segment],
    ) -> RepositoryResult<()>;
}
