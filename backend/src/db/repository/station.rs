//! Station registry.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::Station;

#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Record stations; names already known are ignored.
    ///
    /// # Returns
    /// * `Ok(usize)` - How many stations were new
    async fn register_stations(&self, stations: &[Station]) -> RepositoryResult<usize>;

    /// Every registered station, sorted by name.
    async fn list_stations(&self) -> RepositoryResult<Vec<Station>>;
}
