//! High-level service layer.
//!
//! Repository-agnostic operations that work with any [`FullRepository`].
//! Every mutation of a line's segments follows the same shape:
//!
//! ```text
//! lock line ──► load segments ──► Chain::insert / Chain::remove
//!                                        │
//!                     persist diff ◄─────┘  (removed, added)
//!                          │
//!                          ▼
//!                  ordered stations
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use subway_backend::db::{repositories::LocalRepository, services};
//! use subway_backend::models::Station;
//! use subway_backend::services::LineLocks;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let locks = LineLocks::new();
//!
//!     let line = services::create_line(&repo, "Green", "green").await?;
//!     let view = services::register_section(
//!         &repo,
//!         &locks,
//!         line.id,
//!         Station::from("Gangnam"),
//!         Station::from("Yeoksam"),
//!         10,
//!     )
//!     .await?;
//!     println!("{} stations", view.stations.len());
//!     Ok(())
//! }
//! ```

use log::{debug, info, warn};

use super::repository::{FullRepository, RepositoryError};
use crate::chain::{Chain, ChainError, ChainUpdate};
use crate::models::{Line, LineId, LineStations, LineValidationError, NewLine, Station};
use crate::services::LineLocks;

/// Errors surfaced by service functions.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Validation(#[from] LineValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Chain(e) => e.code(),
            ServiceError::Validation(_) => "INVALID_LINE",
            ServiceError::Repository(e) => match e {
                RepositoryError::NotFound { .. } => "NOT_FOUND",
                RepositoryError::Conflict { .. } => "CONFLICT",
                RepositoryError::ValidationError { .. } => "VALIDATION_ERROR",
                RepositoryError::ConnectionError { .. } => "CONNECTION_ERROR",
                RepositoryError::ConfigurationError { .. } => "CONFIGURATION_ERROR",
                RepositoryError::StorageError { .. } => "STORAGE_ERROR",
                RepositoryError::InternalError { .. } => "INTERNAL_ERROR",
            },
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// ==================== Health ====================

/// Check if the backing store is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<bool> {
    Ok(repo.health_check().await?)
}

// ==================== Lines ====================

/// Validate and store a new, empty line.
///
/// # Returns
/// * `Err(ServiceError::Validation)` - Name length or color rules violated
/// * `Err(ServiceError::Repository(Conflict))` - A line with this name exists
pub async fn create_line<R: FullRepository + ?Sized>(
    repo: &R,
    name: &str,
    color: &str,
) -> ServiceResult<Line> {
    let new_line = NewLine::new(name, color).inspect_err(|e| {
        warn!("Rejected line '{}': {}", name, e);
    })?;

    let line = repo.insert_line(&new_line).await?;
    info!("Created line {} '{}' ({})", line.id, line.name, line.color);
    Ok(line)
}

pub async fn list_lines<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<Vec<Line>> {
    Ok(repo.list_lines().await?)
}

pub async fn get_line<R: FullRepository + ?Sized>(repo: &R, line_id: LineId) -> ServiceResult<Line> {
    Ok(repo.get_line(line_id).await?)
}

/// Delete a line and all of its segments.
///
/// Waits for any in-flight section change on the same line to finish first.
pub async fn delete_line<R: FullRepository + ?Sized>(
    repo: &R,
    locks: &LineLocks,
    line_id: LineId,
) -> ServiceResult<()> {
    let _guard = locks.lock(line_id).await;

    repo.delete_line(line_id).await?;
    locks.forget(line_id);
    info!("Deleted line {}", line_id);
    Ok(())
}

// ==================== Sections ====================

/// Add the segment `source -> target` to a line.
///
/// Exactly one of the two stations must already be on the line (unless the
/// line is empty). When the new segment lands inside an existing one, that
/// segment is split and its distance must be strictly larger than
/// `distance`.
///
/// # Returns
/// The line with its stations in travel order after the change.
pub async fn register_section<R: FullRepository + ?Sized>(
    repo: &R,
    locks: &LineLocks,
    line_id: LineId,
    source: Station,
    target: Station,
    distance: u32,
) -> ServiceResult<LineStations> {
    let _guard = locks.lock(line_id).await;

    let line = repo.get_line(line_id).await?;
    let chain = load_chain(repo, line_id).await?;

    let update = chain
        .insert(source.clone(), target.clone(), distance)
        .inspect_err(|e| {
            warn!(
                "Line {}: rejected section {} -> {} ({}): {}",
                line_id, source, target, distance, e
            );
        })?;

    let view = commit(repo, line, update).await?;

    let registered = repo.register_stations(&[source.clone(), target.clone()]).await?;
    if registered > 0 {
        debug!("Registered {} new station(s)", registered);
    }
    info!(
        "Line {}: added section {} -> {} ({}), now {} stations",
        line_id,
        source,
        target,
        distance,
        view.stations.len()
    );
    Ok(view)
}

/// Remove `station` from a line, merging its neighbouring segments when it
/// sits in the middle.
///
/// # Returns
/// The line with its stations in travel order after the change. Removing
/// the last segment leaves the line empty.
pub async fn delete_station<R: FullRepository + ?Sized>(
    repo: &R,
    locks: &LineLocks,
    line_id: LineId,
    station: &Station,
) -> ServiceResult<LineStations> {
    let _guard = locks.lock(line_id).await;

    let line = repo.get_line(line_id).await?;
    let chain = load_chain(repo, line_id).await?;

    let update = chain.remove(station).inspect_err(|e| {
        warn!("Line {}: could not remove station {}: {}", line_id, station, e);
    })?;

    let view = commit(repo, line, update).await?;
    info!(
        "Line {}: removed station {}, now {} stations",
        line_id,
        station,
        view.stations.len()
    );
    Ok(view)
}

// ==================== Queries ====================

/// A line with its stations in travel order.
pub async fn get_line_stations<R: FullRepository + ?Sized>(
    repo: &R,
    line_id: LineId,
) -> ServiceResult<LineStations> {
    let line = repo.get_line(line_id).await?;
    let chain = load_chain(repo, line_id).await?;
    view_of(line, &chain)
}

/// Every line with its stations in travel order, ordered by line id.
pub async fn list_line_stations<R: FullRepository + ?Sized>(
    repo: &R,
) -> ServiceResult<Vec<LineStations>> {
    let lines = repo.list_lines().await?;

    let views = lines.into_iter().map(|line| async move {
        let chain = load_chain(repo, line.id).await?;
        view_of(line, &chain)
    });

    futures::future::try_join_all(views).await
}

/// Every station seen on any line, sorted by name.
pub async fn list_stations<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<Vec<Station>> {
    Ok(repo.list_stations().await?)
}

// ==================== Helpers ====================

async fn load_chain<R: FullRepository + ?Sized>(repo: &R, line_id: LineId) -> ServiceResult<Chain> {
    let segments = repo.sections_for_line(line_id).await?;
    Ok(Chain::validated(segments)?)
}

async fn commit<R: FullRepository + ?Sized>(
    repo: &R,
    line: Line,
    update: ChainUpdate,
) -> ServiceResult<LineStations> {
    debug!(
        "Line {}: persisting diff (-{} +{})",
        line.id,
        update.removed.len(),
        update.added.len()
    );
    repo.apply_section_diff(line.id, &update.removed, &update.added)
        .await?;
    view_of(line, &update.chain)
}

fn view_of(line: Line, chain: &Chain) -> ServiceResult<LineStations> {
    Ok(LineStations {
        line,
        stations: chain.ordered_stations()?,
        total_distance: chain.total_distance(),
    })
}
