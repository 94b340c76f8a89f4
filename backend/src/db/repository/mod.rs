//! Repository trait definitions for storage operations.
//!
//! Storage is split across three focused traits:
//!
//! - [`line`]: line definitions (id, name, color)
//! - [`section`]: the segments stored for each line
//! - [`station`]: the registry of station names seen on any line
//!
//! For functions that need all of them, use the [`FullRepository`] bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let line = repo.get_line(line_id).await?;
//!     let segments = repo.sections_for_line(line.id).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod line;
pub mod section;
pub mod station;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use line::LineRepository;
pub use section::SectionRepository;
pub use station::StationRepository;

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository: LineRepository + SectionRepository + StationRepository {}

// Blanket implementation: any type implementing all three traits is a FullRepository
impl<T> FullRepository for T where T: LineRepository + SectionRepository + StationRepository {}
