//! Storage for lines and their segments.
//!
//! This module provides abstractions for storage operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Per-line locking                                     │
//! │  - Chain insert / remove and diff persistence           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ Local Repository │◄────┤ File Repository         │
//! │ (in-memory)      │     │ (JSON snapshot on disk) │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```no_run
//! use subway_backend::db::{services, RepositoryFactory};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let lines = services::list_line_stations(repo.as_ref()).await?;
//!     println!("{} lines", lines.len());
//!     Ok(())
//! }
//! ```

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


// ==================== Service Layer ====================

pub use services::{
    create_line, delete_line, delete_station, get_line, get_line_stations, health_check,
    list_line_stations, list_lines, list_stations, register_section, ServiceError, ServiceResult,
};

// ==================== Repository Pattern Exports ====================

pub use repo_config::RepositoryConfig;

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repositories::{FileConfig, FileRepository, LocalRepository};
pub use repository::{
    ErrorContext, FullRepository, LineRepository, RepositoryError, RepositoryResult,
    SectionRepository, StationRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository singleton.
///
/// Uses `repository.toml` when one exists in a standard location, otherwise
/// the environment (`REPOSITORY_TYPE`, `SUBWAY_DATA_FILE`). A config file
/// that exists but does not parse is an error. Calling it again after a
/// successful init is a no-op.
pub async fn init_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if let Some(repo) = REPOSITORY.get() {
        return Ok(repo);
    }

    let config_path = RepositoryConfig::default_location();
    let repo = RepositoryFactory::from_config_or_env(config_path.as_deref())
        .await
        .context("Failed to create repository")?;

    Ok(REPOSITORY.get_or_init(|| repo))
}
