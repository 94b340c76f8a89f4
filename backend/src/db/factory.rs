//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::file::DATA_FILE_ENV;
use super::repositories::{FileConfig, FileRepository, LocalRepository};
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
    /// JSON snapshot on disk
    File,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("local", "memory", "file", "json").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "file" | "json" => Ok(Self::File),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Without it, defaults to File when
    /// `SUBWAY_DATA_FILE` is set, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or_else(|e| {
                log::warn!("{} in REPOSITORY_TYPE, falling back to local", e);
                Self::Local
            });
        }

        if std::env::var(DATA_FILE_ENV).is_ok() {
            Self::File
        } else {
            Self::Local
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```no_run
/// use subway_backend::db::{FileConfig, RepositoryFactory, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = FileConfig::new("subway.json");
///     let _file_repo = RepositoryFactory::create(RepositoryType::File, Some(&config)).await?;
///
///     let _local_repo = RepositoryFactory::create_local();
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `file_config` - Snapshot location (required for File)
    pub async fn create(
        repo_type: RepositoryType,
        file_config: Option<&FileConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::File => {
                let config = file_config.ok_or_else(|| {
                    RepositoryError::configuration("File repository requires FileConfig")
                })?;
                let repo = Self::create_file(config).await?;
                Ok(repo as Arc<dyn FullRepository>)
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a file-backed repository, loading any existing snapshot.
    pub async fn create_file(config: &FileConfig) -> RepositoryResult<Arc<FileRepository>> {
        let repo = FileRepository::from_config(config).await?;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::File => {
                let config = FileConfig::from_env().map_err(RepositoryError::configuration)?;
                Self::create(RepositoryType::File, Some(&config)).await
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_config(&config).await
    }

    /// Create repository from `config_path` when given, otherwise from the
    /// environment. An unreadable or malformed config file is an error.
    pub async fn from_config_or_env(
        config_path: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match config_path {
            Some(path) => {
                log::info!("Using repository config {}", path.display());
                Self::from_config_file(path).await
            }
            None => {
                log::info!("No repository.toml found, configuring from environment");
                Self::from_env().await
            }
        }
    }

    /// Create repository from `repository.toml` in the standard locations.
    pub async fn from_default_config() -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_default_location()?;
        Self::from_config(&config).await
    }

    /// Create repository from an already parsed configuration.
    pub async fn from_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        let file_config = config.to_file_config()?;
        Self::create(repo_type, file_config.as_ref()).await
    }
}

/// Builder for configuring repository creation.
///
/// # Example
/// ```no_run
/// use subway_backend::db::{FileConfig, RepositoryBuilder, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let repo = RepositoryBuilder::new()
///         .repository_type(RepositoryType::File)
///         .file_config(FileConfig::new("subway.json"))
///         .build()
///         .await?;
///     Ok(())
/// }
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    file_config: Option<FileConfig>,
}

impl RepositoryBuilder {
    /// Defaults to the type selected by the environment.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::from_env(),
            file_config: None,
        }
    }

    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    pub fn file_config(mut self, config: FileConfig) -> Self {
        self.file_config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, RepositoryError> {
        self.repo_type = RepositoryType::from_env();
        if self.repo_type == RepositoryType::File {
            let config = FileConfig::from_env().map_err(RepositoryError::configuration)?;
            self.file_config = Some(config);
        }
        Ok(self)
    }

    /// Load configuration from a TOML file.
    pub fn from_config_file<P: AsRef<Path>>(
        mut self,
        config_path: P,
    ) -> Result<Self, RepositoryError> {
        let repo_config = RepositoryConfig::from_file(config_path)?;

        self.repo_type = repo_config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        if let Some(config) = repo_config.to_file_config()? {
            self.file_config = Some(config);
        }
        Ok(self)
    }

    pub async fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryFactory::create(self.repo_type, self.file_config.as_ref()).await
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
