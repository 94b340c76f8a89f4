//! Repository configuration file support.
//!
//! ```toml
//! [repository]
//! type = "file"
//!
//! [file]
//! path = "data/subway.json"
//! pretty = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repositories::FileConfig;
use super::repository::RepositoryError;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub file: FileSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Snapshot file settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub pretty: bool,
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// First existing `repository.toml` among the standard locations:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn default_location() -> Option<PathBuf> {
        [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load repository configuration from the default location.
    ///
    /// A file that exists but cannot be read or parsed is an error, never
    /// treated as missing.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        match Self::default_location() {
            Some(path) => Self::from_file(path),
            None => Err(RepositoryError::configuration(
                "No repository.toml found in standard locations",
            )),
        }
    }

    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// The snapshot location, when this is a File configuration.
    pub fn to_file_config(&self) -> Result<Option<FileConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::File {
            return Ok(None);
        }

        if self.file.path.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "File repository requires 'file.path' setting",
            ));
        }

        Ok(Some(FileConfig {
            path: PathBuf::from(&self.file.path),
            pretty: self.file.pretty,
        }))
    }
}
