//! JSON-file backed repository.
//!
//! Reads are served from an in-memory [`LocalRepository`]. Every successful
//! write rewrites the whole snapshot file (write to a sibling temp file, then
//! rename over the original). If persisting fails the in-memory state is
//! rolled back, so memory and disk never disagree after a returned error.

use async_trait::async_trait;
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::local::{LocalRepository, Snapshot};
use crate::db::repository::*;
use crate::models::{Line, LineId, NewLine, Segment, Station};

/// Environment variable naming the snapshot file.
pub const DATA_FILE_ENV: &str = "SUBWAY_DATA_FILE";

/// Where and how a [`FileRepository`] stores its snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    pub path: PathBuf,
    /// Write indented JSON.
    pub pretty: bool,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    /// Read `SUBWAY_DATA_FILE` (required) and `SUBWAY_DATA_PRETTY` (optional,
    /// default false).
    pub fn from_env() -> Result<Self, String> {
        let path = std::env::var(DATA_FILE_ENV)
            .map_err(|_| format!("{} environment variable not set", DATA_FILE_ENV))?;
        if path.trim().is_empty() {
            return Err(format!("{} must not be empty", DATA_FILE_ENV));
        }
        let pretty = std::env::var("SUBWAY_DATA_PRETTY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        Ok(Self {
            path: PathBuf::from(path),
            pretty,
        })
    }
}

pub struct FileRepository {
    inner: LocalRepository,
    path: PathBuf,
    pretty: bool,
    // Serializes write + persist so snapshots reach disk in commit order.
    write_gate: Mutex<()>,
}

impl FileRepository {
    /// Open (or create on first write) the snapshot at `path`.
    ///
    /// # Errors
    /// `StorageError` if the file exists but cannot be read or parsed.
    pub async fn open(path: impl AsRef<Path>, pretty: bool) -> RepositoryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let snapshot: Snapshot = serde_json::from_str(&content)
                    .map_err(|e| RepositoryError::from(e).with_operation("open"))?;
                info!(
                    "Loaded {} line(s) from {}",
                    snapshot.lines.len(),
                    path.display()
                );
                LocalRepository::from_snapshot(snapshot)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No snapshot at {}, starting empty", path.display());
                LocalRepository::new()
            }
            Err(e) => return Err(RepositoryError::from(e).with_operation("open")),
        };

        Ok(Self {
            inner,
            path,
            pretty,
            write_gate: Mutex::new(()),
        })
    }

    pub async fn from_config(config: &FileConfig) -> RepositoryResult<Self> {
        Self::open(&config.path, config.pretty).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> RepositoryResult<()> {
        let snapshot = self.inner.snapshot();
        let content = if self.pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Persisted snapshot to {}", self.path.display());
        Ok(())
    }

    /// Run `write` against the in-memory store and persist the result.
    async fn write_through<T, F, Fut>(&self, operation: &str, write: F) -> RepositoryResult<T>
    where
        T: Send,
        F: FnOnce(LocalRepository) -> Fut + Send,
        Fut: std::future::Future<Output = RepositoryResult<T>> + Send,
    {
        let _gate = self.write_gate.lock().await;
        let before = self.inner.snapshot();

        let value = write(self.inner.clone()).await?;
        if let Err(e) = self.persist().await {
            self.inner.restore(before)?;
            return Err(e.with_operation(operation));
        }
        Ok(value)
    }
}

#[async_trait]
impl LineRepository for FileRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.inner.health_check().await
    }

    async fn insert_line(&self, line: &NewLine) -> RepositoryResult<Line> {
        let line = line.clone();
        self.write_through("insert_line", |repo| async move {
            repo.insert_line(&line).await
        })
        .await
    }

    async fn get_line(&self, line_id: LineId) -> RepositoryResult<Line> {
        self.inner.get_line(line_id).await
    }

    async fn list_lines(&self) -> RepositoryResult<Vec<Line>> {
        self.inner.list_lines().await
    }

    async fn delete_line(&self, line_id: LineId) -> RepositoryResult<()> {
        self.write_through("delete_line", |repo| async move {
            repo.delete_line(line_id).await
        })
        .await
    }
}

#[async_trait]
impl SectionRepository for FileRepository {
    async fn sections_for_line(&self, line_id: LineId) -> RepositoryResult<Vec<Segment>> {
        self.inner.sections_for_line(line_id).await
    }

    async fn apply_section_diff(
        &self,
        line_id: LineId,
        removed: &[Segment],
        added: &[Segment],
    ) -> RepositoryResult<()> {
        let removed = removed.to_vec();
        let added = added.to_vec();
        self.write_through("apply_section_diff", |repo| async move {
            repo.apply_section_diff(line_id, &removed, &added).await
        })
        .await
    }
}

#[async_trait]
impl StationRepository for FileRepository {
    async fn register_stations(&self, stations: &[Station]) -> RepositoryResult<usize> {
        let stations = stations.to_vec();
        self.write_through("register_stations", |repo| async move {
            repo.register_stations(&stations).await
        })
        .await
    }

    async fn list_stations(&self) -> RepositoryResult<Vec<Station>> {
        self.inner.list_stations().await
    }
}
