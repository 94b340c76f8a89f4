//! In-memory local repository implementation.
//!
//! All data lives in maps behind a single [`RwLock`], so every trait method is
//! one critical section: a section diff is either applied completely or not at
//! all. Suitable for unit tests, local development, and as the working set of
//! [`FileRepository`](super::FileRepository).

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{Line, LineId, NewLine, Segment, Station};

/// In-memory local repository.
///
/// # Example
/// ```no_run
/// use subway_backend::db::repositories::LocalRepository;
/// use subway_backend::db::repository::LineRepository;
/// use subway_backend::models::NewLine;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let repo = LocalRepository::new();
///     let line = repo.insert_line(&NewLine::new("Line 8", "pink")?).await?;
///     assert_eq!(repo.list_lines().await?, vec![line]);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    lines: BTreeMap<LineId, Line>,
    sections: BTreeMap<LineId, Vec<Segment>>,
    stations: BTreeSet<Station>,
    next_line_id: i64,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            lines: BTreeMap::new(),
            sections: BTreeMap::new(),
            stations: BTreeSet::new(),
            next_line_id: 1,
            is_healthy: true,
        }
    }
}

/// Serializable image of a repository's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub next_line_id: i64,
    #[serde(default)]
    pub lines: Vec<LineRecord>,
    #[serde(default)]
    pub stations: Vec<Station>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            next_line_id: 1,
            lines: Vec::new(),
            stations: Vec::new(),
        }
    }
}

/// One line and its stored segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub line: Line,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Rebuild a repository from a snapshot.
    ///
    /// # Errors
    /// `StorageError` if two records share a line id or a line name.
    pub fn from_snapshot(snapshot: Snapshot) -> RepositoryResult<Self> {
        let repo = Self::new();
        repo.restore(snapshot)?;
        Ok(repo)
    }

    /// Copy the current contents out.
    pub fn snapshot(&self) -> Snapshot {
        let data = self.data.read();
        Snapshot {
            next_line_id: data.next_line_id,
            lines: data
                .lines
                .values()
                .map(|line| LineRecord {
                    line: line.clone(),
                    segments: data.sections.get(&line.id).cloned().unwrap_or_default(),
                })
                .collect(),
            stations: data.stations.iter().cloned().collect(),
        }
    }

    /// Replace the current contents with `snapshot`, keeping the health flag.
    pub fn restore(&self, snapshot: Snapshot) -> RepositoryResult<()> {
        let mut restored = LocalData::default();
        let mut max_id: i64 = 0;
        for record in snapshot.lines {
            let id = record.line.id;
            if restored.lines.values().any(|l| l.name == record.line.name) {
                return Err(RepositoryError::storage_with_context(
                    format!("Duplicate line name '{}' in snapshot", record.line.name),
                    ErrorContext::new("restore").with_entity("line").with_entity_id(id),
                ));
            }
            if restored.lines.insert(id, record.line).is_some() {
                return Err(RepositoryError::storage_with_context(
                    "Duplicate line id in snapshot",
                    ErrorContext::new("restore").with_entity("line").with_entity_id(id),
                ));
            }
            restored.sections.insert(id, record.segments);
            max_id = max_id.max(id.value());
        }
        restored.stations = snapshot.stations.into_iter().collect();
        restored.next_line_id = snapshot.next_line_id.max(max_id + 1);

        let mut data = self.data.write();
        restored.is_healthy = data.is_healthy;
        *data = restored;
        Ok(())
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn line_count(&self) -> usize {
        self.data.read().lines.len()
    }

    /// Number of segments stored for `line_id` (0 for unknown lines).
    pub fn segment_count(&self, line_id: LineId) -> usize {
        self.data
            .read()
            .sections
            .get(&line_id)
            .map_or(0, Vec::len)
    }

    fn check_health(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if !data.is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Repository is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    fn line_not_found(line_id: LineId, operation: &str) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Line {} not found", line_id),
            ErrorContext::new(operation)
                .with_entity("line")
                .with_entity_id(line_id),
        )
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn insert_line(&self, line: &NewLine) -> RepositoryResult<Line> {
        let mut data = self.data.write();
        Self::check_health(&data, "insert_line")?;

        if data.lines.values().any(|l| l.name == line.name()) {
            return Err(RepositoryError::conflict_with_context(
                format!("Line '{}' already exists", line.name()),
                ErrorContext::new("insert_line").with_entity("line"),
            ));
        }

        let id = LineId::new(data.next_line_id);
        data.next_line_id += 1;

        let stored = Line::from_new(id, line);
        data.lines.insert(id, stored.clone());
        data.sections.insert(id, Vec::new());
        Ok(stored)
    }

    async fn get_line(&self, line_id: LineId) -> RepositoryResult<Line> {
        let data = self.data.read();
        Self::check_health(&data, "get_line")?;
        data.lines
            .get(&line_id)
            .cloned()
            .ok_or_else(|| Self::line_not_found(line_id, "get_line"))
    }

    async fn list_lines(&self) -> RepositoryResult<Vec<Line>> {
        let data = self.data.read();
        Self::check_health(&data, "list_lines")?;
        Ok(data.lines.values().cloned().collect())
    }

    async fn delete_line(&self, line_id: LineId) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::check_health(&data, "delete_line")?;
        if data.lines.remove(&line_id).is_none() {
            return Err(Self::line_not_found(line_id, "delete_line"));
        }
        data.sections.remove(&line_id);
        Ok(())
    }
}

#[async_trait]
impl SectionRepository for LocalRepository {
    async fn sections_for_line(&self, line_id: LineId) -> RepositoryResult<Vec<Segment>> {
        let data = self.data.read();
        Self::check_health(&data, "sections_for_line")?;
        if !data.lines.contains_key(&line_id) {
            return Err(Self::line_not_found(line_id, "sections_for_line"));
        }
        Ok(data.sections.get(&line_id).cloned().unwrap_or_default())
    }

    async fn apply_section_diff(
        &self,
        line_id: LineId,
        removed: &[Segment],
        added: &[Segment],
    ) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::check_health(&data, "apply_section_diff")?;
        if !data.lines.contains_key(&line_id) {
            return Err(Self::line_not_found(line_id, "apply_section_diff"));
        }

        // Build the new row set first; storage is only replaced once every
        // removed segment has been matched.
        let mut next = data.sections.get(&line_id).cloned().unwrap_or_default();
        for segment in removed {
            let Some(position) = next.iter().position(|stored| stored == segment) else {
                return Err(RepositoryError::conflict_with_context(
                    format!("Segment {} is not stored", segment),
                    ErrorContext::new("apply_section_diff")
                        .with_entity("segment")
                        .with_entity_id(line_id),
                ));
            };
            next.remove(position);
        }
        next.extend(added.iter().cloned());

        data.sections.insert(line_id, next);
        Ok(())
    }
}

#[async_trait]
impl StationRepository for LocalRepository {
    async fn register_stations(&self, stations: &[Station]) -> RepositoryResult<usize> {
        let mut data = self.data.write();
        Self::check_health(&data, "register_stations")?;
        let before = data.stations.len();
        data.stations.extend(stations.iter().cloned());
        Ok(data.stations.len() - before)
    }

    async fn list_stations(&self) -> RepositoryResult<Vec<Station>> {
        let data = self.data.read();
        Self::check_health(&data, "list_stations")?;
        Ok(data.stations.iter().cloned().collect())
    }
}
