//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.

use serde::{Deserialize, Serialize};

use crate::models::{Line, LineStations, Station};

/// Request body for creating a new line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLineRequest {
    /// Line name, 3 to 10 characters
    pub name: String,
    pub color: String,
}

/// Request body for adding a section to a line.
///
/// `distance` is taken as a signed integer so out-of-range values produce a
/// regular 400 response instead of a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRequest {
    /// Upstream station name
    pub source: String,
    /// Downstream station name
    pub target: String,
    pub distance: i64,
}

/// A line without its stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDto {
    pub id: i64,
    pub name: String,
    pub color: String,
}

impl From<Line> for LineDto {
    fn from(line: Line) -> Self {
        Self {
            id: line.id.value(),
            name: line.name,
            color: line.color,
        }
    }
}

/// A line with its stations in travel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStationsDto {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub stations: Vec<String>,
    /// Sum of all segment distances
    pub total_distance: u64,
}

impl From<LineStations> for LineStationsDto {
    fn from(view: LineStations) -> Self {
        Self {
            id: view.line.id.value(),
            name: view.line.name,
            color: view.line.color,
            stations: view.stations.into_iter().map(Station::into_name).collect(),
            total_distance: view.total_distance,
        }
    }
}

/// Line list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineListResponse {
    pub lines: Vec<LineStationsDto>,
    pub total: usize,
}

/// Station list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationListResponse {
    pub stations: Vec<String>,
    pub total: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage status
    pub database: String,
}
