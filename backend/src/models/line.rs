use serde::{Deserialize, Serialize};
use std::fmt;

use super::Station;

/// Shortest accepted line name, in characters.
pub const MIN_NAME_LENGTH: usize = 3;
/// Longest accepted line name, in characters.
pub const MAX_NAME_LENGTH: usize = 10;

/// Line identifier (storage primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub i64);

impl LineId {
    pub fn new(value: i64) -> Self {
        LineId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for LineId {
    fn from(v: i64) -> Self {
        LineId(v)
    }
}

/// Reasons a line definition is refused before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineValidationError {
    #[error("line name '{name}' must be between {min} and {max} characters")]
    NameLength { name: String, min: usize, max: usize },

    #[error("line color must not be empty")]
    EmptyColor,
}

/// A line definition that passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLine {
    name: String,
    color: String,
}

impl NewLine {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Self, LineValidationError> {
        let name = name.into();
        let color = color.into();

        let length = name.chars().count();
        if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
            return Err(LineValidationError::NameLength {
                name,
                min: MIN_NAME_LENGTH,
                max: MAX_NAME_LENGTH,
            });
        }
        if color.trim().is_empty() {
            return Err(LineValidationError::EmptyColor);
        }

        Ok(Self { name, color })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }
}

/// A stored line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,
}

impl Line {
    pub fn from_new(id: LineId, new_line: &NewLine) -> Self {
        Self {
            id,
            name: new_line.name.clone(),
            color: new_line.color.clone(),
        }
    }
}

/// A line together with its stations in travel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStations {
    pub line: Line,
    pub stations: Vec<Station>,
    pub total_distance: u64,
}
