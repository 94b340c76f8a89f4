use serde::{Deserialize, Serialize};
use std::fmt;

use super::Station;
use crate::chain::{ChainError, ChainResult};

/// A directed edge between two adjacent stations.
///
/// `target` lies `distance` units downstream of `source` with no stop in
/// between. Segments are values: splitting or merging always builds new ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SegmentRecord")]
pub struct Segment {
    source: Station,
    target: Station,
    distance: u32,
}

impl Segment {
    /// Build a segment, rejecting zero distances and self-loops.
    pub fn new(source: Station, target: Station, distance: u32) -> ChainResult<Self> {
        if distance == 0 {
            return Err(ChainError::InvalidSegment(format!(
                "distance between {} and {} must be positive",
                source, target
            )));
        }
        if source == target {
            return Err(ChainError::InvalidSegment(format!(
                "segment cannot start and end at {}",
                source
            )));
        }
        Ok(Self {
            source,
            target,
            distance,
        })
    }

    pub fn source(&self) -> &Station {
        &self.source
    }

    pub fn target(&self) -> &Station {
        &self.target
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// True if `station` is either endpoint.
    pub fn contains(&self, station: &Station) -> bool {
        self.is_source(station) || self.is_target(station)
    }

    pub fn is_source(&self, station: &Station) -> bool {
        &self.source == station
    }

    pub fn is_target(&self, station: &Station) -> bool {
        &self.target == station
    }

    /// True if this segment is at least `n` long, i.e. too short to be split at `n`.
    pub fn distance_at_least(&self, n: u32) -> bool {
        self.distance >= n
    }
}

/// Unchecked wire shape; deserialization goes through [`Segment::new`].
#[derive(Deserialize)]
struct SegmentRecord {
    source: Station,
    target: Station,
    distance: u32,
}

impl TryFrom<SegmentRecord> for Segment {
    type Error = ChainError;

    fn try_from(record: SegmentRecord) -> Result<Self, Self::Error> {
        Segment::new(record.source, record.target, record.distance)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.source, self.target, self.distance)
    }
}
