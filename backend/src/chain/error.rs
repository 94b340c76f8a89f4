//! Error types for chain mutations and queries.

use crate::models::{Segment, Station};

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Why a chain operation was refused.
///
/// Every variant is raised before the chain is touched, so a caller holding an
/// error can keep using its original chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// Non-positive distance, or a segment that starts where it ends.
    #[error("Invalid segment: {0}")]
    InvalidSegment(String),

    /// Both endpoints of the proposed segment are already on the line.
    #[error("Duplicate segment: {upstream} and {downstream} are both already on the line")]
    DuplicateSegment { upstream: Station, downstream: Station },

    /// Neither endpoint of the proposed segment is on the line.
    #[error("Disconnected segment: neither {upstream} nor {downstream} is on the line")]
    DisconnectedSegment { upstream: Station, downstream: Station },

    /// The proposed split does not fit inside the segment it would split.
    #[error("Distance too long: {requested} must be shorter than {existing}")]
    DistanceTooLong { requested: u32, existing: Segment },

    #[error("Station not found: {0}")]
    StationNotFound(Station),

    /// The stored segments do not form a single simple path.
    #[error("Inconsistent chain: {0}")]
    InconsistentChain(String),
}

impl ChainError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSegment(_) => "INVALID_SEGMENT",
            Self::DuplicateSegment { .. } => "DUPLICATE_SEGMENT",
            Self::DisconnectedSegment { .. } => "DISCONNECTED_SEGMENT",
            Self::DistanceTooLong { .. } => "DISTANCE_TOO_LONG",
            Self::StationNotFound(_) => "STATION_NOT_FOUND",
            Self::InconsistentChain(_) => "INCONSISTENT_CHAIN",
        }
    }
}
