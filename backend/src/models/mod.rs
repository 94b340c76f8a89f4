//! Domain value types: stations, segments and lines.

pub mod line;
pub mod segment;
pub mod station;

pub use line::{Line, LineId, LineStations, LineValidationError, NewLine};
pub use segment::Segment;
pub use station::Station;
