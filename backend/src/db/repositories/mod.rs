//! Repository implementations module.
//!
//! - `local`: In-memory implementation for unit testing and local development
//! - `file`: The in-memory store persisted as a JSON snapshot on disk
pub mod file;
pub mod local;

pub use file::{FileConfig, FileRepository};
pub use local::{LineRecord, LocalRepository, Snapshot};
