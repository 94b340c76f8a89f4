//! Runtime services shared by the service layer and the HTTP handlers.

pub mod line_locks;

pub use line_locks::LineLocks;
