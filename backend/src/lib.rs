//! # Subway Backend
//!
//! Line and station management for a subway network.
//!
//! Each line is a single directed path of stations. Consecutive stations are
//! joined by a segment carrying a positive distance. Lines grow and shrink one
//! segment at a time: a new segment either extends a line at one end or splits
//! an existing segment, and removing a station merges its neighbours.
//!
//! ## Architecture
//!
//! - [`models`]: Station, segment and line value types
//! - [`chain`]: The segment-chain engine (insert, remove, ordering)
//! - [`db`]: Repository pattern, storage backends and the service layer
//! - [`services`]: Runtime helpers shared by the service layer and HTTP handlers
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod chain;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
