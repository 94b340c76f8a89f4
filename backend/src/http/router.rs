//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route(
            "/lines",
            get(handlers::list_lines).post(handlers::create_line),
        )
        .route(
            "/lines/{line_id}",
            get(handlers::get_line).delete(handlers::delete_line),
        )
        .route(
            "/lines/{line_id}/sections",
            post(handlers::register_section),
        )
        .route(
            "/lines/{line_id}/stations/{station}",
            delete(handlers::delete_station),
        )
        .route("/stations", get(handlers::list_stations));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
