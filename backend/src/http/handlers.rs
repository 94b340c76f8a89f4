//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateLineRequest, HealthResponse, LineDto, LineListResponse, LineStationsDto,
    SectionRequest, StationListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{LineId, Station};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Lines
// =============================================================================

/// GET /v1/lines
///
/// Every line with its stations in travel order.
pub async fn list_lines(State(state): State<AppState>) -> HandlerResult<LineListResponse> {
    let views = db_services::list_line_stations(state.repository.as_ref()).await?;

    let lines: Vec<LineStationsDto> = views.into_iter().map(Into::into).collect();
    let total = lines.len();

    Ok(Json(LineListResponse { lines, total }))
}

/// POST /v1/lines
pub async fn create_line(
    State(state): State<AppState>,
    Json(request): Json<CreateLineRequest>,
) -> Result<(StatusCode, Json<LineDto>), AppError> {
    let line =
        db_services::create_line(state.repository.as_ref(), &request.name, &request.color).await?;

    Ok((StatusCode::CREATED, Json(line.into())))
}

/// GET /v1/lines/{line_id}
pub async fn get_line(
    State(state): State<AppState>,
    Path(line_id): Path<i64>,
) -> HandlerResult<LineStationsDto> {
    let view =
        db_services::get_line_stations(state.repository.as_ref(), LineId::new(line_id)).await?;
    Ok(Json(view.into()))
}

/// DELETE /v1/lines/{line_id}
pub async fn delete_line(
    State(state): State<AppState>,
    Path(line_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_line(
        state.repository.as_ref(),
        &state.line_locks,
        LineId::new(line_id),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Sections and stations
// =============================================================================

/// POST /v1/lines/{line_id}/sections
///
/// Insert a segment and return the updated line.
pub async fn register_section(
    State(state): State<AppState>,
    Path(line_id): Path<i64>,
    Json(request): Json<SectionRequest>,
) -> Result<(StatusCode, Json<LineStationsDto>), AppError> {
    let distance = u32::try_from(request.distance).map_err(|_| {
        AppError::BadRequest(format!(
            "distance must be between 1 and {}, got {}",
            u32::MAX,
            request.distance
        ))
    })?;

    let view = db_services::register_section(
        state.repository.as_ref(),
        &state.line_locks,
        LineId::new(line_id),
        Station::from(request.source),
        Station::from(request.target),
        distance,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view.into())))
}

/// DELETE /v1/lines/{line_id}/stations/{station}
///
/// Remove a station and return the updated line.
pub async fn delete_station(
    State(state): State<AppState>,
    Path((line_id, station)): Path<(i64, String)>,
) -> HandlerResult<LineStationsDto> {
    let view = db_services::delete_station(
        state.repository.as_ref(),
        &state.line_locks,
        LineId::new(line_id),
        &Station::from(station),
    )
    .await?;

    Ok(Json(view.into()))
}

/// GET /v1/stations
pub async fn list_stations(State(state): State<AppState>) -> HandlerResult<StationListResponse> {
    let stations: Vec<String> = db_services::list_stations(state.repository.as_ref())
        .await?
        .into_iter()
        .map(Station::into_name)
        .collect();
    let total = stations.len();

    Ok(Json(StationListResponse { stations, total }))
}
