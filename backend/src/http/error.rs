//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::chain::ChainError;
use crate::db::repository::RepositoryError;
use crate::db::services::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (malformed input)
    BadRequest(String),
    /// Error raised by the service layer
    Service(ServiceError),
}

impl AppError {
    /// Status code for a service error.
    pub fn status_for(err: &ServiceError) -> StatusCode {
        match err {
            ServiceError::Chain(e) => match e {
                ChainError::DuplicateSegment { .. } => StatusCode::CONFLICT,
                ChainError::StationNotFound(_) => StatusCode::NOT_FOUND,
                ChainError::InconsistentChain(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ChainError::InvalidSegment(_)
                | ChainError::DisconnectedSegment { .. }
                | ChainError::DistanceTooLong { .. } => StatusCode::BAD_REQUEST,
            },
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Repository(e) => match e {
                RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
                RepositoryError::Conflict { .. } => StatusCode::CONFLICT,
                RepositoryError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                RepositoryError::ConnectionError { .. }
                | RepositoryError::ConfigurationError { .. }
                | RepositoryError::StorageError { .. }
                | RepositoryError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("BAD_REQUEST", msg),
            ),
            AppError::Service(e) => {
                let status = Self::status_for(&e);
                if status.is_server_error() {
                    log::error!("Request failed: {}", e);
                }
                let mut error = ApiError::new(e.code(), e.to_string());
                if let ServiceError::Repository(repo_err) = &e {
                    if repo_err.is_retryable() {
                        error = error.with_details("retryable");
                    }
                }
                (status, error)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}
