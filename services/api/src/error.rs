//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{calendar::CalendarError, error::BackendError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Submitted input failed validation before any backend call
    #[error("{0}")]
    Validation(String),

    /// Unauthorized access
    #[error("Unauthorized")]
    Unauthorized,

    /// Login throttled
    #[error("Too many login attempts, try again later")]
    TooManyRequests,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Transition rejected by the admin guards
    #[error("{0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Backend (database or storage) error
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::TooManyRequests => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Backend(err) if err.is_not_found() => (StatusCode::NOT_FOUND, err.to_string()),
            ApiError::Backend(err) => {
                error!("Backend error: {}", err);
                let message = match err {
                    BackendError::Storage(_) => "Storage error",
                    _ => "Database error",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
