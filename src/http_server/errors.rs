//! # HTTP Boundary Errors
//!
//! Maps core outcomes onto status codes. Conflict and not-found answers
//! carry an empty body; validation and server failures carry a JSON
//! `{"error", "code"}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::model::ValidationError;
use crate::observability::{log_event_with_fields, Event};
use crate::service::ServiceError;

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// VIN already belongs to another car
    #[error("Car with VIN {0} already exists")]
    Conflict(String),

    #[error("Car not found")]
    NotFound,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::DuplicateVin(vin) => ApiError::Conflict(vin),
            ServiceError::Storage(storage) => ApiError::Internal(storage.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidBody(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        log_event_with_fields(
            Event::RequestRejected,
            &[("status", status.as_str()), ("reason", &self.to_string())],
        );

        match self {
            ApiError::Conflict(_) | ApiError::NotFound => status.into_response(),
            other => {
                let body = ErrorResponse {
                    error: other.to_string(),
                    code: status.as_u16(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
