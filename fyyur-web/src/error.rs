//! HTTP error type for fyyur-web

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fyyur_common::ValidationErrors;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Form failed validation (422)
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<fyyur_common::Error> for ApiError {
    fn from(err: fyyur_common::Error) -> Self {
        match err {
            fyyur_common::Error::NotFound(what) => ApiError::NotFound(what),
            fyyur_common::Error::Validation(errors) => ApiError::Validation(errors),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, fields) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_FAILED",
                errors.to_string(),
                Some(errors),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    msg,
                    None,
                )
            }
        };

        let body = match fields {
            Some(fields) => json!({
                "error": {
                    "code": error_code,
                    "message": message,
                    "fields": fields,
                }
            }),
            None => json!({
                "error": {
                    "code": error_code,
                    "message": message,
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
