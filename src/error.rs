//! Request-layer errors and their HTTP mapping.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use compute::ComputeError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Errors returned by handlers.
///
/// Client errors carry a message that is safe to show; server errors are
/// logged and replaced by a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400
    #[error("Validation failed: {0}")]
    Validation(String),

    // 401
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    // 404
    #[error("{0} not found")]
    NotFound(String),

    // 409
    #[error("Conflict: {0}")]
    Conflict(String),

    // 500
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound(resource.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            ApiError::Database(details) => {
                error!("Database error: {}", details);
                "Database error occurred".to_string()
            }
            ApiError::Internal(details) => {
                error!("Internal error: {}", details);
                "An internal error occurred".to_string()
            }
            ApiError::Validation(message)
            | ApiError::Unauthorized(message)
            | ApiError::Conflict(message) => {
                warn!(code, "{}", message);
                message.clone()
            }
            ApiError::NotFound(_) => {
                warn!(code, "{}", self);
                self.to_string()
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        };

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response();
        }
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(details)) => {
                warn!("Unique constraint violation: {}", details);
                ApiError::Conflict("resource already exists".to_string())
            }
            _ => ApiError::Database(err.to_string()),
        }
    }
}

impl From<ComputeError> for ApiError {
    fn from(err: ComputeError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{err:#}"))
    }
}
