//! Error handling middleware - the sole translation point from error kinds
//! to HTTP status codes. Every 4xx/5xx body is `{"error": message}`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chronicle_shared::ErrorBody;
use std::fmt;

use chronicle_core::StoreError;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    /// Missing/malformed required fields on create/update. Answered with a
    /// server error, not a 4xx.
    Validation(String),
    Forbidden(String),
    Unauthorized,
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg) => write!(f, "{msg}"),
            AppError::Unauthorized => write!(f, "invalid credentials"),
            // The detail is logged, not leaked.
            AppError::Internal(_) => write!(f, "internal server error"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("internal error: {detail}");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

// Conversion from store errors
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(format!("post {id} not found")),
            StoreError::MissingField(field) => {
                AppError::Validation(format!("missing required field: {field}"))
            }
            StoreError::Persistence(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
