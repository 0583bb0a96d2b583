//! Error handling middleware - `{"error": ...}` JSON responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use nce_core::error::{DomainError, RepoError};
use nce_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to JSON error responses.
#[derive(Debug)]
pub enum AppError {
    NotFound,
    BadRequest {
        message: String,
        field: Option<&'static str>,
    },
    Storage(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound => write!(f, "Not found"),
            AppError::BadRequest { message, .. } => write!(f, "{}", message),
            AppError::Storage(diagnostic) => write!(f, "database error: {}", diagnostic),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound => ErrorResponse::not_found(),
            AppError::BadRequest {
                message,
                field: Some(field),
            } => ErrorResponse::new(message.as_str()).with_field(*field),
            AppError::BadRequest { message, field: None } => ErrorResponse::new(message.as_str()),
            AppError::Storage(diagnostic) => {
                tracing::error!("Storage error: {}", diagnostic);
                ErrorResponse::new(self.to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingFields { field } => {
                tracing::debug!(field, "Rejected payload with missing field");
                AppError::BadRequest {
                    message: err.to_string(),
                    field: Some(field),
                }
            }
            DomainError::DateFormat | DomainError::CountFormat => AppError::BadRequest {
                message: err.to_string(),
                field: None,
            },
            DomainError::NotFound { id } => {
                tracing::debug!(error_id = id, "Error record not found");
                AppError::NotFound
            }
            DomainError::Storage(diagnostic) => AppError::Storage(diagnostic),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        DomainError::from(err).into()
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
