//! Error handling - maps domain failures to wire error bodies.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chirp_shared::ErrorBody;
use std::fmt;

/// Application-level error type that converts to `{ httpCode, errorCode,
/// message }` responses. One variant per failure condition; messages are
/// stable strings.
#[derive(Debug)]
pub enum AppError {
    Unauthenticated,
    InvalidRange,
    InvalidFilter(String),
    TooManyTags,
    NotFound(String),
    Forbidden,
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthenticated => write!(f, "Username header is missing."),
            AppError::InvalidRange => {
                write!(f, "Limit or offset parameters are out of range.")
            }
            AppError::InvalidFilter(msg) => write!(f, "{}", msg),
            AppError::TooManyTags => write!(f, "Too many hash tags"),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Forbidden => write!(f, "You are not allowed to delete this tweet"),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::InvalidRange => StatusCode::PRECONDITION_FAILED,
            AppError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            AppError::TooManyTags => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Unauthenticated => ErrorBody::unauthenticated(self.to_string()),
            AppError::InvalidRange => ErrorBody::invalid_range(self.to_string()),
            AppError::InvalidFilter(_) => ErrorBody::invalid_filter(self.to_string()),
            AppError::TooManyTags => ErrorBody::too_many_tags(self.to_string()),
            AppError::NotFound(_) => ErrorBody::not_found(self.to_string()),
            AppError::Forbidden => ErrorBody::forbidden(self.to_string()),
            AppError::BadRequest(_) => ErrorBody::bad_request(self.to_string()),
            AppError::Internal(detail) => {
                // Log internal errors; the wire body stays generic.
                tracing::error!("Internal error: {}", detail);
                ErrorBody::internal()
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

// Conversion from domain errors
impl From<chirp_core::error::DomainError> for AppError {
    fn from(err: chirp_core::error::DomainError) -> Self {
        use chirp_core::error::DomainError;
        match err {
            DomainError::InvalidRange => AppError::InvalidRange,
            DomainError::InvalidFilter(msg) => AppError::InvalidFilter(msg),
            DomainError::TooManyTags => AppError::TooManyTags,
            DomainError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<chirp_core::error::RepoError> for AppError {
    fn from(err: chirp_core::error::RepoError) -> Self {
        use chirp_core::error::RepoError;
        match err {
            RepoError::NotFound => AppError::NotFound("Tweet not found.".to_string()),
            RepoError::Constraint(msg) => AppError::BadRequest(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
