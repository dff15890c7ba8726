//! Domain-level error types.

use thiserror::Error;

/// Domain errors - validation failures raised below the HTTP layer.
///
/// Each variant maps to exactly one HTTP status / wire error code pair at
/// the API boundary. Messages are stable strings so tests can assert on
/// them.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Limit or offset parameters are out of range.")]
    InvalidRange,

    #[error("Invalid filter value: {0}")]
    InvalidFilter(String),

    #[error("Too many hash tags")]
    TooManyTags,

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
