//! Domain-level error types.

use thiserror::Error;

use crate::domain::ACCEPTED_DATE_FORMATS;

/// Domain errors - business logic failures.
///
/// The `Display` text of each variant is the message returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Missing required fields")]
    MissingFields { field: &'static str },

    #[error("error_date must be one of: {formats}", formats = ACCEPTED_DATE_FORMATS.join(", "))]
    DateFormat,

    #[error("error_count must be an integer")]
    CountFormat,

    #[error("Not found")]
    NotFound { id: i32 },

    #[error("database error: {0}")]
    Storage(String),
}

/// Repository-level errors.
///
/// Both variants carry the storage engine's primary diagnostic text only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),
}

impl RepoError {
    /// The engine diagnostic without the variant prefix.
    pub fn diagnostic(&self) -> &str {
        match self {
            RepoError::Connection(msg) | RepoError::Query(msg) => msg,
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        DomainError::Storage(err.diagnostic().to_string())
    }
}
