//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use sea_orm::SqlErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or disallowed input
    #[error("Validation error: {0}")]
    Validation(String),
    /// Uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Acting user is not allowed to touch the resource
    #[error("Not authorized: {0}")]
    Authorization(String),
    /// Resource not found
    #[error("Resource not found")]
    NotFound,
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }
}

// Conversion from SeaORM errors (used in infrastructure layer).
// Unique constraint violations surface as conflicts so racing writers
// get the same answer as the service-level pre-check.
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
            _ => DomainError::Database(e.to_string()),
        }
    }
}
