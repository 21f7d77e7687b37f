//! Core error types for the asset tracker.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, MySQL) are converted to these types by the storage layer.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the asset tracker.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Missing configuration key: {0}")]
    MissingConfigKey(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the error is a write rejected by a uniqueness or foreign-key
    /// constraint in the destination store.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::Database(DatabaseError::UniqueViolation(_))
                | Error::Database(DatabaseError::ForeignKeyViolation(_))
        )
    }

    /// True when the store could not be reached at all.
    pub fn is_connectivity_failure(&self) -> bool {
        matches!(
            self,
            Error::Database(DatabaseError::ConnectionFailed(_))
                | Error::Database(DatabaseError::PoolCreationFailed(_))
        )
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed to begin, commit or roll back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_classification() {
        let unique: Error = DatabaseError::UniqueViolation("assets.serial_number".into()).into();
        let fk: Error = DatabaseError::ForeignKeyViolation("asset_images.asset_id".into()).into();
        let query: Error = DatabaseError::QueryFailed("syntax error".into()).into();

        assert!(unique.is_constraint_violation());
        assert!(fk.is_constraint_violation());
        assert!(!query.is_constraint_violation());
    }

    #[test]
    fn test_connectivity_classification() {
        let err: Error = DatabaseError::ConnectionFailed("Access denied".into()).into();
        assert!(err.is_connectivity_failure());
        assert!(!err.is_constraint_violation());
        assert_eq!(
            err.to_string(),
            "Database operation failed: Failed to connect to database: Access denied"
        );
    }
}
