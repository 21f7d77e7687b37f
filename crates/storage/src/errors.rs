//! Storage-specific error types.
//!
//! Wraps Diesel and r2d2 errors and converts them to the database-agnostic
//! error types defined in `asset_sync_core`.

use asset_sync_core::errors::{DatabaseError, Error};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Storage-specific errors that wrap Diesel and r2d2 types.
///
/// These errors are internal to the storage layer and are converted to
/// `asset_sync_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Transaction failed: {0}")]
    TransactionFailed(DieselError),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => Error::Database(DatabaseError::UniqueViolation(info.message().to_string())),
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                info,
            )) => Error::Database(DatabaseError::ForeignKeyViolation(
                info.message().to_string(),
            )),
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection,
                info,
            )) => Error::Database(DatabaseError::ConnectionFailed(info.message().to_string())),
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::TransactionFailed(e) => {
                Error::Database(DatabaseError::TransactionFailed(e.to_string()))
            }
        }
    }
}

/// Extension trait for converting Diesel and r2d2 results to core results.
///
/// Provides `.into_core()` on any such `Result`, routing the error through
/// [`StorageError`].
pub trait IntoCore<T> {
    fn into_core(self) -> asset_sync_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> asset_sync_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> asset_sync_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, diesel::ConnectionError> {
    fn into_core(self) -> asset_sync_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_core_not_found() {
        let err: Error = StorageError::QueryFailed(DieselError::NotFound).into();
        assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
    }

    #[test]
    fn test_rollback_errors_map_to_transaction_failed() {
        let err: Error = StorageError::TransactionFailed(DieselError::RollbackTransaction).into();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::TransactionFailed(_))
        ));
    }

    #[test]
    fn test_bad_url_maps_to_connection_failed() {
        let result: std::result::Result<(), diesel::ConnectionError> =
            Err(diesel::ConnectionError::InvalidConnectionUrl("nope".to_string()));
        let err = result.into_core().unwrap_err();
        assert!(err.is_connectivity_failure());
    }
}
