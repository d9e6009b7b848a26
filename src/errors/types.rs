//! Error type definitions for the football manager data layer
//!
//! Two layers of errors: `RepositoryError` for everything the data-access
//! layer itself can produce, and `AppError` as the top-level type consumed
//! by whatever hosts the crate (an HTTP layer, a CLI, the tests).

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors (SeaORM)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Repository layer errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Repository layer specific errors
///
/// Three families matter to callers: transient store faults
/// (`ConnectionFailed` and the connection-class `Database` errors, recovered
/// by the retry executor), the typed absence signal (`RecordNotFound`), and
/// everything else, which surfaces unretried.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database connection failures
    #[error("Database connection failed: {message}")]
    ConnectionFailed { message: String },

    /// Database errors from SeaORM
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Constraint violations (unique, foreign key, etc.)
    #[error("Constraint violation: {constraint} - {message}")]
    ConstraintViolation { constraint: String, message: String },

    /// Record not found
    #[error("Record not found: {table} with {field} = {value}")]
    RecordNotFound {
        table: String,
        field: String,
        value: String,
    },

    /// Operation aborted by the caller's cancellation token
    #[error("Operation cancelled: {operation}")]
    Cancelled { operation: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl RepositoryError {
    /// Create a typed not-found error for a single-entity lookup
    pub fn record_not_found<T, F, V>(table: T, field: F, value: V) -> Self
    where
        T: Into<String>,
        F: Into<String>,
        V: Into<String>,
    {
        Self::RecordNotFound {
            table: table.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hosts branch on the error kind, not on message text: the typed
    /// not-found signal survives the lift into AppError.
    #[test]
    fn test_not_found_distinguishable_after_lift() {
        let err = RepositoryError::record_not_found("stadiums", "name", "Emirates");
        let app: AppError = err.into();

        match app {
            AppError::Repository(RepositoryError::RecordNotFound { table, field, value }) => {
                assert_eq!((table.as_str(), field.as_str()), ("stadiums", "name"));
                assert_eq!(value, "Emirates");
            }
            other => panic!("expected typed RecordNotFound, got: {other}"),
        }
    }

    #[test]
    fn test_fault_and_absence_render_differently() {
        let absent = RepositoryError::record_not_found("clubs", "name", "Chelsea");
        let fault = RepositoryError::ConnectionFailed {
            message: "connection reset".to_string(),
        };
        assert_eq!(
            absent.to_string(),
            "Record not found: clubs with name = Chelsea"
        );
        assert_eq!(
            fault.to_string(),
            "Database connection failed: connection reset"
        );
    }
}
