//! SeaORM repository implementations
//!
//! Resilient repositories over the clubs and stadiums tables. Every store
//! round-trip goes through the retry executor in
//! [`crate::utils::database_retry`]; absence of a required row is surfaced
//! as the typed [`RepositoryError::RecordNotFound`] signal, never retried.

use sea_orm::DbErr;
use tracing::info;

use crate::errors::{RepositoryError, RepositoryResult};

pub mod club;
pub mod stadium;

// Re-export for convenience
pub use club::ClubSeaOrmRepository;
pub use stadium::StadiumSeaOrmRepository;

/// Existence guard: unwrap a fetch result or fail with the typed not-found
/// signal carrying the entity kind and lookup key.
pub(crate) fn require_found<T>(
    found: Option<T>,
    table: &str,
    field: &str,
    value: &str,
) -> RepositoryResult<T> {
    match found {
        Some(entity) => Ok(entity),
        None => {
            info!("No {} row with {} = '{}'", table, field, value);
            Err(RepositoryError::record_not_found(table, field, value))
        }
    }
}

/// Detect a unique-index violation by message text; the variant shapes
/// differ per driver, so a string match is the portable check.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("unique") || message.contains("duplicate")
}

/// Detect a foreign-key violation by message text.
pub(crate) fn is_foreign_key_violation(err: &DbErr) -> bool {
    err.to_string().to_lowercase().contains("foreign key")
}

/// Map a write-path error, promoting unique-index violations to the typed
/// constraint signal so callers can tell them from store faults.
pub(crate) fn map_unique_violation(err: DbErr, constraint: &str) -> RepositoryError {
    if is_unique_violation(&err) {
        RepositoryError::ConstraintViolation {
            constraint: constraint.to_string(),
            message: err.to_string(),
        }
    } else {
        RepositoryError::Database(err)
    }
}
