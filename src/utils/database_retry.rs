//! Database retry utilities for handling transient failures
//!
//! This module provides the retry mechanism wrapped around every database
//! round-trip in the repository layer: a fixed, bounded backoff schedule
//! that activates only for transient connectivity-class faults.

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{RepositoryError, RepositoryResult};

/// Configuration for database retry behavior
///
/// An immutable value holding the backoff schedule. Build it once (per
/// repository, or from configuration) and reuse it; the schedule length
/// bounds the retry count, so `delays.len() + 1` attempts happen in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    delays: Vec<Duration>,
}

impl Default for RetryConfig {
    /// The standard store-access schedule: 5s, 10s, 15s
    fn default() -> Self {
        Self {
            delays: vec![
                Duration::from_secs(5),
                Duration::from_secs(10),
                Duration::from_secs(15),
            ],
        }
    }
}

impl RetryConfig {
    /// Create a retry configuration with a custom backoff schedule
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    /// The backoff delays applied between attempts, in order
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Total number of attempts, counting the initial one
    pub fn max_attempts(&self) -> u32 {
        self.delays.len() as u32 + 1
    }
}

/// Execute a database operation with retry logic
///
/// Runs `operation` up to `config.max_attempts()` times. Transient faults
/// (see [`is_retryable_error`]) are logged and retried after the scheduled
/// delay; any other error propagates immediately. The cancellation token is
/// honored both while an attempt is in flight and during backoff waits.
///
/// # Returns
///
/// The result of the first successful attempt, or the last error once the
/// schedule is exhausted.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    cancel: &CancellationToken,
    mut operation: F,
    operation_name: &str,
) -> RepositoryResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = RepositoryResult<T>>,
{
    let max_attempts = config.max_attempts();
    let mut attempt = 1u32;

    loop {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(
                    "Database operation '{}' cancelled on attempt {}/{}",
                    operation_name, attempt, max_attempts
                );
                return Err(RepositoryError::Cancelled {
                    operation: operation_name.to_string(),
                });
            }
            result = operation() => result,
        };

        let err = match result {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        "Database operation '{}' succeeded on attempt {}/{}",
                        operation_name, attempt, max_attempts
                    );
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !is_retryable_error(&err) {
            debug!(
                "Database operation '{}' failed with non-retryable error: {}",
                operation_name, err
            );
            return Err(err);
        }

        let Some(delay) = config.delays().get((attempt - 1) as usize) else {
            warn!(
                "Database operation '{}' failed after {} attempts: {}",
                operation_name, max_attempts, err
            );
            return Err(err);
        };

        warn!(
            "Database operation '{}' failed on attempt {}/{}, retrying in {:?}: {}",
            operation_name, attempt, max_attempts, delay, err
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(RepositoryError::Cancelled {
                    operation: operation_name.to_string(),
                });
            }
            _ = sleep(*delay) => {}
        }

        attempt += 1;
    }
}

/// Determine if an error is worth retrying
///
/// Only connectivity-class store faults qualify. Logical conditions such as
/// `RecordNotFound` are decisions made after a successful round-trip and
/// must never be conflated with store flakiness.
pub fn is_retryable_error(error: &RepositoryError) -> bool {
    match error {
        RepositoryError::ConnectionFailed { .. } => true,
        RepositoryError::Database(db_err) => match db_err {
            sea_orm::DbErr::ConnectionAcquire(_) => true,
            sea_orm::DbErr::Conn(_) => true,
            sea_orm::DbErr::Exec(sea_orm::RuntimeErr::SqlxError(sqlx_err)) => {
                let message = format!("{sqlx_err}").to_lowercase();
                message.contains("database is locked")
                    || message.contains("database is busy")
                    || message.contains("connection reset")
                    || message.contains("timeout")
                    || message.contains("pool timed out")
                    || message.contains("pool closed")
            }
            _ => {
                let message = format!("{db_err}").to_lowercase();
                message.contains("database is locked")
                    || message.contains("database is busy")
                    || message.contains("connection reset")
                    || message.contains("timeout")
            }
        },
        _ => false,
    }
}
