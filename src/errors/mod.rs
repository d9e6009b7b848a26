//! Centralized error handling for the football manager data layer
//!
//! This module provides the error types shared across the crate, split by
//! layer so callers can branch on error kind without inspecting message
//! strings.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Repository Results
pub type RepositoryResult<T> = Result<T, RepositoryError>;
