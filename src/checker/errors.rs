//! Checker error types

use thiserror::Error;

use crate::storage::QueryError;

/// Result type for checker operations
pub type CheckResult<T> = Result<T, CheckError>;

/// Errors that abort a single table check
#[derive(Debug, Error)]
pub enum CheckError {
    /// Identifier failed the allow-list before interpolation
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// Statement execution failed
    #[error("query failed: {0}")]
    Query(#[from] QueryError),

    /// Result row did not hold a count where one was expected
    #[error("expected a count in column {index} of result for: {sql}")]
    UnexpectedResult { sql: String, index: usize },
}
