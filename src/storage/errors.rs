//! Query error types
//!
//! Any of these is fatal for the table check that issued the statement.

use thiserror::Error;

/// Result type for query execution
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while executing a statement against the live store
#[derive(Debug, Error)]
pub enum QueryError {
    /// Underlying SQLite failure (bad identifier, locked file, ...)
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Statement produced no result row
    #[error("statement returned no row: {sql}")]
    NoRow { sql: String },

    /// Store file could not be opened
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
