//! Live store access for schemacheck
//!
//! The checkers only see [`QueryInterface`]: hand it fully-formed SQL
//! text, get back one row of scalars. Connection lifecycle belongs to
//! whoever constructs the store.
//!
//! # Design Principles
//!
//! - Read-only use from the checkers
//! - One statement, one row
//! - Failures propagate; nothing is retried

mod errors;
mod sqlite;
mod value;

pub use errors::{QueryError, QueryResult};
pub use sqlite::SqliteStore;
pub use value::{Row, Scalar};

/// Executes SQL text and returns its first result row.
pub trait QueryInterface {
    /// Executes a statement and returns the first row of scalar results.
    fn execute(&mut self, sql: &str) -> QueryResult<Row>;
}

impl<Q: QueryInterface + ?Sized> QueryInterface for &mut Q {
    fn execute(&mut self, sql: &str) -> QueryResult<Row> {
        (**self).execute(sql)
    }
}

/// Passes statements through to another interface, keeping a copy of each.
///
/// A statement is kept before it runs, so a failing statement is kept too.
pub struct StatementLog<'a, Q: QueryInterface + ?Sized> {
    inner: &'a mut Q,
    issued: &'a mut Vec<String>,
}

impl<'a, Q: QueryInterface + ?Sized> StatementLog<'a, Q> {
    pub fn new(inner: &'a mut Q, issued: &'a mut Vec<String>) -> Self {
        Self { inner, issued }
    }
}

impl<Q: QueryInterface + ?Sized> QueryInterface for StatementLog<'_, Q> {
    fn execute(&mut self, sql: &str) -> QueryResult<Row> {
        self.issued.push(sql.to_string());
        self.inner.execute(sql)
    }
}
