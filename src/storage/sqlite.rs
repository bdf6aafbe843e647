//! SQLite-backed live store

use std::path::{Path, PathBuf};

use rusqlite::config::DbConfig;
use rusqlite::{Connection, OpenFlags};

use super::errors::{QueryError, QueryResult};
use super::value::{Row, Scalar};
use super::QueryInterface;

/// A session against a SQLite database.
#[derive(Debug)]
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = strict_identifiers(Connection::open(&path)?)?;
        Ok(Self {
            path: Some(path),
            conn,
        })
    }

    /// Opens an existing database file read-only.
    ///
    /// Checks never write, so this is what the CLI uses.
    pub fn open_read_only(path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = strict_identifiers(Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?)?;
        Ok(Self {
            path: Some(path),
            conn,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> QueryResult<Self> {
        Ok(Self {
            path: None,
            conn: strict_identifiers(Connection::open_in_memory()?)?,
        })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Runs a batch of statements, typically fixture DDL and inserts.
    pub fn execute_batch(&self, sql: &str) -> QueryResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Runs a query and returns its column names and up to `limit` rows.
    pub fn fetch_all(&self, sql: &str, limit: usize) -> QueryResult<(Vec<String>, Vec<Row>)> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = names.len();

        let mut out = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            if out.len() >= limit {
                break;
            }
            out.push(read_row(row, width)?);
        }

        Ok((names, out))
    }
}

/// Makes a double-quoted name that matches no column an error.
///
/// By default SQLite falls back to reading such a name as a string literal.
fn strict_identifiers(conn: Connection) -> QueryResult<Connection> {
    conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DML, false)?;
    conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DDL, false)?;
    Ok(conn)
}

fn read_row(row: &rusqlite::Row<'_>, width: usize) -> QueryResult<Row> {
    (0..width)
        .map(|i| row.get_ref(i).map(Scalar::from).map_err(QueryError::from))
        .collect()
}

impl QueryInterface for SqliteStore {
    fn execute(&mut self, sql: &str) -> QueryResult<Row> {
        let mut stmt = self.conn.prepare(sql)?;
        let width = stmt.column_count();
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => read_row(row, width),
            None => Err(QueryError::NoRow {
                sql: sql.to_string(),
            }),
        }
    }
}
