//! SQL audit log
//!
//! Every statement a checker issues is kept so the run can be inspected
//! and replayed by hand. The buffer for a run is an explicit [`AuditRun`]
//! owned by the caller; nothing is shared between checkers.
//!
//! File format, appended once per run:
//!
//! ```text
//! -- >>> schemacheck run 6f1c... started 2026-10-18T09:12:44+00:00
//! -- [2026-10-18T09:12:44+00:00] referential-integrity: orders
//! SELECT COUNT(*) FROM "orders" AS c LEFT JOIN "customers" AS p ON ...;
//! -- <<< schemacheck run 6f1c... finished
//! ```

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Which checker a statement group came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditRole {
    ReferentialIntegrity,
    Normalization,
}

impl AuditRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditRole::ReferentialIntegrity => "referential-integrity",
            AuditRole::Normalization => "normalization",
        }
    }
}

impl fmt::Display for AuditRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Statements issued by one checker invocation on one table.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub role: AuditRole,
    pub table: String,
    pub recorded_at: DateTime<Utc>,
    pub statements: Vec<String>,
}

impl AuditEntry {
    pub fn new(role: AuditRole, table: impl Into<String>, statements: Vec<String>) -> Self {
        Self {
            role,
            table: table.into(),
            recorded_at: Utc::now(),
            statements,
        }
    }
}

/// Audit buffer for one run.
#[derive(Debug, Clone)]
pub struct AuditRun {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub entries: Vec<AuditEntry>,
}

impl AuditRun {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Records a statement group; empty groups are dropped.
    pub fn record(&mut self, role: AuditRole, table: &str, statements: Vec<String>) {
        if statements.is_empty() {
            return;
        }
        self.entries.push(AuditEntry::new(role, table, statements));
    }

    pub fn statement_count(&self) -> usize {
        self.entries.iter().map(|e| e.statements.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the run as an SQL-comment-delimited block.
    pub fn render(&self) -> String {
        let mut out = format!(
            "-- >>> schemacheck run {} started {}\n",
            self.id,
            rfc3339(&self.started_at)
        );
        for entry in &self.entries {
            out.push_str(&format!(
                "-- [{}] {}: {}\n",
                rfc3339(&entry.recorded_at),
                entry.role,
                entry.table
            ));
            for sql in &entry.statements {
                out.push_str(sql.trim_end());
                if !sql.trim_end().ends_with(';') {
                    out.push(';');
                }
                out.push('\n');
            }
        }
        out.push_str(&format!("-- <<< schemacheck run {} finished\n", self.id));
        out
    }
}

impl Default for AuditRun {
    fn default() -> Self {
        Self::new()
    }
}

fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Append-only audit file.
///
/// Each run is written as one block, flushed and synced before
/// `append_run` returns.
pub struct FileAuditLog {
    file: File,
}

impl FileAuditLog {
    /// Open or create an audit log file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    pub fn append_run(&mut self, run: &AuditRun) -> io::Result<()> {
        self.file.write_all(run.render().as_bytes())?;
        self.file.flush()?;
        self.file.sync_all()
    }
}
