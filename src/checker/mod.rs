//! Data-driven schema checks for schemacheck
//!
//! Two independent checks run against the live store for each usable table:
//!
//! - Referential integrity: every non-null FK value finds a parent row
//! - Normalization: no non-key column functionally determines another
//!
//! # Design Principles
//!
//! - Read-only aggregate queries, issued strictly in sequence
//! - Every issued statement is returned with the verdict for auditing
//! - Query failures abort the check and propagate to the caller
//! - Callers must not pass skipped tables

mod errors;
mod normalization;
mod referential;
mod report;
pub mod sql;

pub use errors::{CheckError, CheckResult};
pub use normalization::check_normalization;
pub use referential::check_ri;
pub use report::{CheckKind, CheckReport, TableVerdict, Verdict};

use crate::observability::Logger;
use crate::storage::{QueryInterface, Row, Scalar};

/// Issues statements and keeps them, in order, for the audit trail.
struct Recorder<'q> {
    query: &'q mut dyn QueryInterface,
    statements: Vec<String>,
}

impl<'q> Recorder<'q> {
    fn new(query: &'q mut dyn QueryInterface) -> Self {
        Self {
            query,
            statements: Vec::new(),
        }
    }

    fn run(&mut self, sql: &str) -> CheckResult<Row> {
        Logger::trace("QUERY_ISSUED", &[("sql", sql)]);
        self.statements.push(sql.to_string());
        Ok(self.query.execute(sql)?)
    }

    /// Runs `sql` and reads the first `N` columns as counts.
    fn counts<const N: usize>(&mut self, sql: &str) -> CheckResult<[u64; N]> {
        let row = self.run(sql)?;
        let mut out = [0u64; N];
        for (index, slot) in out.iter_mut().enumerate() {
            *slot = row
                .get(index)
                .and_then(Scalar::as_count)
                .ok_or_else(|| CheckError::UnexpectedResult {
                    sql: sql.to_string(),
                    index,
                })?;
        }
        Ok(out)
    }

    fn finish(self, table: &str, kind: CheckKind, findings: Vec<String>) -> CheckReport {
        CheckReport {
            table: table.to_string(),
            kind,
            verdict: Verdict::from_pass(findings.is_empty()),
            statements: self.statements,
            findings,
        }
    }
}
