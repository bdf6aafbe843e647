//! Referential integrity check
//!
//! For each declared FK, counts child rows whose non-null value has no
//! matching parent row. The total and joined counts are issued alongside
//! for the audit trail; only the orphan count decides the verdict.

use crate::schema::ForeignKey;
use crate::storage::QueryInterface;

use super::errors::CheckResult;
use super::report::{CheckKind, CheckReport};
use super::sql;
use super::Recorder;

/// Checks every foreign key of `table`.
///
/// `Y` iff every FK is well-formed and has zero orphan rows. An empty FK
/// list is vacuously `Y` and issues no statements. Malformed FKs count as
/// failures but do not stop the remaining FKs from being checked.
pub fn check_ri(
    query: &mut dyn QueryInterface,
    table: &str,
    foreign_keys: &[ForeignKey],
) -> CheckResult<CheckReport> {
    let mut rec = Recorder::new(query);
    let mut findings = Vec::new();

    for fk in foreign_keys {
        let Some((column, ref_table, ref_column)) = fk.resolved() else {
            findings.push(format!("malformed foreign key on column {}", fk.column));
            continue;
        };

        let [orphans] = rec.counts::<1>(&sql::orphan_count(table, column, ref_table, ref_column)?)?;
        let [total] = rec.counts::<1>(&sql::row_count(table)?)?;
        let [joined] = rec.counts::<1>(&sql::joined_count(table, column, ref_table, ref_column)?)?;

        if orphans != 0 {
            findings.push(format!(
                "{}.{} -> {}.{}: {} orphan row(s) of {} ({} joined)",
                table, column, ref_table, ref_column, orphans, total, joined
            ));
        }
    }

    Ok(rec.finish(table, CheckKind::ReferentialIntegrity, findings))
}
