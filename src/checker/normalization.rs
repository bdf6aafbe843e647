//! Normalization check
//!
//! Approximates 3NF/BCNF violation detection from the data currently in
//! the table. For each non-key column X that repeats, every other non-key
//! column Y is probed: if `distinct(X, Y) == distinct(X)` then each X value
//! maps to a single Y value and `X -> Y` holds empirically.
//!
//! Only single-attribute determinants are considered. Results can both
//! under- and over-report relative to the logical design.

use crate::storage::QueryInterface;

use super::errors::CheckResult;
use super::report::{CheckKind, CheckReport};
use super::sql;
use super::Recorder;

/// Checks `table` for a functional dependency between non-key columns.
///
/// Columns are scanned in declaration order and the scan stops at the first
/// dependency found. A column whose values are all distinct is treated as
/// key-like and not probed as a determinant.
pub fn check_normalization(
    query: &mut dyn QueryInterface,
    table: &str,
    primary_key: &str,
    columns: &[String],
) -> CheckResult<CheckReport> {
    let mut rec = Recorder::new(query);
    let mut findings = Vec::new();

    let non_key: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|c| *c != primary_key)
        .collect();

    'scan: for &x in &non_key {
        let [total, distinct_x] = rec.counts::<2>(&sql::determinant_probe(table, x)?)?;
        if distinct_x == total {
            continue;
        }

        for &y in non_key.iter().filter(|y| **y != x) {
            let [distinct_xy, distinct_x] = rec.counts::<2>(&sql::pair_probe(table, x, y)?)?;
            if distinct_xy == distinct_x {
                findings.push(format!("{} -> {}", x, y));
                break 'scan;
            }
        }
    }

    Ok(rec.finish(table, CheckKind::Normalization, findings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::testing::ScriptedQuery;
    use crate::checker::Verdict;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_only_key_column_is_vacuously_normalized() {
        let mut q = ScriptedQuery::default();
        let report = check_normalization(&mut q, "t", "id", &cols(&["id"])).unwrap();
        assert_eq!(report.verdict, Verdict::Yes);
        assert!(q.issued.is_empty());
    }

    #[test]
    fn test_all_distinct_columns_skip_pair_probes() {
        // b and c: 4 rows, 4 distinct each
        let mut q = ScriptedQuery::with_counts(&[&[4, 4], &[4, 4]]);
        let report = check_normalization(&mut q, "t", "a", &cols(&["a", "b", "c"])).unwrap();

        assert_eq!(report.verdict, Verdict::Yes);
        assert_eq!(q.issued.len(), 2);
        assert!(q.issued.iter().all(|s| s.starts_with("SELECT COUNT(*), ")));
    }

    #[test]
    fn test_dependency_found_stops_scan() {
        // b repeats (4 rows, 2 distinct); (b, c) has 2 distinct pairs
        let mut q = ScriptedQuery::with_counts(&[&[4, 2], &[2, 2]]);
        let report = check_normalization(&mut q, "t", "a", &cols(&["a", "b", "c", "d"])).unwrap();

        assert_eq!(report.verdict, Verdict::No);
        assert_eq!(report.findings, vec!["b -> c"]);
        assert_eq!(q.issued.len(), 2);
        assert_eq!(report.statements, q.issued);
    }

    #[test]
    fn test_repeating_column_without_dependency() {
        // b repeats but (b, c) pairs outnumber b values; c is all distinct
        let mut q = ScriptedQuery::with_counts(&[&[4, 2], &[3, 2], &[4, 4]]);
        let report = check_normalization(&mut q, "t", "a", &cols(&["a", "b", "c"])).unwrap();

        assert_eq!(report.verdict, Verdict::Yes);
        assert!(report.findings.is_empty());
        assert_eq!(q.issued.len(), 3);
    }

    #[test]
    fn test_primary_key_never_probed() {
        let mut q = ScriptedQuery::with_counts(&[&[3, 3]]);
        check_normalization(&mut q, "t", "id", &cols(&["v", "id"])).unwrap();
        assert_eq!(q.issued.len(), 1);
        assert!(!q.issued[0].contains("DISTINCT id"));
    }
}
