//! Store Check Tests
//!
//! Runs both checkers against a real SQLite database:
//! - Orphaned FK values fail referential integrity
//! - NULL FK values are never orphans
//! - An empirical dependency between non-key columns fails normalization
//! - Every issued statement is captured in the audit run

use schemacheck::checker::{check_normalization, check_ri, CheckKind, Verdict};
use schemacheck::cli::{check_tables, render_text, TableOutcome};
use schemacheck::observability::{AuditRole, AuditRun, FileAuditLog};
use schemacheck::schema::{parse, ForeignKey};
use schemacheck::storage::SqliteStore;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn shop_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().expect("Failed to open store");
    store
        .execute_batch(
            "CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT, city TEXT);
             INSERT INTO customers VALUES (1, 'ann', 'oslo'), (2, 'bob', 'rome'), (3, 'cy', 'oslo');

             CREATE TABLE orders (id INTEGER PRIMARY KEY, customer INTEGER, total INTEGER);
             INSERT INTO orders VALUES (1, 1, 10), (2, 2, 20), (3, NULL, 30), (4, 3, 40);

             CREATE TABLE stray_orders (id INTEGER PRIMARY KEY, customer INTEGER);
             INSERT INTO stray_orders VALUES (1, 1), (2, 99), (3, 98);

             CREATE TABLE addresses (id INTEGER PRIMARY KEY, zip TEXT, town TEXT);
             INSERT INTO addresses VALUES
                 (1, '0150', 'oslo'), (2, '0150', 'oslo'), (3, '00100', 'rome');",
        )
        .expect("Failed to seed store");
    store
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Referential Integrity
// =============================================================================

/// NULL child values do not count as orphans.
#[test]
fn test_ri_passes_with_null_child_values() {
    let mut store = shop_store();
    let fks = [ForeignKey::new("customer", "customers", "id")];

    let report = check_ri(&mut store, "orders", &fks).unwrap();
    assert_eq!(report.verdict, Verdict::Yes);
    assert_eq!(report.statements.len(), 3);
}

/// Child values with no parent row fail the check.
#[test]
fn test_ri_fails_on_orphans() {
    let mut store = shop_store();
    let fks = [ForeignKey::new("customer", "customers", "id")];

    let report = check_ri(&mut store, "stray_orders", &fks).unwrap();
    assert_eq!(report.verdict, Verdict::No);
    assert_eq!(
        report.findings,
        vec!["stray_orders.customer -> customers.id: 2 orphan row(s) of 3 (1 joined)"]
    );
}

// =============================================================================
// Normalization
// =============================================================================

/// zip determines town in the stored rows.
#[test]
fn test_normalization_detects_dependency() {
    let mut store = shop_store();
    let report =
        check_normalization(&mut store, "addresses", "id", &cols(&["id", "zip", "town"])).unwrap();

    assert_eq!(report.verdict, Verdict::No);
    assert_eq!(report.findings, vec!["zip -> town"]);
}

/// Repeating values alone are not a dependency.
#[test]
fn test_normalization_passes_without_dependency() {
    let mut store = shop_store();
    // city repeats (oslo twice) but maps to two different names
    let report = check_normalization(
        &mut store,
        "customers",
        "id",
        &cols(&["id", "city", "name"]),
    )
    .unwrap();

    assert_eq!(report.verdict, Verdict::Yes);
    assert!(report.findings.is_empty());
}

/// A column named by digits is read as a column, not a number.
#[test]
fn test_numeric_column_name() {
    let mut store = shop_store();
    store
        .execute_batch(
            r#"CREATE TABLE t (id INTEGER PRIMARY KEY, "1" INTEGER, b INTEGER);
               INSERT INTO t VALUES (1, 10, 1), (2, 20, 1), (3, 30, 2);"#,
        )
        .unwrap();

    let parsed = parse("t(id(pk), 1, b)");
    let t = &parsed.tables[0];
    let report = check_normalization(&mut store, &t.name, "id", &t.columns).unwrap();

    // "1" is all-distinct and b -> "1" does not hold
    assert_eq!(report.verdict, Verdict::Yes);
    assert!(report.findings.is_empty());
}

/// A missing table is a query error, not a verdict.
#[test]
fn test_missing_table_is_an_error() {
    let mut store = shop_store();
    let result = check_normalization(&mut store, "ghost", "id", &cols(&["id", "v"]));
    assert!(result.is_err());
}

// =============================================================================
// Whole Run
// =============================================================================

const SCHEMA: &str = "\
customers(id(pk), name, city)
orders(id(pk), customer(fk:customers.id), total)
stray_orders(id(pk), customer(fk:customers.id))
addresses(id(pk), zip, town)
pairs(a(pk), b(pk))
";

/// One outcome per descriptor, in input order.
#[test]
fn test_run_reports_every_table() {
    let parsed = parse(SCHEMA);
    let mut store = shop_store();
    let mut audit = AuditRun::new();

    let outcomes = check_tables(&parsed, &mut store, &mut audit, false).unwrap();
    let text = render_text(&parsed, &outcomes);
    let summaries: Vec<_> = text.lines().filter(|l| !l.starts_with(' ')).collect();

    assert_eq!(
        summaries,
        vec![
            "customers: RI=Y NORMALIZED=Y",
            "orders: RI=Y NORMALIZED=Y",
            "stray_orders: RI=N NORMALIZED=Y",
            "addresses: RI=Y NORMALIZED=N",
            "pairs: skipped (composite or missing key; case not considered)",
        ]
    );
    assert!(matches!(outcomes[4], TableOutcome::Skipped { .. }));
}

/// Audit groups follow issue order: RI before normalization, table by table.
#[test]
fn test_audit_captures_statements_in_order() {
    let parsed = parse(SCHEMA);
    let mut store = shop_store();
    let mut audit = AuditRun::new();
    check_tables(&parsed, &mut store, &mut audit, false).unwrap();

    let groups: Vec<_> = audit
        .entries
        .iter()
        .map(|e| (e.table.as_str(), e.role))
        .collect();
    assert_eq!(
        groups,
        vec![
            ("customers", AuditRole::Normalization),
            ("orders", AuditRole::ReferentialIntegrity),
            ("orders", AuditRole::Normalization),
            ("stray_orders", AuditRole::ReferentialIntegrity),
            ("stray_orders", AuditRole::Normalization),
            ("addresses", AuditRole::Normalization),
        ]
    );
    assert_eq!(CheckKind::Normalization.audit_role(), AuditRole::Normalization);
}

/// A check that fails partway still leaves its statements in the audit,
/// the failing one last.
#[test]
fn test_audit_keeps_statements_of_failed_checks() {
    let parsed = parse(
        "orders(id(pk), customer(fk:customers.id), ghostcol, total)\n\
         ghost(id(pk), v)",
    );
    let mut store = shop_store();
    let mut audit = AuditRun::new();

    let outcomes = check_tables(&parsed, &mut store, &mut audit, false).unwrap();
    assert!(matches!(outcomes[0], TableOutcome::Failed { .. }));
    assert!(matches!(outcomes[1], TableOutcome::Failed { .. }));

    let groups: Vec<_> = audit
        .entries
        .iter()
        .map(|e| (e.table.as_str(), e.role, e.statements.len()))
        .collect();
    assert_eq!(
        groups,
        vec![
            ("orders", AuditRole::ReferentialIntegrity, 3),
            // customer is all-distinct, so the next probe is on ghostcol
            ("orders", AuditRole::Normalization, 2),
            ("ghost", AuditRole::Normalization, 1),
        ]
    );
    assert!(audit.entries[1].statements[1].contains(r#"DISTINCT "ghostcol""#));
    assert!(audit.entries[2].statements[0].contains(r#"FROM "ghost""#));
}

/// Runs append to the audit file; earlier runs are kept.
#[test]
fn test_audit_file_appends_runs() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("checkdb.sql");
    let parsed = parse(SCHEMA);

    for _ in 0..2 {
        let mut store = shop_store();
        let mut audit = AuditRun::new();
        check_tables(&parsed, &mut store, &mut audit, false).unwrap();
        FileAuditLog::open(&path).unwrap().append_run(&audit).unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("-- >>> schemacheck run").count(), 2);
    assert_eq!(content.matches("-- <<< schemacheck run").count(), 2);
    assert!(content.contains(r#"LEFT JOIN "customers""#));
}
