//! SQL statement builders
//!
//! Identifiers are spliced into statement text, so each one is checked
//! against the schema identifier grammar first and then double-quoted.
//! Quoting keeps a name like `1` a column reference rather than a literal.
//! All statements are semicolon-terminated and portable between SQLite and
//! PostgreSQL.
//!
//! Distinct counts go through `SELECT DISTINCT` sub-selects so NULL forms
//! a single group, unlike `COUNT(DISTINCT col)` which ignores it.

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{CheckError, CheckResult};

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("identifier pattern"))
}

/// Rejects anything outside the schema identifier grammar.
pub fn ident(name: &str) -> CheckResult<&str> {
    if identifier_re().is_match(name) {
        Ok(name)
    } else {
        Err(CheckError::InvalidIdentifier(name.to_string()))
    }
}

/// Allow-listed identifier, double-quoted for interpolation.
pub fn quoted(name: &str) -> CheckResult<String> {
    Ok(format!("\"{}\"", ident(name)?))
}

/// Child rows whose non-null FK value has no matching parent row.
pub fn orphan_count(table: &str, column: &str, ref_table: &str, ref_column: &str) -> CheckResult<String> {
    let (t, c, rt, rc) = (quoted(table)?, quoted(column)?, quoted(ref_table)?, quoted(ref_column)?);
    Ok(format!(
        "SELECT COUNT(*) FROM {t} AS c LEFT JOIN {rt} AS p ON c.{c} = p.{rc} \
         WHERE c.{c} IS NOT NULL AND p.{rc} IS NULL;"
    ))
}

/// Total rows in a table.
pub fn row_count(table: &str) -> CheckResult<String> {
    Ok(format!("SELECT COUNT(*) FROM {};", quoted(table)?))
}

/// Child rows that join to a parent row.
pub fn joined_count(table: &str, column: &str, ref_table: &str, ref_column: &str) -> CheckResult<String> {
    let (t, c, rt, rc) = (quoted(table)?, quoted(column)?, quoted(ref_table)?, quoted(ref_column)?);
    Ok(format!(
        "SELECT COUNT(*) FROM {t} AS c JOIN {rt} AS p ON c.{c} = p.{rc};"
    ))
}

/// Returns `[total rows, distinct X]`.
pub fn determinant_probe(table: &str, x: &str) -> CheckResult<String> {
    let (t, x) = (quoted(table)?, quoted(x)?);
    Ok(format!(
        "SELECT COUNT(*), (SELECT COUNT(*) FROM (SELECT DISTINCT {x} FROM {t}) AS dx) FROM {t};"
    ))
}

/// Returns `[distinct (X, Y), distinct X]`.
pub fn pair_probe(table: &str, x: &str, y: &str) -> CheckResult<String> {
    let (t, x, y) = (quoted(table)?, quoted(x)?, quoted(y)?);
    Ok(format!(
        "SELECT (SELECT COUNT(*) FROM (SELECT DISTINCT {x}, {y} FROM {t}) AS dxy), \
         (SELECT COUNT(*) FROM (SELECT DISTINCT {x} FROM {t}) AS dx);"
    ))
}

/// Raw smoke-test read of a table.
pub fn select_all(table: &str, limit: usize) -> CheckResult<String> {
    Ok(format!("SELECT * FROM {} LIMIT {};", quoted(table)?, limit))
}
