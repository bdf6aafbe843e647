//! Line-oriented schema text parser
//!
//! Grammar, one table per line:
//!
//! ```text
//! orders(id(pk), customer(fk:customers.id), total)
//! ```
//!
//! - Blank lines and lines starting with `--` or `#` are ignored
//! - Identifiers are `[A-Za-z0-9_]+` and normalized to lowercase
//! - Column annotations: `pk`, `fk:TABLE.COLUMN` (or `fk TABLE.COLUMN`)
//!
//! Parsing never fails. Malformed lines and tokens become diagnostics on
//! the affected descriptor, and an unparsable line still yields a skipped
//! placeholder so every input line is accounted for.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::types::{ForeignKey, ParseResult, ParseStatus, TableDescriptor, MAX_FOREIGN_KEYS};

fn table_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z0-9_]+)\s*\(\s*(.*)\s*\)\s*$").expect("table line pattern")
    })
}

fn column_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_]+)\s*(?:\(\s*([^)]+)\s*\))?$").expect("column token pattern")
    })
}

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_]+)\.([A-Za-z0-9_]+)$").expect("reference pattern")
    })
}

/// Result of parsing a single table line.
enum LineOutcome {
    /// A descriptor was built, possibly carrying diagnostics
    Table(TableDescriptor),
    /// The line is not a `name(...)` form
    Unparsable,
}

/// Parses schema text into table descriptors.
///
/// Pure and deterministic: the same text always yields the same result.
pub fn parse(text: &str) -> ParseResult {
    let mut result = ParseResult::default();

    for (idx, raw) in text.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }

        match parse_line(line, lineno) {
            LineOutcome::Table(table) => result.tables.push(table),
            LineOutcome::Unparsable => {
                result
                    .global_errors
                    .push(format!("Line {}: can't parse table line: '{}'", lineno, raw));
                result.tables.push(TableDescriptor::placeholder(lineno));
            }
        }
    }

    result
}

fn is_comment(line: &str) -> bool {
    line.starts_with("--") || line.starts_with('#')
}

fn parse_line(line: &str, lineno: usize) -> LineOutcome {
    let Some(caps) = table_line_re().captures(line) else {
        return LineOutcome::Unparsable;
    };

    let name = caps[1].to_ascii_lowercase();
    let body = caps[2].trim();

    let mut builder = TableBuilder::new(name, lineno);
    if body.is_empty() {
        builder.errors.push("no columns found".to_string());
        return LineOutcome::Table(builder.finish());
    }

    for token in body.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        builder.add_token(token);
    }

    LineOutcome::Table(builder.finish())
}

/// Accumulates one table's columns, keys, and diagnostics.
struct TableBuilder {
    name: String,
    line: usize,
    columns: Vec<String>,
    seen: HashSet<String>,
    pk_candidates: Vec<String>,
    foreign_keys: Vec<ForeignKey>,
    errors: Vec<String>,
}

impl TableBuilder {
    fn new(name: String, line: usize) -> Self {
        Self {
            name,
            line,
            columns: Vec::new(),
            seen: HashSet::new(),
            pk_candidates: Vec::new(),
            foreign_keys: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn add_token(&mut self, token: &str) {
        let Some(caps) = column_token_re().captures(token) else {
            self.errors
                .push(format!("can't parse column token '{}'", token));
            return;
        };

        let column = caps[1].to_ascii_lowercase();
        if self.seen.insert(column.clone()) {
            self.columns.push(column.clone());
        } else {
            self.errors.push(format!("duplicate column {}", column));
        }

        if let Some(annotation) = caps.get(2) {
            self.annotate(&column, annotation.as_str());
        }
    }

    fn annotate(&mut self, column: &str, annotation: &str) {
        let ann = annotation.trim().to_ascii_lowercase();

        if ann == "pk" {
            self.pk_candidates.push(column.to_string());
        } else if ann.starts_with("fk:") || ann.starts_with("fk ") {
            let rest = &ann[2..];
            let reference = rest.strip_prefix(':').unwrap_or(rest).trim();
            match reference_re().captures(reference) {
                Some(r) => self
                    .foreign_keys
                    .push(ForeignKey::new(column, &r[1], &r[2])),
                None => {
                    self.errors.push(format!(
                        "bad FK reference '{}' on column {}",
                        reference, column
                    ));
                    self.foreign_keys.push(ForeignKey::unresolved(column));
                }
            }
        } else {
            self.errors.push(format!(
                "unknown annotation '{}' for column {}",
                ann, column
            ));
        }
    }

    fn finish(mut self) -> TableDescriptor {
        if self.foreign_keys.len() > MAX_FOREIGN_KEYS {
            self.errors
                .push("more than 3 FKs found; only first 3 kept".to_string());
            self.foreign_keys.truncate(MAX_FOREIGN_KEYS);
        }

        let (primary_key, is_composite) = match self.pk_candidates.as_slice() {
            [only] => (Some(only.clone()), false),
            _ => (None, true),
        };

        if self.columns.is_empty() && self.errors.iter().all(|e| e != "no columns found") {
            self.errors.push("no columns found".to_string());
        }

        // Final authority on skip: structural disqualification only.
        let pk_missing = match &primary_key {
            Some(pk) if !self.columns.contains(pk) => {
                self.errors.push("pk not found in cols".to_string());
                true
            }
            Some(_) => false,
            None => true,
        };
        let skip = pk_missing || self.columns.is_empty();

        let status = if self.errors.is_empty() {
            ParseStatus::Parsed
        } else {
            ParseStatus::Diagnosed
        };

        TableDescriptor {
            name: self.name,
            primary_key,
            columns: self.columns,
            foreign_keys: self.foreign_keys,
            is_composite,
            skip,
            errors: self.errors,
            line: self.line,
            status,
        }
    }
}
