//! Table descriptor types produced by the schema parser
//!
//! Descriptors are value objects: built once per parse and consumed
//! read-only by the checkers. The serialized form keeps the short key
//! names (`table`, `pk`, `cols`, `fks`) used by the parsed-JSON export.

use serde::{Deserialize, Serialize};

/// Maximum number of foreign keys retained per table.
pub const MAX_FOREIGN_KEYS: usize = 3;

/// How a descriptor came out of the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStatus {
    /// Line parsed with no diagnostics
    Parsed,
    /// Line parsed, but diagnostics were recorded
    Diagnosed,
    /// Line was not a `name(...)` form; descriptor is a stand-in
    Placeholder,
}

/// A declared foreign key.
///
/// Either reference field is `None` when the reference text could not be
/// parsed. The entry is still kept so callers can see an FK was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Referencing column in the declaring table
    #[serde(rename = "col")]
    pub column: String,
    /// Referenced (parent) table
    pub ref_table: Option<String>,
    /// Referenced column in the parent table
    #[serde(rename = "ref_pk")]
    pub ref_column: Option<String>,
}

impl ForeignKey {
    /// Create a well-formed foreign key.
    pub fn new(
        column: impl Into<String>,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            ref_table: Some(ref_table.into()),
            ref_column: Some(ref_column.into()),
        }
    }

    /// Create a foreign key whose reference could not be parsed.
    pub fn unresolved(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ref_table: None,
            ref_column: None,
        }
    }

    /// Returns the `(column, ref_table, ref_column)` triplet if every part is present.
    pub fn resolved(&self) -> Option<(&str, &str, &str)> {
        match (&self.ref_table, &self.ref_column) {
            (Some(table), Some(column)) if !self.column.is_empty() => {
                Some((&self.column, table, column))
            }
            _ => None,
        }
    }
}

/// One parsed table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Lowercase table name (`line_<n>` for placeholders)
    #[serde(rename = "table")]
    pub name: String,
    /// Single primary key column, if exactly one was annotated
    #[serde(rename = "pk")]
    pub primary_key: Option<String>,
    /// Columns in declaration order
    #[serde(rename = "cols")]
    pub columns: Vec<String>,
    /// At most [`MAX_FOREIGN_KEYS`] declared foreign keys
    #[serde(rename = "fks")]
    pub foreign_keys: Vec<ForeignKey>,
    /// True when zero or several columns carried a `pk` annotation
    #[serde(rename = "composite")]
    pub is_composite: bool,
    /// True when the table cannot be checked
    pub skip: bool,
    /// Diagnostics accumulated while parsing this line
    pub errors: Vec<String>,
    /// 1-based source line
    pub line: usize,
    pub status: ParseStatus,
}

impl TableDescriptor {
    /// Stand-in descriptor for a line that did not parse as a table.
    pub fn placeholder(line: usize) -> Self {
        Self {
            name: format!("line_{}", line),
            primary_key: None,
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            is_composite: true,
            skip: true,
            errors: vec!["can't parse table line".to_string()],
            line,
            status: ParseStatus::Placeholder,
        }
    }

    /// Returns the non-key columns in declaration order.
    pub fn non_key_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(move |c| Some(*c) != self.primary_key.as_deref())
    }

    /// Short human-readable reason the table is skipped, if it is.
    pub fn skip_reason(&self) -> Option<&'static str> {
        if !self.skip {
            return None;
        }
        Some(match self.status {
            ParseStatus::Placeholder => "unparsable line",
            _ if self.columns.is_empty() => "no columns",
            _ if self.is_composite => "composite or missing key; case not considered",
            _ => "primary key not among columns",
        })
    }
}

/// Outcome of parsing a whole schema text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// One descriptor per non-blank, non-comment line, in input order
    pub tables: Vec<TableDescriptor>,
    /// Line-level failures
    pub global_errors: Vec<String>,
}

impl ParseResult {
    /// Tables eligible for checking.
    pub fn checkable(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.iter().filter(|t| !t.skip)
    }

    /// Looks up a table by its (lowercase) name.
    pub fn table(&self, name: &str) -> Option<&TableDescriptor> {
        let name = name.to_ascii_lowercase();
        self.tables.iter().find(|t| t.name == name)
    }

    /// Total diagnostics across global and per-table lists.
    pub fn diagnostic_count(&self) -> usize {
        self.global_errors.len() + self.tables.iter().map(|t| t.errors.len()).sum::<usize>()
    }
}
