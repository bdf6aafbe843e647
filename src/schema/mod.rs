//! Schema text parsing for schemacheck
//!
//! Turns compact schema text into validated table descriptors with
//! per-table diagnostics.
//!
//! # Design Principles
//!
//! - Parsing never fails; every problem is a diagnostic
//! - Every non-blank, non-comment line yields exactly one descriptor
//! - Descriptors are immutable once parsing completes
//! - Only structural disqualification marks a table as skipped

mod errors;
mod loader;
mod parser;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::SchemaLoader;
pub use parser::parse;
pub use types::{ForeignKey, ParseResult, ParseStatus, TableDescriptor, MAX_FOREIGN_KEYS};
