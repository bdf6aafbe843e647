//! schemacheck - cross-check a declared schema against live data
//!
//! Parses a line-oriented schema description into table descriptors, then
//! asks a SQLite store whether each table's foreign keys hold and whether
//! its non-key columns show a functional dependency.

pub mod checker;
pub mod cli;
pub mod observability;
pub mod schema;
pub mod storage;
