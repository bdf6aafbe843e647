//! CLI module for schemacheck
//!
//! Provides command-line interface for:
//! - check: Parse a schema file and check it against the live store
//! - parse: Export parsed descriptors as JSON
//! - peek: Print the first rows of a table

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, StoreArgs};
pub use commands::{check, check_tables, parse, peek, run, run_command, Config, DEFAULT_CONFIG_PATH};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{render_json, render_text, TableOutcome};
