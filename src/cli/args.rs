//! CLI argument definitions using clap
//!
//! Commands:
//! - schemacheck check --schema <path> [--config <path>] [--database <path>]
//! - schemacheck parse --schema <path> [--out <path>]
//! - schemacheck peek --table <name> [--limit <n>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// schemacheck - cross-check a declared schema against live data
#[derive(Parser, Debug)]
#[command(name = "schemacheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options locating the live store
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Path to configuration file (default: ./schemacheck.json if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// SQLite database to check; overrides the config file
    #[arg(long)]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a schema file and check every usable table against the store
    Check {
        /// Schema text file
        #[arg(long)]
        schema: PathBuf,

        #[command(flatten)]
        store: StoreArgs,

        /// Audit log file; overrides the config file
        #[arg(long)]
        audit_log: Option<PathBuf>,

        /// Do not append issued statements to the audit log
        #[arg(long)]
        no_audit: bool,

        /// Print verdicts as JSON instead of text lines
        #[arg(long)]
        json: bool,
    },

    /// Parse a schema file and write the parsed descriptors as JSON
    Parse {
        /// Schema text file
        #[arg(long)]
        schema: PathBuf,

        /// Output path (default: <schema>.parsed.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the first rows of a table as a connectivity smoke test
    Peek {
        /// Table to read
        #[arg(long)]
        table: String,

        /// Maximum rows to print
        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[command(flatten)]
        store: StoreArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
