//! CLI-specific error types
//!
//! Any of these ends the process with a non-zero exit status.

use std::fmt;
use std::io;

use crate::checker::CheckError;
use crate::schema::SchemaError;
use crate::storage::QueryError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, audit log)
    IoError,
    /// Schema file could not be read or exported
    SchemaError,
    /// Store could not be opened or queried
    StoreError,
    /// A table check failed and the run was configured to abort
    CheckAborted,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SCHK_CLI_CONFIG_ERROR",
            Self::IoError => "SCHK_CLI_IO_ERROR",
            Self::SchemaError => "SCHK_CLI_SCHEMA_ERROR",
            Self::StoreError => "SCHK_CLI_STORE_ERROR",
            Self::CheckAborted => "SCHK_CLI_CHECK_ABORTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn store_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::StoreError, msg)
    }

    /// Run aborted on a failed table check
    pub fn check_aborted(table: &str, cause: impl fmt::Display) -> Self {
        Self::new(
            CliErrorCode::CheckAborted,
            format!("check of table '{}' failed: {}", table, cause),
        )
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, e.to_string())
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::store_error(e.to_string())
    }
}

impl From<CheckError> for CliError {
    fn from(e: CheckError) -> Self {
        Self::store_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
