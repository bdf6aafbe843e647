//! Schema file error types
//!
//! Parsing itself never fails; these errors only cover reading schema
//! files and writing the parsed-JSON export.
//!
//! Error codes:
//! - SCHK_SCHEMA_UNREADABLE
//! - SCHK_PARSED_OUTPUT_FAILED

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema file missing, unreadable, or not UTF-8
    SchemaUnreadable,
    /// Parsed JSON could not be serialized or written
    ParsedOutputFailed,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaUnreadable => "SCHK_SCHEMA_UNREADABLE",
            SchemaErrorCode::ParsedOutputFailed => "SCHK_PARSED_OUTPUT_FAILED",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema file error with path context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    path: String,
}

impl SchemaError {
    /// Create an unreadable schema file error
    pub fn unreadable(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        let path = path.into();
        Self {
            code: SchemaErrorCode::SchemaUnreadable,
            message: format!("Failed to read schema file '{}': {}", path, reason),
            path,
        }
    }

    /// Create a parsed-output failure
    pub fn output_failed(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        let path = path.into();
        Self {
            code: SchemaErrorCode::ParsedOutputFailed,
            message: format!("Failed to write parsed schema '{}': {}", path, reason),
            path,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the file path involved
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema file operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::SchemaUnreadable.code(), "SCHK_SCHEMA_UNREADABLE");
        assert_eq!(SchemaErrorCode::ParsedOutputFailed.code(), "SCHK_PARSED_OUTPUT_FAILED");
    }

    #[test]
    fn test_display_includes_code_and_path() {
        let err = SchemaError::unreadable("tc1.txt", "No such file");
        let display = err.to_string();
        assert!(display.starts_with("SCHK_SCHEMA_UNREADABLE"));
        assert!(display.contains("tc1.txt"));
        assert_eq!(err.path(), "tc1.txt");
    }
}
