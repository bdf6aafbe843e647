//! Schema file loading and parsed-JSON export
//!
//! - `read_schema_file` reads UTF-8 schema text and parses it
//! - `write_parsed_json` writes `{"tables": [...], "global_errors": [...]}`
//!   next to the schema file (`<schema>.parsed.json`) unless told otherwise

use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::parser::parse;
use super::types::ParseResult;

/// Reads schema files from disk and hands their text to the parser.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Reads and parses a schema file.
    ///
    /// Only I/O can fail here; malformed content becomes diagnostics.
    pub fn read_schema_file(path: &Path) -> SchemaResult<ParseResult> {
        let text = fs::read_to_string(path)
            .map_err(|e| SchemaError::unreadable(path.display().to_string(), e))?;
        Ok(parse(&text))
    }

    /// Default export location for a schema file.
    pub fn default_output_path(schema_path: &Path) -> PathBuf {
        let mut name = schema_path.as_os_str().to_os_string();
        name.push(".parsed.json");
        PathBuf::from(name)
    }

    /// Parses `schema_path` and writes the result as pretty JSON.
    ///
    /// Returns the output path used.
    pub fn write_parsed_json(schema_path: &Path, out_path: Option<&Path>) -> SchemaResult<PathBuf> {
        let result = Self::read_schema_file(schema_path)?;
        let out = out_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::default_output_path(schema_path));

        let content = serde_json::to_string_pretty(&result)
            .map_err(|e| SchemaError::output_failed(out.display().to_string(), e))?;

        fs::write(&out, content)
            .map_err(|e| SchemaError::output_failed(out.display().to_string(), e))?;

        Ok(out)
    }
}
