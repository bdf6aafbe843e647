//! Observable events for a schemacheck run

use std::fmt;

/// Lifecycle events of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Run begins
    RunStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Schema text parsed
    SchemaParsed,
    /// A line- or table-level parse diagnostic
    ParseDiagnostic,
    /// Table not checked (structurally unusable)
    TableSkipped,
    /// A check produced a verdict
    CheckComplete,
    /// A check aborted on a query failure
    CheckFailed,
    /// Audit statements appended to the log file
    AuditFlushed,
    /// Run finished
    RunComplete,
    /// Run aborted (FATAL)
    RunAborted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RunStart => "RUN_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaParsed => "SCHEMA_PARSED",
            Event::ParseDiagnostic => "PARSE_DIAGNOSTIC",
            Event::TableSkipped => "TABLE_SKIPPED",
            Event::CheckComplete => "CHECK_COMPLETE",
            Event::CheckFailed => "CHECK_FAILED",
            Event::AuditFlushed => "AUDIT_FLUSHED",
            Event::RunComplete => "RUN_COMPLETE",
            Event::RunAborted => "RUN_ABORTED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::RunAborted)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
