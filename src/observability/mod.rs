//! Observability subsystem for schemacheck
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Scoped begin/complete logging
//! - SQL audit log of every statement the checkers issue
//!
//! # Usage
//!
//! ```ignore
//! use schemacheck::observability::{log_event_with_fields, Event, Logger};
//!
//! Logger::info("CHECK_COMPLETE", &[("table", "orders"), ("verdict", "Y")]);
//! log_event_with_fields(Event::TableSkipped, &[("table", "line_3")]);
//! ```

pub mod audit;
mod events;
mod logger;
mod scope;

pub use audit::{AuditEntry, AuditRole, AuditRun, FileAuditLog};
pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
///
/// Severity follows the event: fatal events at FATAL, failures at ERROR,
/// skips and diagnostics at WARN, everything else at INFO.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = match event {
        e if e.is_fatal() => Severity::Fatal,
        Event::CheckFailed => Severity::Error,
        Event::TableSkipped | Event::ParseDiagnostic => Severity::Warn,
        _ => Severity::Info,
    };
    Logger::log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::RunStart);
        log_event(Event::RunComplete);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::TableSkipped, &[("table", "line_3")]);
    }
}
