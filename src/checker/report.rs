//! Check verdicts and reports

use std::fmt;

use serde::Serialize;

use crate::observability::AuditRole;

/// Pass/fail verdict, rendered as `Y` / `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Yes => "Y",
            Verdict::No => "N",
        }
    }

    pub fn from_pass(pass: bool) -> Self {
        if pass {
            Verdict::Yes
        } else {
            Verdict::No
        }
    }

    pub fn passed(&self) -> bool {
        *self == Verdict::Yes
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which checker produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckKind {
    #[serde(rename = "RI")]
    ReferentialIntegrity,
    Normalization,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::ReferentialIntegrity => "RI",
            CheckKind::Normalization => "NORMALIZATION",
        }
    }

    /// Audit log role for statements issued by this check.
    pub fn audit_role(&self) -> AuditRole {
        match self {
            CheckKind::ReferentialIntegrity => AuditRole::ReferentialIntegrity,
            CheckKind::Normalization => AuditRole::Normalization,
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one checker invocation on one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub table: String,
    pub kind: CheckKind,
    pub verdict: Verdict,
    /// Statements issued, in order
    pub statements: Vec<String>,
    /// Reasons behind an `N` verdict
    pub findings: Vec<String>,
}

impl CheckReport {
    pub fn verdict_line(&self) -> TableVerdict {
        TableVerdict {
            table: self.table.clone(),
            check: self.kind,
            verdict: self.verdict,
        }
    }
}

/// `{table, check, verdict}` triple handed to the caller for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableVerdict {
    pub table: String,
    pub check: CheckKind,
    pub verdict: Verdict,
}
