//! Run output
//!
//! Text mode prints one verdict line per table, with indented diagnostic
//! and finding lines under it. JSON mode prints a single object.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::json;

use crate::checker::{CheckKind, TableVerdict};
use crate::schema::ParseResult;
use crate::storage::Row;

use super::errors::CliResult;

/// What happened to one parsed table during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TableOutcome {
    /// Both checks produced verdicts
    Checked {
        table: String,
        verdicts: Vec<TableVerdict>,
        findings: Vec<String>,
        diagnostics: Vec<String>,
    },
    /// Structurally unusable; never sent to a checker
    Skipped {
        table: String,
        reason: String,
        diagnostics: Vec<String>,
    },
    /// A query failed mid-check
    Failed {
        table: String,
        error: String,
        diagnostics: Vec<String>,
    },
}

impl TableOutcome {
    pub fn table(&self) -> &str {
        match self {
            TableOutcome::Checked { table, .. }
            | TableOutcome::Skipped { table, .. }
            | TableOutcome::Failed { table, .. } => table,
        }
    }

    fn diagnostics(&self) -> &[String] {
        match self {
            TableOutcome::Checked { diagnostics, .. }
            | TableOutcome::Skipped { diagnostics, .. }
            | TableOutcome::Failed { diagnostics, .. } => diagnostics,
        }
    }

    /// The one-line summary for this table.
    pub fn summary(&self) -> String {
        match self {
            TableOutcome::Checked { table, verdicts, .. } => {
                let parts: Vec<String> = verdicts
                    .iter()
                    .map(|v| format!("{}={}", label(v), v.verdict))
                    .collect();
                format!("{}: {}", table, parts.join(" "))
            }
            TableOutcome::Skipped { table, reason, .. } => format!("{}: skipped ({})", table, reason),
            TableOutcome::Failed { table, error, .. } => format!("{}: error ({})", table, error),
        }
    }
}

fn label(v: &TableVerdict) -> &'static str {
    match v.check {
        CheckKind::ReferentialIntegrity => "RI",
        CheckKind::Normalization => "NORMALIZED",
    }
}

/// Renders the text report.
pub fn render_text(parsed: &ParseResult, outcomes: &[TableOutcome]) -> String {
    let mut out = String::new();
    for err in &parsed.global_errors {
        out.push_str(&format!("global: {}\n", err));
    }
    for outcome in outcomes {
        out.push_str(&outcome.summary());
        out.push('\n');
        for diag in outcome.diagnostics() {
            out.push_str(&format!("    diagnostic: {}\n", diag));
        }
        if let TableOutcome::Checked { findings, .. } = outcome {
            for finding in findings {
                out.push_str(&format!("    finding: {}\n", finding));
            }
        }
    }
    out
}

/// Renders the JSON report.
pub fn render_json(parsed: &ParseResult, outcomes: &[TableOutcome]) -> CliResult<String> {
    let value = json!({
        "global_errors": parsed.global_errors,
        "tables": outcomes,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Write the run report to stdout
pub fn write_outcomes(parsed: &ParseResult, outcomes: &[TableOutcome], as_json: bool) -> CliResult<()> {
    let body = if as_json {
        let mut s = render_json(parsed, outcomes)?;
        s.push('\n');
        s
    } else {
        render_text(parsed, outcomes)
    };

    let mut stdout = io::stdout();
    stdout.write_all(body.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Write a tab-separated table of rows to stdout
pub fn write_rows(columns: &[String], rows: &[Row]) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", columns.join("\t"))?;
    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(stdout, "{}", cells.join("\t"))?;
    }
    stdout.flush()?;
    Ok(())
}

/// Write a single line to stdout
pub fn write_line(line: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Verdict;

    fn checked() -> TableOutcome {
        TableOutcome::Checked {
            table: "orders".into(),
            verdicts: vec![
                TableVerdict {
                    table: "orders".into(),
                    check: CheckKind::ReferentialIntegrity,
                    verdict: Verdict::Yes,
                },
                TableVerdict {
                    table: "orders".into(),
                    check: CheckKind::Normalization,
                    verdict: Verdict::No,
                },
            ],
            findings: vec!["customer -> total".into()],
            diagnostics: vec!["duplicate column total".into()],
        }
    }

    #[test]
    fn test_summary_lines() {
        assert_eq!(checked().summary(), "orders: RI=Y NORMALIZED=N");

        let skipped = TableOutcome::Skipped {
            table: "line_2".into(),
            reason: "unparsable line".into(),
            diagnostics: Vec::new(),
        };
        assert_eq!(skipped.summary(), "line_2: skipped (unparsable line)");
    }

    #[test]
    fn test_render_text_includes_details() {
        let parsed = ParseResult {
            tables: Vec::new(),
            global_errors: vec!["Line 2: can't parse table line: '??'".into()],
        };
        let text = render_text(&parsed, &[checked()]);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "global: Line 2: can't parse table line: '??'");
        assert_eq!(lines[1], "orders: RI=Y NORMALIZED=N");
        assert_eq!(lines[2], "    diagnostic: duplicate column total");
        assert_eq!(lines[3], "    finding: customer -> total");
    }

    #[test]
    fn test_render_json_shape() {
        let text = render_json(&ParseResult::default(), &[checked()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["tables"][0]["status"], "checked");
        assert_eq!(value["tables"][0]["verdicts"][0]["check"], "RI");
        assert_eq!(value["tables"][0]["verdicts"][1]["verdict"], "N");
    }
}
