//! CLI command implementations
//!
//! `check` is the orchestrator: parse the schema file, run both checkers on
//! every usable table in order, print one verdict line per table, and
//! append the issued statements to the audit log at the end of the run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::checker::{check_normalization, check_ri, sql, CheckKind, CheckReport, CheckResult};
use crate::observability::{
    log_event_with_fields, AuditRun, Event, FileAuditLog, ObservationScope,
};
use crate::schema::{ParseResult, SchemaLoader, TableDescriptor};
use crate::storage::{QueryInterface, SqliteStore, StatementLog};

use super::args::{Command, StoreArgs};
use super::errors::{CliError, CliResult};
use super::io::{write_line, write_outcomes, write_rows, TableOutcome};

/// Config file consulted when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./schemacheck.json";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database to check (required, here or via `--database`)
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Audit log file (default "checkdb.sql")
    #[serde(default = "default_audit_log")]
    pub audit_log: PathBuf,

    /// Whether issued statements are appended to the audit log (default true)
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,

    /// Stop the run at the first failed table check (default false)
    #[serde(default)]
    pub abort_on_query_error: bool,
}

fn default_audit_log() -> PathBuf {
    PathBuf::from("checkdb.sql")
}
fn default_audit_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            audit_log: default_audit_log(),
            audit_enabled: default_audit_enabled(),
            abort_on_query_error: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        Ok(config)
    }

    /// Resolve the effective configuration from file and flags.
    ///
    /// An explicit `--config` must exist. The default path is optional.
    pub fn resolve(store: &StoreArgs, audit_log: Option<&Path>) -> CliResult<Self> {
        let mut config = match &store.config {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        if let Some(db) = &store.database {
            config.database = Some(db.clone());
        }
        if let Some(log) = audit_log {
            config.audit_log = log.to_path_buf();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        match &self.database {
            None => Err(CliError::config_error(
                "database is required (set it in the config file or pass --database)",
            )),
            Some(db) if db.as_os_str().is_empty() => {
                Err(CliError::config_error("database path must not be empty"))
            }
            Some(_) => {
                if self.audit_enabled && self.audit_log.as_os_str().is_empty() {
                    return Err(CliError::config_error("audit_log path must not be empty"));
                }
                Ok(())
            }
        }
    }

    /// Database path; only valid after `resolve`
    pub fn database_path(&self) -> CliResult<&Path> {
        self.database
            .as_deref()
            .ok_or_else(|| CliError::config_error("database is required"))
    }
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check {
            schema,
            store,
            audit_log,
            no_audit,
            json,
        } => check(&schema, &store, audit_log.as_deref(), no_audit, json),
        Command::Parse { schema, out } => parse(&schema, out.as_deref()),
        Command::Peek {
            table,
            limit,
            store,
        } => peek(&table, limit, &store),
    }
}

/// Check every usable table in a schema file against the store.
pub fn check(
    schema_path: &Path,
    store_args: &StoreArgs,
    audit_log: Option<&Path>,
    no_audit: bool,
    as_json: bool,
) -> CliResult<()> {
    log_event_with_fields(Event::RunStart, &[("schema", &schema_path.display().to_string())]);

    let mut config = Config::resolve(store_args, audit_log)?;
    if no_audit {
        config.audit_enabled = false;
    }
    let db_path = config.database_path()?.to_path_buf();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("database", &db_path.display().to_string())],
    );

    let parsed = SchemaLoader::read_schema_file(schema_path)?;
    report_diagnostics(&parsed);

    let mut store = SqliteStore::open_read_only(&db_path)?;
    let mut audit = AuditRun::new();

    let result = check_tables(&parsed, &mut store, &mut audit, config.abort_on_query_error);

    // Flush whatever was issued, even when the run aborted
    if config.audit_enabled && !audit.is_empty() {
        flush_audit(&config.audit_log, &audit)?;
    }

    let outcomes = match result {
        Ok(outcomes) => outcomes,
        Err(e) => {
            log_event_with_fields(Event::RunAborted, &[("reason", e.message())]);
            return Err(e);
        }
    };

    write_outcomes(&parsed, &outcomes, as_json)?;

    let checked = outcomes
        .iter()
        .filter(|o| matches!(o, TableOutcome::Checked { .. }))
        .count();
    log_event_with_fields(
        Event::RunComplete,
        &[
            ("checked", &checked.to_string()),
            ("tables", &outcomes.len().to_string()),
        ],
    );

    Ok(())
}

/// Run both checkers over every non-skipped table, in input order.
///
/// Skipped tables are reported without touching the store. A query failure
/// marks that table as failed and the run moves on, unless
/// `abort_on_query_error` is set.
pub fn check_tables(
    parsed: &ParseResult,
    store: &mut dyn QueryInterface,
    audit: &mut AuditRun,
    abort_on_query_error: bool,
) -> CliResult<Vec<TableOutcome>> {
    let mut outcomes = Vec::with_capacity(parsed.tables.len());

    for table in &parsed.tables {
        let diagnostics = table.errors.clone();

        let primary_key = match (table.skip_reason(), table.primary_key.as_deref()) {
            (None, Some(pk)) => pk,
            (reason, _) => {
                let reason = reason.unwrap_or("no primary key");
                log_event_with_fields(
                    Event::TableSkipped,
                    &[("table", &table.name), ("reason", reason)],
                );
                outcomes.push(TableOutcome::Skipped {
                    table: table.name.clone(),
                    reason: reason.to_string(),
                    diagnostics,
                });
                continue;
            }
        };

        let scope = ObservationScope::with_fields("TABLE_CHECK", &[("table", &table.name)]);
        match run_table_checks(store, table, primary_key, audit) {
            Ok((ri, normalization)) => {
                scope.complete_with_fields(&[
                    ("ri", ri.verdict.as_str()),
                    ("normalized", normalization.verdict.as_str()),
                ]);
                for report in [&ri, &normalization] {
                    log_event_with_fields(
                        Event::CheckComplete,
                        &[
                            ("table", &table.name),
                            ("check", report.kind.as_str()),
                            ("verdict", report.verdict.as_str()),
                            ("statements", &report.statements.len().to_string()),
                        ],
                    );
                }

                let mut findings = ri.findings.clone();
                findings.extend(normalization.findings.iter().cloned());
                outcomes.push(TableOutcome::Checked {
                    table: table.name.clone(),
                    verdicts: vec![ri.verdict_line(), normalization.verdict_line()],
                    findings,
                    diagnostics,
                });
            }
            Err(e) => {
                let message = e.to_string();
                scope.fail(&message);
                log_event_with_fields(
                    Event::CheckFailed,
                    &[("table", &table.name), ("error", &message)],
                );
                if abort_on_query_error {
                    return Err(CliError::check_aborted(&table.name, &message));
                }
                outcomes.push(TableOutcome::Failed {
                    table: table.name.clone(),
                    error: message,
                    diagnostics,
                });
            }
        }
    }

    Ok(outcomes)
}

/// Runs RI then normalization on one table.
///
/// Statements reach the audit run as they were issued, including those of a
/// check that failed partway and the failing statement itself.
fn run_table_checks(
    store: &mut dyn QueryInterface,
    table: &TableDescriptor,
    primary_key: &str,
    audit: &mut AuditRun,
) -> CheckResult<(CheckReport, CheckReport)> {
    let mut issued = Vec::new();
    let ri = check_ri(
        &mut StatementLog::new(&mut *store, &mut issued),
        &table.name,
        &table.foreign_keys,
    );
    audit.record(CheckKind::ReferentialIntegrity.audit_role(), &table.name, issued);
    let ri = ri?;

    let mut issued = Vec::new();
    let normalization = check_normalization(
        &mut StatementLog::new(&mut *store, &mut issued),
        &table.name,
        primary_key,
        &table.columns,
    );
    audit.record(CheckKind::Normalization.audit_role(), &table.name, issued);

    Ok((ri, normalization?))
}

fn report_diagnostics(parsed: &ParseResult) {
    log_event_with_fields(
        Event::SchemaParsed,
        &[
            ("tables", &parsed.tables.len().to_string()),
            ("checkable", &parsed.checkable().count().to_string()),
            ("diagnostics", &parsed.diagnostic_count().to_string()),
        ],
    );
    for err in &parsed.global_errors {
        log_event_with_fields(Event::ParseDiagnostic, &[("error", err)]);
    }
    for table in &parsed.tables {
        for err in &table.errors {
            log_event_with_fields(
                Event::ParseDiagnostic,
                &[("table", &table.name), ("error", err)],
            );
        }
    }
}

fn flush_audit(path: &Path, audit: &AuditRun) -> CliResult<()> {
    let mut log = FileAuditLog::open(path)
        .map_err(|e| CliError::io_error(format!("Failed to open audit log: {}", e)))?;
    log.append_run(audit)
        .map_err(|e| CliError::io_error(format!("Failed to write audit log: {}", e)))?;

    log_event_with_fields(
        Event::AuditFlushed,
        &[
            ("path", &path.display().to_string()),
            ("run_id", &audit.id.to_string()),
            ("statements", &audit.statement_count().to_string()),
        ],
    );
    Ok(())
}

/// Write the parsed descriptors of a schema file as JSON.
pub fn parse(schema_path: &Path, out: Option<&Path>) -> CliResult<()> {
    let used = SchemaLoader::write_parsed_json(schema_path, out)?;
    write_line(&format!(
        "Parsed {} into {}",
        schema_path.display(),
        used.display()
    ))
}

/// Print the first rows of a table.
pub fn peek(table: &str, limit: usize, store_args: &StoreArgs) -> CliResult<()> {
    let config = Config::resolve(store_args, None)?;
    let store = SqliteStore::open_read_only(config.database_path()?)?;

    let query = sql::select_all(table, limit)?;
    let (columns, rows) = store.fetch_all(&query, limit)?;
    write_rows(&columns, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Verdict;
    use crate::observability::AuditRole;
    use crate::schema::parse as parse_schema;
    use tempfile::TempDir;

    fn fixture_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute_batch(
                "CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT);
                 INSERT INTO customers VALUES (1, 'ann'), (2, 'bob');
                 CREATE TABLE orders (id INTEGER PRIMARY KEY, customer INTEGER, total INTEGER);
                 INSERT INTO orders VALUES (1, 1, 10), (2, 2, 20), (3, 1, 30);",
            )
            .unwrap();
        store
    }

    #[test]
    fn test_config_defaults() {
        let config: Config = serde_json::from_str(r#"{"database": "store.db"}"#).unwrap();
        assert_eq!(config.audit_log, PathBuf::from("checkdb.sql"));
        assert!(config.audit_enabled);
        assert!(!config.abort_on_query_error);
    }

    #[test]
    fn test_config_requires_database() {
        let err = Config::default().validate().unwrap_err();
        assert_eq!(err.code_str(), "SCHK_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_resolve_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schemacheck.json");
        fs::write(&path, r#"{"database": "a.db", "audit_log": "a.sql"}"#).unwrap();

        let args = StoreArgs {
            config: Some(path),
            database: Some(PathBuf::from("b.db")),
        };
        let config = Config::resolve(&args, Some(Path::new("b.sql"))).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("b.db")));
        assert_eq!(config.audit_log, PathBuf::from("b.sql"));
    }

    #[test]
    fn test_resolve_missing_explicit_config_fails() {
        let args = StoreArgs {
            config: Some(PathBuf::from("/nonexistent/schemacheck.json")),
            database: Some(PathBuf::from("x.db")),
        };
        assert!(Config::resolve(&args, None).is_err());
    }

    #[test]
    fn test_check_tables_reports_every_table() {
        let parsed = parse_schema(
            "customers(id(pk), name)\n\
             orders(id(pk), customer(fk:customers.id), total)\n\
             pairs(a(pk), b(pk))\n\
             not a table",
        );
        let mut store = fixture_store();
        let mut audit = AuditRun::new();

        let outcomes = check_tables(&parsed, &mut store, &mut audit, false).unwrap();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].summary(), "customers: RI=Y NORMALIZED=Y");
        assert_eq!(outcomes[1].summary(), "orders: RI=Y NORMALIZED=Y");
        assert!(matches!(outcomes[2], TableOutcome::Skipped { .. }));
        assert_eq!(outcomes[3].table(), "line_4");

        // customers has no FKs, so only orders contributes RI statements
        let ri_entries: Vec<_> = audit
            .entries
            .iter()
            .filter(|e| e.role == AuditRole::ReferentialIntegrity)
            .collect();
        assert_eq!(ri_entries.len(), 1);
        assert_eq!(ri_entries[0].table, "orders");
    }

    #[test]
    fn test_check_tables_continues_past_failure() {
        let parsed = parse_schema("ghost(id(pk), v)\norders(id(pk), total)");
        let mut store = fixture_store();
        let mut audit = AuditRun::new();

        let outcomes = check_tables(&parsed, &mut store, &mut audit, false).unwrap();
        assert!(matches!(outcomes[0], TableOutcome::Failed { .. }));
        match &outcomes[1] {
            TableOutcome::Checked { verdicts, .. } => {
                assert_eq!(verdicts[0].check, CheckKind::ReferentialIntegrity);
                assert_eq!(verdicts[1].verdict, Verdict::Yes);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_check_tables_abort_on_failure() {
        let parsed = parse_schema("ghost(id(pk), v)\norders(id(pk), total)");
        let mut store = fixture_store();
        let mut audit = AuditRun::new();

        let err = check_tables(&parsed, &mut store, &mut audit, true).unwrap_err();
        assert_eq!(err.code_str(), "SCHK_CLI_CHECK_ABORTED");
        assert!(err.message().contains("ghost"));

        // The statement that failed is still audited
        assert_eq!(audit.entries.len(), 1);
        assert_eq!(audit.entries[0].table, "ghost");
        assert_eq!(audit.entries[0].role, AuditRole::Normalization);
        assert!(audit.entries[0].statements[0].contains(r#"FROM "ghost""#));
    }
}
