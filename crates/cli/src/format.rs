//! Result → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): line-oriented text, e.g. `Found 3 table(s) in db:`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use std::fmt::Display;
use std::path::Path;

use serde_json::json;
use wtbrowse_browser::{BatchReport, TableInfo};

const RULE_WIDTH: usize = 50;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

fn pretty(value: serde_json::Value) -> String {
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn bullets<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(|s| format!("  • {}", s))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format an error.
pub fn format_error(err: &dyn Display, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(json!({ "error": err.to_string() })),
        OutputMode::Human => format!("(error) {}", err),
    }
}

/// Format an export against a table that is not in the catalog.
pub fn format_missing_table(err: &dyn Display, available: &[String], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(json!({
            "error": err.to_string(),
            "available_tables": available,
        })),
        OutputMode::Human if available.is_empty() => {
            format!("(error) {}\n\nThe database has no tables.", err)
        }
        OutputMode::Human => format!(
            "(error) {}\n\nAvailable tables:\n{}",
            err,
            bullets(available)
        ),
    }
}

/// Format the table list of `list-tables`.
pub fn format_tables(db: &Path, tables: &[String], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(json!({
            "database": db.display().to_string(),
            "tables": tables,
        })),
        OutputMode::Human if tables.is_empty() => {
            format!("No tables found in {}", db.display())
        }
        OutputMode::Human => format!(
            "Found {} table(s) in {}:\n{}\n{}",
            tables.len(),
            db.display(),
            rule(),
            bullets(tables)
        ),
    }
}

/// Format the result of `info`.
pub fn format_table_info(info: &TableInfo, mode: OutputMode) -> String {
    if mode == OutputMode::Json {
        return serde_json::to_string_pretty(info)
            .unwrap_or_else(|e| format_error(&e, OutputMode::Json));
    }

    let mut lines = vec![
        format!("Table Information: {}", info.name),
        rule(),
        format!("Exists: {}", info.exists),
    ];
    if !info.exists {
        lines.push(format!(
            "Table '{}' does not exist in the database.",
            info.name
        ));
        return lines.join("\n");
    }

    match info.record_count.exact() {
        Some(n) => lines.push(format!("Record Count: {}", n)),
        None => lines.push(format!(
            "Record Count: {} (partial)",
            info.record_count.counted()
        )),
    }
    if let Some(config) = info.config.as_deref().filter(|c| !c.is_empty()) {
        lines.push(String::new());
        lines.push("Configuration:".to_string());
        lines.push(format!("  {}", config));
    }
    lines.join("\n")
}

/// Warning line for a partial count, printed on stderr in human mode.
pub fn format_count_warning(info: &TableInfo) -> Option<String> {
    info.error().map(|cause| format!("Warning: {}", cause))
}

/// Format a single-table export.
pub fn format_export(table: &str, count: u64, path: &Path, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(json!({
            "table": table,
            "path": path.display().to_string(),
            "record_count": count,
        })),
        OutputMode::Human => format!(
            "Exported {} records from '{}' to {}",
            count,
            table,
            path.display()
        ),
    }
}

/// Format the stdout part of an `export-all` run.
pub fn format_batch_report(report: &BatchReport, output_dir: &Path, mode: OutputMode) -> String {
    if mode == OutputMode::Json {
        let exported: Vec<_> = report
            .exported
            .iter()
            .map(|s| {
                json!({
                    "table": s.table,
                    "path": s.path.display().to_string(),
                    "record_count": s.count,
                })
            })
            .collect();
        let failed: Vec<_> = report
            .failed
            .iter()
            .map(|f| {
                json!({
                    "table": f.table,
                    "status": f.label(),
                    "error": f.error.to_string(),
                })
            })
            .collect();
        return pretty(json!({
            "output_dir": output_dir.display().to_string(),
            "exported": exported,
            "failed": failed,
        }));
    }

    if report.total() == 0 {
        return "No tables found to export.".to_string();
    }

    let mut lines = vec![
        format!(
            "Exporting {} table(s) to {}",
            report.total(),
            output_dir.display()
        ),
        rule(),
    ];
    for s in &report.exported {
        lines.push(format!(
            "  ✓ {}: {} records -> {}",
            s.table,
            s.count,
            s.path.display()
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "{} exported, {} failed",
        report.exported.len(),
        report.failed.len()
    ));
    lines.join("\n")
}

/// Per-table failure lines of an `export-all` run, for stderr.
pub fn format_batch_failures(report: &BatchReport) -> Vec<String> {
    report
        .failed
        .iter()
        .map(|f| format!("  ✗ {} ({}): {}", f.table, f.label(), f.error))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wtbrowse_browser::{BatchFailure, BrowseError, ExportSummary, RecordCount};

    fn info(record_count: RecordCount) -> TableInfo {
        TableInfo {
            name: "users".into(),
            exists: true,
            config: Some("key_format=i,value_format=S".into()),
            record_count,
        }
    }

    #[test]
    fn test_format_error() {
        let err = BrowseError::NotConnected;
        assert_eq!(
            format_error(&err, OutputMode::Human),
            "(error) not connected to a database"
        );
        let json: serde_json::Value =
            serde_json::from_str(&format_error(&err, OutputMode::Json)).unwrap();
        assert_eq!(json["error"], "not connected to a database");
    }

    #[test]
    fn test_format_tables() {
        let tables = vec!["logs".to_string(), "users".to_string()];
        assert_eq!(
            format_tables(Path::new("db"), &tables, OutputMode::Human),
            format!("Found 2 table(s) in db:\n{}\n  • logs\n  • users", "-".repeat(50))
        );
        assert_eq!(
            format_tables(Path::new("db"), &[], OutputMode::Human),
            "No tables found in db"
        );
    }

    #[test]
    fn test_format_tables_json() {
        let tables = vec!["logs".to_string()];
        let json: serde_json::Value =
            serde_json::from_str(&format_tables(Path::new("db"), &tables, OutputMode::Json))
                .unwrap();
        assert_eq!(json["tables"][0], "logs");
    }

    #[test]
    fn test_format_table_info_complete() {
        let text = format_table_info(&info(RecordCount::Complete(3)), OutputMode::Human);
        assert!(text.contains("Exists: true"));
        assert!(text.contains("Record Count: 3\n"));
        assert!(text.ends_with("Configuration:\n  key_format=i,value_format=S"));
        assert_eq!(format_count_warning(&info(RecordCount::Complete(3))), None);
    }

    #[test]
    fn test_format_table_info_partial() {
        let partial = info(RecordCount::Partial {
            counted: 2,
            cause: "scan failed".into(),
        });
        let text = format_table_info(&partial, OutputMode::Human);
        assert!(text.contains("Record Count: 2 (partial)"));
        assert_eq!(
            format_count_warning(&partial).as_deref(),
            Some("Warning: scan failed")
        );
    }

    #[test]
    fn test_format_table_info_missing() {
        let missing = TableInfo {
            name: "nope".into(),
            exists: false,
            config: None,
            record_count: RecordCount::Complete(0),
        };
        let text = format_table_info(&missing, OutputMode::Human);
        assert!(text.ends_with("Table 'nope' does not exist in the database."));
        assert!(!text.contains("Record Count"));
    }

    #[test]
    fn test_format_export() {
        assert_eq!(
            format_export("users", 3, Path::new("out/users.json"), OutputMode::Human),
            "Exported 3 records from 'users' to out/users.json"
        );
    }

    #[test]
    fn test_format_missing_table() {
        let err = BrowseError::NoSuchTable("nope".into());
        let text = format_missing_table(&err, &["logs".to_string()], OutputMode::Human);
        assert_eq!(
            text,
            "(error) table 'nope' not found\n\nAvailable tables:\n  • logs"
        );
    }

    #[test]
    fn test_format_batch_report() {
        let report = BatchReport {
            exported: vec![ExportSummary {
                table: "users".into(),
                path: PathBuf::from("out/users.csv"),
                count: 3,
            }],
            failed: vec![BatchFailure {
                table: "logs".into(),
                error: BrowseError::NoSuchTable("logs".into()),
            }],
        };
        let text = format_batch_report(&report, Path::new("out"), OutputMode::Human);
        assert!(text.starts_with("Exporting 2 table(s) to out"));
        assert!(text.contains("  ✓ users: 3 records -> out/users.csv"));
        assert!(text.ends_with("1 exported, 1 failed"));
        assert_eq!(
            format_batch_failures(&report),
            vec!["  ✗ logs (missing): table 'logs' not found".to_string()]
        );

        let json: serde_json::Value =
            serde_json::from_str(&format_batch_report(&report, Path::new("out"), OutputMode::Json))
                .unwrap();
        assert_eq!(json["failed"][0]["status"], "missing");
        assert_eq!(json["exported"][0]["record_count"], 3);
    }

    #[test]
    fn test_format_empty_batch() {
        let text = format_batch_report(&BatchReport::default(), Path::new("out"), OutputMode::Human);
        assert_eq!(text, "No tables found to export.");
    }
}
