//! ArgMatches → CliAction conversion.
//!
//! Export format and limit fall back to the loaded `BrowserConfig` when the
//! flags are absent.

use std::path::PathBuf;

use clap::ArgMatches;
use wtbrowse_browser::{BrowserConfig, ExportFormat};

/// A fully resolved command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// List tables.
    ListTables { db: PathBuf },
    /// Inspect one table.
    Info { db: PathBuf, table: String },
    /// Export one table.
    Export {
        db: PathBuf,
        table: String,
        output: PathBuf,
        format: ExportFormat,
        limit: Option<u64>,
    },
    /// Export every table.
    ExportAll {
        db: PathBuf,
        output_dir: PathBuf,
        format: ExportFormat,
        limit: Option<u64>,
    },
}

impl CliAction {
    /// Database directory the action opens.
    pub fn db(&self) -> &PathBuf {
        match self {
            CliAction::ListTables { db }
            | CliAction::Info { db, .. }
            | CliAction::Export { db, .. }
            | CliAction::ExportAll { db, .. } => db,
        }
    }
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches, config: &BrowserConfig) -> Result<CliAction, String> {
    let (sub_name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;
    let db = path(sub, "db_path")?;

    match sub_name {
        "list-tables" => Ok(CliAction::ListTables { db }),
        "info" => Ok(CliAction::Info {
            db,
            table: string(sub, "table")?,
        }),
        "export" => Ok(CliAction::Export {
            db,
            table: string(sub, "table")?,
            output: path(sub, "output_file")?,
            format: format(sub, config)?,
            limit: limit(sub, config),
        }),
        "export-all" => Ok(CliAction::ExportAll {
            db,
            output_dir: path(sub, "output_dir")?,
            format: format(sub, config)?,
            limit: limit(sub, config),
        }),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn string(matches: &ArgMatches, id: &str) -> Result<String, String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| format!("Missing argument: {}", id))
}

fn path(matches: &ArgMatches, id: &str) -> Result<PathBuf, String> {
    string(matches, id).map(PathBuf::from)
}

fn format(matches: &ArgMatches, config: &BrowserConfig) -> Result<ExportFormat, String> {
    match matches.get_one::<String>("format") {
        Some(s) => s.parse().map_err(|e: wtbrowse_browser::BrowseError| e.to_string()),
        None => Ok(config.export.format),
    }
}

fn limit(matches: &ArgMatches, config: &BrowserConfig) -> Option<u64> {
    matches
        .get_one::<u64>("limit")
        .copied()
        .or(config.export.limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;

    fn action(args: &[&str], config: &BrowserConfig) -> CliAction {
        let matches = build_cli().try_get_matches_from(args).unwrap();
        matches_to_action(&matches, config).unwrap()
    }

    #[test]
    fn test_info() {
        assert_eq!(
            action(&["wtbrowse", "info", "db", "users"], &BrowserConfig::default()),
            CliAction::Info {
                db: "db".into(),
                table: "users".into()
            }
        );
    }

    #[test]
    fn test_export_defaults() {
        assert_eq!(
            action(&["wtbrowse", "export", "db", "users", "u.json"], &BrowserConfig::default()),
            CliAction::Export {
                db: "db".into(),
                table: "users".into(),
                output: "u.json".into(),
                format: ExportFormat::Json,
                limit: None,
            }
        );
    }

    #[test]
    fn test_config_supplies_defaults() {
        let config =
            BrowserConfig::from_toml_str("[export]\nformat = \"csv\"\nlimit = 9\n").unwrap();
        let CliAction::ExportAll { format, limit, .. } =
            action(&["wtbrowse", "export-all", "db", "out"], &config)
        else {
            panic!("expected export-all");
        };
        assert_eq!(format, ExportFormat::Csv);
        assert_eq!(limit, Some(9));
    }

    #[test]
    fn test_flags_override_config() {
        let config =
            BrowserConfig::from_toml_str("[export]\nformat = \"csv\"\nlimit = 9\n").unwrap();
        let CliAction::ExportAll { format, limit, .. } = action(
            &["wtbrowse", "export-all", "db", "out", "-f", "json", "-l", "2"],
            &config,
        ) else {
            panic!("expected export-all");
        };
        assert_eq!(format, ExportFormat::Json);
        assert_eq!(limit, Some(2));
    }

    #[test]
    fn test_db_accessor() {
        let a = action(&["wtbrowse", "list-tables", "some/db"], &BrowserConfig::default());
        assert_eq!(a.db(), &PathBuf::from("some/db"));
    }
}
