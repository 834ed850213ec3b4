//! Table export
//!
//! Both sinks write to `<path>.tmp` and rename it over `<path>` only after
//! every record was written. A failed export (scan fault, write fault) leaves
//! no file at `<path>` and removes the temporary file.
//!
//! - `json`: buffers rendered records, then writes one document
//! - `csv`: streams rows as they are read

mod csv;
mod json;

pub use self::csv::{escape_csv, export_csv};
pub use self::json::{export_json, JsonExport};

use crate::catalog::list_tables;
use crate::error::{BrowseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};
use wtbrowse_storage::{is_plain_table_name, Connection};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One JSON document per table
    #[default]
    Json,
    /// Two-column CSV with a `key,value` header
    Csv,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = BrowseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(BrowseError::Config(format!(
                "unknown export format '{}', expected json or csv",
                other
            ))),
        }
    }
}

/// Export one table in the given format. Returns the number of records written.
pub fn export_table(
    conn: &dyn Connection,
    table: &str,
    path: &Path,
    format: ExportFormat,
    limit: Option<u64>,
) -> Result<u64> {
    match format {
        ExportFormat::Json => export_json(conn, table, path, limit),
        ExportFormat::Csv => export_csv(conn, table, path, limit),
    }
}

/// A table exported by a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Table name
    pub table: String,
    /// File written
    pub path: PathBuf,
    /// Records written
    pub count: u64,
}

/// A table a batch could not export.
#[derive(Debug)]
pub struct BatchFailure {
    /// Table name
    pub table: String,
    /// Why the export failed
    pub error: BrowseError,
}

impl BatchFailure {
    /// Short label: `missing` for tables gone since listing, else `failed`.
    pub fn label(&self) -> &'static str {
        if self.error.is_not_found() {
            "missing"
        } else {
            "failed"
        }
    }
}

/// Outcome of [`export_all`], in catalog order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Tables exported
    pub exported: Vec<ExportSummary>,
    /// Tables that failed
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// True if no table failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Tables attempted
    pub fn total(&self) -> usize {
        self.exported.len() + self.failed.len()
    }
}

/// Export every table to `<output_dir>/<table>.<ext>`.
///
/// Per-table failures are collected in the report and do not stop the
/// batch. Listing the catalog or creating `output_dir` failing fails the
/// whole call, as does any connection-level error during a table.
pub fn export_all(
    conn: &dyn Connection,
    output_dir: &Path,
    format: ExportFormat,
    limit: Option<u64>,
) -> Result<BatchReport> {
    let tables = list_tables(conn)?;
    fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    for table in tables {
        let exported = output_path(output_dir, &table.name, format).and_then(|path| {
            export_table(conn, &table.name, &path, format, limit).map(|count| (path, count))
        });
        match exported {
            Ok((path, count)) => report.exported.push(ExportSummary {
                table: table.name,
                path,
                count,
            }),
            Err(e) if e.is_connection_level() => return Err(e),
            Err(error) => {
                warn!(table = %table.name, error = %error, "table export failed, continuing");
                report.failed.push(BatchFailure {
                    table: table.name,
                    error,
                });
            }
        }
    }

    info!(
        exported = report.exported.len(),
        failed = report.failed.len(),
        dir = %output_dir.display(),
        "batch export finished"
    );
    Ok(report)
}

/// `<output_dir>/<table>.<ext>`, refusing names that would leave `output_dir`.
fn output_path(output_dir: &Path, table: &str, format: ExportFormat) -> Result<PathBuf> {
    if !is_plain_table_name(table) {
        return Err(BrowseError::UnsafeTableName(table.to_string()));
    }
    Ok(output_dir.join(format!("{}.{}", table, format.extension())))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Run `write` against a buffered temp file, then rename it over `path`.
///
/// Parent directories are created as needed. On any error the temp file is
/// removed and `path` is left untouched.
pub(crate) fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let result = File::create(&tmp)
        .map_err(BrowseError::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            let value = write(&mut writer)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(value)
        })
        .and_then(|value| {
            fs::rename(&tmp, path)?;
            Ok(value)
        });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
