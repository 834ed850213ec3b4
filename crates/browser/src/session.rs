//! Browser session
//!
//! [`Browser`] is the composition root: it owns the engine connection and
//! exposes every table operation on it. A browser is either Closed (initial)
//! or Open; every table operation on a Closed browser fails with
//! `NotConnected`.
//!
//! # Usage
//!
//! ```ignore
//! use wtbrowse_browser::{Browser, ExportFormat};
//!
//! let mut browser = Browser::connect("backup/db")?;
//! for name in browser.list_tables()? {
//!     let info = browser.table_info(&name)?;
//! }
//! browser.export("users", "out/users.json".as_ref(), ExportFormat::Json, None)?;
//! browser.close()?;
//! ```

use crate::catalog::{self, TableDescriptor};
use crate::error::{BrowseError, Result};
use crate::export::{self, BatchReport, ExportFormat};
use crate::inspect::{self, TableInfo};
use crate::stream::RecordStream;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use wtbrowse_storage::{Connection, ConnectionStats, FileEngine, StorageEngine, DEFAULT_CONFIG};

/// How a [`Browser`] opens its database.
#[derive(Clone)]
pub struct OpenOptions {
    /// Engine used to open the directory
    pub engine: Arc<dyn StorageEngine>,
    /// Engine configuration string
    pub engine_config: String,
}

impl Default for OpenOptions {
    fn default() -> Self {
        OpenOptions {
            engine: Arc::new(FileEngine),
            engine_config: DEFAULT_CONFIG.to_string(),
        }
    }
}

impl fmt::Debug for OpenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenOptions")
            .field("engine", &self.engine.name())
            .field("engine_config", &self.engine_config)
            .finish()
    }
}

impl OpenOptions {
    /// Default options: the file engine, opened `readonly=true`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different storage engine.
    pub fn engine(mut self, engine: Arc<dyn StorageEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Set the engine configuration string.
    pub fn engine_config(mut self, config: impl Into<String>) -> Self {
        self.engine_config = config.into();
        self
    }
}

/// Read-only browser over one database directory.
pub struct Browser {
    path: PathBuf,
    options: OpenOptions,
    conn: Option<Box<dyn Connection>>,
}

impl Browser {
    /// Create a Closed browser for `path` with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, OpenOptions::default())
    }

    /// Create a Closed browser for `path`.
    pub fn with_options(path: impl Into<PathBuf>, options: OpenOptions) -> Self {
        Browser {
            path: path.into(),
            options,
            conn: None,
        }
    }

    /// Create a browser and open it.
    pub fn connect(path: impl Into<PathBuf>) -> Result<Self> {
        let mut browser = Self::new(path);
        browser.open()?;
        Ok(browser)
    }

    /// Database directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options used to open
    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    /// True in the Open state.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the connection. Opening an Open browser does nothing.
    ///
    /// # Errors
    ///
    /// - `Path` if the path is missing or not a directory
    /// - `Connection` if the engine rejects the directory
    ///
    /// The browser stays Closed on error.
    pub fn open(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        let reason = match std::fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => None,
            Ok(_) => Some("not a directory".to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Some("does not exist".to_string())
            }
            Err(e) => Some(e.to_string()),
        };
        if let Some(reason) = reason {
            return Err(BrowseError::Path {
                path: self.path.clone(),
                reason,
            });
        }

        let conn = self
            .options
            .engine
            .open(&self.path, &self.options.engine_config)
            .map_err(|source| BrowseError::Connection {
                path: self.path.clone(),
                source,
            })?;

        info!(
            path = %self.path.display(),
            engine = self.options.engine.name(),
            "connected"
        );
        self.conn = Some(conn);
        Ok(())
    }

    /// Close the connection. Closing a Closed browser does nothing.
    pub fn close(&mut self) -> Result<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        conn.close()?;
        info!(path = %self.path.display(), "disconnected");
        Ok(())
    }

    fn conn(&self) -> Result<&dyn Connection> {
        self.conn.as_deref().ok_or(BrowseError::NotConnected)
    }

    /// Open session and cursor counts on the connection.
    pub fn stats(&self) -> Result<ConnectionStats> {
        Ok(self.conn()?.stats())
    }

    /// Table names, sorted ascending.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables()?.into_iter().map(|t| t.name).collect())
    }

    /// Table descriptors, sorted by name.
    pub fn tables(&self) -> Result<Vec<TableDescriptor>> {
        catalog::list_tables(self.conn()?)
    }

    /// Inspect one table. See [`inspect::inspect`].
    pub fn table_info(&self, name: &str) -> Result<TableInfo> {
        inspect::inspect(self.conn()?, name)
    }

    /// Stream a table's records. The stream borrows the browser, so it
    /// cannot outlive the connection.
    pub fn stream(&self, table: &str, limit: Option<u64>) -> Result<RecordStream<'_>> {
        RecordStream::open(self.conn()?, table, limit)
    }

    /// Export a table to a JSON file. Returns the number of records written.
    pub fn export_json(&self, table: &str, path: &Path, limit: Option<u64>) -> Result<u64> {
        export::export_json(self.conn()?, table, path, limit)
    }

    /// Export a table to a CSV file. Returns the number of records written.
    pub fn export_csv(&self, table: &str, path: &Path, limit: Option<u64>) -> Result<u64> {
        export::export_csv(self.conn()?, table, path, limit)
    }

    /// Export a table in `format`.
    pub fn export(
        &self,
        table: &str,
        path: &Path,
        format: ExportFormat,
        limit: Option<u64>,
    ) -> Result<u64> {
        export::export_table(self.conn()?, table, path, format, limit)
    }

    /// Export every table into `output_dir`. See [`export::export_all`].
    pub fn export_all(
        &self,
        output_dir: &Path,
        format: ExportFormat,
        limit: Option<u64>,
    ) -> Result<BatchReport> {
        export::export_all(self.conn()?, output_dir, format, limit)
    }
}

impl fmt::Debug for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browser")
            .field("path", &self.path)
            .field("options", &self.options)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(path = %self.path.display(), error = %e, "close on drop failed");
        }
    }
}
