//! Reference engine over plain files.
//!
//! `FileEngine` is a read-only engine for databases laid out as:
//!
//! ```text
//! <home>/
//!   CATALOG        catalog frames: (namespaced key, config string)
//!   <table>.wt     table frames: packed (key, value) records
//! ```
//!
//! See [`crate::format`] for the byte layout. Table configs carry
//! `key_format` and `value_format`; both default to `u` when absent.
//!
//! Nothing is cached: every `metadata:` cursor re-reads the catalog, and
//! every table cursor re-resolves its formats from the catalog.

mod cursor;

pub use cursor::FileCursor;

use crate::engine::{Connection, ConnectionStats, Cursor, Session, StorageEngine};
use crate::engine::{is_plain_table_name, METADATA_URI, TABLE_PREFIX};
use crate::error::{EngineError, EngineResult};
use crate::format::{config_value, parse_config, FileHeader, CATALOG_MAGIC};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::debug;

/// Catalog file name inside the database directory
pub const CATALOG_FILE: &str = "CATALOG";

/// Extension of table data files
pub const TABLE_FILE_EXTENSION: &str = "wt";

/// Config string used when the caller does not supply one
pub const DEFAULT_CONFIG: &str = "readonly=true";

/// Read-only engine over `CATALOG` + `<table>.wt` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileEngine;

impl FileEngine {
    /// Open a connection, returning the concrete type.
    ///
    /// # Errors
    ///
    /// - `ReadOnly` if the config asks for `create` or `readonly=false`
    /// - `InvalidConfig` for malformed config strings
    /// - `Io` / `InvalidFormat` if `<home>/CATALOG` is missing or not a catalog
    pub fn open_file(&self, home: &Path, config: &str) -> EngineResult<FileConnection> {
        for entry in parse_config(config)? {
            match (entry.key.as_str(), entry.value.as_str()) {
                ("readonly", "true") => {}
                ("readonly", other) => {
                    return Err(EngineError::ReadOnly(format!(
                        "readonly={} is not supported",
                        other
                    )))
                }
                ("create", "false") => {}
                ("create", _) => {
                    return Err(EngineError::ReadOnly(
                        "cannot create databases".to_string(),
                    ))
                }
                (key, _) => debug!(key, "ignoring unknown engine config key"),
            }
        }

        if !home.is_dir() {
            return Err(EngineError::InvalidFormat(format!(
                "{} is not a directory",
                home.display()
            )));
        }

        let catalog_path = home.join(CATALOG_FILE);
        let file = File::open(&catalog_path).map_err(|e| {
            EngineError::InvalidFormat(format!(
                "cannot open {}: {}",
                catalog_path.display(),
                e
            ))
        })?;
        FileHeader::read_from(&mut BufReader::new(file), CATALOG_MAGIC)?;

        debug!(home = %home.display(), "opened file engine connection");
        Ok(FileConnection {
            home: home.to_path_buf(),
            sessions_open: AtomicUsize::new(0),
            cursors_open: AtomicUsize::new(0),
            next_session_id: AtomicU64::new(1),
        })
    }
}

impl StorageEngine for FileEngine {
    fn name(&self) -> &'static str {
        "file"
    }

    fn open(&self, home: &Path, config: &str) -> EngineResult<Box<dyn Connection>> {
        Ok(Box::new(self.open_file(home, config)?))
    }
}

/// Connection to one `FileEngine` directory.
#[derive(Debug)]
pub struct FileConnection {
    home: PathBuf,
    sessions_open: AtomicUsize,
    cursors_open: AtomicUsize,
    next_session_id: AtomicU64,
}

impl FileConnection {
    /// Path of the catalog file
    pub fn catalog_path(&self) -> PathBuf {
        self.home.join(CATALOG_FILE)
    }

    /// Path of a table's data file.
    ///
    /// Fails with `InvalidUri` for names that would resolve outside the
    /// database directory.
    pub fn table_path(&self, table: &str) -> EngineResult<PathBuf> {
        if !is_plain_table_name(table) {
            return Err(EngineError::InvalidUri(format!("{}{}", TABLE_PREFIX, table)));
        }
        Ok(self
            .home
            .join(format!("{}.{}", table, TABLE_FILE_EXTENSION)))
    }

    /// Find the config string of `key` in the catalog.
    fn catalog_lookup(&self, key: &str) -> EngineResult<Option<String>> {
        FileCursor::metadata(self)?.find_entry(key)
    }

    fn open_table_cursor(&self, uri: &str) -> EngineResult<FileCursor<'_>> {
        let name = &uri[TABLE_PREFIX.len()..];
        let path = self.table_path(name)?;
        let config = self
            .catalog_lookup(uri)?
            .ok_or_else(|| EngineError::NotFound(uri.to_string()))?;

        let key_format = config_value(&config, "key_format")?.unwrap_or_else(|| "u".into());
        let value_format = config_value(&config, "value_format")?.unwrap_or_else(|| "u".into());
        FileCursor::table(self, uri, &path, &key_format, &value_format)
    }
}

impl Connection for FileConnection {
    fn home(&self) -> &Path {
        &self.home
    }

    fn open_session(&self) -> EngineResult<Box<dyn Session<'_> + '_>> {
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        self.sessions_open.fetch_add(1, Ordering::AcqRel);
        debug!(session = id, "session opened");
        Ok(Box::new(FileSession { conn: self, id }))
    }

    fn stats(&self) -> ConnectionStats {
        ConnectionStats {
            sessions_open: self.sessions_open.load(Ordering::Acquire),
            cursors_open: self.cursors_open.load(Ordering::Acquire),
        }
    }

    fn close(self: Box<Self>) -> EngineResult<()> {
        debug!(home = %self.home.display(), "closed file engine connection");
        Ok(())
    }
}

/// Session on a [`FileConnection`].
struct FileSession<'c> {
    conn: &'c FileConnection,
    id: u64,
}

impl<'c> Session<'c> for FileSession<'c> {
    fn open_cursor(&self, uri: &str) -> EngineResult<Box<dyn Cursor + 'c>> {
        let cursor = if uri == METADATA_URI {
            FileCursor::metadata(self.conn)?
        } else if uri.starts_with(TABLE_PREFIX) && uri.len() > TABLE_PREFIX.len() {
            self.conn.open_table_cursor(uri)?
        } else {
            return Err(EngineError::InvalidUri(uri.to_string()));
        };
        debug!(session = self.id, uri, "cursor opened");
        Ok(Box::new(cursor))
    }

    fn close(self: Box<Self>) -> EngineResult<()> {
        Ok(())
    }
}

impl Drop for FileSession<'_> {
    fn drop(&mut self) {
        self.conn.sessions_open.fetch_sub(1, Ordering::AcqRel);
        debug!(session = self.id, "session closed");
    }
}
