//! Error types for table browsing and export
//!
//! Every fallible browser operation returns [`BrowseError`]. Variants follow
//! how far an error reaches:
//!
//! - `Path`, `Connection`: the database could not be opened
//! - `NotConnected`: an operation was issued on a closed browser
//! - `Engine`: the catalog could not be read on an open connection
//! - `NoSuchTable`, `Scan`: fatal to one table operation only

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use wtbrowse_storage::EngineError;

/// Result type alias for browser operations
pub type Result<T> = std::result::Result<T, BrowseError>;

/// Errors raised by the browser.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// Database path is missing or not a directory
    #[error("database path {}: {reason}", path.display())]
    Path {
        /// The path as given
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// The engine refused to open the directory
    #[error("cannot open database at {}: {source}", path.display())]
    Connection {
        /// The database directory
        path: PathBuf,
        /// Engine error
        #[source]
        source: EngineError,
    },

    /// Operation requires an open connection
    #[error("not connected to a database")]
    NotConnected,

    /// Table is absent from the catalog
    #[error("table '{0}' not found")]
    NoSuchTable(String),

    /// Table name cannot be used as an output file name
    #[error("table name '{0}' is not a plain file name")]
    UnsafeTableName(String),

    /// A cursor failed partway through a table
    #[error("scan of table '{table}' failed: {source}")]
    Scan {
        /// Table being read
        table: String,
        /// Engine error
        #[source]
        source: EngineError,
    },

    /// Catalog-level engine failure on an open connection
    #[error("catalog error: {0}")]
    Engine(#[from] EngineError),

    /// I/O error writing output
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Output could not be serialized
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl BrowseError {
    /// Check if this is a missing-table error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BrowseError::NoSuchTable(_))
    }

    /// Check if this is a mid-scan failure.
    pub fn is_scan(&self) -> bool {
        matches!(self, BrowseError::Scan { .. })
    }

    /// Check if this error concerns the connection rather than one table.
    ///
    /// Connection-level errors always propagate, even out of batch exports.
    pub fn is_connection_level(&self) -> bool {
        matches!(
            self,
            BrowseError::Path { .. }
                | BrowseError::Connection { .. }
                | BrowseError::NotConnected
                | BrowseError::Engine(_)
        )
    }

    pub(crate) fn scan(table: &str, source: EngineError) -> Self {
        BrowseError::Scan {
            table: table.to_string(),
            source,
        }
    }
}

impl From<serde_json::Error> for BrowseError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            BrowseError::Io(e.into())
        } else {
            BrowseError::Serialization(e.to_string())
        }
    }
}
