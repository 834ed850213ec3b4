//! Storage engine seam for wtbrowse
//!
//! This crate defines how the browser talks to a storage engine and ships one
//! concrete, read-only engine:
//! - engine: `StorageEngine` / `Connection` / `Session` / `Cursor` traits
//! - file: `FileEngine`, the bundled reference engine
//! - format: on-disk frame layout, record packing, config strings
//! - testing: fixture builder and corruption helpers
//!
//! # Example
//!
//! ```ignore
//! use wtbrowse_storage::{FileEngine, StorageEngine, METADATA_URI};
//!
//! let conn = FileEngine.open(path, "readonly=true")?;
//! let session = conn.open_session()?;
//! for entry in session.open_cursor(METADATA_URI)? {
//!     let (key, config) = entry?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod error;
pub mod file;
pub mod format;
pub mod testing;

pub use engine::{
    is_plain_table_name, table_uri, Connection, ConnectionStats, Cursor, Session, StorageEngine,
    METADATA_URI, TABLE_PREFIX,
};
pub use error::{EngineError, EngineResult};
pub use file::{FileConnection, FileEngine, CATALOG_FILE, DEFAULT_CONFIG, TABLE_FILE_EXTENSION};
