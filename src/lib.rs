//! wtbrowse - read-only browser and exporter for embedded key-value databases
//!
//! Opens a storage engine's database directory without write access, lists
//! the tables in its catalog, counts their records, and exports them to JSON
//! or CSV.
//!
//! # Quick Start
//!
//! ```ignore
//! use wtbrowse::prelude::*;
//!
//! let mut browser = Browser::connect("backup/db")?;
//! for table in browser.list_tables()? {
//!     let info = browser.table_info(&table)?;
//!     println!("{}: {} records", table, info.record_count.counted());
//! }
//! browser.export("users", "out/users.csv".as_ref(), ExportFormat::Csv, Some(100))?;
//! browser.close()?;
//! ```
//!
//! # Architecture
//!
//! - [`Value`] and [`render`]: engine values and their text form
//! - [`storage`]: the engine capability traits and the bundled file engine
//! - [`browser`]: catalog reading, inspection, streaming, and export

pub mod prelude;

pub use wtbrowse_browser as browser;
pub use wtbrowse_storage as storage;

pub use wtbrowse_browser::{
    BatchFailure, BatchReport, BrowseError, Browser, BrowserConfig, ExportFormat, ExportSummary,
    OpenOptions, Record, RecordCount, RecordStream, RenderedRecord, Result, TableDescriptor,
    TableInfo,
};
pub use wtbrowse_core::{decode_hex, render, Value};
pub use wtbrowse_storage::{
    Connection, ConnectionStats, Cursor, EngineError, FileEngine, Session, StorageEngine,
};
