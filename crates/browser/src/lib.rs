//! Read-only table browser and exporter
//!
//! Opens a storage engine's database directory, lists its tables, counts
//! their records, and exports them to JSON or CSV.
//!
//! - catalog: table enumeration from the `metadata:` namespace
//! - inspect: existence, configuration, and exact record counts
//! - stream: lazy, limit-bounded record streams
//! - export: JSON and CSV sinks, batch export
//! - session: the `Browser` that owns the connection
//! - config: `wtbrowse.toml`
//!
//! # Example
//!
//! ```ignore
//! use wtbrowse_browser::{Browser, ExportFormat};
//!
//! let browser = Browser::connect("backup/db")?;
//! let report = browser.export_all("out".as_ref(), ExportFormat::Csv, None)?;
//! for failure in &report.failed {
//!     eprintln!("{}: {}", failure.table, failure.error);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod inspect;
pub mod session;
pub mod stream;

pub use catalog::TableDescriptor;
pub use config::{BrowserConfig, ExportConfig, CONFIG_FILE_NAME};
pub use error::{BrowseError, Result};
pub use export::{
    escape_csv, BatchFailure, BatchReport, ExportFormat, ExportSummary, JsonExport,
};
pub use inspect::{RecordCount, TableInfo};
pub use session::{Browser, OpenOptions};
pub use stream::{Record, RecordStream, RenderedRecord};
