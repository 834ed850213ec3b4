//! Common imports.
//!
//! ```ignore
//! use wtbrowse::prelude::*;
//! ```

pub use wtbrowse_browser::{
    BrowseError, Browser, BrowserConfig, ExportFormat, OpenOptions, RecordCount, TableInfo,
};
pub use wtbrowse_core::{render, Value};
