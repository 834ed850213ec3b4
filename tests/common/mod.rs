//! Shared test utilities for the integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub use tempfile::TempDir;
pub use wtbrowse::storage::testing::{
    append_garbage, corrupt_record, sample_database, truncate_table, FixtureBuilder,
};
pub use wtbrowse::{BrowseError, Browser, ExportFormat, RecordCount, Value};

/// A sample database in a temp directory, plus an open browser on it.
pub struct TestDb {
    pub dir: TempDir,
    pub home: PathBuf,
    pub browser: Browser,
}

impl TestDb {
    /// The users/products/logs sample database.
    pub fn sample() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let home = sample_database(dir.path()).expect("sample database");
        Self::open(dir, home)
    }

    /// A database written by `build` into `<tempdir>/db`.
    pub fn with(build: impl FnOnce(FixtureBuilder) -> FixtureBuilder) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let home = build(FixtureBuilder::new(dir.path().join("db")))
            .build()
            .expect("fixture");
        Self::open(dir, home)
    }

    fn open(dir: TempDir, home: PathBuf) -> Self {
        let browser = Browser::connect(&home).expect("open browser");
        TestDb { dir, home, browser }
    }

    /// Path under the temp directory for output files.
    pub fn out(&self, name: &str) -> PathBuf {
        self.dir.path().join("out").join(name)
    }

    /// Assert no session or cursor is left open.
    pub fn assert_idle(&self) {
        let stats = self.browser.stats().expect("stats");
        assert!(stats.is_idle(), "handles left open: {:?}", stats);
    }
}

/// Parse a JSON export file.
pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("read export");
    serde_json::from_str(&text).expect("valid JSON")
}

/// Lines of a CSV export file.
pub fn read_csv_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("read export")
        .lines()
        .map(str::to_string)
        .collect()
}
