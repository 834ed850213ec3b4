//! Database fixture builder

use crate::engine::{table_uri, TABLE_PREFIX};
use crate::error::{EngineError, EngineResult};
use crate::file::{CATALOG_FILE, TABLE_FILE_EXTENSION};
use crate::format::{encode_catalog_entry, FrameWriter, RecordFormat, CATALOG_MAGIC, TABLE_MAGIC};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use wtbrowse_core::Value;

struct TableSpec {
    key_format: String,
    value_format: String,
    records: BTreeMap<Value, Value>,
}

/// Builds a `FileEngine` database directory.
///
/// Records are written in ascending key order; inserting an existing key
/// replaces its value. Building over an existing directory rewrites the
/// catalog and the data files of the declared tables.
pub struct FixtureBuilder {
    home: PathBuf,
    tables: BTreeMap<String, TableSpec>,
    extra_entries: BTreeMap<String, String>,
    pending: Vec<(String, Value, Value)>,
}

impl FixtureBuilder {
    /// Start a fixture rooted at `home`.
    pub fn new(home: impl AsRef<Path>) -> Self {
        FixtureBuilder {
            home: home.as_ref().to_path_buf(),
            tables: BTreeMap::new(),
            extra_entries: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// Declare a table with its key and value formats.
    pub fn table(mut self, name: &str, key_format: &str, value_format: &str) -> Self {
        self.tables.insert(
            name.to_string(),
            TableSpec {
                key_format: key_format.to_string(),
                value_format: value_format.to_string(),
                records: BTreeMap::new(),
            },
        );
        self
    }

    /// Add a record to a declared table.
    pub fn insert(mut self, table: &str, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        self.pending
            .push((table.to_string(), key.into(), value.into()));
        self
    }

    /// Add a raw catalog entry (e.g. `system:version`).
    ///
    /// An entry for a declared table's key replaces the generated config.
    pub fn catalog_entry(mut self, key: &str, value: &str) -> Self {
        self.extra_entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Write the directory and return its path.
    ///
    /// Fails with `NotFound` if a record targets an undeclared table and
    /// with `UnsupportedFormat` if a record does not fit its table's formats.
    pub fn build(mut self) -> EngineResult<PathBuf> {
        for (table, key, value) in std::mem::take(&mut self.pending) {
            let spec = self
                .tables
                .get_mut(&table)
                .ok_or_else(|| EngineError::NotFound(table_uri(&table)))?;
            spec.records.insert(key, value);
        }

        fs::create_dir_all(&self.home)?;

        let mut catalog = BTreeMap::new();
        for (name, spec) in &self.tables {
            let formats = format!(
                "key_format={},value_format={}",
                spec.key_format, spec.value_format
            );
            catalog.insert(
                format!("{}{}", TABLE_PREFIX, name),
                format!("app_metadata=,colgroups=,{}", formats),
            );
            catalog.insert(
                format!("file:{}.{}", name, TABLE_FILE_EXTENSION),
                format!("allocation_size=4KB,{}", formats),
            );
            self.write_table(name, spec)?;
        }
        // Explicit entries win over generated ones
        catalog.extend(self.extra_entries.clone());

        let file = File::create(self.home.join(CATALOG_FILE))?;
        let mut writer = FrameWriter::new(BufWriter::new(file), CATALOG_MAGIC)?;
        for (key, value) in &catalog {
            writer.write_frame(&encode_catalog_entry(key, value)?)?;
        }
        writer.finish()?;

        Ok(self.home)
    }

    fn write_table(&self, name: &str, spec: &TableSpec) -> EngineResult<()> {
        let key_format = RecordFormat::parse(&spec.key_format)?;
        let value_format = RecordFormat::parse(&spec.value_format)?;

        let path = self
            .home
            .join(format!("{}.{}", name, TABLE_FILE_EXTENSION));
        let mut writer = FrameWriter::new(BufWriter::new(File::create(path)?), TABLE_MAGIC)?;
        for (key, value) in &spec.records {
            let payload = RecordFormat::pack_record(&key_format, &value_format, key, value)?;
            writer.write_frame(&payload)?;
        }
        writer.finish()?;
        Ok(())
    }
}

/// Build the three-table sample database under `dir/sample_db`.
///
/// | Table | Formats | Records |
/// |-------|---------|---------|
/// | `users` | `i` / `S` | 3, keys 1..=3, JSON text values |
/// | `products` | `S` / `S` | 4, keys `prod-001`..`prod-004` |
/// | `logs` | `i` / `S` | 10, keys 1..=10 |
pub fn sample_database(dir: &Path) -> EngineResult<PathBuf> {
    let users = [
        (1, r#"{"name": "Alice", "age": 30}"#),
        (2, r#"{"name": "Bob", "age": 25}"#),
        (3, r#"{"name": "Charlie", "age": 35}"#),
    ];
    let products = [
        ("prod-001", r#"{"name": "Laptop", "price": 999.99}"#),
        ("prod-002", r#"{"name": "Mouse", "price": 29.99}"#),
        ("prod-003", r#"{"name": "Keyboard", "price": 79.99}"#),
        ("prod-004", r#"{"name": "Monitor", "price": 299.99}"#),
    ];

    let mut builder = FixtureBuilder::new(dir.join("sample_db"))
        .table("users", "i", "S")
        .table("products", "S", "S")
        .table("logs", "i", "S");

    for (key, value) in users {
        builder = builder.insert("users", key, value);
    }
    for (key, value) in products {
        builder = builder.insert("products", key, value);
    }
    for i in 1..=10i64 {
        builder = builder.insert("logs", i, format!("log entry {}", i));
    }

    builder.build()
}
