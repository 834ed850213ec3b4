//! Cursors over catalog and table files.

use super::FileConnection;
use crate::engine::{Cursor, METADATA_URI};
use crate::error::{EngineError, EngineResult};
use crate::format::{decode_catalog_entry, FrameReader, RecordFormat, CATALOG_MAGIC, TABLE_MAGIC};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::Ordering;
use tracing::{debug, warn};
use wtbrowse_core::Value;

enum Layout {
    Catalog,
    Table {
        key_format: RecordFormat,
        value_format: RecordFormat,
    },
}

/// Forward-only cursor of a [`FileConnection`].
///
/// Counts as open on its connection until dropped.
pub struct FileCursor<'c> {
    conn: &'c FileConnection,
    uri: String,
    layout: Layout,
    frames: FrameReader<BufReader<File>>,
    yielded: u64,
    failed: bool,
}

impl<'c> FileCursor<'c> {
    pub(super) fn metadata(conn: &'c FileConnection) -> EngineResult<Self> {
        let frames = FrameReader::open(&conn.catalog_path(), CATALOG_MAGIC, METADATA_URI)?;
        Ok(Self::register(conn, METADATA_URI.to_string(), Layout::Catalog, frames))
    }

    pub(super) fn table(
        conn: &'c FileConnection,
        uri: &str,
        path: &Path,
        key_format: &str,
        value_format: &str,
    ) -> EngineResult<Self> {
        let layout = Layout::Table {
            key_format: RecordFormat::parse(key_format)?,
            value_format: RecordFormat::parse(value_format)?,
        };
        let frames = FrameReader::open(path, TABLE_MAGIC, uri)?;
        Ok(Self::register(conn, uri.to_string(), layout, frames))
    }

    fn register(
        conn: &'c FileConnection,
        uri: String,
        layout: Layout,
        frames: FrameReader<BufReader<File>>,
    ) -> Self {
        conn.cursors_open.fetch_add(1, Ordering::AcqRel);
        FileCursor {
            conn,
            uri,
            layout,
            frames,
            yielded: 0,
            failed: false,
        }
    }

    /// Scan a catalog cursor for `key`, returning its config string.
    pub(super) fn find_entry(&mut self, key: &str) -> EngineResult<Option<String>> {
        for entry in self.by_ref() {
            if let (Value::String(k), Value::String(v)) = entry? {
                if k == key {
                    return Ok(Some(v));
                }
            }
        }
        Ok(None)
    }

    fn decode(&self, offset: u64, payload: &[u8]) -> EngineResult<(Value, Value)> {
        let decoded = match &self.layout {
            Layout::Catalog => decode_catalog_entry(payload)
                .map(|(k, v)| (Value::String(k), Value::String(v))),
            Layout::Table {
                key_format,
                value_format,
            } => RecordFormat::unpack_record(key_format, value_format, payload),
        };
        decoded.map_err(|reason| EngineError::corruption(&self.uri, offset, reason))
    }
}

impl Iterator for FileCursor<'_> {
    type Item = EngineResult<(Value, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let offset = self.frames.offset();
        let result = match self.frames.next()? {
            Ok(payload) => self.decode(offset, &payload),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => self.yielded += 1,
            Err(e) => {
                self.failed = true;
                warn!(uri = %self.uri, after = self.yielded, error = %e, "cursor failed");
            }
        }
        Some(result)
    }
}

impl Cursor for FileCursor<'_> {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn close(self: Box<Self>) -> EngineResult<()> {
        Ok(())
    }
}

impl Drop for FileCursor<'_> {
    fn drop(&mut self) {
        self.conn.cursors_open.fetch_sub(1, Ordering::AcqRel);
        debug!(uri = %self.uri, records = self.yielded, "cursor closed");
    }
}
