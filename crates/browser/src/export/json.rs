//! JSON sink

use super::write_atomically;
use crate::error::Result;
use crate::stream::{RecordStream, RenderedRecord};
use serde::Serialize;
use std::path::Path;
use tracing::info;
use wtbrowse_storage::Connection;

/// Document written by [`export_json`].
#[derive(Debug, Serialize)]
pub struct JsonExport {
    /// Table name
    pub table: String,
    /// Number of entries in `records`
    pub record_count: u64,
    /// Rendered records in cursor order
    pub records: Vec<RenderedRecord>,
}

/// Export a table as one pretty-printed JSON document.
///
/// All records are read, and the cursor released, before the file is
/// written.
pub fn export_json(
    conn: &dyn Connection,
    table: &str,
    path: &Path,
    limit: Option<u64>,
) -> Result<u64> {
    let records = RecordStream::open(conn, table, limit)?
        .map(|record| record.map(|r| r.render()))
        .collect::<Result<Vec<_>>>()?;

    let document = JsonExport {
        table: table.to_string(),
        record_count: records.len() as u64,
        records,
    };

    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, &document)?;
        Ok(())
    })?;

    info!(table, count = document.record_count, path = %path.display(), "exported table to JSON");
    Ok(document.record_count)
}
