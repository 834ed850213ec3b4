//! CSV sink

use super::write_atomically;
use crate::error::Result;
use crate::stream::RecordStream;
use std::io::Write;
use std::path::Path;
use tracing::info;
use wtbrowse_storage::Connection;

/// Header row of every CSV export
pub const CSV_HEADER: &str = "key,value";

/// Escape a field for CSV output.
///
/// Fields containing a comma, quote, or line break are wrapped in double
/// quotes, with inner quotes doubled.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Export a table as CSV, writing rows as the cursor yields them.
pub fn export_csv(
    conn: &dyn Connection,
    table: &str,
    path: &Path,
    limit: Option<u64>,
) -> Result<u64> {
    let stream = RecordStream::open(conn, table, limit)?;

    let count = write_atomically(path, move |writer| {
        writeln!(writer, "{}", CSV_HEADER)?;
        let mut count = 0u64;
        for record in stream {
            let rendered = record?.render();
            writeln!(
                writer,
                "{},{}",
                escape_csv(&rendered.key),
                escape_csv(&rendered.value)
            )?;
            count += 1;
        }
        Ok(count)
    })?;

    info!(table, count, path = %path.display(), "exported table to CSV");
    Ok(count)
}
