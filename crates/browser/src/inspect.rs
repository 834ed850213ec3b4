//! Table inspector
//!
//! Counts are exact: every inspection scans the whole table rather than
//! trusting stored statistics. A scan that fails partway does not fail the
//! inspection; the result carries a [`RecordCount::Partial`] instead.

use crate::catalog::find_table;
use crate::error::Result;
use crate::stream::RecordStream;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::warn;
use wtbrowse_storage::Connection;

/// Outcome of a full-table count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordCount {
    /// The scan reached the end of the table
    Complete(u64),
    /// The scan failed after `counted` records
    Partial {
        /// Records read before the failure
        counted: u64,
        /// Why the scan stopped
        cause: String,
    },
}

impl RecordCount {
    /// Records counted, exact or not.
    pub fn counted(&self) -> u64 {
        match self {
            RecordCount::Complete(n) => *n,
            RecordCount::Partial { counted, .. } => *counted,
        }
    }

    /// The exact count, if the scan completed.
    pub fn exact(&self) -> Option<u64> {
        match self {
            RecordCount::Complete(n) => Some(*n),
            RecordCount::Partial { .. } => None,
        }
    }

    /// True if the scan completed.
    pub fn is_complete(&self) -> bool {
        matches!(self, RecordCount::Complete(_))
    }

    /// Failure message of a partial count.
    pub fn cause(&self) -> Option<&str> {
        match self {
            RecordCount::Complete(_) => None,
            RecordCount::Partial { cause, .. } => Some(cause),
        }
    }
}

/// What is known about one table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Name that was looked up
    pub name: String,
    /// Whether the catalog declares the table
    pub exists: bool,
    /// Catalog configuration string, if the table exists
    pub config: Option<String>,
    /// Result of the full scan; `Complete(0)` for missing tables
    pub record_count: RecordCount,
}

impl TableInfo {
    fn missing(name: &str) -> Self {
        TableInfo {
            name: name.to_string(),
            exists: false,
            config: None,
            record_count: RecordCount::Complete(0),
        }
    }

    /// Scan failure message, if the count is partial.
    pub fn error(&self) -> Option<&str> {
        self.record_count.cause()
    }
}

/// Serializes as `{name, exists, config, record_count, error}`.
impl Serialize for TableInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TableInfo", 5)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("exists", &self.exists)?;
        state.serialize_field("config", &self.config)?;
        state.serialize_field("record_count", &self.record_count.counted())?;
        state.serialize_field("error", &self.error())?;
        state.end()
    }
}

/// Inspect one table.
///
/// A missing table is a normal outcome (`exists: false`), not an error.
/// Only catalog failures are returned as errors.
pub fn inspect(conn: &dyn Connection, name: &str) -> Result<TableInfo> {
    let Some(table) = find_table(conn, name)? else {
        return Ok(TableInfo::missing(name));
    };

    let record_count = match RecordStream::open(conn, name, None) {
        Ok(stream) => match stream.count_records() {
            (n, None) => RecordCount::Complete(n),
            (counted, Some(e)) => RecordCount::Partial {
                counted,
                cause: e.to_string(),
            },
        },
        // Vanished since the lookup
        Err(e) if e.is_not_found() => return Ok(TableInfo::missing(name)),
        Err(e) if e.is_connection_level() => return Err(e),
        Err(e) => RecordCount::Partial {
            counted: 0,
            cause: e.to_string(),
        },
    };

    if let RecordCount::Partial { counted, cause } = &record_count {
        warn!(table = name, counted, cause = %cause, "record count is partial");
    }

    Ok(TableInfo {
        name: name.to_string(),
        exists: true,
        config: Some(table.raw_config),
        record_count,
    })
}
