//! Catalog reader
//!
//! Tables are the catalog entries whose key starts with `table:`. The
//! catalog is read fresh on every call so results reflect the database at
//! call time.

use crate::error::Result;
use serde::Serialize;
use tracing::debug;
use wtbrowse_core::Value;
use wtbrowse_storage::{Connection, Cursor, EngineError, EngineResult, METADATA_URI, TABLE_PREFIX};

/// A table declared in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    /// Table name, without the `table:` prefix
    pub name: String,
    /// Engine configuration string, passed through as-is
    pub raw_config: String,
}

/// List every table in the catalog, sorted by name.
///
/// Any catalog read failure fails the whole call; no partial list is
/// returned.
pub fn list_tables(conn: &dyn Connection) -> Result<Vec<TableDescriptor>> {
    let mut tables = Vec::new();
    scan_tables(conn, |table| {
        tables.push(table);
        false
    })?;
    tables.sort_by(|a, b| a.name.cmp(&b.name));
    tables.dedup_by(|a, b| a.name == b.name);
    debug!(count = tables.len(), "listed tables");
    Ok(tables)
}

/// Find one table by exact name, stopping at the first match.
pub fn find_table(conn: &dyn Connection, name: &str) -> Result<Option<TableDescriptor>> {
    let mut found = None;
    scan_tables(conn, |table| {
        if table.name == name {
            found = Some(table);
            true
        } else {
            false
        }
    })?;
    Ok(found)
}

/// Walk table entries of the catalog until `visit` returns true.
///
/// The session and cursor are released before returning on every path.
fn scan_tables<F>(conn: &dyn Connection, mut visit: F) -> Result<()>
where
    F: FnMut(TableDescriptor) -> bool,
{
    let session = conn.open_session()?;
    let walked = session
        .open_cursor(METADATA_URI)
        .and_then(|cursor| walk_catalog(cursor, &mut visit));
    session.close()?;
    Ok(walked?)
}

fn walk_catalog<F>(cursor: Box<dyn Cursor + '_>, visit: &mut F) -> EngineResult<()>
where
    F: FnMut(TableDescriptor) -> bool,
{
    for entry in cursor {
        let (key, value) = entry?;
        let Some(name) = key.as_str().and_then(|k| k.strip_prefix(TABLE_PREFIX)) else {
            continue;
        };
        let raw_config = match value {
            Value::String(s) => s,
            other => {
                return Err(EngineError::InvalidFormat(format!(
                    "catalog value of {}{} is {}, expected String",
                    TABLE_PREFIX,
                    name,
                    other.type_name()
                )))
            }
        };
        if visit(TableDescriptor {
            name: name.to_string(),
            raw_config,
        }) {
            break;
        }
    }
    Ok(())
}
