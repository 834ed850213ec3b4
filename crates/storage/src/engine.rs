//! Storage engine capability traits.
//!
//! The browser never touches engine files directly. It asks a
//! [`StorageEngine`] for a read-only [`Connection`], opens a short-lived
//! [`Session`] per operation, and reads through [`Cursor`]s.
//!
//! # Handle lifetimes
//!
//! Sessions and cursors borrow their connection, so the borrow checker
//! rules out closing a connection while anything opened from it is alive.
//! Dropping a session or cursor releases it; `close` is the explicit form and
//! reports release errors.
//!
//! # URIs
//!
//! | URI | Yields |
//! |-----|--------|
//! | `metadata:` | `(String key, String config)` catalog entries |
//! | `table:<name>` | decoded `(key, value)` records of one table |

use crate::error::EngineResult;
use std::path::{Component, Path};
use wtbrowse_core::Value;

/// URI of the catalog cursor
pub const METADATA_URI: &str = "metadata:";

/// Namespace marker of table entries in the catalog
pub const TABLE_PREFIX: &str = "table:";

/// Build the cursor URI of a table.
pub fn table_uri(name: &str) -> String {
    format!("{}{}", TABLE_PREFIX, name)
}

/// True if `name` is exactly one plain path component.
///
/// Table names come from the catalog and end up in file names, so names
/// with separators, `..`, or a root are rejected.
pub fn is_plain_table_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(first)), None) => first == name,
        _ => false,
    }
}

/// A storage engine that can open database directories.
///
/// Implementations must be object-safe so the browser can hold any engine
/// behind `Arc<dyn StorageEngine>`.
pub trait StorageEngine: Send + Sync {
    /// Short engine identifier for logs.
    fn name(&self) -> &'static str;

    /// Open a connection to the database at `home`.
    ///
    /// `config` is an engine-specific configuration string, e.g.
    /// `readonly=true`.
    fn open(&self, home: &Path, config: &str) -> EngineResult<Box<dyn Connection>>;
}

/// An open handle to one database directory.
pub trait Connection: Send {
    /// The database directory.
    fn home(&self) -> &Path;

    /// Open a session. Sessions are cheap and meant to live for one operation.
    fn open_session(&self) -> EngineResult<Box<dyn Session<'_> + '_>>;

    /// Number of sessions and cursors currently open on this connection.
    fn stats(&self) -> ConnectionStats;

    /// Close the connection.
    fn close(self: Box<Self>) -> EngineResult<()>;
}

/// A unit of work on a connection.
pub trait Session<'c> {
    /// Open a cursor over `uri`. See the module docs for supported URIs.
    fn open_cursor(&self, uri: &str) -> EngineResult<Box<dyn Cursor + 'c>>;

    /// Close the session.
    fn close(self: Box<Self>) -> EngineResult<()>;
}

/// Sequential iterator over one namespace's key/value pairs.
///
/// After yielding an error, a cursor yields nothing further.
pub trait Cursor: Iterator<Item = EngineResult<(Value, Value)>> {
    /// The URI this cursor was opened on.
    fn uri(&self) -> &str;

    /// Close the cursor.
    fn close(self: Box<Self>) -> EngineResult<()>;
}

/// Open handle counts of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionStats {
    /// Sessions currently open
    pub sessions_open: usize,
    /// Cursors currently open
    pub cursors_open: usize,
}

impl ConnectionStats {
    /// True when no session or cursor is open.
    pub fn is_idle(&self) -> bool {
        self.sessions_open == 0 && self.cursors_open == 0
    }
}
