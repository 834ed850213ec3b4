//! Record streams
//!
//! A [`RecordStream`] owns the session and cursor of one table scan. Both
//! are released exactly once: when the cursor is exhausted, when the limit
//! is reached, when the cursor fails, or when the stream is dropped early.
//! After any of these the stream yields nothing more.

use crate::catalog::find_table;
use crate::error::{BrowseError, Result};
use serde::Serialize;
use tracing::{debug, warn};
use wtbrowse_core::{render, Value};
use wtbrowse_storage::{table_uri, Connection, Cursor, Session};

/// One key/value pair read from a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record key
    pub key: Value,
    /// Record value
    pub value: Value,
}

impl Record {
    /// Render both halves to their display text.
    pub fn render(&self) -> RenderedRecord {
        RenderedRecord {
            key: render(&self.key),
            value: render(&self.value),
        }
    }
}

/// A record as written to export files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRecord {
    /// Rendered key
    pub key: String,
    /// Rendered value
    pub value: String,
}

/// Lazy, finite, single-pass sequence of a table's records.
pub struct RecordStream<'c> {
    table: String,
    limit: Option<u64>,
    yielded: u64,
    cursor: Option<Box<dyn Cursor + 'c>>,
    session: Option<Box<dyn Session<'c> + 'c>>,
}

impl<'c> RecordStream<'c> {
    /// Open a stream over `table`, stopping after `limit` records if set.
    ///
    /// Fails with `NoSuchTable` before anything is read if the catalog has
    /// no such table.
    pub fn open(conn: &'c dyn Connection, table: &str, limit: Option<u64>) -> Result<Self> {
        if find_table(conn, table)?.is_none() {
            return Err(BrowseError::NoSuchTable(table.to_string()));
        }

        let session = conn.open_session()?;
        let cursor = match session.open_cursor(&table_uri(table)) {
            Ok(cursor) => cursor,
            // Dropped between the catalog check and the open
            Err(e) if e.is_not_found() => return Err(BrowseError::NoSuchTable(table.to_string())),
            Err(e) => return Err(BrowseError::scan(table, e)),
        };

        debug!(table, ?limit, "record stream opened");
        let mut stream = RecordStream {
            table: table.to_string(),
            limit,
            yielded: 0,
            cursor: Some(cursor),
            session: Some(session),
        };
        if limit == Some(0) {
            stream.release();
        }
        Ok(stream)
    }

    /// Table this stream reads
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Records yielded so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    /// True once the cursor and session have been released.
    pub fn is_released(&self) -> bool {
        self.cursor.is_none() && self.session.is_none()
    }

    /// Drain the stream, returning how many records it yielded.
    ///
    /// On a scan failure the count read before the failure is returned
    /// alongside the error.
    pub fn count_records(mut self) -> (u64, Option<BrowseError>) {
        let error = self.by_ref().find_map(|item| item.err());
        (self.yielded, error)
    }

    fn release(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            if let Err(e) = cursor.close() {
                warn!(table = %self.table, error = %e, "cursor close failed");
            }
        }
        if let Some(session) = self.session.take() {
            if let Err(e) = session.close() {
                warn!(table = %self.table, error = %e, "session close failed");
            }
            debug!(table = %self.table, records = self.yielded, "record stream released");
        }
    }
}

impl Iterator for RecordStream<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        match cursor.next() {
            Some(Ok((key, value))) => {
                self.yielded += 1;
                if self.limit.is_some_and(|limit| self.yielded >= limit) {
                    self.release();
                }
                Some(Ok(Record { key, value }))
            }
            Some(Err(e)) => {
                self.release();
                Some(Err(BrowseError::scan(&self.table, e)))
            }
            None => {
                self.release();
                None
            }
        }
    }
}

impl Drop for RecordStream<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
