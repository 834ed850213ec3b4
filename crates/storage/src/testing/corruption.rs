//! Table file corruption utilities
//!
//! Damage a table's data file in place so that a cursor over it fails
//! partway through.
//!
//! # Corruption Types
//!
//! - Record: flips one byte of a frame so its checksum no longer matches
//! - Truncation: removes bytes from the file tail (torn final frame)
//! - Garbage: appends bytes that do not form a complete frame

use crate::file::TABLE_FILE_EXTENSION;
use crate::format::HEADER_SIZE;
use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Result of a truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncationResult {
    /// File that was truncated
    pub path: PathBuf,
    /// Size before
    pub original_size: u64,
    /// Size after
    pub new_size: u64,
}

fn table_path(home: &Path, table: &str) -> PathBuf {
    home.join(format!("{}.{}", table, TABLE_FILE_EXTENSION))
}

/// Flip one byte of the `index`-th record (0-based) of `table`.
///
/// Records before `index` stay readable; reading record `index` fails with a
/// checksum mismatch.
pub fn corrupt_record(home: &Path, table: &str, index: usize) -> io::Result<()> {
    let path = table_path(home, table);
    let mut data = std::fs::read(&path)?;

    let mut offset = HEADER_SIZE;
    for _ in 0..index {
        if offset + 4 > data.len() {
            break;
        }
        let len = LittleEndian::read_u32(&data[offset..offset + 4]) as usize;
        offset += 4 + len + 4;
    }
    if offset + 8 > data.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no record {}", path.display(), index),
        ));
    }

    let len = LittleEndian::read_u32(&data[offset..offset + 4]) as usize;
    // Empty payloads have nothing to flip, so damage the stored checksum
    let target = if len == 0 { offset + 4 } else { offset + 4 + len / 2 };
    data[target] ^= 0xff;

    std::fs::write(&path, data)
}

/// Remove `bytes_to_remove` bytes from the end of `table`'s data file.
///
/// Never cuts into the file header.
pub fn truncate_table(home: &Path, table: &str, bytes_to_remove: u64) -> io::Result<TruncationResult> {
    let path = table_path(home, table);
    let original_size = std::fs::metadata(&path)?.len();
    let new_size = original_size
        .saturating_sub(bytes_to_remove)
        .max(HEADER_SIZE as u64);

    let file = std::fs::OpenOptions::new().write(true).open(&path)?;
    file.set_len(new_size)?;

    Ok(TruncationResult {
        path,
        original_size,
        new_size,
    })
}

/// Append raw bytes to the end of `table`'s data file.
pub fn append_garbage(home: &Path, table: &str, garbage: &[u8]) -> io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(table_path(home, table))?;
    file.write_all(garbage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Connection, METADATA_URI};
    use crate::file::{FileEngine, DEFAULT_CONFIG};
    use crate::testing::FixtureBuilder;
    use tempfile::tempdir;

    fn scan(home: &Path, table: &str) -> (usize, Option<crate::EngineError>) {
        let conn = FileEngine.open_file(home, DEFAULT_CONFIG).unwrap();
        let session = conn.open_session().unwrap();
        let mut ok = 0;
        for entry in session.open_cursor(&format!("table:{}", table)).unwrap() {
            match entry {
                Ok(_) => ok += 1,
                Err(e) => return (ok, Some(e)),
            }
        }
        (ok, None)
    }

    fn five_records(dir: &Path) -> PathBuf {
        let mut builder = FixtureBuilder::new(dir.join("db")).table("t", "i", "S");
        for i in 0..5i64 {
            builder = builder.insert("t", i, format!("value {}", i));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_corrupt_record_fails_at_index() {
        let dir = tempdir().unwrap();
        let home = five_records(dir.path());
        corrupt_record(&home, "t", 3).unwrap();

        let (ok, err) = scan(&home, "t");
        assert_eq!(ok, 3);
        assert!(err.unwrap().is_corruption());
    }

    #[test]
    fn test_corrupt_record_out_of_range() {
        let dir = tempdir().unwrap();
        let home = five_records(dir.path());
        let err = corrupt_record(&home, "t", 5).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_truncate_table_tears_last_record() {
        let dir = tempdir().unwrap();
        let home = five_records(dir.path());
        let result = truncate_table(&home, "t", 3).unwrap();
        assert_eq!(result.original_size - result.new_size, 3);

        let (ok, err) = scan(&home, "t");
        assert_eq!(ok, 4);
        assert!(err.unwrap().is_corruption());
    }

    #[test]
    fn test_append_garbage_is_corruption_after_all_records() {
        let dir = tempdir().unwrap();
        let home = five_records(dir.path());
        append_garbage(&home, "t", &[0x10, 0, 0]).unwrap();

        let (ok, err) = scan(&home, "t");
        assert_eq!(ok, 5);
        assert!(err.is_some());
    }

    #[test]
    fn test_catalog_untouched_by_table_corruption() {
        let dir = tempdir().unwrap();
        let home = five_records(dir.path());
        corrupt_record(&home, "t", 0).unwrap();

        let conn = FileEngine.open_file(&home, DEFAULT_CONFIG).unwrap();
        let session = conn.open_session().unwrap();
        assert!(session
            .open_cursor(METADATA_URI)
            .unwrap()
            .all(|entry| entry.is_ok()));
    }
}
