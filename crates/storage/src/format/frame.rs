//! File header and checksummed frame layout
//!
//! Catalog and table files share one layout.
//!
//! # Format
//!
//! ```text
//! +------------------+
//! | Magic            | 4 bytes ("WTBC" catalog, "WTBT" table)
//! | Format Version   | 4 bytes (u32 LE)
//! +------------------+
//! | Frame 0          |
//! | Frame 1          |
//! | ...              |
//! +------------------+
//!
//! Frame:
//! +------------------+
//! | Payload Length   | 4 bytes (u32 LE)
//! | Payload          | variable
//! | CRC32            | 4 bytes (of payload only)
//! +------------------+
//! ```
//!
//! End of file exactly at a frame boundary ends the sequence. Anything else
//! (short header, short payload, checksum mismatch) is corruption.

use crate::error::{EngineError, EngineResult};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

/// Catalog file magic bytes: "WTBC"
pub const CATALOG_MAGIC: [u8; 4] = *b"WTBC";

/// Table file magic bytes: "WTBT"
pub const TABLE_MAGIC: [u8; 4] = *b"WTBT";

/// Current file format version
pub const FORMAT_VERSION: u32 = 1;

/// Size of the file header in bytes
pub const HEADER_SIZE: usize = 8;

/// Largest payload a frame may declare (64 MiB)
pub const MAX_FRAME_SIZE: u32 = 64 * 1024 * 1024;

/// Leading header of every engine file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Magic bytes identifying the file kind
    pub magic: [u8; 4],
    /// Format version
    pub version: u32,
}

impl FileHeader {
    /// Header for a new file of the given kind
    pub fn new(magic: [u8; 4]) -> Self {
        FileHeader {
            magic,
            version: FORMAT_VERSION,
        }
    }

    /// Serialize the header
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        LittleEndian::write_u32(&mut bytes[4..8], self.version);
        bytes
    }

    /// Read and validate a header.
    pub fn read_from<R: Read>(reader: &mut R, expected_magic: [u8; 4]) -> EngineResult<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        let n = read_full(reader, &mut bytes)?;
        if n < HEADER_SIZE {
            return Err(EngineError::InvalidFormat(format!(
                "file header too short ({} of {} bytes)",
                n, HEADER_SIZE
            )));
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        if magic != expected_magic {
            return Err(EngineError::InvalidFormat(format!(
                "bad magic {:?}, expected {:?}",
                String::from_utf8_lossy(&magic),
                String::from_utf8_lossy(&expected_magic)
            )));
        }

        let version = LittleEndian::read_u32(&bytes[4..8]);
        if version != FORMAT_VERSION {
            return Err(EngineError::InvalidFormat(format!(
                "unsupported format version {}",
                version
            )));
        }

        Ok(FileHeader { magic, version })
    }
}

/// Reads checksummed frames after a validated header.
///
/// Yields each payload in file order. After the first error the reader is
/// finished and yields nothing more.
pub struct FrameReader<R> {
    reader: R,
    uri: String,
    offset: u64,
    finished: bool,
}

impl FrameReader<BufReader<File>> {
    /// Open a file, validate its header, and position at the first frame.
    pub fn open(path: &Path, magic: [u8; 4], uri: impl Into<String>) -> EngineResult<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        FileHeader::read_from(&mut reader, magic)?;
        Ok(FrameReader::new(reader, uri))
    }
}

impl<R: Read> FrameReader<R> {
    /// Wrap a reader positioned just past the file header.
    ///
    /// `uri` is only used to label corruption errors.
    pub fn new(reader: R, uri: impl Into<String>) -> Self {
        FrameReader {
            reader,
            uri: uri.into(),
            offset: HEADER_SIZE as u64,
            finished: false,
        }
    }

    /// Byte offset of the next frame
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn fail(&mut self, offset: u64, reason: String) -> EngineError {
        self.finished = true;
        EngineError::corruption(&self.uri, offset, reason)
    }

    fn read_frame(&mut self) -> Option<EngineResult<Vec<u8>>> {
        let frame_offset = self.offset;

        let mut len_buf = [0u8; 4];
        match read_full(&mut self.reader, &mut len_buf) {
            Ok(0) => {
                self.finished = true;
                return None;
            }
            Ok(4) => {}
            Ok(n) => {
                return Some(Err(
                    self.fail(frame_offset, format!("truncated frame header ({} of 4 bytes)", n))
                ))
            }
            Err(e) => {
                self.finished = true;
                return Some(Err(e.into()));
            }
        }

        let len = LittleEndian::read_u32(&len_buf);
        if len > MAX_FRAME_SIZE {
            return Some(Err(self.fail(
                frame_offset,
                format!("frame length {} exceeds maximum {}", len, MAX_FRAME_SIZE),
            )));
        }

        let mut payload = vec![0u8; len as usize];
        match read_full(&mut self.reader, &mut payload) {
            Ok(n) if n == payload.len() => {}
            Ok(n) => {
                return Some(Err(self.fail(
                    frame_offset,
                    format!("truncated payload ({} of {} bytes)", n, len),
                )))
            }
            Err(e) => {
                self.finished = true;
                return Some(Err(e.into()));
            }
        }

        let mut crc_buf = [0u8; 4];
        match read_full(&mut self.reader, &mut crc_buf) {
            Ok(4) => {}
            Ok(n) => {
                return Some(Err(
                    self.fail(frame_offset, format!("truncated checksum ({} of 4 bytes)", n))
                ))
            }
            Err(e) => {
                self.finished = true;
                return Some(Err(e.into()));
            }
        }

        let stored = LittleEndian::read_u32(&crc_buf);
        let computed = crc32fast::hash(&payload);
        if stored != computed {
            return Some(Err(self.fail(
                frame_offset,
                format!(
                    "checksum mismatch: stored {:08x}, computed {:08x}",
                    stored, computed
                ),
            )));
        }

        self.offset += 8 + len as u64;
        Some(Ok(payload))
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = EngineResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.read_frame()
    }
}

/// Writes a header followed by checksummed frames.
pub struct FrameWriter<W: Write> {
    writer: W,
}

impl<W: Write> FrameWriter<W> {
    /// Write the header for a file of the given kind.
    pub fn new(mut writer: W, magic: [u8; 4]) -> io::Result<Self> {
        writer.write_all(&FileHeader::new(magic).to_bytes())?;
        Ok(FrameWriter { writer })
    }

    /// Append one frame.
    pub fn write_frame(&mut self, payload: &[u8]) -> io::Result<()> {
        if payload.len() > MAX_FRAME_SIZE as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("frame payload of {} bytes exceeds maximum", payload.len()),
            ));
        }
        self.writer.write_u32::<LittleEndian>(payload.len() as u32)?;
        self.writer.write_all(payload)?;
        self.writer
            .write_u32::<LittleEndian>(crc32fast::hash(payload))?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Fill `buf` from `reader`, stopping early only at end of input.
///
/// Returns the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
