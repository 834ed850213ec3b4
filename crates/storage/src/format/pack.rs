//! Record packing
//!
//! A table's `key_format` and `value_format` each list one type character per
//! column. One character decodes to a scalar [`Value`]; several decode to a
//! [`Value::Tuple`].
//!
//! | Character | Value | Encoding |
//! |-----------|-------|----------|
//! | `b h i l q` | `Int` | 8 bytes, i64 LE |
//! | `S` | `String` | u32 LE length + UTF-8 bytes |
//! | `u` | `Bytes` | u32 LE length + raw bytes |
//!
//! Leading byte-order markers (`@ < > = !`) are accepted and ignored.
//!
//! A table frame payload is the packed key immediately followed by the
//! packed value. Every field is fixed-size or length-prefixed, so no extra
//! delimiter is needed.

use crate::error::{EngineError, EngineResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use wtbrowse_core::Value;

/// Storage type of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed integer
    Int,
    /// UTF-8 string
    String,
    /// Raw bytes
    Bytes,
}

impl FieldKind {
    fn name(&self) -> &'static str {
        match self {
            FieldKind::Int => "Int",
            FieldKind::String => "String",
            FieldKind::Bytes => "Bytes",
        }
    }
}

/// Parsed `key_format` or `value_format`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFormat {
    format: String,
    fields: Vec<FieldKind>,
}

impl RecordFormat {
    /// Parse a format string such as `i`, `S`, or `qSu`.
    pub fn parse(format: &str) -> EngineResult<Self> {
        let unsupported = |reason: String| EngineError::UnsupportedFormat {
            format: format.to_string(),
            reason,
        };

        let body = format.trim_start_matches(['@', '<', '>', '=', '!']);
        let mut fields = Vec::with_capacity(body.len());
        for c in body.chars() {
            let kind = match c {
                'b' | 'h' | 'i' | 'l' | 'q' => FieldKind::Int,
                'S' => FieldKind::String,
                'u' => FieldKind::Bytes,
                other => return Err(unsupported(format!("unknown type character '{}'", other))),
            };
            fields.push(kind);
        }

        if fields.is_empty() {
            return Err(unsupported("no columns".to_string()));
        }

        Ok(RecordFormat {
            format: format.to_string(),
            fields,
        })
    }

    /// The format string as given
    pub fn as_str(&self) -> &str {
        &self.format
    }

    /// Column kinds in order
    pub fn fields(&self) -> &[FieldKind] {
        &self.fields
    }

    /// True for multi-column formats
    pub fn is_composite(&self) -> bool {
        self.fields.len() > 1
    }

    /// Append the packed form of `value` to `out`.
    pub fn pack_into(&self, value: &Value, out: &mut Vec<u8>) -> EngineResult<()> {
        if self.is_composite() {
            let items = value.as_tuple().ok_or_else(|| self.mismatch("Tuple", value))?;
            if items.len() != self.fields.len() {
                return Err(EngineError::UnsupportedFormat {
                    format: self.format.clone(),
                    reason: format!(
                        "expected {} columns, got {}",
                        self.fields.len(),
                        items.len()
                    ),
                });
            }
            for (kind, item) in self.fields.iter().zip(items) {
                self.pack_field(*kind, item, out)?;
            }
            Ok(())
        } else {
            self.pack_field(self.fields[0], value, out)
        }
    }

    fn pack_field(&self, kind: FieldKind, value: &Value, out: &mut Vec<u8>) -> EngineResult<()> {
        match (kind, value) {
            (FieldKind::Int, Value::Int(i)) => out.write_i64::<LittleEndian>(*i)?,
            (FieldKind::String, Value::String(s)) => write_prefixed(out, s.as_bytes())?,
            (FieldKind::Bytes, Value::Bytes(b)) => write_prefixed(out, b)?,
            (kind, other) => return Err(self.mismatch(kind.name(), other)),
        }
        Ok(())
    }

    fn mismatch(&self, expected: &str, actual: &Value) -> EngineError {
        EngineError::UnsupportedFormat {
            format: self.format.clone(),
            reason: format!("expected {}, got {}", expected, actual.type_name()),
        }
    }

    /// Decode one value from the front of `input`, advancing it.
    pub fn unpack_from(&self, input: &mut &[u8]) -> Result<Value, String> {
        if self.is_composite() {
            let items = self
                .fields
                .iter()
                .map(|kind| unpack_field(*kind, input))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Tuple(items))
        } else {
            unpack_field(self.fields[0], input)
        }
    }

    /// Pack a key/value pair into one table frame payload.
    pub fn pack_record(
        key_format: &RecordFormat,
        value_format: &RecordFormat,
        key: &Value,
        value: &Value,
    ) -> EngineResult<Vec<u8>> {
        let mut out = Vec::new();
        key_format.pack_into(key, &mut out)?;
        value_format.pack_into(value, &mut out)?;
        Ok(out)
    }

    /// Decode a table frame payload into its key/value pair.
    pub fn unpack_record(
        key_format: &RecordFormat,
        value_format: &RecordFormat,
        payload: &[u8],
    ) -> Result<(Value, Value), String> {
        let mut input = payload;
        let key = key_format
            .unpack_from(&mut input)
            .map_err(|e| format!("key: {}", e))?;
        let value = value_format
            .unpack_from(&mut input)
            .map_err(|e| format!("value: {}", e))?;
        if !input.is_empty() {
            return Err(format!("{} trailing bytes after record", input.len()));
        }
        Ok((key, value))
    }
}

fn unpack_field(kind: FieldKind, input: &mut &[u8]) -> Result<Value, String> {
    match kind {
        FieldKind::Int => input
            .read_i64::<LittleEndian>()
            .map(Value::Int)
            .map_err(|_| "truncated integer".to_string()),
        FieldKind::String => {
            let bytes = read_prefixed(input)?;
            String::from_utf8(bytes)
                .map(Value::String)
                .map_err(|e| format!("invalid UTF-8 in string column: {}", e))
        }
        FieldKind::Bytes => read_prefixed(input).map(Value::Bytes),
    }
}

fn write_prefixed(out: &mut Vec<u8>, bytes: &[u8]) -> std::io::Result<()> {
    let len = u32::try_from(bytes.len()).map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "item longer than u32::MAX")
    })?;
    out.write_u32::<LittleEndian>(len)?;
    out.extend_from_slice(bytes);
    Ok(())
}

fn read_prefixed(input: &mut &[u8]) -> Result<Vec<u8>, String> {
    let len = input
        .read_u32::<LittleEndian>()
        .map_err(|_| "truncated length prefix".to_string())? as usize;
    if input.len() < len {
        return Err(format!("length {} exceeds remaining {} bytes", len, input.len()));
    }
    let (head, tail) = input.split_at(len);
    *input = tail;
    Ok(head.to_vec())
}

/// Encode a catalog entry payload: two length-prefixed strings.
pub fn encode_catalog_entry(key: &str, value: &str) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(8 + key.len() + value.len());
    write_prefixed(&mut out, key.as_bytes())?;
    write_prefixed(&mut out, value.as_bytes())?;
    Ok(out)
}

/// Decode a catalog entry payload.
pub fn decode_catalog_entry(payload: &[u8]) -> Result<(String, String), String> {
    let mut input = payload;
    let key = String::from_utf8(read_prefixed(&mut input)?)
        .map_err(|e| format!("catalog key is not UTF-8: {}", e))?;
    let value = String::from_utf8(read_prefixed(&mut input)?)
        .map_err(|e| format!("catalog value is not UTF-8: {}", e))?;
    if !input.is_empty() {
        return Err(format!("{} trailing bytes after catalog entry", input.len()));
    }
    Ok((key, value))
}
