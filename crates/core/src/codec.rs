//! Display codec for engine values
//!
//! `render` turns any [`Value`] into the canonical text used by every export
//! format. It is total and never fails.
//!
//! | Value | Rendering |
//! |-------|-----------|
//! | `Int(42)` | `42` |
//! | `String("abc")` | `abc` |
//! | `Bytes` holding valid UTF-8 | the decoded text |
//! | `Bytes` holding invalid UTF-8 | lowercase hex of the raw bytes |
//! | `Tuple([1, "a"])` | `(1, a)` |
//!
//! This is a display codec, not a self-describing format: hex output and text
//! that happens to look like hex are indistinguishable. An import path would
//! need an explicit encoding tag.
//!
//! Tuples are wrapped in [`TUPLE_OPEN`]/[`TUPLE_CLOSE`] with elements joined
//! by [`TUPLE_SEPARATOR`]. Elements are rendered recursively with the same
//! rules, so nested tuples nest their parentheses.

use crate::value::Value;

/// Opening delimiter of a rendered tuple
pub const TUPLE_OPEN: &str = "(";

/// Closing delimiter of a rendered tuple
pub const TUPLE_CLOSE: &str = ")";

/// Separator between rendered tuple elements
pub const TUPLE_SEPARATOR: &str = ", ";

/// Render a value to its canonical text form.
pub fn render(value: &Value) -> String {
    match value {
        Value::Int(i) => i.to_string(),
        Value::String(s) => s.clone(),
        Value::Bytes(b) => render_bytes(b),
        Value::Tuple(items) => {
            let parts: Vec<String> = items.iter().map(render).collect();
            format!("{}{}{}", TUPLE_OPEN, parts.join(TUPLE_SEPARATOR), TUPLE_CLOSE)
        }
    }
}

/// Decode bytes as UTF-8, falling back to lowercase hex.
fn render_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => encode_hex(bytes),
    }
}

/// Lowercase hex encoding, two characters per byte.
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decode a hex string produced by [`encode_hex`].
///
/// Accepts upper or lower case. Returns `None` for odd lengths or non-hex
/// characters.
pub fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        })
        .collect()
}
