//! Value types for wtbrowse
//!
//! This module defines the Value type for every key and value read out of a
//! storage engine. Engines hand back one of four shapes, so the enum has
//! exactly four variants.
//!
//! - Integer keys (record numbers, `i`/`q` formats) are `Int`
//! - Strings are always valid UTF-8 (`String`)
//! - Raw byte items (`u` format) are `Bytes`, even when they happen to be text
//! - Multi-column keys or values are `Tuple`

use serde::{Deserialize, Serialize};

/// Engine-native key or value
///
/// ## Ordering
///
/// `Value` derives `Ord`. Variants order as declared (`Int < String < Bytes
/// < Tuple`); within a variant, the natural ordering of the payload applies.
/// Tuples compare element by element.
///
/// ## Equality Rules
///
/// - Different variants are never equal
/// - `String("abc")` != `Bytes([97, 98, 99])`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),

    /// UTF-8 encoded string
    String(String),

    /// Opaque byte sequence, may or may not be UTF-8
    Bytes(Vec<u8>),

    /// Ordered sub-values of a composite (multi-column) item
    Tuple(Vec<Value>),
}

impl Value {
    /// Returns the type name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Tuple(_) => "Tuple",
        }
    }

    /// Check if this is a composite value
    pub fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[u8] if this is a Bytes value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get as &[Value] if this is a Tuple value
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(t) => Some(t),
            _ => None,
        }
    }

    /// Consume and return the inner string, if any
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(t: Vec<Value>) -> Self {
        Value::Tuple(t)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::codec::render(self))
    }
}
