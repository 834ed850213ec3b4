//! Core types for wtbrowse
//!
//! This crate defines the foundational types shared by every layer:
//! - Value: tagged variant for engine-native keys and values
//! - codec: lossless display rendering of a Value into text

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod value;

pub use codec::{decode_hex, encode_hex, render, TUPLE_CLOSE, TUPLE_OPEN, TUPLE_SEPARATOR};
pub use value::Value;
