//! On-disk byte formats of the reference engine.
//!
//! This module centralizes all serialization logic for `FileEngine` files.
//! Keeping serialization separate from cursor logic (how files are opened
//! and walked) keeps the format in one place.
//!
//! # Module Structure
//!
//! - `frame`: file header and checksummed frame layout
//! - `pack`: key/value packing driven by `key_format`/`value_format`
//! - `config`: `key=value,...` configuration strings

pub mod config;
pub mod frame;
pub mod pack;

pub use config::{config_value, parse_config, ConfigEntry};
pub use frame::{
    FileHeader, FrameReader, FrameWriter, CATALOG_MAGIC, FORMAT_VERSION, HEADER_SIZE,
    MAX_FRAME_SIZE, TABLE_MAGIC,
};
pub use pack::{decode_catalog_entry, encode_catalog_entry, FieldKind, RecordFormat};
