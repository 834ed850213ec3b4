//! Testing utilities for the reference engine
//!
//! - **Fixtures**: write `FileEngine` database directories from in-memory tables
//! - **Corruption**: damage table files to exercise scan-fault paths
//!
//! # Example
//!
//! ```ignore
//! use wtbrowse_storage::testing::{corrupt_record, FixtureBuilder};
//!
//! let home = FixtureBuilder::new(dir.path().join("db"))
//!     .table("users", "i", "S")
//!     .insert("users", 1, "alice")
//!     .insert("users", 2, "bob")
//!     .build()?;
//!
//! // Second record now fails its checksum
//! corrupt_record(&home, "users", 1)?;
//! ```

mod corruption;
mod fixture;

pub use corruption::{append_garbage, corrupt_record, truncate_table, TruncationResult};
pub use fixture::{sample_database, FixtureBuilder};
