//! Browser Integration Tests
//!
//! End-to-end tests through the public `wtbrowse` API against databases
//! written by the storage fixtures:
//! - scenario: the users/products/logs walkthrough
//! - lifecycle: open/close state machine and handle release
//! - faults: scan faults in inspection and export
//! - batch: export-all isolation and reporting
//! - properties: counts, limits, and rendering over generated tables

#[path = "../common/mod.rs"]
mod common;

mod batch;
mod faults;
mod lifecycle;
mod properties;
mod scenario;
