//! shared-info-core
//!
//! Core library for inventorying which shared objects every running Linux
//! process has mapped into memory.
//!
//! This crate owns the whole scanning pipeline:
//! - `procfs`: procfs layout and process id enumeration
//! - `symlink`: bounded symlink resolution for mapped library paths
//! - `maps`: map-record parsing and per-process scanning
//! - `inventory`: the process/object indexes, the name table, and grouping views
//! - `session`: the scan session that threads configuration through a run
//!
//! Frontends (the `shared-info` CLI) only parse arguments and render the
//! grouping views this crate produces.

pub mod config;
pub mod error;
pub mod inventory;
pub mod maps;
pub mod model;
pub mod procfs;
pub mod session;
pub mod symlink;

pub use config::ScanConfig;
pub use error::{InvalidProcessId, MapLineError, ScanError, ScanResult};
pub use inventory::{GroupBy, GroupedView, Inventory, ObjectRow, ProcessEntry, ProcessRow};
pub use model::{ProcessId, ProcessScan, SharedObjectPath, SkippedProcess};
pub use session::ScanSession;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
