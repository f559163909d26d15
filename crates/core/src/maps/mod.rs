//! Map-record parsing and per-process scanning.
//!
//! A scan reads `/proc/<pid>/maps` line by line, resolves every shared
//! library path through [`crate::symlink`], and picks the first plain file
//! path as the process display name. Malformed lines are skipped; only a
//! failure to open or read the file fails the scan.

mod record;
mod scanner;

pub use record::{MapRecord, RecordKind};
pub use scanner::{scan_process, scan_reader};
