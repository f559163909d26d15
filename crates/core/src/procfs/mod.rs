//! Procfs layout and process enumeration.

mod layout;

pub use layout::ProcLayout;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ScanError, ScanResult};
use crate::model::ProcessId;

/// List the process ids present under `root`.
///
/// Only immediate subdirectories whose names are entirely decimal digits are
/// returned; entries like `self` or `net` are skipped. No ordering is implied.
///
/// Fails only when `root` itself cannot be listed.
pub fn list_process_ids(root: &Path) -> ScanResult<Vec<ProcessId>> {
    let entries = fs::read_dir(root)
        .map_err(|source| ScanError::ProcRootUnreadable { path: root.to_path_buf(), source })?;

    let mut pids = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "skipping unreadable procfs entry");
                continue;
            }
        };

        let Some(pid) = entry.file_name().to_str().and_then(|name| name.parse::<ProcessId>().ok())
        else {
            continue;
        };

        // The process may already be gone; a failed stat just drops it.
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => pids.push(pid),
            _ => continue,
        }
    }

    debug!(root = %root.display(), count = pids.len(), "enumerated processes");
    Ok(pids)
}
