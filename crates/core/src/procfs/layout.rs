use std::path::{Path, PathBuf};

use crate::model::ProcessId;

/// Logical layout of a procfs tree.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcLayout {
    /// Root of the process-information filesystem (normally `/proc`).
    pub root: PathBuf,
}

impl ProcLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Per-process directory, e.g. `/proc/42`.
    pub fn process_dir(&self, pid: ProcessId) -> PathBuf {
        self.root.join(pid.to_string())
    }

    /// Per-process map-records file, e.g. `/proc/42/maps`.
    pub fn maps_path(&self, pid: ProcessId) -> PathBuf {
        self.process_dir(pid).join("maps")
    }
}
