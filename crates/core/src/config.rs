use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::procfs::ProcLayout;

/// Default procfs mount point.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Maximum number of symlink hops followed before giving up on a path.
///
/// Mirrors the kernel's own limit on nested symlinks.
pub const MAX_SYMLINK_DEPTH: usize = 40;

/// Serializable configuration for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root of the process-information filesystem.
    pub proc_root: PathBuf,
    /// Symlink hop limit for library path resolution.
    #[serde(default = "default_symlink_depth")]
    pub max_symlink_depth: usize,
    /// Number of scanning workers. `1` scans sequentially.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_symlink_depth() -> usize {
    MAX_SYMLINK_DEPTH
}

fn default_jobs() -> usize {
    1
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ScanConfig {
    /// Create a configuration scanning the given procfs root with default limits.
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            max_symlink_depth: MAX_SYMLINK_DEPTH,
            jobs: default_jobs(),
        }
    }

    /// Worker count; values below one are treated as one.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_max_symlink_depth(mut self, depth: usize) -> Self {
        self.max_symlink_depth = depth;
        self
    }

    /// Path layout for the configured procfs root.
    pub fn layout(&self) -> ProcLayout {
        ProcLayout::new(&self.proc_root)
    }
}
