//! Core data model: process ids, shared object paths, and per-process scan results.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidProcessId;

/// Identifier of a live OS process at scan time.
///
/// Only valid for the duration of a scan; the process may exit at any point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProcessId(u32);

impl ProcessId {
    /// Wrap a raw pid. Returns `None` for `0`, which never names a process.
    pub fn new(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProcessId {
    type Err = InvalidProcessId;

    /// Accepts only plain ASCII decimal digits, so procfs entries such as
    /// `self`, `net` or `+1` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidProcessId(s.to_string()));
        }
        s.parse::<u32>()
            .ok()
            .and_then(ProcessId::new)
            .ok_or_else(|| InvalidProcessId(s.to_string()))
    }
}

/// Canonical (symlink-resolved) path of a mapped shared object.
///
/// Two raw mapped paths that resolve to the same file compare equal here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedObjectPath(String);

impl SharedObjectPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Build from a resolved filesystem path, decoding lossily.
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SharedObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SharedObjectPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Everything one process contributed during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessScan {
    pub pid: ProcessId,
    /// Resolved shared objects mapped by the process.
    pub objects: BTreeSet<SharedObjectPath>,
    /// First non-library, non-bracketed mapped path (heuristically the executable).
    pub name: Option<String>,
}

impl ProcessScan {
    pub fn new(pid: ProcessId) -> Self {
        Self { pid, objects: BTreeSet::new(), name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_object(mut self, object: SharedObjectPath) -> Self {
        self.objects.insert(object);
        self
    }
}

/// A process that could not be scanned, kept so reports never drop it silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedProcess {
    pub pid: ProcessId,
    pub reason: String,
}
