//! Error types for the scanning pipeline.
//!
//! Only `ScanError::ProcRootUnreadable` aborts a run. Everything else is
//! recovered from at the level it occurs (one process, or one map line).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::ProcessId;

/// Error type for enumeration and per-process scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The procfs root could not be listed, so no process can be scanned.
    #[error("Failed to read process root {}: {source}", path.display())]
    ProcRootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One process's map file could not be opened or read.
    ///
    /// Usually the process exited mid-scan or belongs to another user.
    #[error("Failed to read map records for pid {pid} at {}: {source}", path.display())]
    MapsUnreadable {
        pid: ProcessId,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Convenience result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Why a single map-record line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapLineError {
    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("invalid address range '{0}'")]
    AddressRange(String),

    #[error("invalid permissions '{0}'")]
    Permissions(String),

    #[error("invalid offset '{0}'")]
    Offset(String),

    #[error("invalid device '{0}'")]
    Device(String),

    #[error("invalid inode '{0}'")]
    Inode(String),
}

/// A string that is not a positive decimal process id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid process id '{0}'")]
pub struct InvalidProcessId(pub String);
