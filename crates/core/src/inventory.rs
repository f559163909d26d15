//! Aggregated scan state and its grouping views.
//!
//! `Inventory` holds three structures filled one process at a time:
//! - the process index (pid -> shared objects)
//! - the object index (shared object -> pids), always the exact inverse
//! - the name table (pid -> display name), first write wins
//!
//! Ordered maps and sets keep every view deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{ProcessId, ProcessScan, SharedObjectPath, SkippedProcess};

/// Which index a report is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Process,
    Object,
}

/// A process reference as shown next to an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: ProcessId,
    pub name: Option<String>,
}

/// One row of the by-process view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRow {
    pub pid: ProcessId,
    pub name: Option<String>,
    pub objects: Vec<SharedObjectPath>,
}

/// One row of the by-object view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRow {
    pub object: SharedObjectPath,
    pub processes: Vec<ProcessEntry>,
}

/// Read-only projection handed to presenters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupedView {
    Process(Vec<ProcessRow>),
    Object(Vec<ObjectRow>),
}

impl GroupedView {
    pub fn group_by(&self) -> GroupBy {
        match self {
            GroupedView::Process(_) => GroupBy::Process,
            GroupedView::Object(_) => GroupBy::Object,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GroupedView::Process(rows) => rows.is_empty(),
            GroupedView::Object(rows) => rows.is_empty(),
        }
    }
}

/// Bidirectional process/object index plus the process name table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    processes: BTreeMap<ProcessId, BTreeSet<SharedObjectPath>>,
    objects: BTreeMap<SharedObjectPath, BTreeSet<ProcessId>>,
    names: BTreeMap<ProcessId, String>,
    skipped: BTreeMap<ProcessId, String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one process scan into the indexes.
    ///
    /// Each (pid, object) pair lands in both indexes before the next one is
    /// touched. Re-ingesting the same scan changes nothing, and an existing
    /// name is never overwritten.
    pub fn ingest(&mut self, scan: &ProcessScan) {
        for object in &scan.objects {
            self.processes.entry(scan.pid).or_default().insert(object.clone());
            self.objects.entry(object.clone()).or_default().insert(scan.pid);
        }
        if let Some(name) = &scan.name {
            self.names.entry(scan.pid).or_insert_with(|| name.clone());
        }
    }

    /// Remember a process that could not be scanned.
    pub fn record_skipped(&mut self, pid: ProcessId, reason: impl Into<String>) {
        self.skipped.entry(pid).or_insert_with(|| reason.into());
    }

    pub fn processes(&self) -> &BTreeMap<ProcessId, BTreeSet<SharedObjectPath>> {
        &self.processes
    }

    pub fn objects(&self) -> &BTreeMap<SharedObjectPath, BTreeSet<ProcessId>> {
        &self.objects
    }

    pub fn names(&self) -> &BTreeMap<ProcessId, String> {
        &self.names
    }

    pub fn name_of(&self, pid: ProcessId) -> Option<&str> {
        self.names.get(&pid).map(String::as_str)
    }

    pub fn skipped(&self) -> Vec<SkippedProcess> {
        self.skipped
            .iter()
            .map(|(pid, reason)| SkippedProcess { pid: *pid, reason: reason.clone() })
            .collect()
    }

    /// True when `pid` maps `object` (checked against the process index).
    pub fn contains(&self, pid: ProcessId, object: &SharedObjectPath) -> bool {
        self.processes.get(&pid).is_some_and(|set| set.contains(object))
    }

    /// Verify the two indexes are exact inverses and hold no empty sets.
    pub fn is_consistent(&self) -> bool {
        let forward = self.processes.iter().all(|(pid, objects)| {
            !objects.is_empty()
                && objects.iter().all(|o| self.objects.get(o).is_some_and(|p| p.contains(pid)))
        });
        let backward = self.objects.iter().all(|(object, pids)| {
            !pids.is_empty()
                && pids.iter().all(|p| self.processes.get(p).is_some_and(|o| o.contains(object)))
        });
        forward && backward
    }

    pub fn view(&self, group_by: GroupBy) -> GroupedView {
        match group_by {
            GroupBy::Process => GroupedView::Process(self.by_process()),
            GroupBy::Object => GroupedView::Object(self.by_object()),
        }
    }

    /// Rows ordered by pid, objects ordered by path.
    pub fn by_process(&self) -> Vec<ProcessRow> {
        self.processes
            .iter()
            .map(|(pid, objects)| ProcessRow {
                pid: *pid,
                name: self.names.get(pid).cloned(),
                objects: objects.iter().cloned().collect(),
            })
            .collect()
    }

    /// Rows ordered by path, processes ordered by pid.
    pub fn by_object(&self) -> Vec<ObjectRow> {
        self.objects
            .iter()
            .map(|(object, pids)| ObjectRow {
                object: object.clone(),
                processes: pids
                    .iter()
                    .map(|pid| ProcessEntry { pid: *pid, name: self.names.get(pid).cloned() })
                    .collect(),
            })
            .collect()
    }
}
