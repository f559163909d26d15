//! Scan session: one explicit value carrying configuration and results through a run.

use std::thread;

use crossbeam::channel::unbounded;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::inventory::Inventory;
use crate::maps::scan_process;
use crate::model::{ProcessId, ProcessScan};
use crate::procfs::{list_process_ids, ProcLayout};

/// Drives enumeration, scanning, and ingestion for a single invocation.
#[derive(Debug)]
pub struct ScanSession {
    config: ScanConfig,
    layout: ProcLayout,
    inventory: Inventory,
}

impl ScanSession {
    pub fn new(config: ScanConfig) -> Self {
        let layout = config.layout();
        Self { config, layout, inventory: Inventory::new() }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Enumerate every process under the procfs root and scan each one.
    ///
    /// Fails only if the root cannot be listed.
    pub fn run_all(&mut self) -> ScanResult<()> {
        let pids = list_process_ids(&self.layout.root)?;
        self.scan_pids(&pids);
        info!(
            scanned = self.inventory.processes().len(),
            objects = self.inventory.objects().len(),
            skipped = self.inventory.skipped().len(),
            "scan complete"
        );
        Ok(())
    }

    /// Scan a single, explicitly chosen process.
    pub fn run_pid(&mut self, pid: ProcessId) {
        self.scan_pids(&[pid]);
    }

    /// Scan the given pids, in parallel when more than one job is configured.
    ///
    /// Ingestion always happens on the calling thread, one process at a time.
    pub fn scan_pids(&mut self, pids: &[ProcessId]) {
        let jobs = self.config.jobs.max(1).min(pids.len());
        if jobs <= 1 {
            for &pid in pids {
                let outcome = scan_process(&self.layout, pid, self.config.max_symlink_depth);
                self.absorb(pid, outcome);
            }
        } else {
            self.scan_parallel(pids, jobs);
        }
    }

    fn scan_parallel(&mut self, pids: &[ProcessId], jobs: usize) {
        debug!(jobs, count = pids.len(), "scanning processes in parallel");

        let (work_tx, work_rx) = unbounded::<ProcessId>();
        let (result_tx, result_rx) = unbounded::<(ProcessId, ScanResult<ProcessScan>)>();
        for &pid in pids {
            // The receiver is alive in this scope, so sending cannot fail.
            let _ = work_tx.send(pid);
        }
        drop(work_tx);

        let layout = self.layout.clone();
        let depth = self.config.max_symlink_depth;

        thread::scope(|scope| {
            for _ in 0..jobs {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let layout = &layout;
                scope.spawn(move || {
                    for pid in work_rx.iter() {
                        let outcome = scan_process(layout, pid, depth);
                        if result_tx.send((pid, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(result_tx);

            for (pid, outcome) in result_rx.iter() {
                self.absorb(pid, outcome);
            }
        });
    }

    fn absorb(&mut self, pid: ProcessId, outcome: Result<ProcessScan, ScanError>) {
        match outcome {
            Ok(scan) => self.inventory.ingest(&scan),
            Err(err) => {
                warn!(%pid, error = %err, "skipping process");
                self.inventory.record_skipped(pid, err.to_string());
            }
        }
    }

    /// Hand back the finished, read-only inventory.
    pub fn finish(self) -> Inventory {
        self.inventory
    }
}

/// Scan everything under `config.proc_root` in one call.
pub fn scan_all(config: ScanConfig) -> ScanResult<Inventory> {
    let mut session = ScanSession::new(config);
    session.run_all()?;
    Ok(session.finish())
}
