use anyhow::{Context, Result};
use shared_info_core::{GroupBy, Inventory, ProcessId, ScanConfig, ScanSession};
use tracing::debug;

use crate::render::{presenter_for, OutputFormat, Report};

/// Options for one report invocation.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub group_by: GroupBy,
    /// Restrict the scan to this process instead of enumerating procfs.
    pub pid: Option<ProcessId>,
    pub format: OutputFormat,
    /// Column budget for table wrapping.
    pub width: usize,
    pub config: ScanConfig,
}

/// Scan either every process or just `pid`.
///
/// Only an unreadable procfs root is an error; unreadable processes are
/// recorded as skipped on the returned inventory.
pub fn collect_inventory(config: &ScanConfig, pid: Option<ProcessId>) -> Result<Inventory> {
    let mut session = ScanSession::new(config.clone());
    match pid {
        Some(pid) => session.run_pid(pid),
        None => session.run_all().with_context(|| {
            format!("Failed to enumerate processes under {}", config.proc_root.display())
        })?,
    }
    Ok(session.finish())
}

/// Render an already collected inventory.
pub fn render_report(inventory: &Inventory, options: &ReportOptions) -> Result<String> {
    let report = Report::new(inventory, &options.config, options.group_by);
    let presenter = presenter_for(options.format, options.width);
    debug!(presenter = presenter.name(), width = options.width, "rendering report");
    presenter
        .render(&report)
        .with_context(|| format!("Failed to render {} report", presenter.name()))
}

/// Scan, render, and print a report to stdout.
pub fn report_command(options: &ReportOptions) -> Result<()> {
    let inventory = collect_inventory(&options.config, options.pid)?;
    let rendered = render_report(&inventory, options)?;
    println!("{}", rendered.trim_end());
    Ok(())
}
