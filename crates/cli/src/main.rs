use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use shared_info::commands::{report_command, ReportOptions};
use shared_info::render::OutputFormat;
use shared_info::{init_logging, resolve_width};
use shared_info_core::config::DEFAULT_PROC_ROOT;
use shared_info_core::{GroupBy, ProcessId, ScanConfig};

/// Shared library inventory for running processes.
///
/// This CLI is a thin wrapper around `shared-info-core` (exposed in code as
/// `shared_info_core`). Scanning and indexing live in the library; this
/// binary only parses arguments and renders the result.
#[derive(Parser, Debug)]
#[command(
    name = "shared-info",
    version,
    about = "List the shared objects mapped by running processes",
    long_about = None
)]
#[command(group(ArgGroup::new("grouping").required(true).args(["by_process", "by_object"])))]
struct Cli {
    /// Group the report by process.
    #[arg(long = "proc")]
    by_process: bool,

    /// Group the report by shared object.
    #[arg(long = "obj")]
    by_object: bool,

    /// Scan only this process id.
    #[arg(long)]
    pid: Option<ProcessId>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Table width in columns. Defaults to the terminal width.
    #[arg(long)]
    width: Option<usize>,

    /// Number of processes to scan concurrently.
    #[arg(long, default_value_t = 1)]
    jobs: usize,

    /// Root of the process-information filesystem.
    #[arg(long, default_value = DEFAULT_PROC_ROOT)]
    proc_root: PathBuf,

    /// Diagnostics filter (e.g. `debug`). Falls back to RUST_LOG, then `warn`.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let group_by = if cli.by_object { GroupBy::Object } else { GroupBy::Process };
    let options = ReportOptions {
        group_by,
        pid: cli.pid,
        format: cli.format,
        width: resolve_width(cli.width),
        config: ScanConfig::new(cli.proc_root).with_jobs(cli.jobs),
    };

    report_command(&options)
}
