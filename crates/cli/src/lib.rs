pub mod commands;
pub mod render;

use std::io::IsTerminal;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Width used when no terminal is attached and none was requested.
pub const DEFAULT_WIDTH: usize = 80;

/// Install the diagnostics subscriber.
///
/// Diagnostics go to stderr so they never mix with report output on stdout.
/// An explicit `filter` wins over `RUST_LOG`; without either only warnings
/// and errors are shown.
pub fn init_logging(filter: Option<&str>) -> Result<()> {
    let env_filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log filter '{directives}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to install logger: {err}"))
}

/// Pick the report width: explicit override, then the terminal, then [`DEFAULT_WIDTH`].
///
/// The terminal is only consulted when stdout is attached to it, so redirected
/// output always uses the default.
pub fn resolve_width(requested: Option<usize>) -> usize {
    let terminal = if std::io::stdout().is_terminal() {
        crossterm::terminal::size().ok().map(|(cols, _rows)| usize::from(cols))
    } else {
        None
    };
    choose_width(requested, terminal)
}

/// Width selection given an already probed terminal width.
pub fn choose_width(requested: Option<usize>, terminal: Option<usize>) -> usize {
    requested.or(terminal).filter(|width| *width > 0).unwrap_or(DEFAULT_WIDTH)
}
