//! Presenters turning a grouped inventory view into text.

mod plain;
mod structured;
mod table;

pub use plain::PlainPresenter;
pub use structured::{JsonPresenter, YamlPresenter};
pub use table::TablePresenter;

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use shared_info_core::{GroupBy, GroupedView, Inventory, ScanConfig, SkippedProcess};

/// Output formats selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Plain,
    Json,
    Yaml,
}

/// Everything a presenter may show, detached from scan internals.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub group_by: GroupBy,
    pub config: ScanConfig,
    pub rows: GroupedView,
    pub skipped: Vec<SkippedProcess>,
}

impl Report {
    pub fn new(inventory: &Inventory, config: &ScanConfig, group_by: GroupBy) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            group_by,
            config: config.clone(),
            rows: inventory.view(group_by),
            skipped: inventory.skipped(),
        }
    }
}

/// Renders a report into its final textual form.
pub trait Presenter {
    fn name(&self) -> &'static str;

    fn render(&self, report: &Report) -> Result<String>;
}

/// Build the presenter for `format`; only the table uses `width`.
pub fn presenter_for(format: OutputFormat, width: usize) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Table => Box::new(TablePresenter::new(width)),
        OutputFormat::Plain => Box::new(PlainPresenter),
        OutputFormat::Json => Box::new(JsonPresenter),
        OutputFormat::Yaml => Box::new(YamlPresenter),
    }
}

/// Hard-wrap `text` by inserting a newline after every `width` characters.
///
/// A `width` of zero leaves the text untouched.
pub fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + text.len() / width);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 && i % width == 0 {
            out.push('\n');
        }
        out.push(ch);
    }
    out
}
