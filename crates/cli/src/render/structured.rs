use anyhow::{Context, Result};

use super::{Presenter, Report};

/// Pretty-printed JSON report.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPresenter;

impl Presenter for JsonPresenter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &Report) -> Result<String> {
        serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
    }
}

/// YAML report.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlPresenter;

impl Presenter for YamlPresenter {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn render(&self, report: &Report) -> Result<String> {
        serde_yaml::to_string(report).context("Failed to serialize report to YAML")
    }
}
