use std::fmt::Write as _;

use anyhow::Result;
use shared_info_core::GroupedView;

use super::{Presenter, Report};

/// Indented text listing, one key per block.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPresenter;

impl Presenter for PlainPresenter {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn render(&self, report: &Report) -> Result<String> {
        let mut out = String::new();

        if report.rows.is_empty() {
            out.push_str("(none)\n");
        }

        match &report.rows {
            GroupedView::Process(rows) => {
                for row in rows {
                    writeln!(out, "{} {}", row.pid, row.name.as_deref().unwrap_or("?"))?;
                    for object in &row.objects {
                        writeln!(out, "    {object}")?;
                    }
                }
            }
            GroupedView::Object(rows) => {
                for row in rows {
                    writeln!(out, "{}", row.object)?;
                    for entry in &row.processes {
                        writeln!(
                            out,
                            "    {} ({})",
                            entry.name.as_deref().unwrap_or("?"),
                            entry.pid
                        )?;
                    }
                }
            }
        }

        Ok(out)
    }
}
