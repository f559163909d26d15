use anyhow::Result;
use prettytable::{color, format, Attr, Cell, Row, Table};
use shared_info_core::{GroupedView, ObjectRow, ProcessRow};

use super::{wrap_text, Presenter, Report};

/// Boxed table sized to a terminal width.
#[derive(Debug, Clone, Copy)]
pub struct TablePresenter {
    width: usize,
}

impl TablePresenter {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    fn by_process(&self, rows: &[ProcessRow]) -> Table {
        let name_width = self.width / 7;
        let objects_width = 4 * self.width / 7;

        let mut table = new_table(&["PID", "Process Name", "Shared Objects"]);
        for row in rows {
            let objects = row
                .objects
                .iter()
                .map(|object| wrap_text(object.as_str(), objects_width))
                .collect::<Vec<_>>()
                .join("\n");
            table.add_row(Row::new(vec![
                Cell::new(&row.pid.to_string()),
                Cell::new(&wrap_text(row.name.as_deref().unwrap_or_default(), name_width)),
                Cell::new(&objects),
            ]));
        }
        table
    }

    fn by_object(&self, rows: &[ObjectRow]) -> Table {
        let object_width = 4 * self.width / 13;
        let process_width = 4 * self.width / 7;

        let mut table = new_table(&["Shared Object", "Processes"]);
        for row in rows {
            let processes = row
                .processes
                .iter()
                .map(|entry| {
                    format!(
                        "{} ({})",
                        wrap_text(entry.name.as_deref().unwrap_or_default(), process_width),
                        entry.pid
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            table.add_row(Row::new(vec![
                Cell::new(&wrap_text(row.object.as_str(), object_width)),
                Cell::new(&processes),
            ]));
        }
        table
    }
}

fn new_table(titles: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(titles.iter().map(|title| header_cell(title)).collect()));
    table
}

/// Bold blue header cell; styling only shows when printed to a terminal.
fn header_cell(title: &str) -> Cell {
    Cell::new(title).with_style(Attr::Bold).with_style(Attr::ForegroundColor(color::BLUE))
}

impl Presenter for TablePresenter {
    fn name(&self) -> &'static str {
        "table"
    }

    fn render(&self, report: &Report) -> Result<String> {
        let table = match &report.rows {
            GroupedView::Process(rows) => self.by_process(rows),
            GroupedView::Object(rows) => self.by_object(rows),
        };
        Ok(table.to_string())
    }
}
