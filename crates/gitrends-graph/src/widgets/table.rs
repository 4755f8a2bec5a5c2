//! Grid rendering of a [`Table`] with sortable headers and CSV export

use egui::{Color32, RichText, ScrollArea, Ui};
use tracing::warn;

use crate::table::{SortDirection, Table};

/// Actions returned from the table widget (caller handles these)
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    None,
    /// A cell of a clickable column; `row` indexes the input rows
    ValueClicked { row: usize, column: usize },
    /// CSV text was copied to the clipboard
    Exported(String),
}

pub struct TableWidget<R> {
    id: String,
    table: Table<R>,
    sort_error: Option<String>,
}

impl<R> TableWidget<R> {
    pub fn new(id: impl Into<String>, table: Table<R>) -> Self {
        Self {
            id: id.into(),
            table,
            sort_error: None,
        }
    }

    pub fn table(&self) -> &Table<R> {
        &self.table
    }

    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.sort_error = None;
        self.table.set_rows(rows);
    }

    pub fn reset_sort(&mut self) {
        self.sort_error = None;
        self.table.reset_sort();
    }

    pub fn ui(&mut self, ui: &mut Ui) -> TableAction {
        let mut action = TableAction::None;

        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{} rows", self.table.len())).color(Color32::GRAY));
            if ui.button("Export CSV").clicked() {
                let csv = self.table.to_csv();
                ui.output_mut(|o| o.copied_text = csv.clone());
                action = TableAction::Exported(csv);
            }
        });
        if let Some(err) = &self.sort_error {
            ui.colored_label(Color32::from_rgb(220, 80, 80), err);
        }

        let mut clicked_header: Option<usize> = None;
        ScrollArea::both().id_salt(&self.id).show(ui, |ui| {
            egui::Grid::new(&self.id)
                .striped(true)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("#").strong());
                    let sort = self.table.sort_order();
                    for (i, column) in self.table.columns().iter().enumerate() {
                        let arrow = match (self.table.is_sorted() && sort.column_index == i, sort.direction) {
                            (true, SortDirection::Ascending) => " ▲",
                            (true, SortDirection::Descending) => " ▼",
                            (false, _) => "",
                        };
                        let header = RichText::new(format!("{}{}", column.display, arrow)).strong();
                        if ui.button(header).clicked() {
                            clicked_header = Some(i);
                        }
                    }
                    ui.end_row();

                    for display_index in 0..self.table.len() {
                        let Some(row_index) = self.table.row_index(display_index) else {
                            continue;
                        };
                        let Some(row) = self.table.rows().get(row_index) else {
                            continue;
                        };
                        ui.label(RichText::new((display_index + 1).to_string()).color(Color32::GRAY));
                        for (i, column) in self.table.columns().iter().enumerate() {
                            let text = self
                                .table
                                .cell(row, i)
                                .map(|c| c.to_string())
                                .unwrap_or_default();
                            if column.clickable {
                                if ui.link(text).clicked() {
                                    action = TableAction::ValueClicked {
                                        row: row_index,
                                        column: i,
                                    };
                                }
                            } else {
                                ui.label(text);
                            }
                        }
                        ui.end_row();
                    }
                });
        });

        if let Some(column) = clicked_header {
            match self.table.click_header(column) {
                Ok(()) => self.sort_error = None,
                Err(err) => {
                    warn!(%err, "table sort rejected");
                    self.sort_error = Some(err.to_string());
                }
            }
        }
        action
    }
}
