//! Change couplings table with a per-entry drill-down
//!
//! The table lists the strongest couplings overall. Picking an entry (from
//! the autocomplete or by clicking a name) replaces the rows with that
//! entry's couplings until the drill-down is closed.

use egui::{RichText, ScrollArea, Ui};
use gitrends_graph::{
    AutoCompleteEvent, AutoCompleteWidget, CellValue, ColumnAccessors, SortDirection, SortOrder, Table, TableAction,
    TableColumn, TableError, TableWidget,
};
use gitrends_types::{ChangeCouplingEntry, EntryType, ModuleEntry};
use tracing::debug;

use super::{entry_type_switch, error_ui, header_ui, table_widget, Selection, View, ViewContext, ViewKind};
use crate::pending::PendingFetch;

const LEFT_NAME: usize = 0;
const RIGHT_NAME: usize = 1;

/// Coupling ratio in percent, rounded to one decimal
pub fn coupling_percent(entry: &ChangeCouplingEntry) -> f64 {
    (entry.coupling_ratio() * 1000.0).round() / 10.0
}

pub(crate) fn coupling_table(entry_type: EntryType) -> Result<Table<ChangeCouplingEntry>, TableError> {
    let kind = entry_type.as_str();
    Table::new(
        vec![
            TableColumn::new("left_name", format!("Left {} name", kind)).clickable(),
            TableColumn::new("right_name", format!("Right {} name", kind)).clickable(),
            TableColumn::new("coupled_revisions", "Number of coupled revisions"),
            TableColumn::new("average_revisions", "Average number of revisions"),
            TableColumn::new("coupling_ratio", "Amount of coupling (%)"),
        ],
        ColumnAccessors::<ChangeCouplingEntry>::new()
            .with("left_name", |r| CellValue::from(r.left_name.as_str()))
            .with("right_name", |r| CellValue::from(r.right_name.as_str()))
            .with("coupled_revisions", |r| CellValue::from(r.coupled_revisions))
            .with("average_revisions", |r| CellValue::from(r.average_revisions()))
            .with("coupling_ratio", |r| CellValue::from(coupling_percent(r))),
        SortOrder::new(2, SortDirection::Descending),
    )
}

/// Sorted, de-duplicated file and module names for the autocomplete
pub(crate) fn completion_candidates(modules: &[ModuleEntry]) -> (Vec<String>, Vec<String>) {
    let mut files: Vec<String> = modules
        .iter()
        .flat_map(|m| m.files.iter().map(|f| f.name.clone()))
        .collect();
    files.sort();
    files.dedup();

    let mut names: Vec<String> = modules.iter().map(|m| m.name.clone()).collect();
    names.sort();
    names.dedup();
    (files, names)
}

/// What a click on a name cell asks for
#[derive(Debug, Clone, PartialEq)]
enum NameClick {
    ShowDetails(String),
    Drill(String),
}

fn name_click(
    entry_type: EntryType,
    selected_name: Option<&str>,
    row: &ChangeCouplingEntry,
    column: usize,
) -> Option<NameClick> {
    match column {
        LEFT_NAME if entry_type == EntryType::File && selected_name == Some(row.left_name.as_str()) => {
            Some(NameClick::ShowDetails(row.left_name.clone()))
        }
        LEFT_NAME => Some(NameClick::Drill(row.left_name.clone())),
        RIGHT_NAME => Some(NameClick::Drill(row.right_name.clone())),
        _ => None,
    }
}

pub struct ChangeCouplingsView {
    entry_type: EntryType,
    table: Option<TableWidget<ChangeCouplingEntry>>,
    all: Vec<ChangeCouplingEntry>,
    specific: Vec<ChangeCouplingEntry>,
    selected_name: Option<String>,
    autocomplete: AutoCompleteWidget,
    file_names: Vec<String>,
    module_names: Vec<String>,
    pending_all: PendingFetch<Vec<ChangeCouplingEntry>>,
    pending_specific: PendingFetch<(String, Vec<ChangeCouplingEntry>)>,
    pending_candidates: PendingFetch<Vec<ModuleEntry>>,
    error: Option<String>,
}

impl Default for ChangeCouplingsView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeCouplingsView {
    pub fn new() -> Self {
        let mut view = Self {
            entry_type: EntryType::File,
            table: None,
            all: Vec::new(),
            specific: Vec::new(),
            selected_name: None,
            autocomplete: AutoCompleteWidget::new(),
            file_names: Vec::new(),
            module_names: Vec::new(),
            pending_all: PendingFetch::new(),
            pending_specific: PendingFetch::new(),
            pending_candidates: PendingFetch::new(),
            error: None,
        };
        view.rebuild_table();
        view
    }

    fn rebuild_table(&mut self) {
        self.table = table_widget("change_coupling_table", coupling_table(self.entry_type), &mut self.error);
    }

    fn candidates(&self) -> Vec<String> {
        match self.entry_type {
            EntryType::File => self.file_names.clone(),
            EntryType::Module => self.module_names.clone(),
        }
    }

    /// Rows currently shown: the drill-down if it has any, else the overall list
    fn shown_rows(&self) -> &[ChangeCouplingEntry] {
        if self.specific.is_empty() {
            &self.all
        } else {
            &self.specific
        }
    }

    fn refresh_rows(&mut self) {
        let rows = self.shown_rows().to_vec();
        if let Some(table) = self.table.as_mut() {
            table.set_rows(rows);
        }
    }

    fn fetch_all(&mut self, cx: &ViewContext<'_>) {
        let api = cx.api.clone();
        let entry_type = self.entry_type;
        let count = cx.config.change_coupling_max_entries;
        self.pending_all.start(cx.runtime, async move {
            api.change_couplings(entry_type, count).await
        });
    }

    fn fetch_for_entry(&mut self, cx: &ViewContext<'_>, name: String) {
        debug!(%name, "change coupling drill-down");
        let api = cx.api.clone();
        let entry_type = self.entry_type;
        self.pending_specific.start(cx.runtime, async move {
            api.change_couplings_for(entry_type, &name)
                .await
                .map(|rows| (name, rows))
        });
    }

    fn close_specific(&mut self) {
        self.pending_specific.discard();
        self.specific.clear();
        self.selected_name = None;
        self.refresh_rows();
    }

    fn switch_entry_type(&mut self, cx: &ViewContext<'_>) {
        self.pending_all.discard();
        self.pending_specific.discard();
        self.all.clear();
        self.specific.clear();
        self.selected_name = None;
        self.autocomplete.reset();
        self.autocomplete.set_candidates(self.candidates());
        self.rebuild_table();
        self.fetch_all(cx);
    }
}

impl View for ChangeCouplingsView {
    fn kind(&self) -> ViewKind {
        ViewKind::ChangeCouplings
    }

    fn fetch(&mut self, cx: &ViewContext<'_>) {
        self.error = None;
        self.fetch_all(cx);
        let api = cx.api.clone();
        self.pending_candidates
            .start(cx.runtime, async move { api.modules().await });
    }

    fn poll(&mut self, _cx: &ViewContext<'_>) {
        match self.pending_all.poll() {
            Some(Ok(rows)) => {
                self.all = rows;
                self.refresh_rows();
            }
            Some(Err(err)) => self.error = Some(format!("Failed to load change couplings: {}", err)),
            None => {}
        }

        match self.pending_specific.poll() {
            Some(Ok((name, rows))) => {
                self.selected_name = Some(name);
                self.specific = rows;
                self.refresh_rows();
            }
            Some(Err(err)) => self.error = Some(format!("Failed to load change couplings: {}", err)),
            None => {}
        }

        match self.pending_candidates.poll() {
            Some(Ok(modules)) => {
                let (files, names) = completion_candidates(&modules);
                self.file_names = files;
                self.module_names = names;
                self.autocomplete.set_candidates(self.candidates());
            }
            Some(Err(err)) => self.error = Some(format!("Failed to load completions: {}", err)),
            None => {}
        }
    }

    fn reset(&mut self) {
        self.pending_all.discard();
        self.pending_specific.discard();
        self.pending_candidates.discard();
        self.all.clear();
        self.specific.clear();
        self.selected_name = None;
        self.autocomplete.reset();
        self.error = None;
        self.rebuild_table();
    }

    fn is_loading(&self) -> bool {
        self.pending_all.is_loading() || self.pending_specific.is_loading()
    }

    fn ui(&mut self, ui: &mut Ui, cx: &ViewContext<'_>) -> Option<Selection> {
        header_ui(ui, ViewKind::ChangeCouplings.display_name(), self.is_loading());
        if entry_type_switch(ui, &mut self.entry_type) {
            self.switch_entry_type(cx);
        }

        match self.autocomplete.ui(ui, "Enter entry to show results for.") {
            Some(AutoCompleteEvent::Committed(name)) | Some(AutoCompleteEvent::Submitted(name))
                if !name.trim().is_empty() =>
            {
                self.fetch_for_entry(cx, name.trim().to_string());
            }
            _ => {}
        }

        if !self.specific.is_empty() {
            let mut close = false;
            ui.horizontal(|ui| {
                let name = self.selected_name.as_deref().unwrap_or_default();
                ui.label(RichText::new(format!("Couplings of {}", name)).strong());
                close = ui.button("✕").on_hover_text("Back to all couplings").clicked();
            });
            if close {
                self.close_specific();
            }
        }
        error_ui(ui, &self.error);

        let table = self.table.as_mut()?;
        let action = ScrollArea::vertical()
            .id_salt("change_couplings")
            .show(ui, |ui| table.ui(ui))
            .inner;

        let TableAction::ValueClicked { row, column } = action else {
            return None;
        };
        let click = table
            .table()
            .rows()
            .get(row)
            .and_then(|r| name_click(self.entry_type, self.selected_name.as_deref(), r, column));

        match click {
            Some(NameClick::ShowDetails(name)) => Some(Selection::file(name)),
            Some(NameClick::Drill(name)) => {
                self.fetch_for_entry(cx, name);
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitrends_types::ModuleFile;
    use pretty_assertions::assert_eq;

    fn coupling(left: &str, right: &str) -> ChangeCouplingEntry {
        ChangeCouplingEntry {
            left_name: left.to_string(),
            right_name: right.to_string(),
            coupled_revisions: 10,
            num_left_revisions: 15,
            num_right_revisions: 10,
        }
    }

    #[test]
    fn test_coupling_percent() {
        assert_eq!(coupling_percent(&coupling("a", "b")), 83.3);
    }

    #[test]
    fn test_left_name_of_selected_file_shows_details() {
        let row = coupling("src/a.rs", "src/b.rs");
        assert_eq!(
            name_click(EntryType::File, Some("src/a.rs"), &row, LEFT_NAME),
            Some(NameClick::ShowDetails("src/a.rs".to_string()))
        );
        assert_eq!(
            name_click(EntryType::Module, Some("src/a.rs"), &row, LEFT_NAME),
            Some(NameClick::Drill("src/a.rs".to_string()))
        );
        assert_eq!(
            name_click(EntryType::File, None, &row, RIGHT_NAME),
            Some(NameClick::Drill("src/b.rs".to_string()))
        );
        assert_eq!(name_click(EntryType::File, None, &row, 2), None);
    }

    #[test]
    fn test_drill_down_replaces_rows_until_closed() {
        let mut view = ChangeCouplingsView::new();
        view.all = vec![coupling("a", "b"), coupling("c", "d")];
        view.refresh_rows();
        assert_eq!(view.table.as_ref().unwrap().table().len(), 2);

        view.selected_name = Some("a".to_string());
        view.specific = vec![coupling("a", "b")];
        view.refresh_rows();
        assert_eq!(view.table.as_ref().unwrap().table().len(), 1);

        view.close_specific();
        assert_eq!(view.selected_name, None);
        assert_eq!(view.table.as_ref().unwrap().table().len(), 2);
    }

    #[test]
    fn test_completion_candidates() {
        let file = |name: &str| ModuleFile {
            name: name.to_string(),
            num_code_lines: 1,
            total_indent_levels: 1,
        };
        let modules = vec![
            ModuleEntry {
                name: "web".to_string(),
                files: vec![file("src/web/app.rs")],
            },
            ModuleEntry {
                name: "core".to_string(),
                files: vec![file("src/lib.rs"), file("src/web/app.rs")],
            },
        ];
        let (files, names) = completion_candidates(&modules);
        assert_eq!(files, vec!["src/lib.rs".to_string(), "src/web/app.rs".to_string()]);
        assert_eq!(names, vec!["core".to_string(), "web".to_string()]);
    }
}
