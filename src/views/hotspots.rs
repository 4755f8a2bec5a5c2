//! Hotspots table for files or modules

use egui::{ScrollArea, Ui};
use gitrends_graph::{
    CellValue, ColumnAccessors, SortDirection, SortOrder, Table, TableAction, TableColumn, TableError, TableWidget,
};
use gitrends_types::{EntryType, HotspotEntry};

use super::{entry_type_switch, error_ui, header_ui, table_widget, Selection, View, ViewContext, ViewKind};
use crate::pending::PendingFetch;

pub(crate) fn hotspot_table(entry_type: EntryType) -> Result<Table<HotspotEntry>, TableError> {
    Table::new(
        vec![
            TableColumn::new("name", format!("{} name", entry_type.display_name())).clickable(),
            TableColumn::new("num_revisions", "Number of revisions"),
            TableColumn::new("num_code_lines", "Number of code lines"),
            TableColumn::new("total_indent_levels", "Complexity"),
        ],
        ColumnAccessors::<HotspotEntry>::new()
            .with("name", |r| CellValue::from(r.name.as_str()))
            .with("num_revisions", |r| CellValue::from(r.num_revisions))
            .with("num_code_lines", |r| CellValue::from(r.num_code_lines))
            .with("total_indent_levels", |r| CellValue::from(r.total_indent_levels)),
        SortOrder::new(1, SortDirection::Descending),
    )
}

pub struct HotspotsView {
    entry_type: EntryType,
    table: Option<TableWidget<HotspotEntry>>,
    pending: PendingFetch<Vec<HotspotEntry>>,
    error: Option<String>,
}

impl Default for HotspotsView {
    fn default() -> Self {
        Self::new()
    }
}

impl HotspotsView {
    pub fn new() -> Self {
        let mut view = Self {
            entry_type: EntryType::File,
            table: None,
            pending: PendingFetch::new(),
            error: None,
        };
        view.rebuild_table();
        view
    }

    /// Column labels follow the entry type, so the table is rebuilt on a switch
    fn rebuild_table(&mut self) {
        self.table = table_widget("hotspots_table", hotspot_table(self.entry_type), &mut self.error);
    }
}

impl View for HotspotsView {
    fn kind(&self) -> ViewKind {
        ViewKind::Hotspots
    }

    fn fetch(&mut self, cx: &ViewContext<'_>) {
        self.error = None;
        let api = cx.api.clone();
        let entry_type = self.entry_type;
        let count = cx.config.hotspots_max_entries;
        self.pending
            .start(cx.runtime, async move { api.hotspots(entry_type, count).await });
    }

    fn poll(&mut self, _cx: &ViewContext<'_>) {
        match self.pending.poll() {
            Some(Ok(rows)) => {
                if let Some(table) = self.table.as_mut() {
                    table.set_rows(rows);
                }
            }
            Some(Err(err)) => self.error = Some(format!("Failed to load hotspots: {}", err)),
            None => {}
        }
    }

    fn reset(&mut self) {
        self.pending.discard();
        self.error = None;
        self.rebuild_table();
    }

    fn is_loading(&self) -> bool {
        self.pending.is_loading()
    }

    fn ui(&mut self, ui: &mut Ui, cx: &ViewContext<'_>) -> Option<Selection> {
        header_ui(ui, ViewKind::Hotspots.display_name(), self.is_loading());
        if entry_type_switch(ui, &mut self.entry_type) {
            self.reset();
            self.fetch(cx);
        }
        error_ui(ui, &self.error);

        let table = self.table.as_mut()?;
        let action = ScrollArea::vertical()
            .id_salt("hotspots")
            .show(ui, |ui| table.ui(ui))
            .inner;

        match action {
            TableAction::ValueClicked { row, .. } => table
                .table()
                .rows()
                .get(row)
                .map(|r| Selection::of(self.entry_type, r.name.clone())),
            _ => None,
        }
    }
}
