//! Sum of couplings table for files or modules

use egui::{ScrollArea, Ui};
use gitrends_graph::{
    CellValue, ColumnAccessors, SortDirection, SortOrder, Table, TableAction, TableColumn, TableError, TableWidget,
};
use gitrends_types::{EntryType, SumOfCouplingsEntry};

use super::{entry_type_switch, error_ui, header_ui, table_widget, Selection, View, ViewContext, ViewKind};
use crate::pending::PendingFetch;

/// Only file names open the detail window
pub(crate) fn sum_of_couplings_table(entry_type: EntryType) -> Result<Table<SumOfCouplingsEntry>, TableError> {
    let mut name = TableColumn::new("name", format!("{} name", entry_type.display_name()));
    if entry_type == EntryType::File {
        name = name.clickable();
    }
    Table::new(
        vec![name, TableColumn::new("sum_of_couplings", "Sum of couplings")],
        ColumnAccessors::<SumOfCouplingsEntry>::new()
            .with("name", |r| CellValue::from(r.name.as_str()))
            .with("sum_of_couplings", |r| CellValue::from(r.sum_of_couplings)),
        SortOrder::new(1, SortDirection::Descending),
    )
}

pub struct SumOfCouplingsView {
    entry_type: EntryType,
    table: Option<TableWidget<SumOfCouplingsEntry>>,
    pending: PendingFetch<Vec<SumOfCouplingsEntry>>,
    error: Option<String>,
}

impl Default for SumOfCouplingsView {
    fn default() -> Self {
        Self::new()
    }
}

impl SumOfCouplingsView {
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

    fn rebuild_table(&mut self) {
        self.table = table_widget(
            "sum_of_couplings_table",
            sum_of_couplings_table(self.entry_type),
            &mut self.error,
        );
    }
}

impl View for SumOfCouplingsView {
    fn kind(&self) -> ViewKind {
        ViewKind::SumOfCouplings
    }

    fn fetch(&mut self, cx: &ViewContext<'_>) {
        self.error = None;
        let api = cx.api.clone();
        let entry_type = self.entry_type;
        let count = cx.config.change_coupling_max_entries;
        self.pending.start(cx.runtime, async move {
            api.sum_of_couplings(entry_type, count).await
        });
    }

    fn poll(&mut self, _cx: &ViewContext<'_>) {
        match self.pending.poll() {
            Some(Ok(rows)) => {
                if let Some(table) = self.table.as_mut() {
                    table.set_rows(rows);
                }
            }
            Some(Err(err)) => self.error = Some(format!("Failed to load sum of couplings: {}", err)),
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
        header_ui(ui, ViewKind::SumOfCouplings.display_name(), self.is_loading());
        if entry_type_switch(ui, &mut self.entry_type) {
            self.reset();
            self.fetch(cx);
        }
        error_ui(ui, &self.error);

        let table = self.table.as_mut()?;
        let action = ScrollArea::vertical()
            .id_salt("sum_of_couplings")
            .show(ui, |ui| table.ui(ui))
            .inner;

        match action {
            TableAction::ValueClicked { row, .. } => table
                .table()
                .rows()
                .get(row)
                .map(|r| Selection::file(r.name.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_names_are_not_clickable() {
        assert!(sum_of_couplings_table(EntryType::File).unwrap().columns()[0].clickable);
        assert!(!sum_of_couplings_table(EntryType::Module).unwrap().columns()[0].clickable);
    }
}
