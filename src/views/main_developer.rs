//! Main developer: histogram of files per developer and the ownership table

use egui::{Color32, ScrollArea, Ui};
use gitrends_graph::colors::shorten_name;
use gitrends_graph::layout::TreemapOptions;
use gitrends_graph::{
    histogram, legend_ui, CategoryColors, CellValue, ColumnAccessors, SortDirection, SortOrder, Table, TableAction,
    TableColumn, TableError, TableWidget, TreemapColoring, TreemapWidget, TABLEAU20,
};
use gitrends_types::{EntryType, MainDeveloperEntry};
use tracing::warn;

use super::{caption, error_ui, header_ui, table_widget, Selection, View, ViewContext, ViewKind};
use crate::pending::PendingFetch;

const HISTOGRAM_WIDTH: f64 = 1500.0;
const HISTOGRAM_HEIGHT: f64 = 300.0;
const HISTOGRAM_PADDING: f64 = 1.0;

/// Files with fewer net added lines are left out of the ownership table
pub const MIN_NET_ADDED_LINES: u64 = 100;

pub(crate) fn ownership_table() -> Result<Table<MainDeveloperEntry>, TableError> {
    Table::new(
        vec![
            TableColumn::new("name", "File name").clickable(),
            TableColumn::new("main_developer", "Main developer"),
            TableColumn::new("ownership", "Ownership (%)"),
            TableColumn::new("net_added_lines", "Net added lines"),
            TableColumn::new("total_net_added_lines", "Total net added lines"),
        ],
        ColumnAccessors::<MainDeveloperEntry>::new()
            .with("name", |r| CellValue::from(r.name.as_str()))
            .with("main_developer", |r| CellValue::from(r.main_developer.as_str()))
            .with("ownership", |r| CellValue::from(r.ownership_percent()))
            .with("net_added_lines", |r| CellValue::from(r.net_added_lines))
            .with("total_net_added_lines", |r| CellValue::from(r.total_net_added_lines)),
        SortOrder::new(2, SortDirection::Descending),
    )
}

/// Files above the line threshold, highest ownership first, capped at `max_entries`
pub(crate) fn ownership_rows(entries: &[MainDeveloperEntry], max_entries: usize) -> Vec<MainDeveloperEntry> {
    let mut rows: Vec<MainDeveloperEntry> = entries
        .iter()
        .filter(|e| e.net_added_lines > MIN_NET_ADDED_LINES)
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.ownership_percent().total_cmp(&a.ownership_percent()));
    rows.truncate(max_entries);
    rows
}

pub struct MainDeveloperView {
    histogram: TreemapWidget,
    legend: Vec<(String, Color32)>,
    table: Option<TableWidget<MainDeveloperEntry>>,
    pending: PendingFetch<Vec<MainDeveloperEntry>>,
    error: Option<String>,
}

impl Default for MainDeveloperView {
    fn default() -> Self {
        Self::new()
    }
}

impl MainDeveloperView {
    pub fn new() -> Self {
        let mut error = None;
        let table = table_widget("ownership_table", ownership_table(), &mut error);
        Self {
            histogram: TreemapWidget::new(),
            legend: Vec::new(),
            table,
            pending: PendingFetch::new(),
            error,
        }
    }

    fn load(&mut self, entries: Vec<MainDeveloperEntry>, max_developers: usize, max_entries: usize) {
        let observations = entries.iter().map(|e| (shorten_name(&e.main_developer), 1.0));
        match histogram(observations, max_developers) {
            Ok(bucketed) => {
                let colors = CategoryColors::new(&bucketed.ranking, &TABLEAU20);
                self.legend = colors.legend(false);
                self.histogram.set_data(
                    bucketed.tree,
                    TreemapOptions::new(HISTOGRAM_WIDTH, HISTOGRAM_HEIGHT, HISTOGRAM_PADDING),
                    TreemapColoring::Leaf(colors),
                );
            }
            Err(err) => {
                warn!(%err, "main developer histogram rejected");
                self.error = Some(format!("Failed to build histogram: {}", err));
            }
        }

        if let Some(table) = self.table.as_mut() {
            table.set_rows(ownership_rows(&entries, max_entries));
        }
    }
}

impl View for MainDeveloperView {
    fn kind(&self) -> ViewKind {
        ViewKind::MainDeveloper
    }

    fn fetch(&mut self, cx: &ViewContext<'_>) {
        self.error = None;
        let api = cx.api.clone();
        self.pending.start(cx.runtime, async move {
            api.main_developers(EntryType::File).await
        });
    }

    fn poll(&mut self, cx: &ViewContext<'_>) {
        match self.pending.poll() {
            Some(Ok(entries)) => self.load(
                entries,
                cx.config.main_developer_histogram_max_developers,
                cx.config.main_developer_max_entries,
            ),
            Some(Err(err)) => self.error = Some(format!("Failed to load main developers: {}", err)),
            None => {}
        }
    }

    fn reset(&mut self) {
        self.pending.discard();
        self.histogram.clear();
        self.legend.clear();
        if let Some(table) = self.table.as_mut() {
            table.set_rows(Vec::new());
            table.reset_sort();
        }
        self.error = None;
    }

    fn is_loading(&self) -> bool {
        self.pending.is_loading()
    }

    fn ui(&mut self, ui: &mut Ui, _cx: &ViewContext<'_>) -> Option<Selection> {
        header_ui(ui, ViewKind::MainDeveloper.display_name(), self.is_loading());
        error_ui(ui, &self.error);

        let mut selection = None;
        ScrollArea::vertical().id_salt("main_developer").show(ui, |ui| {
            ui.strong("Files per main developer");
            self.histogram.ui(ui);
            legend_ui(ui, &self.legend);

            ui.add_space(16.0);
            ui.strong("Files with highest ownership");
            caption(
                ui,
                &format!("Only files with more than {} net added lines.", MIN_NET_ADDED_LINES),
            );
            if let Some(table) = self.table.as_mut() {
                if let TableAction::ValueClicked { row, .. } = table.ui(ui) {
                    selection = table.table().rows().get(row).map(|r| Selection::file(r.name.clone()));
                }
            }
        });
        selection
    }
}
