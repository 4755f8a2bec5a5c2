//! Detail window for the selected file or module
//!
//! The selection itself is owned by the app; this window only holds what
//! was fetched for it. A file shows its revision history, a module the files
//! it contains.

use chrono::DateTime;
use egui::{Color32, Pos2, Rect, ScrollArea, Sense, Shape, Stroke, Ui, Vec2};
use gitrends_graph::{
    CellValue, ColumnAccessors, SortDirection, SortOrder, Table, TableColumn, TableError, TableWidget,
};
use gitrends_types::{EntryType, FileHistoryEntry, ModuleEntry, ModuleFile};
use tracing::debug;

use crate::pending::PendingFetch;
use crate::views::{Selection, ViewContext};

const CHART_SIZE: Vec2 = Vec2::new(600.0, 160.0);
const CODE_LINES_COLOR: Color32 = Color32::from_rgb(0x4e, 0x79, 0xa7);
const COMPLEXITY_COLOR: Color32 = Color32::from_rgb(0xe1, 0x57, 0x59);

/// Commit time as `YYYY-MM-DD HH:MM` (UTC), raw seconds if out of range
pub fn format_date(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

pub(crate) fn history_table() -> Result<Table<FileHistoryEntry>, TableError> {
    Table::new(
        vec![
            TableColumn::new("revision", "Revision"),
            TableColumn::new("date", "Date"),
            TableColumn::new("num_code_lines", "Code lines"),
            TableColumn::new("num_comment_lines", "Comment lines"),
            TableColumn::new("num_blank_lines", "Blank lines"),
            TableColumn::new("total_indent_levels", "Complexity"),
            TableColumn::new("avg_indent_levels", "Average indent"),
            TableColumn::new("std_indent_level", "Indent deviation"),
        ],
        ColumnAccessors::<FileHistoryEntry>::new()
            .with("revision", |r| CellValue::from(r.revision.as_str()))
            .with("date", |r| CellValue::from(format_date(r.date)))
            .with("num_code_lines", |r| CellValue::from(r.num_code_lines))
            .with("num_comment_lines", |r| CellValue::from(r.num_comment_lines))
            .with("num_blank_lines", |r| CellValue::from(r.num_blank_lines))
            .with("total_indent_levels", |r| CellValue::from(r.total_indent_levels))
            .with("avg_indent_levels", |r| CellValue::from(r.avg_indent_levels))
            .with("std_indent_level", |r| CellValue::from(r.std_indent_level)),
        SortOrder::new(1, SortDirection::Descending),
    )
}

pub(crate) fn module_files_table() -> Result<Table<ModuleFile>, TableError> {
    Table::new(
        vec![
            TableColumn::new("name", "File name"),
            TableColumn::new("num_code_lines", "Number of code lines"),
            TableColumn::new("total_indent_levels", "Complexity"),
        ],
        ColumnAccessors::<ModuleFile>::new()
            .with("name", |r| CellValue::from(r.name.as_str()))
            .with("num_code_lines", |r| CellValue::from(r.num_code_lines))
            .with("total_indent_levels", |r| CellValue::from(r.total_indent_levels)),
        SortOrder::new(1, SortDirection::Descending),
    )
}

/// Points in the unit square, x by date and y by `metric` over its maximum
pub(crate) fn history_points<F>(history: &[FileHistoryEntry], metric: F) -> Vec<[f64; 2]>
where
    F: Fn(&FileHistoryEntry) -> f64,
{
    let (Some(first), Some(last)) = (
        history.iter().map(|h| h.date).min(),
        history.iter().map(|h| h.date).max(),
    ) else {
        return Vec::new();
    };
    let span = (last - first).max(1) as f64;
    let max = history.iter().map(&metric).fold(0.0_f64, f64::max);

    let mut sorted: Vec<&FileHistoryEntry> = history.iter().collect();
    sorted.sort_by_key(|h| h.date);
    sorted
        .into_iter()
        .map(|h| {
            let y = if max > 0.0 { metric(h) / max } else { 0.0 };
            [(h.date - first) as f64 / span, y]
        })
        .collect()
}

// =============================================================================
// WINDOW
// =============================================================================

#[derive(Default)]
pub struct DetailWindow {
    loaded_for: Option<Selection>,
    history: Vec<FileHistoryEntry>,
    history_table: Option<TableWidget<FileHistoryEntry>>,
    files_table: Option<TableWidget<ModuleFile>>,
    pending_history: PendingFetch<Vec<FileHistoryEntry>>,
    pending_modules: PendingFetch<Vec<ModuleEntry>>,
    error: Option<String>,
}

impl DetailWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_history.is_loading() || self.pending_modules.is_loading()
    }

    /// Fetch for `selection` unless it is already loaded
    pub fn sync(&mut self, selection: Option<&Selection>, cx: &ViewContext<'_>) {
        if self.loaded_for.as_ref() == selection {
            return;
        }
        self.clear();
        let Some(selection) = selection else {
            return;
        };
        debug!(name = %selection.name, entry_type = selection.entry_type.as_str(), "loading details");

        let api = cx.api.clone();
        match selection.entry_type {
            EntryType::File => {
                let name = selection.name.clone();
                self.pending_history
                    .start(cx.runtime, async move { api.file_history(&name).await });
            }
            EntryType::Module => {
                self.pending_modules
                    .start(cx.runtime, async move { api.modules().await });
            }
        }
        self.loaded_for = Some(selection.clone());
    }

    pub fn clear(&mut self) {
        self.pending_history.discard();
        self.pending_modules.discard();
        self.loaded_for = None;
        self.history.clear();
        self.history_table = None;
        self.files_table = None;
        self.error = None;
    }

    pub fn poll(&mut self) {
        match self.pending_history.poll() {
            Some(Ok(history)) => self.set_history(history),
            Some(Err(err)) => self.error = Some(format!("Failed to load file history: {}", err)),
            None => {}
        }
        match self.pending_modules.poll() {
            Some(Ok(modules)) => self.set_module_files(&modules),
            Some(Err(err)) => self.error = Some(format!("Failed to load module files: {}", err)),
            None => {}
        }
    }

    fn set_history(&mut self, history: Vec<FileHistoryEntry>) {
        match history_table() {
            Ok(table) => {
                let mut widget = TableWidget::new("file_history", table);
                widget.set_rows(history.clone());
                self.history_table = Some(widget);
            }
            Err(err) => self.error = Some(format!("Table setup failed: {}", err)),
        }
        self.history = history;
    }

    fn set_module_files(&mut self, modules: &[ModuleEntry]) {
        let Some(name) = self.loaded_for.as_ref().map(|s| s.name.as_str()) else {
            return;
        };
        let files = modules
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.files.clone())
            .unwrap_or_default();
        match module_files_table() {
            Ok(table) => {
                let mut widget = TableWidget::new("module_files", table);
                widget.set_rows(files);
                self.files_table = Some(widget);
            }
            Err(err) => self.error = Some(format!("Table setup failed: {}", err)),
        }
    }

    fn title(selection: &Selection, history_len: Option<usize>) -> String {
        match (selection.entry_type, history_len) {
            (EntryType::File, Some(len)) => format!("{} (revisions: {})", selection.name, len),
            _ => selection.name.clone(),
        }
    }

    /// Draw the window; closing it clears `selection`
    pub fn ui(&mut self, ctx: &egui::Context, selection: &mut Option<Selection>) {
        let Some(current) = selection.as_ref() else {
            return;
        };
        let history_len = self.history_table.as_ref().map(|_| self.history.len());
        let title = Self::title(current, history_len);

        let mut open = true;
        egui::Window::new(title)
            .id(egui::Id::new("detail_window"))
            .open(&mut open)
            .default_width(CHART_SIZE.x + 40.0)
            .show(ctx, |ui| {
                if self.is_loading() {
                    ui.spinner();
                }
                if let Some(err) = &self.error {
                    ui.colored_label(Color32::RED, err);
                }
                ScrollArea::vertical().id_salt("detail_scroll").show(ui, |ui| {
                    if self.history_table.is_some() {
                        history_chart(ui, &self.history);
                        ui.add_space(8.0);
                    }
                    if let Some(table) = self.history_table.as_mut() {
                        table.ui(ui);
                    }
                    if let Some(table) = self.files_table.as_mut() {
                        ui.strong("Module files");
                        table.ui(ui);
                    }
                });
            });

        if !open {
            *selection = None;
            self.clear();
        }
    }
}

fn history_chart(ui: &mut Ui, history: &[FileHistoryEntry]) {
    let (response, painter) = ui.allocate_painter(CHART_SIZE, Sense::hover());
    let rect = response.rect.shrink(4.0);
    painter.rect_stroke(response.rect, 2.0, Stroke::new(1.0, Color32::from_gray(90)));

    let to_screen = |p: &[f64; 2]| -> Pos2 {
        Pos2::new(
            rect.left() + p[0] as f32 * rect.width(),
            rect.bottom() - p[1] as f32 * rect.height(),
        )
    };
    for (metric, color) in [
        (history_points(history, |h| h.num_code_lines as f64), CODE_LINES_COLOR),
        (history_points(history, |h| h.total_indent_levels as f64), COMPLEXITY_COLOR),
    ] {
        let points: Vec<Pos2> = metric.iter().map(to_screen).collect();
        painter.add(Shape::line(points, Stroke::new(1.5, color)));
    }

    let legend = Rect::from_min_size(rect.min, Vec2::new(rect.width(), 14.0));
    painter.text(
        legend.left_top(),
        egui::Align2::LEFT_TOP,
        "code lines",
        egui::FontId::proportional(10.0),
        CODE_LINES_COLOR,
    );
    painter.text(
        legend.left_top() + Vec2::new(70.0, 0.0),
        egui::Align2::LEFT_TOP,
        "complexity",
        egui::FontId::proportional(10.0),
        COMPLEXITY_COLOR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn revision(date: i64, lines: u64) -> FileHistoryEntry {
        FileHistoryEntry {
            revision: format!("r{}", date),
            date,
            num_code_lines: lines,
            num_comment_lines: 0,
            num_blank_lines: 0,
            total_indent_levels: lines / 2,
            avg_indent_levels: 0.5,
            std_indent_level: 0.1,
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(0), "1970-01-01 00:00");
        assert_eq!(format_date(1_700_000_000), "2023-11-14 22:13");
    }

    #[test]
    fn test_history_points_normalized_and_ordered() {
        let history = vec![revision(200, 50), revision(100, 100), revision(300, 25)];
        let points = history_points(&history, |h| h.num_code_lines as f64);
        assert_eq!(points, vec![[0.0, 1.0], [0.5, 0.5], [1.0, 0.25]]);
    }

    #[test]
    fn test_history_points_empty() {
        assert!(history_points(&[], |h| h.num_code_lines as f64).is_empty());
    }

    #[test]
    fn test_tables_build() {
        assert_eq!(history_table().unwrap().columns().len(), 8);
        assert_eq!(module_files_table().unwrap().columns().len(), 3);
    }

    #[test]
    fn test_module_files_for_loaded_module() {
        let mut window = DetailWindow::new();
        window.loaded_for = Some(Selection::module("core"));
        window.set_module_files(&[ModuleEntry {
            name: "core".to_string(),
            files: vec![ModuleFile {
                name: "src/lib.rs".to_string(),
                num_code_lines: 10,
                total_indent_levels: 3,
            }],
        }]);
        assert_eq!(window.files_table.as_ref().unwrap().table().len(), 1);
    }

    #[test]
    fn test_file_title_counts_revisions() {
        assert_eq!(
            DetailWindow::title(&Selection::file("src/a.rs"), Some(3)),
            "src/a.rs (revisions: 3)"
        );
        assert_eq!(DetailWindow::title(&Selection::module("core"), None), "core");
    }
}
