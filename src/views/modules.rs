//! Modules: files grouped by module, sized by code lines or complexity

use egui::{Color32, ScrollArea, Ui};
use gitrends_graph::layout::TreemapOptions;
use gitrends_graph::{
    legend_ui, module_breakdown, CategoryColors, GraphAction, ModuleMetric, PathTree, TreemapColoring,
    TreemapWidget, TABLEAU20,
};
use gitrends_types::ModuleEntry;
use tracing::warn;

use super::commit_spread::{TREEMAP_HEIGHT, TREEMAP_WIDTH};
use super::{error_ui, header_ui, Selection, View, ViewContext, ViewKind};
use crate::pending::PendingFetch;

const FILE_PADDING: f64 = 1.0;
const MODULE_HEADER: f64 = 14.0;

pub struct ModulesView {
    metric: ModuleMetric,
    modules: Vec<ModuleEntry>,
    widget: TreemapWidget,
    legend: Vec<(String, Color32)>,
    pending: PendingFetch<Vec<ModuleEntry>>,
    error: Option<String>,
}

impl Default for ModulesView {
    fn default() -> Self {
        Self::new()
    }
}

impl ModulesView {
    pub fn new() -> Self {
        Self {
            metric: ModuleMetric::default(),
            modules: Vec::new(),
            widget: TreemapWidget::new(),
            legend: Vec::new(),
            pending: PendingFetch::new(),
            error: None,
        }
    }

    /// Rebuild the treemap from the fetched modules with the current metric
    fn rebuild(&mut self) {
        match module_breakdown(&self.modules, self.metric) {
            Ok(tree) => {
                let colors = CategoryColors::from_names(self.modules.iter().map(|m| m.name.clone()), &TABLEAU20);
                self.legend = colors.legend(false);
                self.widget.set_data(
                    tree,
                    TreemapOptions::new(TREEMAP_WIDTH, TREEMAP_HEIGHT, FILE_PADDING).with_header(MODULE_HEADER),
                    TreemapColoring::Module(colors),
                );
            }
            Err(err) => {
                warn!(%err, "module breakdown rejected");
                self.error = Some(format!("Failed to build modules: {}", err));
            }
        }
    }

    fn set_metric(&mut self, metric: ModuleMetric) {
        if self.metric != metric {
            self.metric = metric;
            self.rebuild();
        }
    }
}

/// A file leaf opens the file, a module rectangle opens the module
fn selection_for(tree: &PathTree, path: &str, is_leaf: bool) -> Option<Selection> {
    if is_leaf {
        let leaf = tree.find_leaf(path)?;
        Some(Selection::file(tree.node(leaf).name.clone()))
    } else {
        Some(Selection::module(path))
    }
}

impl View for ModulesView {
    fn kind(&self) -> ViewKind {
        ViewKind::Modules
    }

    fn fetch(&mut self, cx: &ViewContext<'_>) {
        self.error = None;
        let api = cx.api.clone();
        self.pending.start(cx.runtime, async move { api.modules().await });
    }

    fn poll(&mut self, _cx: &ViewContext<'_>) {
        match self.pending.poll() {
            Some(Ok(modules)) => {
                self.modules = modules;
                self.rebuild();
            }
            Some(Err(err)) => self.error = Some(format!("Failed to load modules: {}", err)),
            None => {}
        }
    }

    fn reset(&mut self) {
        self.pending.discard();
        self.modules.clear();
        self.widget.clear();
        self.legend.clear();
        self.error = None;
    }

    fn is_loading(&self) -> bool {
        self.pending.is_loading()
    }

    fn ui(&mut self, ui: &mut Ui, _cx: &ViewContext<'_>) -> Option<Selection> {
        header_ui(ui, ViewKind::Modules.display_name(), self.is_loading());

        let mut switched = None;
        ui.horizontal(|ui| {
            for metric in ModuleMetric::all() {
                if ui
                    .selectable_label(self.metric == *metric, metric.display_name())
                    .clicked()
                {
                    switched = Some(*metric);
                }
            }
        });
        if let Some(metric) = switched {
            self.set_metric(metric);
        }
        error_ui(ui, &self.error);

        let mut action = GraphAction::None;
        ScrollArea::vertical().id_salt("modules").show(ui, |ui| {
            action = self.widget.ui(ui);
            ui.add_space(8.0);
            legend_ui(ui, &self.legend);
        });

        match action {
            GraphAction::NodeSelected { path, is_leaf } => {
                self.widget.tree().and_then(|tree| selection_for(tree, &path, is_leaf))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitrends_types::ModuleFile;
    use pretty_assertions::assert_eq;

    fn modules() -> Vec<ModuleEntry> {
        let file = |name: &str, lines: u64, indent: u64| ModuleFile {
            name: name.to_string(),
            num_code_lines: lines,
            total_indent_levels: indent,
        };
        vec![
            ModuleEntry {
                name: "core".to_string(),
                files: vec![file("src/core/lib.rs", 100, 10), file("src/core/io.rs", 50, 40)],
            },
            ModuleEntry {
                name: "web".to_string(),
                files: vec![file("src/web/app.rs", 30, 5)],
            },
        ]
    }

    #[test]
    fn test_metric_switch_rebuilds_values() {
        let mut view = ModulesView::new();
        view.modules = modules();
        view.rebuild();
        let root_value = |view: &ModulesView| {
            let tree = view.widget.tree().unwrap();
            tree.node(tree.root()).value
        };
        assert_eq!(root_value(&view), 180.0);

        view.set_metric(ModuleMetric::Complexity);
        assert_eq!(root_value(&view), 55.0);
    }

    #[test]
    fn test_leaf_selection_opens_file() {
        let tree = module_breakdown(&modules(), ModuleMetric::CodeLines).unwrap();
        assert_eq!(
            selection_for(&tree, "core/src/core/io.rs", true),
            Some(Selection::file("src/core/io.rs"))
        );
        assert_eq!(selection_for(&tree, "web", false), Some(Selection::module("web")));
    }
}
