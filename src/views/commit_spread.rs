//! Commit spread: module -> author treemap of revision counts

use egui::{Color32, ScrollArea, Ui};
use gitrends_graph::layout::TreemapOptions;
use gitrends_graph::{commit_spread, legend_ui, CategoryColors, TreemapColoring, TreemapWidget, TABLEAU10};
use gitrends_types::CommitSpreadEntry;
use tracing::warn;

use super::{caption, error_ui, header_ui, Selection, View, ViewContext, ViewKind};
use crate::pending::PendingFetch;

pub(crate) const TREEMAP_WIDTH: f64 = 1500.0;
/// Chart height minus the room left for the legend
pub(crate) const TREEMAP_HEIGHT: f64 = 900.0 - 35.0;
const MODULE_PADDING: f64 = 10.0;

pub struct CommitSpreadView {
    widget: TreemapWidget,
    legend: Vec<(String, Color32)>,
    pending: PendingFetch<Vec<CommitSpreadEntry>>,
    error: Option<String>,
}

impl Default for CommitSpreadView {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitSpreadView {
    pub fn new() -> Self {
        Self {
            widget: TreemapWidget::new(),
            legend: Vec::new(),
            pending: PendingFetch::new(),
            error: None,
        }
    }

    fn load(&mut self, entries: &[CommitSpreadEntry], max_authors: usize, min_module_commits: u64) {
        match commit_spread(entries, max_authors, min_module_commits) {
            Ok(bucketed) => {
                let colors = CategoryColors::new(&bucketed.ranking, &TABLEAU10);
                self.legend = colors.legend(true);
                self.widget.set_data(
                    bucketed.tree,
                    TreemapOptions::new(TREEMAP_WIDTH, TREEMAP_HEIGHT, MODULE_PADDING),
                    TreemapColoring::Leaf(colors),
                );
            }
            Err(err) => {
                warn!(%err, "commit spread rejected");
                self.error = Some(format!("Failed to build commit spread: {}", err));
            }
        }
    }
}

impl View for CommitSpreadView {
    fn kind(&self) -> ViewKind {
        ViewKind::CommitSpread
    }

    fn fetch(&mut self, cx: &ViewContext<'_>) {
        self.error = None;
        let api = cx.api.clone();
        self.pending
            .start(cx.runtime, async move { api.commit_spread().await });
    }

    fn poll(&mut self, cx: &ViewContext<'_>) {
        match self.pending.poll() {
            Some(Ok(entries)) => self.load(
                &entries,
                cx.config.commit_spread_max_authors,
                cx.config.commit_spread_min_module_commits,
            ),
            Some(Err(err)) => self.error = Some(format!("Failed to load commit spread: {}", err)),
            None => {}
        }
    }

    fn reset(&mut self) {
        self.pending.discard();
        self.widget.clear();
        self.legend.clear();
        self.error = None;
    }

    fn is_loading(&self) -> bool {
        self.pending.is_loading()
    }

    fn ui(&mut self, ui: &mut Ui, cx: &ViewContext<'_>) -> Option<Selection> {
        header_ui(ui, ViewKind::CommitSpread.display_name(), self.is_loading());
        caption(
            ui,
            &format!(
                "Revisions per author and module. Modules with fewer than {} commits are hidden.",
                cx.config.commit_spread_min_module_commits
            ),
        );
        error_ui(ui, &self.error);

        ScrollArea::vertical().id_salt("commit_spread").show(ui, |ui| {
            self.widget.ui(ui);
            ui.add_space(8.0);
            legend_ui(ui, &self.legend);
        });

        // Leaves are authors, nothing to open
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(module: &str, author: &str, revisions: u64) -> CommitSpreadEntry {
        CommitSpreadEntry {
            module_name: module.to_string(),
            author: author.to_string(),
            num_revisions: revisions,
        }
    }

    #[test]
    fn test_small_modules_are_left_out() {
        let entries = vec![
            entry("core", "Jane Doe", 8),
            entry("core", "John Smith", 4),
            entry("docs", "Jane Doe", 2),
        ];
        let mut view = CommitSpreadView::new();
        view.load(&entries, 13, 10);

        let tree = view.widget.tree().unwrap();
        assert!(tree.find("core").is_some());
        assert_eq!(tree.find("docs"), None);
        assert_eq!(tree.node(tree.root()).value, 12.0);
    }
}
