//! Hotspots structure: circle pack of the file tree, leaves shaded by weight

use egui::{ScrollArea, Ui};
use gitrends_graph::tree::{METRIC_AUTHOR_WEIGHT, METRIC_REVISION_WEIGHT};
use gitrends_graph::{EnclosureWidget, GraphAction, LeafFill, PathTree, SiblingOrder};
use gitrends_types::StructureNode;
use tracing::warn;

use super::{caption, error_ui, header_ui, Selection, View, ViewContext, ViewKind};
use crate::pending::PendingFetch;

/// Which weight shades the leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HotspotAnalysis {
    #[default]
    Revision,
    Author,
}

impl HotspotAnalysis {
    pub fn display_name(&self) -> &'static str {
        match self {
            HotspotAnalysis::Revision => "Revisions",
            HotspotAnalysis::Author => "Authors",
        }
    }

    pub fn metric(&self) -> &'static str {
        match self {
            HotspotAnalysis::Revision => METRIC_REVISION_WEIGHT,
            HotspotAnalysis::Author => METRIC_AUTHOR_WEIGHT,
        }
    }

    pub fn fill(&self) -> LeafFill {
        LeafFill::Weight {
            metric: self.metric().to_string(),
        }
    }

    pub fn all() -> &'static [HotspotAnalysis] {
        &[HotspotAnalysis::Revision, HotspotAnalysis::Author]
    }
}

pub struct HotspotStructureView {
    analysis: HotspotAnalysis,
    widget: EnclosureWidget,
    pending: PendingFetch<StructureNode>,
    error: Option<String>,
}

impl Default for HotspotStructureView {
    fn default() -> Self {
        Self::new()
    }
}

impl HotspotStructureView {
    pub fn new() -> Self {
        let analysis = HotspotAnalysis::default();
        Self {
            analysis,
            widget: EnclosureWidget::new(analysis.fill()),
            pending: PendingFetch::new(),
            error: None,
        }
    }

    pub fn analysis(&self) -> HotspotAnalysis {
        self.analysis
    }

    /// Switching only changes the leaf fill, the layout is kept
    pub fn set_analysis(&mut self, analysis: HotspotAnalysis) {
        self.analysis = analysis;
        self.widget.set_fill(analysis.fill());
    }

    fn load(&mut self, structure: &StructureNode) {
        match PathTree::from_structure(structure) {
            Ok(mut tree) => {
                tree.sort_siblings(SiblingOrder::Enclosure);
                self.widget.set_tree(tree);
            }
            Err(err) => {
                warn!(%err, "hotspot structure rejected");
                self.error = Some(format!("Failed to build hotspot structure: {}", err));
            }
        }
    }
}

impl View for HotspotStructureView {
    fn kind(&self) -> ViewKind {
        ViewKind::HotspotStructure
    }

    fn fetch(&mut self, cx: &ViewContext<'_>) {
        self.error = None;
        let api = cx.api.clone();
        self.pending
            .start(cx.runtime, async move { api.hotspots_structure().await });
    }

    fn poll(&mut self, _cx: &ViewContext<'_>) {
        match self.pending.poll() {
            Some(Ok(structure)) => self.load(&structure),
            Some(Err(err)) => self.error = Some(format!("Failed to load hotspots: {}", err)),
            None => {}
        }
    }

    fn reset(&mut self) {
        self.pending.discard();
        self.widget.clear();
        self.error = None;
    }

    fn is_loading(&self) -> bool {
        self.pending.is_loading()
    }

    fn ui(&mut self, ui: &mut Ui, _cx: &ViewContext<'_>) -> Option<Selection> {
        header_ui(ui, ViewKind::HotspotStructure.display_name(), self.is_loading());

        let mut switched = None;
        ui.horizontal(|ui| {
            ui.label("Shade by:");
            for analysis in HotspotAnalysis::all() {
                if ui
                    .selectable_label(self.analysis == *analysis, analysis.display_name())
                    .clicked()
                {
                    switched = Some(*analysis);
                }
            }
        });
        if let Some(analysis) = switched {
            self.set_analysis(analysis);
        }
        caption(ui, "Click a circle to zoom in, click the focused circle to zoom out.");
        error_ui(ui, &self.error);

        let action = ScrollArea::both()
            .id_salt("hotspot_structure")
            .show(ui, |ui| self.widget.ui(ui))
            .inner;

        match action {
            GraphAction::NodeSelected { path, is_leaf: true } => Some(Selection::file(path)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_analysis_metric_keys() {
        assert_eq!(HotspotAnalysis::Revision.metric(), METRIC_REVISION_WEIGHT);
        assert_eq!(HotspotAnalysis::Author.metric(), METRIC_AUTHOR_WEIGHT);
    }

    #[test]
    fn test_load_builds_tree_from_structure() {
        let structure: StructureNode = serde_json::from_str(
            r#"{"type": "Internal", "name": "root", "children": [
                {"type": "Internal", "name": "src", "children": [
                    {"type": "Leaf", "name": "a.rs", "size": 3, "revision_weight": 0.5}
                ]}
            ]}"#,
        )
        .unwrap();

        let mut view = HotspotStructureView::new();
        view.load(&structure);
        assert_eq!(view.error, None);
        let tree = view.widget.tree().unwrap();
        assert!(tree.find_leaf("src/a.rs").is_some());
    }

    #[test]
    fn test_switching_analysis_keeps_tree() {
        let structure: StructureNode = serde_json::from_str(
            r#"{"type": "Internal", "name": "root", "children": [
                {"type": "Leaf", "name": "a.rs", "size": 1, "author_weight": 1.0}
            ]}"#,
        )
        .unwrap();
        let mut view = HotspotStructureView::new();
        view.load(&structure);
        view.set_analysis(HotspotAnalysis::Author);
        assert_eq!(view.analysis(), HotspotAnalysis::Author);
        assert!(view.widget.tree().is_some());
    }
}
