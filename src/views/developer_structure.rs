//! Main developer structure: circle pack colored by each file's main developer

use egui::{Color32, ScrollArea, Ui};
use gitrends_graph::tree::TAG_MAIN_DEVELOPER;
use gitrends_graph::{
    legend_ui, rank_leaf_tag, CategoryColors, EnclosureWidget, GraphAction, LeafFill, PathTree, SiblingOrder,
    TABLEAU20,
};
use gitrends_types::StructureNode;
use tracing::warn;

use super::{error_ui, header_ui, Selection, View, ViewContext, ViewKind};
use crate::pending::PendingFetch;

pub struct DeveloperStructureView {
    widget: EnclosureWidget,
    legend: Vec<(String, Color32)>,
    pending: PendingFetch<StructureNode>,
    error: Option<String>,
}

impl Default for DeveloperStructureView {
    fn default() -> Self {
        Self::new()
    }
}

impl DeveloperStructureView {
    pub fn new() -> Self {
        Self {
            widget: EnclosureWidget::new(LeafFill::Category {
                tag: TAG_MAIN_DEVELOPER.to_string(),
                colors: CategoryColors::from_names(Vec::<String>::new(), &TABLEAU20),
            }),
            legend: Vec::new(),
            pending: PendingFetch::new(),
            error: None,
        }
    }

    fn load(&mut self, structure: &StructureNode, max_developers: usize) {
        let mut tree = match PathTree::from_structure(structure) {
            Ok(tree) => tree,
            Err(err) => {
                warn!(%err, "main developer structure rejected");
                self.error = Some(format!("Failed to build main developer structure: {}", err));
                return;
            }
        };
        tree.sort_siblings(SiblingOrder::Enclosure);

        let ranking = rank_leaf_tag(&tree, TAG_MAIN_DEVELOPER, max_developers);
        let colors = CategoryColors::new(&ranking, &TABLEAU20);
        self.legend = colors.legend(true);
        self.widget.set_fill(LeafFill::Category {
            tag: TAG_MAIN_DEVELOPER.to_string(),
            colors,
        });
        self.widget.set_tree(tree);
    }
}

impl View for DeveloperStructureView {
    fn kind(&self) -> ViewKind {
        ViewKind::MainDeveloperStructure
    }

    fn fetch(&mut self, cx: &ViewContext<'_>) {
        self.error = None;
        let api = cx.api.clone();
        self.pending
            .start(cx.runtime, async move { api.main_developer_structure().await });
    }

    fn poll(&mut self, cx: &ViewContext<'_>) {
        match self.pending.poll() {
            Some(Ok(structure)) => self.load(&structure, cx.config.main_developer_structure_max_developers),
            Some(Err(err)) => self.error = Some(format!("Failed to load main developers: {}", err)),
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

    fn ui(&mut self, ui: &mut Ui, _cx: &ViewContext<'_>) -> Option<Selection> {
        header_ui(ui, ViewKind::MainDeveloperStructure.display_name(), self.is_loading());
        error_ui(ui, &self.error);

        let mut action = GraphAction::None;
        ScrollArea::both()
            .id_salt("developer_structure")
            .show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    action = self.widget.ui(ui);
                    ui.vertical(|ui| legend_ui(ui, &self.legend));
                });
            });

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

    fn developer_leaf(name: &str, developer: &str) -> StructureNode {
        StructureNode::Leaf {
            name: name.to_string(),
            size: Some(10.0),
            revision_weight: None,
            author_weight: None,
            main_developer: Some(developer.to_string()),
            couplings: Vec::new(),
        }
    }

    #[test]
    fn test_legend_lists_top_developers_and_others() {
        let structure = StructureNode::internal(
            "root",
            vec![
                developer_leaf("a.rs", "Jane Doe"),
                developer_leaf("b.rs", "Jane Doe"),
                developer_leaf("c.rs", "John Smith"),
                developer_leaf("d.rs", "Max Power"),
            ],
        );

        let mut view = DeveloperStructureView::new();
        view.load(&structure, 1);

        let names: Vec<&str> = view.legend.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names.first(), Some(&"J. Doe"));
        assert!(names.contains(&gitrends_graph::OTHERS));
        assert!(!names.contains(&"J. Smith"));
    }
}
