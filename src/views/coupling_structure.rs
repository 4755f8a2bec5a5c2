//! Change coupling structure: radial layout with bundled coupling edges

use egui::{ScrollArea, Ui};
use gitrends_graph::{BundleWidget, EdgeSet, GraphAction, PathTree, SiblingOrder};
use gitrends_types::{EntryType, StructureNode};
use tracing::{debug, warn};

use super::{caption, entry_type_switch, error_ui, header_ui, Selection, View, ViewContext, ViewKind};
use crate::pending::PendingFetch;

pub struct CouplingStructureView {
    entry_type: EntryType,
    widget: BundleWidget,
    pending: PendingFetch<StructureNode>,
    error: Option<String>,
}

impl Default for CouplingStructureView {
    fn default() -> Self {
        Self::new()
    }
}

impl CouplingStructureView {
    pub fn new() -> Self {
        Self {
            entry_type: EntryType::File,
            widget: BundleWidget::new(),
            pending: PendingFetch::new(),
            error: None,
        }
    }

    fn load(&mut self, structure: &StructureNode) {
        let mut tree = match PathTree::from_structure(structure) {
            Ok(tree) => tree,
            Err(err) => {
                warn!(%err, "change coupling structure rejected");
                self.error = Some(format!("Failed to build change coupling structure: {}", err));
                return;
            }
        };
        tree.sort_siblings(SiblingOrder::Radial);
        let edges = EdgeSet::from_structure(&tree, structure);
        debug!(edges = edges.len(), skipped = edges.skipped(), "coupling edges built");
        self.widget.set_data(tree, edges);
    }
}

impl View for CouplingStructureView {
    fn kind(&self) -> ViewKind {
        ViewKind::ChangeCouplingStructure
    }

    fn fetch(&mut self, cx: &ViewContext<'_>) {
        self.error = None;
        let api = cx.api.clone();
        let entry_type = self.entry_type;
        self.pending.start(cx.runtime, async move {
            api.change_coupling_structure(entry_type).await
        });
    }

    fn poll(&mut self, _cx: &ViewContext<'_>) {
        match self.pending.poll() {
            Some(Ok(structure)) => self.load(&structure),
            Some(Err(err)) => self.error = Some(format!("Failed to load change coupling: {}", err)),
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

    fn ui(&mut self, ui: &mut Ui, cx: &ViewContext<'_>) -> Option<Selection> {
        header_ui(ui, ViewKind::ChangeCouplingStructure.display_name(), self.is_loading());
        if entry_type_switch(ui, &mut self.entry_type) {
            self.reset();
            self.fetch(cx);
        }
        caption(ui, "Hover a name to highlight what it is coupled to.");
        error_ui(ui, &self.error);

        let action = ScrollArea::both()
            .id_salt("coupling_structure")
            .show(ui, |ui| self.widget.ui(ui))
            .inner;

        match action {
            GraphAction::NodeSelected { path, is_leaf: true } => Some(Selection::of(self.entry_type, path)),
            _ => None,
        }
    }
}
