//! egui widgets over the layouts
//!
//! Each widget owns its tree and layout and is rebuilt when new data
//! arrives. Interaction comes back as an action value; the caller decides
//! what a selection means.
//!
//! # EGUI-RULES Compliance
//! - No callbacks - `ui()` returns [`GraphAction`] / [`TableAction`]
//! - Layouts are computed once per data set, never inside `ui()`
//! - Widgets request a repaint only while a spring is animating

mod autocomplete;
mod bundle;
mod enclosure;
mod legend;
mod table;
mod treemap;

pub use autocomplete::AutoCompleteWidget;
pub use bundle::BundleWidget;
pub use enclosure::{EnclosureWidget, LeafFill};
pub use legend::legend_ui;
pub use table::{TableAction, TableWidget};
pub use treemap::{TreemapColoring, TreemapWidget};

use egui::{Color32, FontId, Pos2, Ui, Vec2};

/// Actions returned from the graph widgets (caller handles these)
#[derive(Debug, Clone, PartialEq)]
pub enum GraphAction {
    /// No action
    None,
    /// A node was picked
    NodeSelected { path: String, is_leaf: bool },
    /// The hovered node changed
    HoverChanged { path: Option<String> },
}

impl GraphAction {
    pub fn is_none(&self) -> bool {
        matches!(self, GraphAction::None)
    }

    /// Keep a selection over a hover change
    pub(crate) fn merge(self, other: GraphAction) -> GraphAction {
        match (&self, &other) {
            (GraphAction::NodeSelected { .. }, _) => self,
            (_, GraphAction::None) => self,
            _ => other,
        }
    }
}

pub(crate) const LABEL_COLOR: Color32 = Color32::from_rgb(30, 30, 30);
pub(crate) const EMPTY_TEXT_COLOR: Color32 = Color32::from_rgb(140, 140, 140);

pub(crate) fn to_pos(origin: Pos2, x: f64, y: f64) -> Pos2 {
    origin + Vec2::new(x as f32, y as f32)
}

pub(crate) fn render_empty_state(ui: &mut Ui, message: &str) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), 120.0), egui::Sense::hover());
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        message,
        FontId::proportional(14.0),
        EMPTY_TEXT_COLOR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wins_over_hover() {
        let selected = GraphAction::NodeSelected {
            path: "src".to_string(),
            is_leaf: false,
        };
        let hover = GraphAction::HoverChanged { path: None };
        assert_eq!(selected.clone().merge(hover.clone()), selected);
        assert_eq!(hover.clone().merge(selected.clone()), selected);
        assert_eq!(hover.clone().merge(GraphAction::None), hover);
    }
}
