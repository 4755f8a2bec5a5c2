//! Radial bundle widget: leaves on a circle, couplings as bundled curves
//!
//! Leaves are hovered by pointer angle anywhere in the label band, which is
//! easier to hit than the rotated text itself. Hover state lives in
//! [`HighlightState`]; every stroke and label style is derived from it while
//! painting.

use std::f64::consts::{PI, TAU};

use egui::epaint::TextShape;
use egui::{Color32, FontId, Painter, Pos2, Response, Sense, Shape, Stroke, Ui, Vec2};
use tracing::debug;

use super::{render_empty_state, GraphAction};
use crate::colors::additive;
use crate::edges::EdgeSet;
use crate::highlight::{BlendMode, HighlightState, LabelStyle};
use crate::layout::{cluster, edge_curve, ClusterLayout, BUNDLE_BETA};
use crate::tree::{NodeId, PathTree};

pub const RADIAL_WIDTH: f32 = 954.0;
const RADIAL_MARGIN: f32 = 70.0;
/// Room between the leaf circle and the outer radius for labels
const LABEL_BAND: f32 = 100.0;
const LABEL_OFFSET: f32 = 6.0;
const BACKGROUND: Color32 = Color32::from_rgb(0x1b, 0x1e, 0x23);

fn leaf_radius() -> f32 {
    RADIAL_WIDTH / 2.0 - RADIAL_MARGIN - LABEL_BAND
}

struct Loaded {
    tree: PathTree,
    layout: ClusterLayout,
    edges: EdgeSet,
    /// Flattened curve per edge, relative to the center
    curves: Vec<Vec<[f64; 2]>>,
    /// Leaves with their angle, increasing
    leaf_angles: Vec<(NodeId, f64)>,
}

#[derive(Default)]
pub struct BundleWidget {
    loaded: Option<Loaded>,
    highlight: HighlightState,
}

impl BundleWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the data; `edges` must have been built against `tree`
    pub fn set_data(&mut self, tree: PathTree, edges: EdgeSet) {
        let layout = cluster(&tree, leaf_radius() as f64);
        let curves: Vec<Vec<[f64; 2]>> = edges
            .edges()
            .iter()
            .map(|e| edge_curve(&tree, &layout, e.source, e.target, BUNDLE_BETA))
            .collect();
        let leaf_angles = tree
            .leaves()
            .into_iter()
            .map(|id| (id, layout.point(id).angle))
            .collect();
        debug!(leaves = tree.leaves().len(), edges = edges.len(), "radial layout computed");

        self.highlight.clear();
        self.loaded = Some(Loaded {
            tree,
            layout,
            edges,
            curves,
            leaf_angles,
        });
    }

    pub fn clear(&mut self) {
        self.loaded = None;
        self.highlight.clear();
    }

    pub fn tree(&self) -> Option<&PathTree> {
        self.loaded.as_ref().map(|l| &l.tree)
    }

    pub fn edges(&self) -> Option<&EdgeSet> {
        self.loaded.as_ref().map(|l| &l.edges)
    }

    /// Curves with at least two points, one per drawable edge
    pub fn curve_count(&self) -> usize {
        self.loaded
            .as_ref()
            .map(|l| l.curves.iter().filter(|c| c.len() >= 2).count())
            .unwrap_or(0)
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    /// Set the hovered leaf; returns false when nothing changed
    pub fn hover(&mut self, leaf: Option<NodeId>) -> bool {
        match self.loaded.as_ref() {
            Some(loaded) => self.highlight.set_hovered(&loaded.edges, leaf),
            None => false,
        }
    }

    pub fn label_style(&self, leaf: NodeId) -> LabelStyle {
        self.highlight.label_style(leaf)
    }

    pub fn needs_repaint(&self) -> bool {
        false
    }

    // =========================================================================
    // UPDATE & RENDER
    // =========================================================================

    pub fn ui(&mut self, ui: &mut Ui) -> GraphAction {
        if self.loaded.is_none() {
            render_empty_state(ui, "No data");
            return GraphAction::None;
        }

        let (response, painter) = ui.allocate_painter(Vec2::splat(RADIAL_WIDTH), Sense::click());
        let center = response.rect.center();

        let action = self.handle_input(&response, center);
        painter.rect_filled(response.rect, 0.0, BACKGROUND);
        self.render(ui, &painter, center);

        if let (Some(hovered), Some(loaded)) = (self.highlight.hovered(), self.loaded.as_ref()) {
            let text = format!(
                "{}, coupled: {}",
                loaded.tree.path(hovered),
                loaded.edges.outgoing(hovered).len()
            );
            response.on_hover_text_at_pointer(text);
        }
        action
    }

    fn handle_input(&mut self, response: &Response, center: Pos2) -> GraphAction {
        let Some(loaded) = self.loaded.as_ref() else {
            return GraphAction::None;
        };

        let leaf = response
            .hover_pos()
            .and_then(|p| leaf_at(&loaded.leaf_angles, p - center));
        let path = leaf.map(|id| loaded.tree.path(id));

        let mut action = GraphAction::None;
        if self.hover(leaf) {
            action = GraphAction::HoverChanged { path: path.clone() };
        }
        if response.clicked() {
            if let Some(path) = path {
                action = GraphAction::NodeSelected { path, is_leaf: true };
            }
        }
        action
    }

    fn render(&self, ui: &Ui, painter: &Painter, center: Pos2) {
        let Some(loaded) = self.loaded.as_ref() else {
            return;
        };
        let blend = self.highlight.blend_mode();
        for index in self.highlight.draw_order(&loaded.edges) {
            let Some(curve) = loaded.curves.get(index).filter(|c| c.len() >= 2) else {
                continue;
            };
            let style = self.highlight.edge_style(&loaded.edges, index);
            let color = match blend {
                BlendMode::Screen => additive(style.color),
                BlendMode::Normal => style.color,
            };
            let points: Vec<Pos2> = curve
                .iter()
                .map(|[x, y]| center + Vec2::new(*x as f32, *y as f32))
                .collect();
            painter.add(Shape::line(points, Stroke::new(style.width, color)));
        }

        for &(leaf, _) in &loaded.leaf_angles {
            self.render_label(ui, painter, center, loaded, leaf);
        }
    }

    fn render_label(&self, ui: &Ui, painter: &Painter, center: Pos2, loaded: &Loaded, leaf: NodeId) {
        let point = loaded.layout.point(leaf);
        let style = self.highlight.label_style(leaf);
        let size = if style.bold { 11.5 } else { 10.0 };
        let galley = ui.fonts(|f| {
            f.layout_no_wrap(loaded.tree.node(leaf).name.clone(), FontId::proportional(size), style.color)
        });

        let theta = point.angle as f32;
        let dir = Vec2::new(theta.sin(), -theta.cos());
        let (rotation, start) = if point.is_left_half() {
            // Flipped so the text reads left to right, ending at the offset
            (theta + std::f32::consts::FRAC_PI_2, point.radius as f32 + LABEL_OFFSET + galley.size().x)
        } else {
            (theta - std::f32::consts::FRAC_PI_2, point.radius as f32 + LABEL_OFFSET)
        };
        let y_axis = Vec2::new(-rotation.sin(), rotation.cos());
        let pos = center + dir * start - y_axis * (galley.size().y / 2.0);

        let mut shape = TextShape::new(pos, galley, style.color);
        shape.angle = rotation;
        painter.add(shape);
    }
}

/// Leaf whose angle is nearest to the pointer, within half a leaf step and
/// inside the label band
fn leaf_at(leaf_angles: &[(NodeId, f64)], offset: Vec2) -> Option<NodeId> {
    let r = offset.length();
    let inner = leaf_radius() - LABEL_OFFSET;
    if leaf_angles.is_empty() || r < inner || r > leaf_radius() + LABEL_BAND {
        return None;
    }
    let angle = (offset.x as f64).atan2(-(offset.y as f64)).rem_euclid(TAU);
    let tolerance = (PI / leaf_angles.len() as f64).max(0.005);

    leaf_angles
        .iter()
        .map(|&(id, a)| (id, angular_distance(a, angle)))
        .filter(|(_, d)| *d <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{PathTreeBuilder, Payload, SiblingOrder};
    use pretty_assertions::assert_eq;

    fn widget() -> BundleWidget {
        let mut builder = PathTreeBuilder::new();
        for path in ["src/a.ts", "src/b.ts", "lib/c.ts"] {
            builder.insert(path, 1.0, Payload::new()).unwrap();
        }
        let mut tree = builder.build();
        tree.sort_siblings(SiblingOrder::Radial);
        let edges = EdgeSet::from_paths(&tree, vec![("src/a.ts", "src/b.ts", 0.5)]);
        let mut widget = BundleWidget::new();
        widget.set_data(tree, edges);
        widget
    }

    #[test]
    fn test_one_curve_per_edge() {
        let widget = widget();
        assert_eq!(widget.curve_count(), 1);
    }

    #[test]
    fn test_hover_bolds_targets_only() {
        let mut widget = widget();
        let tree = widget.tree().unwrap().clone();
        let a = tree.find_leaf("src/a.ts").unwrap();
        let b = tree.find_leaf("src/b.ts").unwrap();
        let c = tree.find_leaf("lib/c.ts").unwrap();

        assert!(widget.hover(Some(a)));
        assert!(widget.label_style(b).bold);
        assert!(!widget.label_style(a).bold);
        assert!(!widget.label_style(c).bold);

        assert!(widget.hover(None));
        assert!(!widget.label_style(b).bold);
    }

    #[test]
    fn test_leaf_at_angle() {
        let leaves = vec![(NodeId(1), 0.0), (NodeId(2), PI / 2.0), (NodeId(3), PI)];
        let r = leaf_radius() + 20.0;
        // 12 o'clock
        assert_eq!(leaf_at(&leaves, Vec2::new(0.0, -r)), Some(NodeId(1)));
        // 3 o'clock
        assert_eq!(leaf_at(&leaves, Vec2::new(r, 0.0)), Some(NodeId(2)));
        // Inside the circle
        assert_eq!(leaf_at(&leaves, Vec2::new(10.0, 0.0)), None);
        // Between leaves beyond tolerance: 9 o'clock is PI/2 from both neighbours
        assert_eq!(leaf_at(&leaves, Vec2::new(-r, 0.0)), None);
    }

    #[test]
    fn test_angular_distance_wraps() {
        assert!((angular_distance(0.1, TAU - 0.1) - 0.2).abs() < 1e-9);
    }
}
