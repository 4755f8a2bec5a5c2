//! Enclosure-zoom widget: nested circles with click-to-zoom
//!
//! The pack layout is computed once per tree in a fixed 900-unit square.
//! Zooming never recomputes it; a spring animates the view circle and the
//! [`ZoomTransform`] maps layout space to the viewport each frame.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};
use tracing::debug;

use super::{render_empty_state, to_pos, GraphAction, LABEL_COLOR};
use crate::animation::SpringCircle;
use crate::colors::{depth_color, weight_color, CategoryColors, OTHERS};
use crate::focus::{ZoomFocus, ZoomTransform};
use crate::layout::{pack, Circle, PackLayout, PACK_PADDING};
use crate::spatial::{SpatialIndex, SpatialNode};
use crate::tree::{NodeId, PathTree};

/// Layout square side, in layout units
pub const PACK_DIAMETER: f64 = 900.0;

const VIEWPORT_MARGIN: f32 = 10.0;
const MIN_VISIBLE_RADIUS: f32 = 0.5;

/// How leaf circles are filled; internal circles always use the depth ramp
#[derive(Debug, Clone)]
pub enum LeafFill {
    /// Dark red with the payload metric as opacity
    Weight { metric: String },
    /// Categorical color of a payload tag
    Category { tag: String, colors: CategoryColors },
}

impl LeafFill {
    fn color(&self, tree: &PathTree, id: NodeId) -> Color32 {
        let payload = &tree.node(id).payload;
        match self {
            LeafFill::Weight { metric } => weight_color(payload.metric(metric)),
            LeafFill::Category { tag, colors } => colors.color(payload.tag(tag).unwrap_or(OTHERS)),
        }
    }
}

struct Loaded {
    tree: PathTree,
    layout: PackLayout,
    index: SpatialIndex,
    focus: ZoomFocus,
}

pub struct EnclosureWidget {
    loaded: Option<Loaded>,
    fill: LeafFill,
    view: SpringCircle,
    hovered: Option<NodeId>,
    /// Label hit boxes from the last frame, in screen space
    label_rects: Vec<(NodeId, Rect)>,
}

impl EnclosureWidget {
    pub fn new(fill: LeafFill) -> Self {
        let half = (PACK_DIAMETER / 2.0) as f32;
        Self {
            loaded: None,
            fill,
            view: SpringCircle::new(half, half, half),
            hovered: None,
            label_rects: Vec::new(),
        }
    }

    /// Replace the tree; focus goes back to the root
    pub fn set_tree(&mut self, tree: PathTree) {
        let layout = pack(&tree, PACK_DIAMETER, PACK_PADDING);
        let index = SpatialIndex::from_nodes(tree.ids().map(|id| {
            let c = layout.circle(id);
            SpatialNode::circle(id, [c.x as f32, c.y as f32], c.r as f32)
        }));
        let root = layout.circle(tree.root());
        self.view.set_immediate(root.x as f32, root.y as f32, root.r as f32);
        self.hovered = None;
        self.label_rects.clear();
        debug!(nodes = tree.len(), "enclosure layout computed");

        self.loaded = Some(Loaded {
            focus: ZoomFocus::new(&tree),
            tree,
            layout,
            index,
        });
    }

    pub fn set_fill(&mut self, fill: LeafFill) {
        self.fill = fill;
    }

    pub fn clear(&mut self) {
        self.loaded = None;
        self.hovered = None;
        self.label_rects.clear();
    }

    pub fn tree(&self) -> Option<&PathTree> {
        self.loaded.as_ref().map(|l| &l.tree)
    }

    pub fn focus(&self) -> Option<NodeId> {
        self.loaded.as_ref().map(|l| l.focus.focus())
    }

    pub fn needs_repaint(&self) -> bool {
        self.view.is_animating()
    }

    // =========================================================================
    // UPDATE & RENDER
    // =========================================================================

    pub fn ui(&mut self, ui: &mut Ui) -> GraphAction {
        if self.loaded.is_none() {
            render_empty_state(ui, "No data");
            return GraphAction::None;
        }

        let available = ui.available_size();
        let side = available.x.min(available.y).max(100.0);
        let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::click());

        let dt = ui.input(|i| i.stable_dt);
        self.view.tick(dt);

        let viewport = response.rect.shrink(VIEWPORT_MARGIN);
        let transform = self.transform(viewport.width());

        let action = self.handle_input(&response, viewport.min, &transform);
        self.render(ui, &painter, viewport.min, &transform);

        if let (Some(hovered), Some(loaded)) = (self.hovered, self.loaded.as_ref()) {
            if hovered != loaded.tree.root() {
                response.on_hover_text_at_pointer(loaded.tree.path(hovered));
            }
        }

        if self.needs_repaint() {
            ui.ctx().request_repaint();
        }
        action
    }

    fn transform(&self, diameter: f32) -> ZoomTransform {
        let (x, y, r) = self.view.get();
        ZoomTransform::new(Circle::new(x as f64, y as f64, r as f64), diameter as f64)
    }

    /// Handle hover and click (call before render)
    fn handle_input(&mut self, response: &Response, origin: Pos2, transform: &ZoomTransform) -> GraphAction {
        let Some(loaded) = self.loaded.as_ref() else {
            return GraphAction::None;
        };

        let mut action = GraphAction::None;
        let pointer = response.hover_pos();
        let new_hover = pointer.and_then(|p| {
            let local = p - origin;
            let (x, y) = transform.invert(local.x as f64, local.y as f64);
            loaded.index.innermost_at([x as f32, y as f32])
        });
        if new_hover != self.hovered {
            self.hovered = new_hover;
            action = GraphAction::HoverChanged {
                path: new_hover.map(|id| loaded.tree.path(id)),
            };
        }

        if response.clicked() {
            let label_hit = pointer.and_then(|p| {
                self.label_rects
                    .iter()
                    .find(|(_, rect)| rect.contains(p))
                    .map(|(id, _)| *id)
            });
            let click = match label_hit {
                Some(id) => self.select_label(id),
                None => self.click_node(self.hovered),
            };
            action = action.merge(click);
        }
        action
    }

    /// Click on a circle, or on the background when `node` is `None`
    pub fn click_node(&mut self, node: Option<NodeId>) -> GraphAction {
        let Some(loaded) = self.loaded.as_mut() else {
            return GraphAction::None;
        };

        let target = match node {
            Some(id) => {
                let click = loaded.focus.click(&loaded.tree, id);
                if let Some(leaf) = click.selected_leaf {
                    self.animate_to(click.focus);
                    return self.selection(leaf);
                }
                click.focus
            }
            None => {
                loaded.focus.reset(&loaded.tree);
                loaded.tree.root()
            }
        };
        self.animate_to(target);
        GraphAction::None
    }

    /// Click on a visible label: select without zooming
    pub fn select_label(&mut self, node: NodeId) -> GraphAction {
        match self.loaded.as_ref() {
            Some(loaded) if loaded.focus.is_label_visible(&loaded.tree, node) => self.selection(node),
            _ => GraphAction::None,
        }
    }

    fn selection(&self, node: NodeId) -> GraphAction {
        match self.loaded.as_ref() {
            Some(loaded) => GraphAction::NodeSelected {
                path: loaded.tree.path(node),
                is_leaf: loaded.tree.node(node).is_leaf(),
            },
            None => GraphAction::None,
        }
    }

    fn animate_to(&mut self, node: NodeId) {
        if let Some(loaded) = self.loaded.as_ref() {
            let c = loaded.layout.circle(node);
            self.view.set_target(c.x as f32, c.y as f32, c.r as f32);
        }
    }

    fn render(&mut self, ui: &Ui, painter: &Painter, origin: Pos2, transform: &ZoomTransform) {
        self.label_rects.clear();
        let Some(loaded) = self.loaded.as_ref() else {
            return;
        };
        let clip = painter.clip_rect();
        let tree = &loaded.tree;

        for id in tree.pre_order() {
            let circle = transform.apply_circle(loaded.layout.circle(id));
            let r = circle.r as f32;
            let center = to_pos(origin, circle.x, circle.y);
            if r < MIN_VISIBLE_RADIUS || !clip.expand(r).contains(center) {
                continue;
            }

            let node = tree.node(id);
            let fill = if node.is_leaf() {
                self.fill.color(tree, id)
            } else {
                depth_color(node.depth())
            };
            let stroke = if Some(id) == self.hovered && id != tree.root() {
                Stroke::new(1.5, Color32::BLACK)
            } else {
                Stroke::NONE
            };
            painter.circle(center, r, fill, stroke);
        }

        let focus = loaded.focus.focus();
        for &child in tree.children(focus) {
            let circle = transform.apply_circle(loaded.layout.circle(child));
            let center = to_pos(origin, circle.x, circle.y);
            let galley = ui.fonts(|f| {
                f.layout_no_wrap(tree.node(child).name.clone(), FontId::proportional(11.0), LABEL_COLOR)
            });
            let rect = Align2::CENTER_CENTER.anchor_size(center, galley.size());
            painter.galley(rect.min, galley, LABEL_COLOR);
            self.label_rects.push((child, rect));
        }
    }
}

impl Default for EnclosureWidget {
    fn default() -> Self {
        Self::new(LeafFill::Weight {
            metric: crate::tree::METRIC_REVISION_WEIGHT.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{PathTreeBuilder, Payload};
    use pretty_assertions::assert_eq;

    fn widget() -> EnclosureWidget {
        let mut builder = PathTreeBuilder::new();
        for (path, size) in [("src/a.ts", 10.0), ("src/util/b.ts", 20.0), ("lib/c.ts", 5.0)] {
            builder.insert(path, size, Payload::new()).unwrap();
        }
        let mut widget = EnclosureWidget::default();
        widget.set_tree(builder.build());
        widget
    }

    fn find(widget: &EnclosureWidget, path: &str) -> NodeId {
        widget.tree().unwrap().find(path).unwrap()
    }

    #[test]
    fn test_empty_widget_ignores_clicks() {
        let mut widget = EnclosureWidget::default();
        assert_eq!(widget.click_node(None), GraphAction::None);
        assert_eq!(widget.focus(), None);
    }

    #[test]
    fn test_click_zooms_and_animates() {
        let mut widget = widget();
        let src = find(&widget, "src");
        assert_eq!(widget.click_node(Some(src)), GraphAction::None);
        assert_eq!(widget.focus(), Some(src));
        assert!(widget.needs_repaint());
    }

    #[test]
    fn test_click_visible_leaf_selects_it() {
        let mut widget = widget();
        widget.click_node(Some(find(&widget, "src")));
        let a = widget.tree().unwrap().find_leaf("src/a.ts").unwrap();
        assert_eq!(
            widget.click_node(Some(a)),
            GraphAction::NodeSelected {
                path: "src/a.ts".to_string(),
                is_leaf: true
            }
        );
    }

    #[test]
    fn test_background_click_resets_focus() {
        let mut widget = widget();
        widget.click_node(Some(find(&widget, "src/util")));
        widget.click_node(None);
        assert_eq!(widget.focus(), Some(widget.tree().unwrap().root()));
    }

    #[test]
    fn test_label_selection_only_for_focus_children() {
        let mut widget = widget();
        let lib = find(&widget, "lib");
        let util = find(&widget, "src/util");
        assert_eq!(widget.select_label(util), GraphAction::None);
        assert_eq!(
            widget.select_label(lib),
            GraphAction::NodeSelected {
                path: "lib".to_string(),
                is_leaf: false
            }
        );
        assert_eq!(widget.focus(), Some(widget.tree().unwrap().root()));
    }

    #[test]
    fn test_category_fill_falls_back_to_others() {
        let mut builder = PathTreeBuilder::new();
        builder.insert("a.rs", 1.0, Payload::new()).unwrap();
        let tree = builder.build();
        let colors = CategoryColors::from_names([OTHERS, "Ann"], &crate::colors::TABLEAU20);
        let fill = LeafFill::Category {
            tag: crate::tree::TAG_MAIN_DEVELOPER.to_string(),
            colors: colors.clone(),
        };
        let leaf = tree.find_leaf("a.rs").unwrap();
        assert_eq!(fill.color(&tree, leaf), colors.color(OTHERS));
    }
}
