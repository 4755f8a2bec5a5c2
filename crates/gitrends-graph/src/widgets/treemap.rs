//! Treemap widget with categorical coloring and clipped labels
//!
//! The layout is computed once at its nominal size and scaled uniformly to
//! the available width.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

use super::{render_empty_state, to_pos, GraphAction};
use crate::colors::CategoryColors;
use crate::layout::treemap::label_line_offset;
use crate::layout::{label_lines, treemap, Bounds, TreemapLayout, TreemapOptions};
use crate::spatial::{SpatialIndex, SpatialNode};
use crate::tree::{NodeId, PathTree};

const LABEL_FONT_SIZE: f32 = 10.0;
const LABEL_INSET: f32 = 3.0;
const HEADER_TEXT: Color32 = Color32::from_rgb(60, 60, 60);

/// Which name picks a leaf's color
#[derive(Debug, Clone)]
pub enum TreemapColoring {
    /// The leaf's own name (author, developer)
    Leaf(CategoryColors),
    /// The name of the leaf's top-level ancestor (module)
    Module(CategoryColors),
}

impl TreemapColoring {
    fn color(&self, tree: &PathTree, leaf: NodeId) -> Color32 {
        match self {
            TreemapColoring::Leaf(colors) => colors.color(&tree.node(leaf).name),
            TreemapColoring::Module(colors) => {
                let top = tree
                    .ancestors(leaf)
                    .into_iter()
                    .rev()
                    .find(|id| tree.node(*id).depth() == 1)
                    .unwrap_or(leaf);
                colors.color(&tree.node(top).name)
            }
        }
    }

    pub fn colors(&self) -> &CategoryColors {
        match self {
            TreemapColoring::Leaf(colors) | TreemapColoring::Module(colors) => colors,
        }
    }
}

struct Loaded {
    tree: PathTree,
    layout: TreemapLayout,
    index: SpatialIndex,
    options: TreemapOptions,
    coloring: TreemapColoring,
}

#[derive(Default)]
pub struct TreemapWidget {
    loaded: Option<Loaded>,
    hovered: Option<NodeId>,
}

impl TreemapWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the data; the tree must be summed and in treemap sibling order
    pub fn set_data(&mut self, tree: PathTree, options: TreemapOptions, coloring: TreemapColoring) {
        let layout = treemap(&tree, &options);
        let index = SpatialIndex::from_nodes(tree.ids().filter(|id| *id != tree.root()).map(|id| {
            let b = layout.rect(id);
            SpatialNode::rect(id, [b.x0 as f32, b.y0 as f32], [b.x1 as f32, b.y1 as f32])
        }));
        self.hovered = None;
        self.loaded = Some(Loaded {
            tree,
            layout,
            index,
            options,
            coloring,
        });
    }

    pub fn clear(&mut self) {
        self.loaded = None;
        self.hovered = None;
    }

    pub fn tree(&self) -> Option<&PathTree> {
        self.loaded.as_ref().map(|l| &l.tree)
    }

    pub fn rect(&self, id: NodeId) -> Option<Bounds> {
        self.loaded.as_ref().map(|l| l.layout.rect(id))
    }

    pub fn coloring(&self) -> Option<&TreemapColoring> {
        self.loaded.as_ref().map(|l| &l.coloring)
    }

    /// Node under a point in layout coordinates
    pub fn node_at(&self, x: f32, y: f32) -> Option<NodeId> {
        self.loaded.as_ref().and_then(|l| l.index.innermost_at([x, y]))
    }

    // =========================================================================
    // UPDATE & RENDER
    // =========================================================================

    pub fn ui(&mut self, ui: &mut Ui) -> GraphAction {
        let Some(options) = self.loaded.as_ref().map(|l| l.options) else {
            render_empty_state(ui, "No data");
            return GraphAction::None;
        };

        let width = ui.available_width().max(100.0);
        let scale = width / options.width as f32;
        let size = Vec2::new(width, options.height as f32 * scale);
        let (response, painter) = ui.allocate_painter(size, Sense::click());
        let origin = response.rect.min;

        let action = self.handle_input(&response, origin, scale);
        self.render(&painter, origin, scale);

        if let (Some(hovered), Some(loaded)) = (self.hovered, self.loaded.as_ref()) {
            let node = loaded.tree.node(hovered);
            response.on_hover_text_at_pointer(format!("{}\n{}", loaded.tree.path(hovered), node.value));
        }
        action
    }

    fn handle_input(&mut self, response: &Response, origin: Pos2, scale: f32) -> GraphAction {
        let new_hover = response.hover_pos().and_then(|p| {
            let local = (p - origin) / scale;
            self.node_at(local.x, local.y)
        });

        let Some(loaded) = self.loaded.as_ref() else {
            return GraphAction::None;
        };
        let mut action = GraphAction::None;
        if new_hover != self.hovered {
            action = GraphAction::HoverChanged {
                path: new_hover.map(|id| loaded.tree.path(id)),
            };
            self.hovered = new_hover;
        }
        if response.clicked() {
            if let Some(id) = self.hovered {
                action = GraphAction::NodeSelected {
                    path: loaded.tree.path(id),
                    is_leaf: loaded.tree.node(id).is_leaf(),
                };
            }
        }
        action
    }

    fn render(&self, painter: &Painter, origin: Pos2, scale: f32) {
        let Some(loaded) = self.loaded.as_ref() else {
            return;
        };
        let tree = &loaded.tree;
        let to_screen = |b: Bounds| {
            Rect::from_min_max(
                to_pos(origin, b.x0 * scale as f64, b.y0 * scale as f64),
                to_pos(origin, b.x1 * scale as f64, b.y1 * scale as f64),
            )
        };

        for id in tree.pre_order() {
            if id == tree.root() {
                continue;
            }
            let node = tree.node(id);
            let rect = to_screen(loaded.layout.rect(id));
            if rect.width() <= 0.0 || rect.height() <= 0.0 {
                continue;
            }

            if !node.is_leaf() {
                if loaded.options.header > 0.0 && node.depth() == 1 {
                    painter.with_clip_rect(rect).text(
                        rect.left_top() + Vec2::new(LABEL_INSET, 1.0),
                        Align2::LEFT_TOP,
                        &node.name,
                        FontId::proportional(LABEL_FONT_SIZE + 1.0),
                        HEADER_TEXT,
                    );
                }
                continue;
            }

            let fill = loaded.coloring.color(tree, id);
            let stroke = if Some(id) == self.hovered {
                Stroke::new(1.5, Color32::BLACK)
            } else {
                Stroke::NONE
            };
            painter.rect(rect, 0.0, fill, stroke);

            let clipped = painter.with_clip_rect(rect);
            let lines = label_lines(&node.name, node.value);
            let last = lines.len().saturating_sub(1);
            for (i, line) in lines.iter().enumerate() {
                let dy = label_line_offset(i, i == last) * LABEL_FONT_SIZE;
                clipped.text(
                    rect.left_top() + Vec2::new(LABEL_INSET, dy),
                    Align2::LEFT_BOTTOM,
                    line,
                    FontId::proportional(LABEL_FONT_SIZE),
                    label_color(fill, i == last),
                );
            }
        }
    }
}

/// Dark text on light fills; the value line is dimmed
fn label_color(fill: Color32, is_value_line: bool) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    let base = if luma > 140.0 {
        Color32::from_rgb(20, 20, 20)
    } else {
        Color32::WHITE
    };
    if is_value_line {
        base.gamma_multiply(0.7)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::histogram;
    use crate::colors::TABLEAU10;
    use pretty_assertions::assert_eq;

    fn widget() -> TreemapWidget {
        let result = histogram(vec![("Ann", 6.0), ("Bob", 3.0), ("Cid", 1.0)], 2).unwrap();
        let colors = CategoryColors::new(&result.ranking, &TABLEAU10);
        let mut widget = TreemapWidget::new();
        widget.set_data(
            result.tree,
            TreemapOptions::new(100.0, 50.0, 0.0),
            TreemapColoring::Leaf(colors),
        );
        widget
    }

    #[test]
    fn test_node_at_finds_leaf() {
        let widget = widget();
        let tree = widget.tree().unwrap();
        let ann = tree.find_leaf("Ann").unwrap();
        let b = widget.rect(ann).unwrap();
        let hit = widget.node_at(((b.x0 + b.x1) / 2.0) as f32, ((b.y0 + b.y1) / 2.0) as f32);
        assert_eq!(hit, Some(ann));
    }

    #[test]
    fn test_leaf_coloring_uses_rank_slots() {
        let widget = widget();
        let tree = widget.tree().unwrap();
        let coloring = widget.coloring().unwrap();
        let ann = tree.find_leaf("Ann").unwrap();
        let others = tree.find_leaf("Others").unwrap();
        assert_eq!(coloring.color(tree, ann), TABLEAU10[0]);
        assert_eq!(coloring.color(tree, others), TABLEAU10[2]);
    }

    #[test]
    fn test_module_coloring_uses_top_level_name() {
        let mut builder = crate::tree::PathTreeBuilder::new();
        builder
            .insert_segments(&["core", "src/core/a.rs"], 1.0, crate::tree::Payload::new())
            .unwrap();
        let tree = builder.build();
        let colors = CategoryColors::from_names(["ui", "core"], &TABLEAU10);
        let coloring = TreemapColoring::Module(colors);
        let leaf = tree.find_leaf("core/src/core/a.rs").unwrap();
        assert_eq!(coloring.color(&tree, leaf), TABLEAU10[1]);
    }

    #[test]
    fn test_label_color_contrast() {
        assert_eq!(label_color(Color32::WHITE, false), Color32::from_rgb(20, 20, 20));
        assert_eq!(label_color(Color32::BLACK, false), Color32::WHITE);
    }
}
