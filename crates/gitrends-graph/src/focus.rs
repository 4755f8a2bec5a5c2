//! Zoom focus for the enclosure layout
//!
//! The focus is the node whose circle fills the viewport. Clicking moves it:
//!
//! ```text
//! candidate = node            if node is internal
//!           = node.parent     if node is a leaf
//!
//! candidate == focus  ->  focus = candidate.parent   (zoom out, root stays root)
//! otherwise           ->  focus = candidate          (zoom in / across)
//! ```
//!
//! Only the direct children of the focus are labeled, and only they can be
//! selected through their label.

use crate::layout::Circle;
use crate::tree::{NodeId, PathTree};

/// Outcome of a click on a circle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomClick {
    pub previous: NodeId,
    pub focus: NodeId,
    /// Set when the clicked node is a leaf directly under the previous focus
    pub selected_leaf: Option<NodeId>,
}

impl ZoomClick {
    pub fn changed(&self) -> bool {
        self.previous != self.focus
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomFocus {
    focus: NodeId,
}

impl ZoomFocus {
    /// Focus on the root
    pub fn new(tree: &PathTree) -> Self {
        Self { focus: tree.root() }
    }

    pub fn focus(&self) -> NodeId {
        self.focus
    }

    pub fn reset(&mut self, tree: &PathTree) {
        self.focus = tree.root();
    }

    pub fn click(&mut self, tree: &PathTree, node: NodeId) -> ZoomClick {
        let previous = self.focus;
        let is_leaf = tree.node(node).is_leaf();

        let selected_leaf = (is_leaf && tree.parent(node) == Some(previous)).then_some(node);

        let candidate = if is_leaf {
            tree.parent(node).unwrap_or(node)
        } else {
            node
        };
        self.focus = if candidate == previous {
            tree.parent(candidate).unwrap_or(candidate)
        } else {
            candidate
        };

        ZoomClick {
            previous,
            focus: self.focus,
            selected_leaf,
        }
    }

    /// Labels are shown for the focus's direct children only
    pub fn is_label_visible(&self, tree: &PathTree, node: NodeId) -> bool {
        tree.parent(node) == Some(self.focus)
    }
}

// =============================================================================
// VIEW TRANSFORM
// =============================================================================

/// Maps layout coordinates so a view circle fills a square viewport
///
/// `k = diameter / (2 * r)`; a point maps to `(p - (c - r)) * k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub view: Circle,
    pub diameter: f64,
}

impl ZoomTransform {
    pub fn new(view: Circle, diameter: f64) -> Self {
        Self { view, diameter }
    }

    pub fn scale(&self) -> f64 {
        if self.view.r > 0.0 {
            self.diameter / (2.0 * self.view.r)
        } else {
            0.0
        }
    }

    /// Layout point to viewport offset from the top-left corner
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let k = self.scale();
        (
            (x - (self.view.x - self.view.r)) * k,
            (y - (self.view.y - self.view.r)) * k,
        )
    }

    pub fn apply_circle(&self, circle: Circle) -> Circle {
        let (x, y) = self.apply(circle.x, circle.y);
        Circle::new(x, y, circle.r * self.scale())
    }

    /// Viewport offset back to layout coordinates
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        let k = self.scale();
        if k == 0.0 {
            return (self.view.x, self.view.y);
        }
        (
            x / k + self.view.x - self.view.r,
            y / k + self.view.y - self.view.r,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{PathTreeBuilder, Payload};
    use pretty_assertions::assert_eq;

    fn tree() -> PathTree {
        let mut builder = PathTreeBuilder::new();
        for path in ["src/a.ts", "src/util/b.ts", "lib/c.ts"] {
            builder.insert(path, 1.0, Payload::new()).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_click_internal_zooms_in() {
        let tree = tree();
        let mut focus = ZoomFocus::new(&tree);
        let src = tree.find("src").unwrap();

        let click = focus.click(&tree, src);
        assert_eq!(click.focus, src);
        assert!(click.changed());
        assert_eq!(click.selected_leaf, None);
    }

    #[test]
    fn test_click_focused_node_zooms_out() {
        let tree = tree();
        let mut focus = ZoomFocus::new(&tree);
        let util = tree.find("src/util").unwrap();

        focus.click(&tree, util);
        assert_eq!(focus.focus(), util);
        focus.click(&tree, util);
        assert_eq!(focus.focus(), tree.find("src").unwrap());
    }

    #[test]
    fn test_click_root_at_root_stays() {
        let tree = tree();
        let mut focus = ZoomFocus::new(&tree);
        let click = focus.click(&tree, tree.root());
        assert_eq!(click.focus, tree.root());
        assert!(!click.changed());
    }

    #[test]
    fn test_click_deep_descendant_focuses_it() {
        let tree = tree();
        let mut focus = ZoomFocus::new(&tree);
        focus.click(&tree, tree.find("src").unwrap());
        let util = tree.find("src/util").unwrap();
        focus.click(&tree, util);
        assert_eq!(focus.focus(), util);

        // Across to a node outside the focused subtree
        let lib = tree.find("lib").unwrap();
        focus.click(&tree, lib);
        assert_eq!(focus.focus(), lib);
    }

    #[test]
    fn test_click_visible_leaf_selects_it() {
        let tree = tree();
        let mut focus = ZoomFocus::new(&tree);
        let src = tree.find("src").unwrap();
        let a = tree.find_leaf("src/a.ts").unwrap();
        focus.click(&tree, src);

        // Leaf under the focus: candidate is the focus itself, so zoom out
        let click = focus.click(&tree, a);
        assert_eq!(click.selected_leaf, Some(a));
        assert_eq!(click.focus, tree.root());
    }

    #[test]
    fn test_click_hidden_leaf_focuses_its_parent() {
        let tree = tree();
        let mut focus = ZoomFocus::new(&tree);
        let b = tree.find_leaf("src/util/b.ts").unwrap();

        let click = focus.click(&tree, b);
        assert_eq!(click.selected_leaf, None);
        assert_eq!(click.focus, tree.find("src/util").unwrap());
    }

    #[test]
    fn test_label_visibility_follows_focus() {
        let tree = tree();
        let mut focus = ZoomFocus::new(&tree);
        let src = tree.find("src").unwrap();
        let a = tree.find_leaf("src/a.ts").unwrap();

        assert!(focus.is_label_visible(&tree, src));
        assert!(!focus.is_label_visible(&tree, a));
        focus.click(&tree, src);
        assert!(focus.is_label_visible(&tree, a));
        assert!(!focus.is_label_visible(&tree, src));
    }

    #[test]
    fn test_transform_fills_viewport_with_view_circle() {
        let t = ZoomTransform::new(Circle::new(100.0, 100.0, 50.0), 900.0);
        assert_eq!(t.scale(), 9.0);
        assert_eq!(t.apply(100.0, 100.0), (450.0, 450.0));
        assert_eq!(t.apply(50.0, 100.0), (0.0, 450.0));
        assert_eq!(t.invert(450.0, 450.0), (100.0, 100.0));
        assert_eq!(t.apply_circle(Circle::new(100.0, 100.0, 50.0)).r, 450.0);
    }
}
