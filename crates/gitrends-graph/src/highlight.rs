//! Hover highlight for the radial bundle view
//!
//! `hovered` is the only state. Hovering leaf L activates exactly the edges
//! leaving L and highlights exactly the targets of those edges. Styles and
//! draw order are derived from that state every frame.
//!
//! # EGUI-RULES Compliance
//! - No callbacks - `set_hovered` returns whether anything changed
//! - Derived sets are rebuilt from the edge index on hover change, O(out-degree)

use std::collections::HashSet;

use egui::Color32;

use crate::edges::EdgeSet;
use crate::tree::NodeId;

pub const TEXT_NORMAL: Color32 = Color32::WHITE;
pub const TEXT_HIGHLIGHT: Color32 = Color32::from_rgb(0x82, 0x9a, 0xb1);
pub const EDGE_NORMAL: Color32 = Color32::from_rgb(0x2c, 0x2e, 0x30);
pub const EDGE_HIGHLIGHT: Color32 = Color32::from_rgb(0x82, 0x9a, 0xb1);

/// How edge strokes combine with what is already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Additive, overlapping bundles read brighter
    Screen,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub color: Color32,
    pub width: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub color: Color32,
    pub bold: bool,
}

/// Stroke width for an edge weight
pub fn edge_width(weight: f64) -> f32 {
    (weight * 10.0).max(1.0) as f32
}

#[derive(Debug, Clone, Default)]
pub struct HighlightState {
    hovered: Option<NodeId>,
    active_edges: HashSet<usize>,
    targets: HashSet<NodeId>,
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Set the hovered leaf; returns false when nothing changed
    pub fn set_hovered(&mut self, edges: &EdgeSet, node: Option<NodeId>) -> bool {
        if node == self.hovered {
            return false;
        }
        self.hovered = node;
        self.active_edges.clear();
        self.targets.clear();

        if let Some(leaf) = node {
            for &index in edges.outgoing(leaf) {
                if let Some(edge) = edges.edge(index) {
                    self.active_edges.insert(index);
                    self.targets.insert(edge.target);
                }
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.hovered = None;
        self.active_edges.clear();
        self.targets.clear();
    }

    pub fn is_edge_active(&self, index: usize) -> bool {
        self.active_edges.contains(&index)
    }

    pub fn is_target(&self, leaf: NodeId) -> bool {
        self.targets.contains(&leaf)
    }

    pub fn edge_style(&self, edges: &EdgeSet, index: usize) -> EdgeStyle {
        let active = self.is_edge_active(index);
        let weight = edges.edge(index).map(|e| e.weight).unwrap_or(0.0);
        EdgeStyle {
            color: if active { EDGE_HIGHLIGHT } else { EDGE_NORMAL },
            width: edge_width(weight),
            active,
        }
    }

    pub fn label_style(&self, leaf: NodeId) -> LabelStyle {
        let bold = self.is_target(leaf);
        LabelStyle {
            color: if bold { TEXT_HIGHLIGHT } else { TEXT_NORMAL },
            bold,
        }
    }

    /// Edge indices back to front: inactive edges in their default order,
    /// then the active ones
    pub fn draw_order(&self, edges: &EdgeSet) -> Vec<usize> {
        let (mut inactive, active): (Vec<usize>, Vec<usize>) =
            (0..edges.len()).partition(|i| !self.is_edge_active(*i));
        inactive.extend(active);
        inactive
    }

    pub fn blend_mode(&self) -> BlendMode {
        if self.hovered.is_some() {
            BlendMode::Normal
        } else {
            BlendMode::Screen
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{PathTree, PathTreeBuilder, Payload};
    use pretty_assertions::assert_eq;

    fn fixture() -> (PathTree, EdgeSet) {
        let mut builder = PathTreeBuilder::new();
        for path in ["src/a.ts", "src/b.ts", "lib/c.ts", "lib/d.ts"] {
            builder.insert(path, 1.0, Payload::new()).unwrap();
        }
        let tree = builder.build();
        let edges = EdgeSet::from_paths(
            &tree,
            vec![
                ("src/b.ts", "lib/d.ts", 0.3),
                ("src/a.ts", "src/b.ts", 0.5),
                ("src/a.ts", "lib/c.ts", 0.05),
                ("lib/c.ts", "src/a.ts", 0.5),
            ],
        );
        (tree, edges)
    }

    #[test]
    fn test_hover_activates_outgoing_edges_and_their_targets() {
        let (tree, edges) = fixture();
        let a = tree.find_leaf("src/a.ts").unwrap();
        let mut state = HighlightState::new();

        assert!(state.set_hovered(&edges, Some(a)));

        let active: Vec<usize> = (0..edges.len()).filter(|i| state.is_edge_active(*i)).collect();
        assert_eq!(active, edges.outgoing(a).to_vec());

        let bold: Vec<&str> = tree
            .leaves()
            .into_iter()
            .filter(|l| state.label_style(*l).bold)
            .map(|l| tree.node(l).name.as_str())
            .collect();
        assert_eq!(bold, vec!["b.ts", "c.ts"]);
        assert!(!state.label_style(a).bold);
        assert_eq!(state.blend_mode(), BlendMode::Normal);
    }

    #[test]
    fn test_active_edges_draw_last() {
        let (tree, edges) = fixture();
        let a = tree.find_leaf("src/a.ts").unwrap();
        let mut state = HighlightState::new();
        state.set_hovered(&edges, Some(a));

        let order = state.draw_order(&edges);
        let tail: Vec<usize> = order[order.len() - 2..].to_vec();
        assert_eq!(tail, edges.outgoing(a).to_vec());
        assert_eq!(order.len(), edges.len());
    }

    #[test]
    fn test_unhover_restores_defaults() {
        let (tree, edges) = fixture();
        let mut state = HighlightState::new();
        state.set_hovered(&edges, tree.find_leaf("src/a.ts"));
        assert!(state.set_hovered(&edges, None));

        assert_eq!(state.draw_order(&edges), (0..edges.len()).collect::<Vec<_>>());
        assert_eq!(state.blend_mode(), BlendMode::Screen);
        for i in 0..edges.len() {
            assert_eq!(state.edge_style(&edges, i).color, EDGE_NORMAL);
        }
        for leaf in tree.leaves() {
            assert_eq!(state.label_style(leaf).color, TEXT_NORMAL);
        }
    }

    #[test]
    fn test_rehover_is_noop() {
        let (tree, edges) = fixture();
        let a = tree.find_leaf("src/a.ts");
        let mut state = HighlightState::new();
        assert!(state.set_hovered(&edges, a));
        assert!(!state.set_hovered(&edges, a));
    }

    #[test]
    fn test_edge_width() {
        assert_eq!(edge_width(0.05), 1.0);
        assert_eq!(edge_width(0.5), 5.0);
    }
}
