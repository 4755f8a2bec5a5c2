//! Path tree - hierarchy built from "/"-delimited record names
//!
//! Nodes live in a flat arena indexed by [`NodeId`]. The root is a synthetic
//! node that is never part of a path; every other node's path is the
//! "/"-joined names from the first level down to itself.
//!
//! ```text
//! src/a.ts (10)        root (35)
//! src/b.ts (20)   ->   ├── src (30)
//! lib/c.ts (5)         │   ├── a.ts (10)
//!                      │   └── b.ts (20)
//!                      └── lib (5)
//!                          └── c.ts (5)
//! ```
//!
//! Trees are rebuilt from scratch on every fetch. Layouts index their output
//! by `NodeId::index()`, so a layout is only valid for the tree it was
//! computed from.

mod aggregate;
mod builder;

pub use aggregate::SiblingOrder;
pub use builder::{split_path, PathRecord, PathTreeBuilder};

use std::collections::{BTreeMap, HashMap, HashSet};

/// Name of the synthetic root when the input does not provide one
pub const ROOT_NAME: &str = "root";

/// Payload metric keys filled in from structure payloads
pub const METRIC_REVISION_WEIGHT: &str = "revision_weight";
pub const METRIC_AUTHOR_WEIGHT: &str = "author_weight";
pub const TAG_MAIN_DEVELOPER: &str = "main_developer";

// =============================================================================
// NODE TYPES
// =============================================================================

/// Index of a node inside its [`PathTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Internal,
}

/// Per-view metric bag carried by a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub metrics: BTreeMap<String, f64>,
    pub tags: BTreeMap<String, String>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied()
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// One node of a [`PathTree`]
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Path segment
    pub name: String,
    pub kind: NodeKind,
    /// Input size (leaves only, 0 for internal nodes)
    pub size: f64,
    /// Aggregated mass: the size for leaves, sum of children otherwise
    pub value: f64,
    pub payload: Payload,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) depth: usize,
    pub(crate) height: usize,
}

impl TreeNode {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            kind,
            size: 0.0,
            value: 0.0,
            payload: Payload::default(),
            parent,
            children: Vec::new(),
            depth: 0,
            height: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Distance from the root (root = 0)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Longest distance down to a descendant without children (0 for leaves)
    pub fn height(&self) -> usize {
        self.height
    }
}

// =============================================================================
// PATH TREE
// =============================================================================

/// Single-rooted hierarchy of named nodes
#[derive(Debug, Clone)]
pub struct PathTree {
    nodes: Vec<TreeNode>,
    leaf_paths: HashMap<String, NodeId>,
}

impl PathTree {
    pub(crate) fn from_parts(nodes: Vec<TreeNode>, leaf_paths: HashMap<String, NodeId>) -> Self {
        let mut tree = Self { nodes, leaf_paths };
        tree.compute_shape();
        tree.sum();
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds nothing but its root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Depth-first pre-order, parents before children, siblings in order
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Depth-first post-order, children before parents
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut out = self.pre_order_reversed_children();
        out.reverse();
        out
    }

    fn pre_order_reversed_children(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().copied());
        }
        out
    }

    /// Leaves in depth-first order
    pub fn leaves(&self) -> Vec<NodeId> {
        self.pre_order()
            .into_iter()
            .filter(|id| self.node(*id).is_leaf())
            .collect()
    }

    /// "/"-joined names from the first level down to `id` (empty for the root)
    pub fn path(&self, id: NodeId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .into_iter()
            .filter(|a| *a != self.root())
            .map(|a| self.node(a).name.as_str())
            .collect();
        names.reverse();
        names.join("/")
    }

    /// Leaf with the given full path
    pub fn find_leaf(&self, path: &str) -> Option<NodeId> {
        self.leaf_paths.get(path).copied()
    }

    /// Any node with the given full path, the empty path names the root
    pub fn find(&self, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(self.root());
        }
        if let Some(leaf) = self.find_leaf(path) {
            return Some(leaf);
        }
        let mut current = self.root();
        for segment in path.split('/') {
            current = *self
                .children(current)
                .iter()
                .find(|c| self.node(**c).name == segment)?;
        }
        Some(current)
    }

    /// `id` followed by its ancestors up to and including the root
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            out.push(parent);
            current = parent;
        }
        out
    }

    pub fn lowest_common_ancestor(&self, a: NodeId, b: NodeId) -> NodeId {
        let b_chain: HashSet<NodeId> = self.ancestors(b).into_iter().collect();
        self.ancestors(a)
            .into_iter()
            .find(|n| b_chain.contains(n))
            .unwrap_or_else(|| self.root())
    }

    /// Shortest path from `source` up to the lowest common ancestor and down
    /// to `target`, both ends included
    pub fn path_between(&self, source: NodeId, target: NodeId) -> Vec<NodeId> {
        let ancestor = self.lowest_common_ancestor(source, target);

        let mut up: Vec<NodeId> = Vec::new();
        let mut current = source;
        up.push(current);
        while current != ancestor {
            match self.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
            up.push(current);
        }

        let mut down: Vec<NodeId> = Vec::new();
        let mut current = target;
        while current != ancestor {
            down.push(current);
            match self.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        down.reverse();

        up.extend(down);
        up
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [TreeNode] {
        &mut self.nodes
    }

    /// Depth top-down, height bottom-up
    fn compute_shape(&mut self) {
        for id in self.pre_order() {
            let depth = self.parent(id).map(|p| self.nodes[p.0].depth + 1).unwrap_or(0);
            self.nodes[id.0].depth = depth;
        }
        for id in self.post_order() {
            let height = self
                .children(id)
                .iter()
                .map(|c| self.nodes[c.0].height + 1)
                .max()
                .unwrap_or(0);
            self.nodes[id.0].height = height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> PathTree {
        let mut builder = PathTreeBuilder::new();
        builder.insert("src/a.ts", 10.0, Payload::new()).unwrap();
        builder.insert("src/b.ts", 20.0, Payload::new()).unwrap();
        builder.insert("lib/c.ts", 5.0, Payload::new()).unwrap();
        builder.build()
    }

    fn names(tree: &PathTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|id| tree.node(*id).name.clone()).collect()
    }

    #[test]
    fn test_paths_exclude_root() {
        let tree = sample();
        let a = tree.find_leaf("src/a.ts").unwrap();
        assert_eq!(tree.path(a), "src/a.ts");
        assert_eq!(tree.path(tree.root()), "");
        assert_eq!(tree.find("src"), tree.parent(a));
    }

    #[test]
    fn test_orders() {
        let tree = sample();
        assert_eq!(
            names(&tree, &tree.pre_order()),
            vec!["root", "src", "a.ts", "b.ts", "lib", "c.ts"]
        );
        assert_eq!(
            names(&tree, &tree.post_order()),
            vec!["a.ts", "b.ts", "src", "c.ts", "lib", "root"]
        );
        assert_eq!(names(&tree, &tree.leaves()), vec!["a.ts", "b.ts", "c.ts"]);
    }

    #[test]
    fn test_depth_and_height() {
        let tree = sample();
        let root = tree.node(tree.root());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.height(), 2);
        let c = tree.node(tree.find_leaf("lib/c.ts").unwrap());
        assert_eq!(c.depth(), 2);
        assert_eq!(c.height(), 0);
    }

    #[test]
    fn test_path_between_siblings_goes_through_parent() {
        let tree = sample();
        let a = tree.find_leaf("src/a.ts").unwrap();
        let b = tree.find_leaf("src/b.ts").unwrap();
        assert_eq!(names(&tree, &tree.path_between(a, b)), vec!["a.ts", "src", "b.ts"]);
    }

    #[test]
    fn test_path_between_cousins_goes_through_root() {
        let tree = sample();
        let a = tree.find_leaf("src/a.ts").unwrap();
        let c = tree.find_leaf("lib/c.ts").unwrap();
        assert_eq!(
            names(&tree, &tree.path_between(a, c)),
            vec!["a.ts", "src", "root", "lib", "c.ts"]
        );
    }

    #[test]
    fn test_payload_accessors() {
        let payload = Payload::new()
            .with_metric(METRIC_REVISION_WEIGHT, 0.25)
            .with_tag(TAG_MAIN_DEVELOPER, "Jane Doe");
        assert_eq!(payload.metric(METRIC_REVISION_WEIGHT), Some(0.25));
        assert_eq!(payload.metric(METRIC_AUTHOR_WEIGHT), None);
        assert_eq!(payload.tag(TAG_MAIN_DEVELOPER), Some("Jane Doe"));
    }
}
