//! Directed edges between leaves
//!
//! Edges reference leaves of one tree. Endpoints that do not resolve to a
//! leaf are dropped with a warning and the rest of the set is kept. Each
//! leaf's outgoing edges are indexed once per edge set, which the hover
//! highlight needs.

use std::collections::HashMap;

use gitrends_types::{ChangeCouplingEntry, StructureNode};
use tracing::{debug, warn};

use crate::tree::{NodeId, PathTree};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Coupling ratio in [0, 1] or an absolute count
    pub weight: f64,
}

/// Minimum coupling strength for an edge to be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingFilter {
    pub min_coupled_revisions: u64,
    pub min_ratio: f64,
}

impl Default for CouplingFilter {
    fn default() -> Self {
        Self {
            min_coupled_revisions: 15,
            min_ratio: 0.2,
        }
    }
}

impl CouplingFilter {
    pub fn accepts(&self, entry: &ChangeCouplingEntry) -> bool {
        entry.coupled_revisions >= self.min_coupled_revisions
            && entry.coupling_ratio() >= self.min_ratio
    }
}

/// Edges of one tree, in draw order
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    edges: Vec<Edge>,
    outgoing: HashMap<NodeId, Vec<usize>>,
    skipped: usize,
}

impl EdgeSet {
    /// Resolve `(source path, target path, weight)` triples against the tree
    ///
    /// Edges are ordered by their source leaf's depth-first position, then by
    /// input order.
    pub fn from_paths<I, S, T>(tree: &PathTree, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T, f64)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut edges = Vec::new();
        let mut skipped = 0;

        for (source, target, weight) in pairs {
            let (source, target) = (source.as_ref(), target.as_ref());
            match (tree.find_leaf(source), tree.find_leaf(target)) {
                (Some(s), Some(t)) => edges.push(Edge {
                    source: s,
                    target: t,
                    weight,
                }),
                (s, _) => {
                    let missing = if s.is_none() { source } else { target };
                    warn!(source, target, missing, "dropping edge with unknown endpoint");
                    skipped += 1;
                }
            }
        }

        let leaf_order: HashMap<NodeId, usize> = tree
            .leaves()
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();
        edges.sort_by_key(|e| leaf_order.get(&e.source).copied().unwrap_or(usize::MAX));

        let mut outgoing: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for (i, edge) in edges.iter().enumerate() {
            outgoing.entry(edge.source).or_default().push(i);
        }

        debug!(edges = edges.len(), skipped, "edge set built");
        Self {
            edges,
            outgoing,
            skipped,
        }
    }

    /// One edge per direction for every coupling pair passing the filter,
    /// weighted by the coupling ratio
    pub fn from_couplings(
        tree: &PathTree,
        couplings: &[ChangeCouplingEntry],
        filter: &CouplingFilter,
    ) -> Self {
        let pairs = couplings
            .iter()
            .filter(|c| filter.accepts(c))
            .flat_map(|c| {
                let ratio = c.coupling_ratio();
                [
                    (c.left_name.as_str(), c.right_name.as_str(), ratio),
                    (c.right_name.as_str(), c.left_name.as_str(), ratio),
                ]
            });
        Self::from_paths(tree, pairs)
    }

    /// Edges from the `couplings` lists of a structure payload's leaves
    ///
    /// `coupled` holds the full path of the target leaf.
    pub fn from_structure(tree: &PathTree, payload: &StructureNode) -> Self {
        let mut pairs: Vec<(String, String, f64)> = Vec::new();
        collect_structure_couplings(payload, &mut Vec::new(), true, &mut pairs);
        Self::from_paths(tree, pairs)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    /// Indices of the edges leaving `leaf`
    pub fn outgoing(&self, leaf: NodeId) -> &[usize] {
        self.outgoing.get(&leaf).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of edges dropped for unknown endpoints
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

fn collect_structure_couplings<'a>(
    node: &'a StructureNode,
    prefix: &mut Vec<&'a str>,
    is_root: bool,
    out: &mut Vec<(String, String, f64)>,
) {
    match node {
        StructureNode::Internal { name, children } => {
            if !is_root {
                prefix.push(name);
            }
            for child in children {
                collect_structure_couplings(child, prefix, false, out);
            }
            if !is_root {
                prefix.pop();
            }
        }
        StructureNode::Leaf {
            name, couplings, ..
        } => {
            prefix.push(name);
            let source = prefix.join("/");
            prefix.pop();
            for coupling in couplings {
                out.push((source.clone(), coupling.coupled.clone(), coupling.coupling_ratio));
            }
        }
    }
}
