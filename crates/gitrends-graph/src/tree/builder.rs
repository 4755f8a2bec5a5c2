//! Tree construction from flat records and from structure payloads

use std::collections::HashMap;

use gitrends_types::{HotspotEntry, MainDeveloperEntry, StructureNode, SumOfCouplingsEntry};

use super::{
    NodeId, NodeKind, PathTree, Payload, TreeNode, METRIC_AUTHOR_WEIGHT, METRIC_REVISION_WEIGHT,
    ROOT_NAME, TAG_MAIN_DEVELOPER,
};
use crate::error::TreeError;

/// A flat record that can be placed into a [`PathTree`] by its path
pub trait PathRecord {
    fn path(&self) -> &str;
    fn size(&self) -> f64;
    fn payload(&self) -> Payload {
        Payload::default()
    }
}

impl PathRecord for HotspotEntry {
    fn path(&self) -> &str {
        &self.name
    }

    fn size(&self) -> f64 {
        self.num_code_lines as f64
    }

    fn payload(&self) -> Payload {
        Payload::new()
            .with_metric("num_revisions", self.num_revisions as f64)
            .with_metric("num_code_lines", self.num_code_lines as f64)
            .with_metric("total_indent_levels", self.total_indent_levels as f64)
    }
}

impl PathRecord for MainDeveloperEntry {
    fn path(&self) -> &str {
        &self.name
    }

    fn size(&self) -> f64 {
        self.total_net_added_lines as f64
    }

    fn payload(&self) -> Payload {
        Payload::new()
            .with_metric("net_added_lines", self.net_added_lines as f64)
            .with_tag(TAG_MAIN_DEVELOPER, self.main_developer.clone())
    }
}

impl PathRecord for SumOfCouplingsEntry {
    fn path(&self) -> &str {
        &self.name
    }

    fn size(&self) -> f64 {
        self.sum_of_couplings as f64
    }
}

/// Split a record name into its segments, rejecting empty ones
pub fn split_path(path: &str) -> Result<Vec<&str>, TreeError> {
    if path.is_empty() {
        return Err(TreeError::MalformedPath(path.to_string()));
    }
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(TreeError::MalformedPath(path.to_string()));
    }
    Ok(segments)
}

// =============================================================================
// BUILDER
// =============================================================================

/// Incremental [`PathTree`] construction
///
/// Intermediate segments create or reuse internal nodes; the last segment
/// becomes a leaf. Children keep insertion order.
#[derive(Debug)]
pub struct PathTreeBuilder {
    nodes: Vec<TreeNode>,
    lookup: HashMap<(NodeId, String), NodeId>,
    leaf_paths: HashMap<String, NodeId>,
}

impl Default for PathTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTreeBuilder {
    pub fn new() -> Self {
        Self::with_root_name(ROOT_NAME)
    }

    pub fn with_root_name(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![TreeNode::new(name, NodeKind::Internal, None)],
            lookup: HashMap::new(),
            leaf_paths: HashMap::new(),
        }
    }

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Insert a leaf at a "/"-delimited path
    pub fn insert(&mut self, path: &str, size: f64, payload: Payload) -> Result<NodeId, TreeError> {
        let segments = split_path(path)?;
        self.insert_segments(&segments, size, payload)
    }

    /// Insert a leaf at an explicit segment list
    ///
    /// Segments may themselves contain "/" (module names used as a single
    /// grouping level); the leaf path is still the "/"-joined segments.
    pub fn insert_segments<S: AsRef<str>>(
        &mut self,
        segments: &[S],
        size: f64,
        payload: Payload,
    ) -> Result<NodeId, TreeError> {
        let full_path = segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("/");
        let Some((last, dirs)) = segments.split_last() else {
            return Err(TreeError::MalformedPath(full_path));
        };
        if segments.iter().any(|s| s.as_ref().is_empty()) {
            return Err(TreeError::MalformedPath(full_path));
        }

        let mut parent = self.root();
        let mut walked: Vec<&str> = Vec::with_capacity(dirs.len());
        for dir in dirs {
            walked.push(dir.as_ref());
            parent = self.internal_child(parent, dir.as_ref(), &full_path, &walked.join("/"))?;
        }
        self.leaf_child(parent, last.as_ref(), &full_path, size, payload)
    }

    fn internal_child(
        &mut self,
        parent: NodeId,
        name: &str,
        full_path: &str,
        dir_path: &str,
    ) -> Result<NodeId, TreeError> {
        if let Some(existing) = self.lookup.get(&(parent, name.to_string())).copied() {
            if self.nodes[existing.0].is_leaf() {
                return Err(TreeError::PathConflict {
                    path: full_path.to_string(),
                    existing: dir_path.to_string(),
                });
            }
            return Ok(existing);
        }
        Ok(self.push(parent, TreeNode::new(name, NodeKind::Internal, Some(parent))))
    }

    fn leaf_child(
        &mut self,
        parent: NodeId,
        name: &str,
        full_path: &str,
        size: f64,
        payload: Payload,
    ) -> Result<NodeId, TreeError> {
        if !size.is_finite() || size < 0.0 {
            return Err(TreeError::InvalidSize {
                path: full_path.to_string(),
                size,
            });
        }
        if let Some(existing) = self.lookup.get(&(parent, name.to_string())).copied() {
            return Err(if self.nodes[existing.0].is_leaf() {
                TreeError::DuplicatePath(full_path.to_string())
            } else {
                TreeError::PathConflict {
                    path: full_path.to_string(),
                    existing: full_path.to_string(),
                }
            });
        }
        if self.leaf_paths.contains_key(full_path) {
            return Err(TreeError::DuplicatePath(full_path.to_string()));
        }

        let mut node = TreeNode::new(name, NodeKind::Leaf, Some(parent));
        node.size = size;
        node.payload = payload;
        let id = self.push(parent, node);
        self.leaf_paths.insert(full_path.to_string(), id);
        Ok(id)
    }

    fn push(&mut self, parent: NodeId, node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.lookup.insert((parent, node.name.clone()), id);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Finish construction: depth, height and aggregated values are computed
    pub fn build(self) -> PathTree {
        PathTree::from_parts(self.nodes, self.leaf_paths)
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

impl PathTree {
    /// Build from flat records, one leaf per record
    pub fn from_records<'a, R, I>(records: I) -> Result<Self, TreeError>
    where
        R: PathRecord + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut builder = PathTreeBuilder::new();
        for record in records {
            builder.insert(record.path(), record.size(), record.payload())?;
        }
        Ok(builder.build())
    }

    /// Convert a pre-shaped structure payload
    ///
    /// The payload root becomes the tree root and keeps its name. A payload
    /// that is a single leaf is placed under a synthetic root.
    pub fn from_structure(payload: &StructureNode) -> Result<Self, TreeError> {
        let mut builder = match payload {
            StructureNode::Internal { name, .. } => PathTreeBuilder::with_root_name(name.clone()),
            StructureNode::Leaf { .. } => PathTreeBuilder::new(),
        };

        match payload {
            StructureNode::Internal { children, .. } => {
                for child in children {
                    insert_structure(&mut builder, builder_root(), child, &mut Vec::new())?;
                }
            }
            leaf @ StructureNode::Leaf { .. } => {
                insert_structure(&mut builder, builder_root(), leaf, &mut Vec::new())?;
            }
        }
        Ok(builder.build())
    }
}

fn builder_root() -> NodeId {
    NodeId(0)
}

fn insert_structure<'a>(
    builder: &mut PathTreeBuilder,
    parent: NodeId,
    node: &'a StructureNode,
    prefix: &mut Vec<&'a str>,
) -> Result<(), TreeError> {
    let name = node.name();
    prefix.push(name);
    let full_path = prefix.join("/");
    if name.is_empty() {
        return Err(TreeError::MalformedPath(full_path));
    }

    let result = match node {
        StructureNode::Leaf {
            size,
            revision_weight,
            author_weight,
            main_developer,
            ..
        } => {
            let mut payload = Payload::new();
            if let Some(w) = revision_weight {
                payload = payload.with_metric(METRIC_REVISION_WEIGHT, *w);
            }
            if let Some(w) = author_weight {
                payload = payload.with_metric(METRIC_AUTHOR_WEIGHT, *w);
            }
            if let Some(dev) = main_developer {
                payload = payload.with_tag(TAG_MAIN_DEVELOPER, dev.clone());
            }
            builder
                .leaf_child(parent, name, &full_path, size.unwrap_or(0.0), payload)
                .map(|_| ())
        }
        StructureNode::Internal { children, .. } => {
            let id = builder.internal_child(parent, name, &full_path, &full_path)?;
            for child in children {
                insert_structure(builder, id, child, prefix)?;
            }
            Ok(())
        }
    };

    prefix.pop();
    result
}
