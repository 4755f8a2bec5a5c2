//! Pre-shaped structure trees
//!
//! The structure endpoints (`/api/file/hotspots-structure`,
//! `/api/file/main-developer-structure`, `/api/{file|module}/change-coupling-structure`)
//! return a nested tree instead of flat records. Leaves carry whichever
//! optional fields the endpoint fills in.

use serde::{Deserialize, Serialize};

/// One node of a structure payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StructureNode {
    Leaf {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        revision_weight: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        author_weight: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        main_developer: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        couplings: Vec<Coupling>,
    },
    Internal {
        name: String,
        #[serde(default)]
        children: Vec<StructureNode>,
    },
}

/// Outgoing coupling of a structure leaf, `coupled` is the full path of the target leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupling {
    pub coupled: String,
    pub coupling_ratio: f64,
}

impl StructureNode {
    /// Leaf with only a name and a size
    pub fn leaf(name: impl Into<String>, size: f64) -> Self {
        StructureNode::Leaf {
            name: name.into(),
            size: Some(size),
            revision_weight: None,
            author_weight: None,
            main_developer: None,
            couplings: Vec::new(),
        }
    }

    pub fn internal(name: impl Into<String>, children: Vec<StructureNode>) -> Self {
        StructureNode::Internal {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StructureNode::Leaf { name, .. } | StructureNode::Internal { name, .. } => name,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, StructureNode::Leaf { .. })
    }

    /// Children of an internal node, empty for leaves
    pub fn children(&self) -> &[StructureNode] {
        match self {
            StructureNode::Leaf { .. } => &[],
            StructureNode::Internal { children, .. } => children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_tagged_tree() {
        let json = r#"{
            "type": "Internal",
            "name": "root",
            "children": [
                {"type": "Leaf", "name": "a.rs", "size": 12, "revision_weight": 0.5},
                {"type": "Leaf", "name": "b.rs", "couplings": [{"coupled": "a.rs", "coupling_ratio": 0.4}]}
            ]
        }"#;

        let tree: StructureNode = serde_json::from_str(json).unwrap();
        assert_eq!(tree.name(), "root");
        assert_eq!(tree.children().len(), 2);

        match &tree.children()[0] {
            StructureNode::Leaf {
                size,
                revision_weight,
                author_weight,
                ..
            } => {
                assert_eq!(*size, Some(12.0));
                assert_eq!(*revision_weight, Some(0.5));
                assert_eq!(*author_weight, None);
            }
            other => panic!("expected leaf, got {:?}", other),
        }

        match &tree.children()[1] {
            StructureNode::Leaf { couplings, .. } => assert_eq!(
                couplings,
                &vec![Coupling {
                    coupled: "a.rs".to_string(),
                    coupling_ratio: 0.4
                }]
            ),
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_leaf_has_no_children() {
        let leaf = StructureNode::leaf("x.rs", 1.0);
        assert!(leaf.is_leaf());
        assert!(leaf.children().is_empty());
    }
}
