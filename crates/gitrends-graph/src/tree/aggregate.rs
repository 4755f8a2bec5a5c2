//! Bottom-up aggregation and deterministic sibling ordering

use std::cmp::Ordering;

use super::{PathTree, TreeNode};

/// Sibling order used by each layout family
///
/// Every order falls back to name ascending so repeated renders are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingOrder {
    /// Height descending, then value descending
    Enclosure,
    /// Height ascending
    Radial,
    /// Value descending
    Treemap,
}

impl SiblingOrder {
    fn compare(self, a: &TreeNode, b: &TreeNode) -> Ordering {
        let primary = match self {
            SiblingOrder::Enclosure => b
                .height
                .cmp(&a.height)
                .then_with(|| b.value.total_cmp(&a.value)),
            SiblingOrder::Radial => a.height.cmp(&b.height),
            SiblingOrder::Treemap => b.value.total_cmp(&a.value),
        };
        primary.then_with(|| a.name.cmp(&b.name))
    }
}

impl PathTree {
    /// Recompute values: leaves take their size, internal nodes the sum of
    /// their children
    pub fn sum(&mut self) {
        self.sum_by(|leaf| leaf.size);
    }

    /// Recompute values with a custom leaf measure
    pub fn sum_by<F>(&mut self, measure: F)
    where
        F: Fn(&TreeNode) -> f64,
    {
        for id in self.post_order() {
            let value = if self.node(id).is_leaf() {
                let v = measure(self.node(id));
                if v.is_finite() && v > 0.0 {
                    v
                } else {
                    0.0
                }
            } else {
                self.children(id).iter().map(|c| self.node(*c).value).sum()
            };
            self.nodes_mut()[id.index()].value = value;
        }
    }

    /// Stable-sort every node's children
    pub fn sort_siblings(&mut self, order: SiblingOrder) {
        for id in self.pre_order() {
            let mut children = std::mem::take(&mut self.nodes_mut()[id.index()].children);
            children.sort_by(|a, b| order.compare(self.node(*a), self.node(*b)));
            self.nodes_mut()[id.index()].children = children;
        }
    }
}
