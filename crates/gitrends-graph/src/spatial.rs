//! Spatial index for hit testing rendered circles and rectangles
//!
//! Uses an R-tree (via `rstar`) for O(log n) lookups. Circles of a packed
//! hierarchy are nested, so a point usually lies inside a whole chain of
//! ancestors; `innermost_at` picks the smallest shape containing the point.

use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

use crate::tree::NodeId;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    Circle { center: [f32; 2], radius: f32 },
    Rect { min: [f32; 2], max: [f32; 2] },
}

/// Spatial index entry for a rendered node
#[derive(Debug, Clone)]
pub struct SpatialNode {
    pub id: NodeId,
    shape: Shape,
    bounds: AABB<[f32; 2]>,
}

impl SpatialNode {
    pub fn circle(id: NodeId, center: [f32; 2], radius: f32) -> Self {
        let bounds = AABB::from_corners(
            [center[0] - radius, center[1] - radius],
            [center[0] + radius, center[1] + radius],
        );
        Self {
            id,
            shape: Shape::Circle { center, radius },
            bounds,
        }
    }

    pub fn rect(id: NodeId, min: [f32; 2], max: [f32; 2]) -> Self {
        Self {
            id,
            shape: Shape::Rect { min, max },
            bounds: AABB::from_corners(min, max),
        }
    }

    fn area(&self) -> f32 {
        match self.shape {
            Shape::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
            Shape::Rect { min, max } => (max[0] - min[0]) * (max[1] - min[1]),
        }
    }
}

impl RTreeObject for SpatialNode {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for SpatialNode {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        match self.shape {
            Shape::Circle { center, radius } => {
                let dx = point[0] - center[0];
                let dy = point[1] - center[1];
                let dist_to_edge = ((dx * dx + dy * dy).sqrt() - radius).max(0.0);
                dist_to_edge * dist_to_edge
            }
            Shape::Rect { .. } => self.bounds.distance_2(point),
        }
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        match self.shape {
            Shape::Circle { center, radius } => {
                let dx = point[0] - center[0];
                let dy = point[1] - center[1];
                dx * dx + dy * dy <= radius * radius
            }
            Shape::Rect { min, max } => {
                point[0] >= min[0] && point[0] <= max[0] && point[1] >= min[1] && point[1] <= max[1]
            }
        }
    }
}

/// R-tree over the shapes of one layout
#[derive(Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialNode>,
    count: usize,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl Iterator<Item = SpatialNode>) -> Self {
        let nodes: Vec<_> = nodes.collect();
        let count = nodes.len();
        Self {
            tree: RTree::bulk_load(nodes),
            count,
        }
    }

    /// Smallest shape containing the point
    pub fn innermost_at(&self, point: [f32; 2]) -> Option<NodeId> {
        self.tree
            .locate_all_at_point(&point)
            .min_by(|a, b| a.area().total_cmp(&b.area()))
            .map(|node| node.id)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new();
        assert!(index.is_empty());
        assert!(index.innermost_at([0.0, 0.0]).is_none());
    }

    #[test]
    fn test_nested_circles_pick_innermost() {
        let index = SpatialIndex::from_nodes(
            vec![
                SpatialNode::circle(NodeId(0), [0.0, 0.0], 100.0),
                SpatialNode::circle(NodeId(1), [20.0, 0.0], 40.0),
                SpatialNode::circle(NodeId(2), [30.0, 0.0], 5.0),
            ]
            .into_iter(),
        );
        assert_eq!(index.len(), 3);
        assert_eq!(index.innermost_at([31.0, 1.0]), Some(NodeId(2)));
        assert_eq!(index.innermost_at([0.0, 0.0]), Some(NodeId(1)));
        assert_eq!(index.innermost_at([-90.0, 0.0]), Some(NodeId(0)));
        assert_eq!(index.innermost_at([200.0, 0.0]), None);
    }

    #[test]
    fn test_circle_corners_are_not_hits() {
        let index =
            SpatialIndex::from_nodes(std::iter::once(SpatialNode::circle(NodeId(3), [0.0, 0.0], 10.0)));
        assert_eq!(index.innermost_at([9.0, 9.0]), None);
    }

    #[test]
    fn test_rects() {
        let index = SpatialIndex::from_nodes(
            vec![
                SpatialNode::rect(NodeId(1), [0.0, 0.0], [10.0, 10.0]),
                SpatialNode::rect(NodeId(2), [10.0, 0.0], [30.0, 10.0]),
            ]
            .into_iter(),
        );
        assert_eq!(index.innermost_at([5.0, 5.0]), Some(NodeId(1)));
        assert_eq!(index.innermost_at([25.0, 5.0]), Some(NodeId(2)));
    }
}
