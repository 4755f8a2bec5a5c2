//! Radial cluster layout
//!
//! Leaves are spread evenly over the angle range in depth-first order, with
//! one unit between siblings and two between cousins. Internal nodes sit at
//! the mean angle of their children, at a radius set by their height: the
//! root at the center, leaves on the outer circle.

use std::f64::consts::PI;

use tracing::debug;

use crate::tree::{NodeId, PathTree};

/// Position of a node in polar coordinates
///
/// `angle` is measured clockwise from 12 o'clock, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarPoint {
    pub angle: f64,
    pub radius: f64,
}

impl PolarPoint {
    /// Cartesian offset from the center, y pointing down
    pub fn to_cartesian(self) -> (f64, f64) {
        (self.radius * self.angle.sin(), -self.radius * self.angle.cos())
    }

    /// Labels on the left half are flipped so they read left to right
    pub fn is_left_half(self) -> bool {
        self.angle >= PI
    }
}

/// Polar position per node, indexed by `NodeId::index()`
#[derive(Debug, Clone, Default)]
pub struct ClusterLayout {
    points: Vec<PolarPoint>,
    radius: f64,
}

impl ClusterLayout {
    pub fn point(&self, id: NodeId) -> PolarPoint {
        self.points.get(id.index()).copied().unwrap_or_default()
    }

    /// Radius of the leaf circle
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// Lay out the tree over a full turn with leaves at `radius`
pub fn cluster(tree: &PathTree, radius: f64) -> ClusterLayout {
    cluster_with_extent(tree, 2.0 * PI, radius)
}

pub fn cluster_with_extent(tree: &PathTree, angle_extent: f64, radius: f64) -> ClusterLayout {
    let n = tree.len();
    let mut x = vec![0.0f64; n];
    let mut y = vec![0.0f64; n];

    let separation = |a: NodeId, b: NodeId| -> f64 {
        if tree.parent(a) == tree.parent(b) {
            1.0
        } else {
            2.0
        }
    };

    let mut previous: Option<NodeId> = None;
    let mut first: Option<NodeId> = None;
    for id in tree.post_order() {
        let children = tree.children(id);
        if children.is_empty() {
            x[id.index()] = match previous {
                Some(prev) => x[prev.index()] + separation(id, prev),
                None => 0.0,
            };
            y[id.index()] = 0.0;
            first.get_or_insert(id);
            previous = Some(id);
        } else {
            x[id.index()] =
                children.iter().map(|c| x[c.index()]).sum::<f64>() / children.len() as f64;
            y[id.index()] = 1.0
                + children
                    .iter()
                    .map(|c| y[c.index()])
                    .fold(0.0f64, f64::max);
        }
    }

    let root = tree.root();
    let (Some(left), Some(right)) = (first, previous) else {
        return ClusterLayout {
            points: vec![PolarPoint::default(); n],
            radius,
        };
    };
    let x0 = x[left.index()] - separation(left, right) / 2.0;
    let x1 = x[right.index()] + separation(right, left) / 2.0;
    let root_y = y[root.index()];

    let points = (0..n)
        .map(|i| {
            let angle = (x[i] - x0) / (x1 - x0) * angle_extent;
            let depth_ratio = if root_y > 0.0 { y[i] / root_y } else { 1.0 };
            PolarPoint {
                angle,
                radius: (1.0 - depth_ratio) * radius,
            }
        })
        .collect();

    debug!(nodes = n, radius, "radial cluster computed");
    ClusterLayout { points, radius }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{PathTreeBuilder, Payload, SiblingOrder};

    const EPS: f64 = 1e-9;

    fn tree(paths: &[&str]) -> PathTree {
        let mut builder = PathTreeBuilder::new();
        for path in paths {
            builder.insert(path, 1.0, Payload::new()).unwrap();
        }
        let mut tree = builder.build();
        tree.sort_siblings(SiblingOrder::Radial);
        tree
    }

    #[test]
    fn test_root_at_center_leaves_on_circle() {
        let tree = tree(&["src/a.ts", "src/b.ts", "lib/c.ts"]);
        let layout = cluster(&tree, 100.0);

        assert_eq!(layout.point(tree.root()).radius, 0.0);
        for leaf in tree.leaves() {
            assert!((layout.point(leaf).radius - 100.0).abs() < EPS);
        }
        let src = tree.find("src").unwrap();
        assert!((layout.point(src).radius - 50.0).abs() < EPS);
    }

    #[test]
    fn test_cousins_are_further_apart_than_siblings() {
        // Sorted: lib/c.ts, src/a.ts, src/b.ts -> x = 0, 2, 3 over [-1, 4]
        let tree = tree(&["src/a.ts", "src/b.ts", "lib/c.ts"]);
        let layout = cluster(&tree, 100.0);
        let angle = |p: &str| layout.point(tree.find_leaf(p).unwrap()).angle;

        let unit = 2.0 * PI / 5.0;
        assert!((angle("lib/c.ts") - unit).abs() < EPS);
        assert!((angle("src/a.ts") - 3.0 * unit).abs() < EPS);
        assert!((angle("src/b.ts") - 4.0 * unit).abs() < EPS);
    }

    #[test]
    fn test_parent_sits_at_mean_child_angle() {
        let tree = tree(&["src/a.ts", "src/b.ts", "lib/c.ts"]);
        let layout = cluster(&tree, 100.0);
        let src = layout.point(tree.find("src").unwrap()).angle;
        let a = layout.point(tree.find_leaf("src/a.ts").unwrap()).angle;
        let b = layout.point(tree.find_leaf("src/b.ts").unwrap()).angle;
        assert!((src - (a + b) / 2.0).abs() < EPS);
    }

    #[test]
    fn test_to_cartesian_starts_at_twelve_oclock() {
        let (x, y) = PolarPoint {
            angle: 0.0,
            radius: 10.0,
        }
        .to_cartesian();
        assert!(x.abs() < EPS);
        assert!((y + 10.0).abs() < EPS);
    }

    #[test]
    fn test_empty_tree() {
        let tree = PathTreeBuilder::new().build();
        let layout = cluster(&tree, 10.0);
        assert_eq!(layout.point(tree.root()).radius, 0.0);
    }
}
