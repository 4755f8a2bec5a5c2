//! Bundled edge curves
//!
//! An edge between two leaves follows the tree: source, its ancestors up to
//! the lowest common ancestor, then down to the target. The control points
//! are pulled toward the straight source-target line by `1 - beta` and then
//! smoothed with a uniform cubic B-spline, so edges sharing ancestors bundle
//! together.

use crate::tree::{NodeId, PathTree};

use super::cluster::ClusterLayout;

/// Bundle tension used by the radial view
pub const BUNDLE_BETA: f64 = 0.85;

/// Samples per cubic segment when flattening
const SEGMENT_SAMPLES: usize = 8;

/// Flattened curve for the edge `source -> target`, relative to the layout
/// center; empty for self edges
pub fn edge_curve(
    tree: &PathTree,
    layout: &ClusterLayout,
    source: NodeId,
    target: NodeId,
    beta: f64,
) -> Vec<[f64; 2]> {
    if source == target {
        return Vec::new();
    }
    let controls: Vec<[f64; 2]> = tree
        .path_between(source, target)
        .into_iter()
        .map(|id| {
            let (x, y) = layout.point(id).to_cartesian();
            [x, y]
        })
        .collect();
    bundle_curve(&controls, beta)
}

/// Straighten control points by `beta`, then flatten the B-spline through them
pub fn bundle_curve(points: &[[f64; 2]], beta: f64) -> Vec<[f64; 2]> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let j = (n - 1) as f64;
    let [x0, y0] = points[0];
    let [xn, yn] = points[n - 1];
    let (dx, dy) = (xn - x0, yn - y0);

    let straightened: Vec<[f64; 2]> = points
        .iter()
        .enumerate()
        .map(|(i, [x, y])| {
            let t = i as f64 / j;
            [
                beta * x + (1.0 - beta) * (x0 + t * dx),
                beta * y + (1.0 - beta) * (y0 + t * dy),
            ]
        })
        .collect();
    basis_spline(&straightened)
}

/// Uniform cubic B-spline clamped to the first and last point
///
/// Two points give a straight line; each further point adds one cubic
/// segment.
pub fn basis_spline(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    match points.len() {
        0 => return Vec::new(),
        1 => return vec![points[0]],
        2 => return vec![points[0], points[1]],
        _ => {}
    }

    let mut out = vec![points[0]];
    let (mut p0, mut p1) = (points[0], points[1]);

    // Third point: a short line to the first knot before the first cubic
    let knot = [(5.0 * p0[0] + p1[0]) / 6.0, (5.0 * p0[1] + p1[1]) / 6.0];
    out.push(knot);

    let mut cursor = knot;
    for &p in &points[2..] {
        cursor = push_segment(&mut out, cursor, p0, p1, p);
        p0 = p1;
        p1 = p;
    }

    // Close with the last point repeated, then a line to it
    push_segment(&mut out, cursor, p0, p1, p1);
    out.push(p1);
    out
}

/// Append the cubic for control window (p0, p1, p) starting at `from`;
/// returns the segment's end point
fn push_segment(
    out: &mut Vec<[f64; 2]>,
    from: [f64; 2],
    p0: [f64; 2],
    p1: [f64; 2],
    p: [f64; 2],
) -> [f64; 2] {
    let c1 = [(2.0 * p0[0] + p1[0]) / 3.0, (2.0 * p0[1] + p1[1]) / 3.0];
    let c2 = [(p0[0] + 2.0 * p1[0]) / 3.0, (p0[1] + 2.0 * p1[1]) / 3.0];
    let end = [
        (p0[0] + 4.0 * p1[0] + p[0]) / 6.0,
        (p0[1] + 4.0 * p1[1] + p[1]) / 6.0,
    ];
    for step in 1..=SEGMENT_SAMPLES {
        let t = step as f64 / SEGMENT_SAMPLES as f64;
        out.push(cubic(from, c1, c2, end, t));
    }
    end
}

fn cubic(p0: [f64; 2], p1: [f64; 2], p2: [f64; 2], p3: [f64; 2], t: f64) -> [f64; 2] {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    [
        a * p0[0] + b * p1[0] + c * p2[0] + d * p3[0],
        a * p0[1] + b * p1[1] + c * p2[1] + d * p3[1],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cluster::cluster;
    use crate::tree::{PathTreeBuilder, Payload, SiblingOrder};

    const EPS: f64 = 1e-9;

    fn close(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < EPS && (a[1] - b[1]).abs() < EPS
    }

    #[test]
    fn test_curve_starts_and_ends_on_endpoints() {
        let points = [[0.0, 0.0], [5.0, 5.0], [10.0, 0.0]];
        let curve = bundle_curve(&points, BUNDLE_BETA);
        assert!(close(curve[0], [0.0, 0.0]));
        assert!(close(*curve.last().unwrap(), [10.0, 0.0]));
    }

    #[test]
    fn test_beta_zero_is_straight() {
        let points = [[0.0, 0.0], [5.0, 50.0], [10.0, 0.0]];
        let curve = bundle_curve(&points, 0.0);
        assert!(curve.iter().all(|p| p[1].abs() < EPS));
    }

    #[test]
    fn test_bundled_curve_bends_toward_ancestor() {
        let points = [[0.0, 0.0], [5.0, 10.0], [10.0, 0.0]];
        let curve = bundle_curve(&points, BUNDLE_BETA);
        let peak = curve.iter().map(|p| p[1]).fold(f64::MIN, f64::max);
        assert!(peak > 1.0 && peak < 10.0);
    }

    #[test]
    fn test_edge_curve_for_siblings() {
        let mut builder = PathTreeBuilder::new();
        builder.insert("src/a.ts", 1.0, Payload::new()).unwrap();
        builder.insert("src/b.ts", 1.0, Payload::new()).unwrap();
        let mut tree = builder.build();
        tree.sort_siblings(SiblingOrder::Radial);
        let layout = cluster(&tree, 100.0);

        let a = tree.find_leaf("src/a.ts").unwrap();
        let b = tree.find_leaf("src/b.ts").unwrap();
        let curve = edge_curve(&tree, &layout, a, b, BUNDLE_BETA);
        let (ax, ay) = layout.point(a).to_cartesian();
        assert!(close(curve[0], [ax, ay]));
        assert!(edge_curve(&tree, &layout, a, a, BUNDLE_BETA).is_empty());
    }
}
