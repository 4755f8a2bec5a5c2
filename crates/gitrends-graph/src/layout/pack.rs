//! Circle packing
//!
//! Siblings are packed with a front-chain placement, each parent becomes the
//! minimal enclosing circle of its children, and leaf areas are proportional
//! to their values. Output is in layout coordinates: a square of side `size`
//! with the root circle centered in it.
//!
//! ```text
//!   leaf r = sqrt(value)
//!   pass 1: pack without padding      -> root radius R0
//!   pass 2: pack with padding * R0/size (padding is in output units)
//!   scale:  k = size / (2 * R)
//! ```

use tracing::{debug, warn};

use crate::tree::{NodeId, PathTree};

/// Gap between sibling circles, in output units
pub const PACK_PADDING: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.r * self.r
    }
}

/// Circle per node, indexed by `NodeId::index()`
#[derive(Debug, Clone, Default)]
pub struct PackLayout {
    circles: Vec<Circle>,
    size: f64,
}

impl PackLayout {
    pub fn circle(&self, id: NodeId) -> Circle {
        self.circles.get(id.index()).copied().unwrap_or_default()
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    /// Side of the square the layout was computed for
    pub fn size(&self) -> f64 {
        self.size
    }
}

// =============================================================================
// HIERARCHY PACKING
// =============================================================================

/// Pack a whole tree into a `size` x `size` square
pub fn pack(tree: &PathTree, size: f64, padding: f64) -> PackLayout {
    let mut circles = vec![Circle::default(); tree.len()];
    for id in tree.ids() {
        if tree.children(id).is_empty() {
            circles[id.index()].r = tree.node(id).value.max(0.0).sqrt();
        }
    }

    let post_order = tree.post_order();
    pack_children(tree, &post_order, &mut circles, 0.0);

    let root = tree.root();
    let unpadded = circles[root.index()].r;
    if unpadded > 0.0 && padding > 0.0 {
        pack_children(tree, &post_order, &mut circles, padding * unpadded / size);
    }

    let root_r = circles[root.index()].r;
    let k = if root_r > 0.0 { size / (2.0 * root_r) } else { 0.0 };
    for id in tree.pre_order() {
        let (px, py) = match tree.parent(id) {
            Some(parent) => (circles[parent.index()].x, circles[parent.index()].y),
            None => {
                circles[id.index()].x = 0.0;
                circles[id.index()].y = 0.0;
                (size / 2.0, size / 2.0)
            }
        };
        let c = &mut circles[id.index()];
        c.r *= k;
        c.x = px + k * c.x;
        c.y = py + k * c.y;
    }

    debug!(nodes = tree.len(), size, "circle pack computed");
    PackLayout { circles, size }
}

/// Pack each node's children around its origin, bottom-up
fn pack_children(tree: &PathTree, post_order: &[NodeId], circles: &mut [Circle], pad: f64) {
    for &id in post_order {
        let children = tree.children(id);
        if children.is_empty() {
            continue;
        }
        let mut group: Vec<Circle> = children
            .iter()
            .map(|c| {
                let circle = circles[c.index()];
                Circle::new(circle.x, circle.y, circle.r + pad)
            })
            .collect();
        let enclosing = pack_siblings(&mut group);
        for (child, placed) in children.iter().zip(&group) {
            let c = &mut circles[child.index()];
            c.x = placed.x;
            c.y = placed.y;
            c.r = placed.r - pad;
        }
        circles[id.index()].r = enclosing + pad;
    }
}

// =============================================================================
// SIBLING PACKING
// =============================================================================

/// Place circles tangent to each other around the origin
///
/// Only radii are read. Returns the radius of the enclosing circle, which is
/// centered on the origin after placement.
pub fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    let (b0, a0) = (circles[1], circles[0]);
    place(b0, a0, &mut circles[2]);

    // Front chain as a ring over circle indices
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    let (mut a, mut b) = (0usize, 1usize);
    next[0] = 1;
    prev[2] = 1;
    next[1] = 2;
    prev[0] = 2;
    next[2] = 0;
    prev[1] = 0;

    let mut i = 3;
    'pack: while i < n {
        let (ca, cb) = (circles[a], circles[b]);
        place(ca, cb, &mut circles[i]);
        let c = i;

        // Closest intersecting circle on the front chain, by distance along it
        let mut j = next[b];
        let mut k = prev[a];
        let mut sj = circles[b].r;
        let mut sk = circles[a].r;
        loop {
            if sj <= sk {
                if intersects(&circles[j], &circles[c]) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &circles[c]) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        prev[c] = a;
        next[c] = b;
        next[a] = c;
        prev[b] = c;
        b = c;

        // New closest pair to the centroid
        let mut best = score(circles, &next, a);
        let mut node = next[c];
        while node != b {
            let s = score(circles, &next, node);
            if s < best {
                a = node;
                best = s;
            }
            node = next[node];
        }
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut node = next[b];
    while node != b {
        chain.push(circles[node]);
        node = next[node];
    }

    let Some(enclosing) = enclose(&chain) else {
        return 0.0;
    };
    for circle in circles.iter_mut() {
        circle.x -= enclosing.x;
        circle.y -= enclosing.y;
    }
    enclosing.r
}

/// Put `c` tangent to both `a` and `b`
fn place(b: Circle, a: Circle, c: &mut Circle) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r) * (a.r + c.r);
        let b2 = (b.r + c.r) * (b.r + c.r);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + c.r;
        c.y = a.y;
    }
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Squared distance from the origin to the weighted midpoint of `node` and
/// its successor
fn score(circles: &[Circle], next: &[usize], node: usize) -> f64 {
    let a = circles[node];
    let b = circles[next[node]];
    let ab = a.r + b.r;
    if ab <= 0.0 {
        let (mx, my) = ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        return mx * mx + my * my;
    }
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

// =============================================================================
// MINIMAL ENCLOSING CIRCLE
// =============================================================================

/// Smallest circle enclosing all given circles (Welzl, move-to-front)
pub fn enclose(circles: &[Circle]) -> Option<Circle> {
    let n = circles.len();
    let mut basis: Vec<Circle> = Vec::new();
    let mut enclosing: Option<Circle> = None;
    let mut i = 0;
    let mut restarts = 0usize;
    let max_restarts = 16 + n * n * 4;

    while i < n {
        let p = circles[i];
        match enclosing {
            Some(e) if encloses_weak(&e, &p) => i += 1,
            _ => {
                basis = extend_basis(&basis, p);
                enclosing = Some(enclose_basis(&basis));
                i = 0;
                restarts += 1;
                if restarts > max_restarts {
                    warn!(circles = n, "enclosing circle did not converge");
                    break;
                }
            }
        }
    }
    enclosing
}

fn extend_basis(basis: &[Circle], p: Circle) -> Vec<Circle> {
    if encloses_weak_all(&p, basis) {
        return vec![p];
    }

    for &bi in basis {
        if encloses_not(&p, &bi) && encloses_weak_all(&enclose_basis2(&bi, &p), basis) {
            return vec![bi, p];
        }
    }

    for i in 0..basis.len().saturating_sub(1) {
        for j in (i + 1)..basis.len() {
            let (bi, bj) = (basis[i], basis[j]);
            if encloses_not(&enclose_basis2(&bi, &bj), &p)
                && encloses_not(&enclose_basis2(&bi, &p), &bj)
                && encloses_not(&enclose_basis2(&bj, &p), &bi)
                && encloses_weak_all(&enclose_basis3(&bi, &bj, &p), basis)
            {
                return vec![bi, bj, p];
            }
        }
    }

    // Only reachable through floating point noise
    vec![p]
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(a, b),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => Circle::default(),
    }
}

fn enclose_basis2(a: &Circle, b: &Circle) -> Circle {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = (x21 * x21 + y21 * y21).sqrt();
    if l == 0.0 {
        return Circle::new(a.x, a.y, a.r.max(b.r));
    }
    Circle::new(
        (a.x + b.x + x21 / l * r21) / 2.0,
        (a.y + b.y + y21 / l * r21) / 2.0,
        (l + a.r + b.r) / 2.0,
    )
}

fn enclose_basis3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle::new(x1 + xa + xb * r, y1 + ya + yb * r, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{PathTreeBuilder, Payload, SiblingOrder};
    use proptest::prelude::*;

    const EPS: f64 = 1e-6;

    fn distance(a: &Circle, b: &Circle) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    fn assert_encloses(outer: &Circle, inner: &Circle) {
        assert!(
            distance(outer, inner) + inner.r <= outer.r + 1e-4,
            "{:?} does not enclose {:?}",
            outer,
            inner
        );
    }

    #[test]
    fn test_single_and_pair() {
        let mut one = vec![Circle::new(9.0, 9.0, 3.0)];
        assert_eq!(pack_siblings(&mut one), 3.0);
        assert_eq!((one[0].x, one[0].y), (0.0, 0.0));

        let mut two = vec![Circle::new(0.0, 0.0, 1.0), Circle::new(0.0, 0.0, 1.0)];
        assert_eq!(pack_siblings(&mut two), 2.0);
        assert_eq!(two[0].x, -1.0);
        assert_eq!(two[1].x, 1.0);
    }

    #[test]
    fn test_three_equal_circles_touch() {
        let mut three = vec![Circle::new(0.0, 0.0, 1.0); 3];
        let r = pack_siblings(&mut three);
        for i in 0..3 {
            for j in (i + 1)..3 {
                assert!((distance(&three[i], &three[j]) - 2.0).abs() < EPS);
            }
        }
        // Enclosing radius of three unit circles in a triangle
        assert!((r - (1.0 + 2.0 / 3.0_f64.sqrt())).abs() < 1e-6);
    }

    #[test]
    fn test_enclose_two_circles() {
        let e = enclose(&[Circle::new(-2.0, 0.0, 1.0), Circle::new(2.0, 0.0, 1.0)]).unwrap();
        assert!((e.x).abs() < EPS);
        assert!((e.r - 3.0).abs() < EPS);
        assert!(enclose(&[]).is_none());
    }

    #[test]
    fn test_tree_pack_nests_children() {
        let mut builder = PathTreeBuilder::new();
        for (path, size) in [
            ("src/a.ts", 10.0),
            ("src/b.ts", 20.0),
            ("src/util/c.ts", 4.0),
            ("lib/d.ts", 5.0),
        ] {
            builder.insert(path, size, Payload::new()).unwrap();
        }
        let mut tree = builder.build();
        tree.sort_siblings(SiblingOrder::Enclosure);
        let layout = pack(&tree, 900.0, PACK_PADDING);

        let root = layout.circle(tree.root());
        assert!((root.x - 450.0).abs() < EPS);
        assert!((root.y - 450.0).abs() < EPS);
        assert!((root.r - 450.0).abs() < 1e-6);

        for id in tree.ids() {
            if let Some(parent) = tree.parent(id) {
                assert_encloses(&layout.circle(parent), &layout.circle(id));
            }
        }

        // Leaf areas scale with value
        let a = layout.circle(tree.find_leaf("src/a.ts").unwrap());
        let b = layout.circle(tree.find_leaf("src/b.ts").unwrap());
        assert!(((b.r * b.r) / (a.r * a.r) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_tree_packs_to_center() {
        let tree = PathTreeBuilder::new().build();
        let layout = pack(&tree, 100.0, PACK_PADDING);
        assert_eq!(layout.circle(tree.root()), Circle::new(50.0, 50.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_siblings_do_not_overlap(radii in prop::collection::vec(0.5f64..20.0, 1..40)) {
            let mut circles: Vec<Circle> = radii.iter().map(|r| Circle::new(0.0, 0.0, *r)).collect();
            let enclosing_r = pack_siblings(&mut circles);
            let enclosing = Circle::new(0.0, 0.0, enclosing_r);

            for i in 0..circles.len() {
                prop_assert!(distance(&enclosing, &circles[i]) + circles[i].r <= enclosing_r + 1e-4);
                for j in (i + 1)..circles.len() {
                    prop_assert!(distance(&circles[i], &circles[j]) >= circles[i].r + circles[j].r - 1e-4);
                }
            }
        }
    }
}
