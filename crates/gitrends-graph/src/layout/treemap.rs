//! Binary treemap
//!
//! Each node's rectangle is split recursively: children (already sorted) are
//! divided at the value midpoint into two groups, laid side by side along the
//! longer axis. Padding insets every node, and coordinates are rounded
//! to whole units at the end.

use tracing::debug;

use crate::tree::{NodeId, PathTree};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Bounds {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn contains(&self, other: &Bounds) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreemapOptions {
    pub width: f64,
    pub height: f64,
    /// Gap between siblings and inset from the parent's edge
    pub padding: f64,
    /// Extra top inset on internal nodes below the root, room for a header
    pub header: f64,
    pub round: bool,
}

impl TreemapOptions {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
            header: 0.0,
            round: true,
        }
    }

    pub fn with_header(mut self, header: f64) -> Self {
        self.header = header;
        self
    }
}

/// Rectangle per node, indexed by `NodeId::index()`
#[derive(Debug, Clone, Default)]
pub struct TreemapLayout {
    rects: Vec<Bounds>,
}

impl TreemapLayout {
    pub fn rect(&self, id: NodeId) -> Bounds {
        self.rects.get(id.index()).copied().unwrap_or_default()
    }
}

/// Lay out a tree whose values are aggregated and siblings sorted
pub fn treemap(tree: &PathTree, options: &TreemapOptions) -> TreemapLayout {
    let n = tree.len();
    let mut rects = vec![Bounds::default(); n];
    let mut inset = vec![0.0f64; n];

    let root = tree.root();
    rects[root.index()] = Bounds::new(0.0, 0.0, options.width, options.height);

    for id in tree.pre_order() {
        let p = inset[id.index()];
        let outer = rects[id.index()];
        let placed = shrink(outer, p, p, p, p);
        rects[id.index()] = placed;

        let children = tree.children(id);
        if children.is_empty() {
            continue;
        }

        let half = options.padding / 2.0;
        for child in children {
            inset[child.index()] = half;
        }
        let top = if id == root { 0.0 } else { options.header };
        let inner = shrink(
            placed,
            options.padding - half + top,
            options.padding - half,
            options.padding - half,
            options.padding - half,
        );

        let values: Vec<f64> = children.iter().map(|c| tree.node(*c).value).collect();
        let mut slots = vec![Bounds::default(); children.len()];
        binary_partition(&values, inner, &mut slots);
        for (child, slot) in children.iter().zip(slots) {
            rects[child.index()] = slot;
        }
    }

    if options.round {
        for r in &mut rects {
            *r = Bounds::new(r.x0.round(), r.y0.round(), r.x1.round(), r.y1.round());
        }
    }

    debug!(nodes = n, width = options.width, height = options.height, "treemap computed");
    TreemapLayout { rects }
}

/// Inset a rectangle, collapsing to its center line when it would invert
fn shrink(b: Bounds, top: f64, right: f64, bottom: f64, left: f64) -> Bounds {
    let (mut x0, mut y0, mut x1, mut y1) = (b.x0 + left, b.y0 + top, b.x1 - right, b.y1 - bottom);
    if x1 < x0 {
        x0 = (x0 + x1) / 2.0;
        x1 = x0;
    }
    if y1 < y0 {
        y0 = (y0 + y1) / 2.0;
        y1 = y0;
    }
    Bounds::new(x0, y0, x1, y1)
}

/// Split `area` among `values` in order, writing one rectangle per value
pub fn binary_partition(values: &[f64], area: Bounds, out: &mut [Bounds]) {
    if values.is_empty() {
        return;
    }
    let mut sums = Vec::with_capacity(values.len() + 1);
    sums.push(0.0);
    let mut total = 0.0;
    for v in values {
        total += v;
        sums.push(total);
    }
    partition(&sums, 0, values.len(), total, area, out);
}

fn partition(sums: &[f64], i: usize, j: usize, value: f64, area: Bounds, out: &mut [Bounds]) {
    if i + 1 >= j {
        out[i] = area;
        return;
    }

    let offset = sums[i];
    let target = value / 2.0 + offset;
    let mut k = i + 1;
    let mut hi = j - 1;
    while k < hi {
        let mid = (k + hi) / 2;
        if sums[mid] < target {
            k = mid + 1;
        } else {
            hi = mid;
        }
    }
    if target - sums[k - 1] < sums[k] - target && i + 1 < k {
        k -= 1;
    }

    let left = sums[k] - offset;
    let right = value - left;
    let Bounds { x0, y0, x1, y1 } = area;

    if x1 - x0 > y1 - y0 {
        let xk = if value > 0.0 {
            (x0 * right + x1 * left) / value
        } else {
            x1
        };
        partition(sums, i, k, left, Bounds::new(x0, y0, xk, y1), out);
        partition(sums, k, j, right, Bounds::new(xk, y0, x1, y1), out);
    } else {
        let yk = if value > 0.0 {
            (y0 * right + y1 * left) / value
        } else {
            y1
        };
        partition(sums, i, k, left, Bounds::new(x0, y0, x1, yk), out);
        partition(sums, k, j, right, Bounds::new(x0, yk, x1, y1), out);
    }
}

// =============================================================================
// LABELS
// =============================================================================

/// Label lines for a leaf: the last path segment split on camel-case
/// boundaries and whitespace, then the value
pub fn label_lines(name: &str, value: f64) -> Vec<String> {
    let segment = name.rsplit('/').next().unwrap_or(name);
    let mut lines = split_words(segment);
    lines.push(format_value(value));
    lines
}

/// Split before every uppercase letter followed by a lowercase one, and on
/// runs of whitespace
fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let starts_word = c.is_uppercase()
            && chars.get(i + 1).is_some_and(|next| next.is_lowercase())
            && !current.is_empty();
        if starts_word {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Vertical offset of label line `i` in units of the font height; the value
/// line is pushed down a little further
pub fn label_line_offset(index: usize, is_value_line: bool) -> f32 {
    (if is_value_line { 0.3 } else { 0.0 }) + 1.1 + index as f32 * 0.9
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{PathTreeBuilder, Payload, SiblingOrder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_binary_partition_splits_longer_axis() {
        let mut out = vec![Bounds::default(); 2];
        binary_partition(&[3.0, 1.0], Bounds::new(0.0, 0.0, 100.0, 10.0), &mut out);
        assert_eq!(out[0], Bounds::new(0.0, 0.0, 75.0, 10.0));
        assert_eq!(out[1], Bounds::new(75.0, 0.0, 100.0, 10.0));

        binary_partition(&[1.0, 1.0], Bounds::new(0.0, 0.0, 10.0, 100.0), &mut out);
        assert_eq!(out[0], Bounds::new(0.0, 0.0, 10.0, 50.0));
    }

    #[test]
    fn test_areas_are_proportional_without_padding() {
        let values = [6.0, 3.0, 2.0, 1.0];
        let mut out = vec![Bounds::default(); 4];
        binary_partition(&values, Bounds::new(0.0, 0.0, 120.0, 100.0), &mut out);
        for (v, r) in values.iter().zip(&out) {
            assert!((r.area() - v / 12.0 * 12000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_values_collapse() {
        let mut out = vec![Bounds::default(); 2];
        binary_partition(&[0.0, 0.0], Bounds::new(0.0, 0.0, 10.0, 10.0), &mut out);
        assert_eq!(out[1].area(), 0.0);
    }

    #[test]
    fn test_tree_layout_nests_and_rounds() {
        let mut builder = PathTreeBuilder::new();
        for (path, size) in [("m/a", 30.0), ("m/b", 10.0), ("n/c", 20.0)] {
            builder.insert(path, size, Payload::new()).unwrap();
        }
        let mut tree = builder.build();
        tree.sort_siblings(SiblingOrder::Treemap);

        let options = TreemapOptions::new(600.0, 400.0, 10.0).with_header(12.0);
        let layout = treemap(&tree, &options);

        assert_eq!(layout.rect(tree.root()), Bounds::new(0.0, 0.0, 600.0, 400.0));
        for id in tree.ids() {
            let r = layout.rect(id);
            assert_eq!(r.x0, r.x0.round());
            if let Some(parent) = tree.parent(id) {
                assert!(layout.rect(parent).contains(&r));
            }
        }

        let m = layout.rect(tree.find("m").unwrap());
        let a = layout.rect(tree.find_leaf("m/a").unwrap());
        assert!(a.y0 >= m.y0 + 12.0);
    }

    #[test]
    fn test_label_lines() {
        assert_eq!(
            label_lines("src/components/AutoCompleteInput.tsx", 42.0),
            vec!["Auto", "Complete", "Input.tsx", "42"]
        );
        assert_eq!(label_lines("Jane Doe", 3.0), vec!["Jane", "Doe", "3"]);
        assert_eq!(label_lines("HTTPServer", 1.5), vec!["HTTP", "Server", "1.5"]);
    }

    #[test]
    fn test_value_line_sits_lower() {
        assert!(label_line_offset(1, true) > label_line_offset(1, false));
        assert_eq!(label_line_offset(0, false), 1.1);
    }
}
