//! Layout algorithms
//!
//! Pure geometry over a [`crate::PathTree`]; no egui types. Each layout
//! returns positions indexed by `NodeId::index()` in its own coordinate
//! space, and the widgets map those to screen space.

pub mod bundle;
pub mod cluster;
pub mod pack;
pub mod treemap;

pub use bundle::{bundle_curve, edge_curve, BUNDLE_BETA};
pub use cluster::{cluster, ClusterLayout, PolarPoint};
pub use pack::{pack, pack_siblings, Circle, PackLayout, PACK_PADDING};
pub use treemap::{label_lines, treemap, Bounds, TreemapLayout, TreemapOptions};
