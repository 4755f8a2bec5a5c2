//! gitrends graph engine
//!
//! Hierarchies built from "/"-delimited file and module paths, the three
//! layouts drawn over them (enclosure zoom, radial bundle, treemap), and the
//! table and autocomplete models the dashboard views share.
//!
//! This crate contains no API client and no app shell. Views in the root
//! crate fetch records, build a [`PathTree`], and hand it to a widget.

pub mod animation;
pub mod autocomplete;
pub mod buckets;
pub mod colors;
pub mod edges;
pub mod error;
pub mod focus;
pub mod highlight;
pub mod layout;
pub mod spatial;
pub mod table;
pub mod tree;
pub mod widgets;

pub use autocomplete::{AutoComplete, AutoCompleteEvent, AutoCompleteKey, MAX_SUGGESTIONS};
pub use buckets::{commit_spread, histogram, module_breakdown, rank_leaf_tag, BucketedTree, ModuleMetric};
pub use colors::{CategoryColors, CategoryRanking, RankedCategory, OTHERS, TABLEAU10, TABLEAU20};
pub use edges::{CouplingFilter, Edge, EdgeSet};
pub use error::{SortError, TableError, TreeError};
pub use focus::{ZoomClick, ZoomFocus};
pub use highlight::HighlightState;
pub use table::{CellValue, ColumnAccessors, SortDirection, SortOrder, Table, TableColumn};
pub use tree::{NodeId, NodeKind, PathRecord, PathTree, PathTreeBuilder, Payload, SiblingOrder, TreeNode};
pub use widgets::{
    legend_ui, AutoCompleteWidget, BundleWidget, EnclosureWidget, GraphAction, LeafFill, TableAction,
    TableWidget, TreemapColoring, TreemapWidget,
};
