//! Layout engine: converts the tree plus viewport into node positions.
//!
//! Layout is a pure function of `(tree, viewport, params)`; the growth
//! animation relies on that to tell new edges from moved ones.

mod engine;
mod edges;

pub use engine::{compute_layout, BranchPosition, Layout, LayoutParams, LeafPosition};
pub use edges::{new_edges, ColorClass, Edge, EdgeKey, NewEdge};
