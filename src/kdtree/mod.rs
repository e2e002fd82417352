//! An implementation of an unbalanced, k-dimensional binary search tree.

#![warn(missing_docs)]

mod builder;
mod index;
mod node;
mod options;
mod r#trait;
mod traversal;

pub use builder::KDTreeBuilder;
pub use index::{Insertion, KDTree};
pub use node::Node;
pub use options::{DuplicatePolicy, KDTreeOptions, PruneBound};
pub use r#trait::{nearest_neighbor, range_search, KDTreeIndex};
pub use traversal::{Iter, RangeIter, Subtree};
