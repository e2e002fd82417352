use crate::error::Result;
use crate::kdtree::index::{Insertion, KDTree};
use crate::kdtree::options::KDTreeOptions;
use crate::r#type::CoordNum;

/// A builder to create a [`KDTree`] of a known dimensionality.
///
/// Points are inserted as they are added, so the resulting shape depends on the order of
/// [`add`][Self::add] calls.
#[derive(Debug)]
pub struct KDTreeBuilder<N: CoordNum> {
    tree: KDTree<N>,
    added: usize,
}

impl<N: CoordNum> KDTreeBuilder<N> {
    /// Create a new builder for points of `dims` coordinates with the default options.
    pub fn new(dims: usize) -> Self {
        Self::new_with_options(dims, KDTreeOptions::default())
    }

    /// Create a new builder for points of `dims` coordinates with the provided options.
    pub fn new_with_options(dims: usize, options: KDTreeOptions) -> Self {
        Self {
            tree: KDTree::with_dims_and_options(dims, options),
            added: 0,
        }
    }

    /// Add a point to the index.
    pub fn add(&mut self, coords: &[N]) -> Result<Insertion> {
        let insertion = self.tree.insert(coords)?;
        self.added += 1;
        Ok(insertion)
    }

    /// Consume this builder, returning the tree ready for queries.
    pub fn finish(self) -> KDTree<N> {
        log::debug!(
            "built KDTree from {} points, {} discarded as duplicates",
            self.added,
            self.added - self.tree.len()
        );
        self.tree
    }
}
