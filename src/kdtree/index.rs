use std::cmp::Ordering;
use std::fmt;

use crate::error::{KdIndexError, Result};
use crate::kdtree::node::{release_post_order, Node};
use crate::kdtree::options::KDTreeOptions;
use crate::r#type::CoordNum;

/// The outcome of inserting a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The point was stored in a new node.
    Inserted,
    /// The point tied an existing node and was dropped without being stored.
    Discarded,
}

impl Insertion {
    /// Returns `true` if the point was stored.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// An owned, unbalanced k-d tree over integer points.
///
/// The dimensionality `k` is either fixed up front with [`KDTree::with_dims`] or taken from the
/// first inserted point. Every later point must have exactly `k` coordinates.
///
/// The splitting axis of a node at depth `d` is `d % k`. Points that compare lower than a node on
/// its axis live in its left subtree, all others in its right subtree. There is no rebalancing, so
/// the shape of the tree is fully determined by insertion order.
pub struct KDTree<N: CoordNum> {
    pub(crate) root: Option<Box<Node<N>>>,
    pub(crate) size: usize,
    pub(crate) dims: Option<usize>,
    pub(crate) options: KDTreeOptions,
}

impl<N: CoordNum> KDTree<N> {
    /// Create an empty tree whose dimensionality is set by the first insertion.
    pub fn new() -> Self {
        Self::with_options(KDTreeOptions::default())
    }

    /// Create an empty tree with the given options.
    pub fn with_options(options: KDTreeOptions) -> Self {
        Self {
            root: None,
            size: 0,
            dims: None,
            options,
        }
    }

    /// Create an empty tree holding points of exactly `dims` coordinates.
    pub fn with_dims(dims: usize) -> Self {
        Self::with_dims_and_options(dims, KDTreeOptions::default())
    }

    /// Create an empty tree holding points of exactly `dims` coordinates, with the given options.
    pub fn with_dims_and_options(dims: usize, options: KDTreeOptions) -> Self {
        assert!(dims > 0, "A KDTree needs at least one dimension.");
        Self {
            root: None,
            size: 0,
            dims: Some(dims),
            options,
        }
    }

    /// The number of points stored in this tree.
    ///
    /// Discarded duplicates are not counted.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no point has been stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of coordinates per point, if known yet.
    #[inline]
    pub fn dims(&self) -> Option<usize> {
        self.dims
    }

    /// The options this tree was created with.
    #[inline]
    pub fn options(&self) -> &KDTreeOptions {
        &self.options
    }

    /// The number of levels in the tree. An empty tree has height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node<N>, usize)> = Vec::new();
        stack.extend(self.root.as_deref().map(|node| (node, 1)));
        while let Some((node, level)) = stack.pop() {
            height = height.max(level);
            stack.extend(node.left().map(|n| (n, level + 1)));
            stack.extend(node.right().map(|n| (n, level + 1)));
        }
        height
    }

    /// Insert a point.
    ///
    /// Walks down from the root comparing the point against each node on that node's splitting
    /// axis. Lower values descend left, higher values descend right. A tie is resolved by the
    /// tree's [`DuplicatePolicy`][crate::kdtree::DuplicatePolicy]: under the default policy the
    /// point is discarded as soon as it ties any node on the axis being compared.
    ///
    /// Returns an error if the point is empty or its length differs from the tree's dimensions.
    pub fn insert(&mut self, coords: &[N]) -> Result<Insertion> {
        let dims = self.resolve_dims(coords.len())?;
        let duplicates = self.options.duplicates;

        let mut depth = 0;
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            let axis = depth % dims;
            slot = match coords[axis].cmp(&node.point[axis]) {
                Ordering::Less => &mut node.left,
                Ordering::Equal if duplicates.discards(coords, node.point.coords()) => {
                    log::debug!(
                        "discarding {:?}: ties {:?} on axis {}",
                        coords,
                        node.point.coords(),
                        axis
                    );
                    return Ok(Insertion::Discarded);
                }
                Ordering::Equal | Ordering::Greater => &mut node.right,
            };
            depth += 1;
        }

        *slot = Some(Box::new(Node::new(coords)));
        self.size += 1;
        Ok(Insertion::Inserted)
    }

    /// Check `len` against the tree's dimensions, adopting it if none are set yet.
    fn resolve_dims(&mut self, len: usize) -> Result<usize> {
        if len == 0 {
            return Err(KdIndexError::EmptyPoint);
        }
        match self.dims {
            Some(dims) if dims != len => Err(KdIndexError::DimensionMismatch {
                expected: dims,
                actual: len,
            }),
            Some(dims) => Ok(dims),
            None => {
                self.dims = Some(len);
                Ok(len)
            }
        }
    }
}

impl<N: CoordNum> Default for KDTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: CoordNum> fmt::Debug for KDTree<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KDTree")
            .field("size", &self.size)
            .field("dims", &self.dims)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// Dropping a `Box<Node>` recurses once per level, which overflows the stack on degenerate trees
// built from sorted input.
impl<N: CoordNum> Drop for KDTree<N> {
    fn drop(&mut self) {
        release_post_order(self.root.take(), drop);
    }
}

#[cfg(feature = "rayon")]
impl<N: CoordNum> KDTree<N> {
    /// Answer a batch of nearest-neighbor queries in parallel.
    ///
    /// Results are returned in the order of `targets`.
    pub fn par_nearest<'a, T>(
        &'a self,
        targets: &[T],
    ) -> Result<Vec<Option<&'a crate::Point<N>>>>
    where
        T: AsRef<[N]> + Sync,
    {
        use crate::kdtree::KDTreeIndex;
        use rayon::prelude::*;

        targets
            .par_iter()
            .map(|target| self.nearest(target.as_ref()))
            .collect()
    }
}
