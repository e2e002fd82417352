//! Utilities to traverse the KDTree structure.

use tinyvec::TinyVec;

use crate::kdtree::node::Node;
use crate::kdtree::options::KDTreeOptions;
use crate::point::Point;
use crate::r#type::CoordNum;

/// A view onto one node of a KDTree and everything below it.
///
/// A subtree knows its depth, so it can be searched on its own with the methods of
/// [`KDTreeIndex`][crate::kdtree::KDTreeIndex].
#[derive(Debug, Clone, Copy)]
pub struct Subtree<'a, N: CoordNum> {
    node: &'a Node<N>,

    /// The distance from the root of the tree. The root has depth 0.
    depth: usize,

    dims: usize,
    options: KDTreeOptions,
}

impl<'a, N: CoordNum> Subtree<'a, N> {
    pub(crate) fn new(
        node: &'a Node<N>,
        depth: usize,
        dims: usize,
        options: KDTreeOptions,
    ) -> Self {
        Self {
            node,
            depth,
            dims,
            options,
        }
    }

    /// The node at the top of this subtree.
    #[inline]
    pub fn node(&self) -> &'a Node<N> {
        self.node
    }

    /// The point stored at the top of this subtree.
    #[inline]
    pub fn point(&self) -> &'a Point<N> {
        &self.node.point
    }

    /// The depth of this subtree's node within the tree.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The axis this node splits its children over.
    #[inline]
    pub fn axis(&self) -> usize {
        self.depth % self.dims
    }

    #[inline]
    pub(crate) fn num_dims(&self) -> usize {
        self.dims
    }

    #[inline]
    pub(crate) fn tree_options(&self) -> &KDTreeOptions {
        &self.options
    }

    /// The subtree of points lower than this node on [`axis`][Self::axis].
    pub fn left_child(&self) -> Option<Subtree<'a, N>> {
        self.node
            .left()
            .map(|node| Self::new(node, self.depth + 1, self.dims, self.options))
    }

    /// The subtree of points at or above this node on [`axis`][Self::axis].
    pub fn right_child(&self) -> Option<Subtree<'a, N>> {
        self.node
            .right()
            .map(|node| Self::new(node, self.depth + 1, self.dims, self.options))
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }
}

/// An iterator over stored points in right subtree, node, left subtree order.
///
/// Pending nodes are kept on an explicit stack, so iteration does not recurse.
#[derive(Debug)]
pub struct Iter<'a, N: CoordNum> {
    // Use TinyVec to avoid heap allocations for trees up to 32 levels deep along a right spine
    stack: TinyVec<[Option<&'a Node<N>>; 32]>,
}

impl<'a, N: CoordNum> Iter<'a, N> {
    pub(crate) fn new(root: Option<&'a Node<N>>) -> Self {
        let mut iter = Self {
            stack: TinyVec::new(),
        };
        iter.push_right_spine(root);
        iter
    }

    fn push_right_spine(&mut self, mut node: Option<&'a Node<N>>) {
        while let Some(n) = node {
            self.stack.push(Some(n));
            node = n.right();
        }
    }
}

impl<'a, N: CoordNum> Iterator for Iter<'a, N> {
    type Item = &'a Point<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop().flatten()?;
        // everything on the right of `node` has already been yielded
        self.push_right_spine(node.left());
        Some(&node.point)
    }
}

/// A lazy range search. See [`KDTreeIndex::range_iter`][crate::kdtree::KDTreeIndex::range_iter].
#[derive(Debug)]
pub struct RangeIter<'a, N: CoordNum> {
    iter: Iter<'a, N>,
    lower: Point<N>,
    upper: Point<N>,
}

impl<'a, N: CoordNum> RangeIter<'a, N> {
    pub(crate) fn new(root: Option<&'a Node<N>>, lower: &[N], upper: &[N]) -> Self {
        Self {
            iter: Iter::new(root),
            lower: Point::new(lower),
            upper: Point::new(upper),
        }
    }
}

impl<'a, N: CoordNum> Iterator for RangeIter<'a, N> {
    type Item = &'a Point<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let (lower, upper) = (&self.lower, &self.upper);
        self.iter.find(|point| point.within(lower, upper))
    }
}
