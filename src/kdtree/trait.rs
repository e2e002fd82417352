use crate::error::{KdIndexError, Result};
use crate::kdtree::node::Node;
use crate::kdtree::options::{KDTreeOptions, PruneBound};
use crate::kdtree::traversal::{Iter, RangeIter, Subtree};
use crate::kdtree::KDTree;
use crate::point::{squared_distance, Point};
use crate::r#type::CoordNum;

/// A trait for searching a KDTree, or any subtree of one.
pub trait KDTreeIndex<N: CoordNum>: Sized {
    /// The node searches start from, or `None` if there are no points.
    fn root_node(&self) -> Option<&Node<N>>;

    /// The depth of [`root_node`][Self::root_node] within its tree. This is `0` for a whole tree.
    fn root_depth(&self) -> usize;

    /// The number of coordinates per point, if known yet.
    fn dims(&self) -> Option<usize>;

    /// Access the options of the underlying tree.
    fn options(&self) -> &KDTreeOptions;

    /// Check that a query point has the dimensionality of this index.
    fn check_query(&self, len: usize) -> Result<()> {
        if len == 0 {
            return Err(KdIndexError::EmptyPoint);
        }
        match self.dims() {
            Some(dims) if dims != len => Err(KdIndexError::DimensionMismatch {
                expected: dims,
                actual: len,
            }),
            _ => Ok(()),
        }
    }

    /// Find the stored point closest to `target` by Euclidean distance.
    ///
    /// Returns `Ok(None)` if the index is empty. The returned point borrows from the tree.
    fn nearest(&self, target: &[N]) -> Result<Option<&Point<N>>> {
        Ok(self.nearest_with_visits(target)?.0)
    }

    /// Find the stored point closest to `target`, along with the number of nodes the search
    /// entered.
    fn nearest_with_visits(&self, target: &[N]) -> Result<(Option<&Point<N>>, usize)> {
        self.check_query(target.len())?;
        let Some(dims) = self.dims() else {
            return Ok((None, 0));
        };

        let mut visited = 0;
        let best = search_nearest(
            self.root_node(),
            target,
            dims,
            self.root_depth(),
            self.options().prune,
            &mut visited,
        );
        log::trace!(
            "nearest to {:?}: {:?} after visiting {} nodes",
            target,
            best.map(|node| node.point.coords()),
            visited
        );
        Ok((best.map(Node::point), visited))
    }

    /// Search the index for points within an axis-aligned box.
    ///
    /// - lower: inclusive lower bound on each axis
    /// - upper: inclusive upper bound on each axis
    ///
    /// Every node is visited. Results come in traversal order: right subtree, then the node
    /// itself, then left subtree. This is not sorted on any axis.
    fn range(&self, lower: &[N], upper: &[N]) -> Result<Vec<&Point<N>>> {
        self.check_query(lower.len())?;
        self.check_query(upper.len())?;

        let mut result = vec![];
        range_search(self.root_node(), lower, upper, &mut result);
        Ok(result)
    }

    /// Lazily search the index for points within an axis-aligned box.
    ///
    /// Yields the same points in the same order as [`range`][Self::range], without recursion.
    fn range_iter(&self, lower: &[N], upper: &[N]) -> Result<RangeIter<'_, N>> {
        self.check_query(lower.len())?;
        self.check_query(upper.len())?;
        Ok(RangeIter::new(self.root_node(), lower, upper))
    }

    /// Iterate over every stored point in traversal order.
    fn iter(&self) -> Iter<'_, N> {
        Iter::new(self.root_node())
    }

    /// Access the root node for manual traversal.
    fn root(&self) -> Option<Subtree<'_, N>> {
        let dims = self.dims()?;
        let node = self.root_node()?;
        Some(Subtree::new(node, self.root_depth(), dims, *self.options()))
    }
}

impl<N: CoordNum> KDTreeIndex<N> for KDTree<N> {
    fn root_node(&self) -> Option<&Node<N>> {
        self.root.as_deref()
    }

    fn root_depth(&self) -> usize {
        0
    }

    fn dims(&self) -> Option<usize> {
        self.dims
    }

    fn options(&self) -> &KDTreeOptions {
        &self.options
    }
}

impl<N: CoordNum> KDTreeIndex<N> for Subtree<'_, N> {
    fn root_node(&self) -> Option<&Node<N>> {
        Some(self.node())
    }

    fn root_depth(&self) -> usize {
        self.depth()
    }

    fn dims(&self) -> Option<usize> {
        Some(self.num_dims())
    }

    fn options(&self) -> &KDTreeOptions {
        self.tree_options()
    }
}

/// Branch-and-bound nearest-neighbor search below `node`, which sits at `depth`.
///
/// Descends first into the child on the target's side of the splitting value, then visits the
/// other child unless `bound` proves it cannot hold a closer point.
///
/// Returns an error if `dims` is zero or `target` or `node` do not have `dims` coordinates.
pub fn nearest_neighbor<'a, N: CoordNum>(
    node: Option<&'a Node<N>>,
    target: &[N],
    dims: usize,
    depth: usize,
    bound: PruneBound,
) -> Result<Option<&'a Node<N>>> {
    if dims == 0 || target.is_empty() {
        return Err(KdIndexError::EmptyPoint);
    }
    for len in std::iter::once(target.len()).chain(node.map(|node| node.point.dims())) {
        if len != dims {
            return Err(KdIndexError::DimensionMismatch {
                expected: dims,
                actual: len,
            });
        }
    }

    let mut visited = 0;
    Ok(search_nearest(node, target, dims, depth, bound, &mut visited))
}

fn search_nearest<'a, N: CoordNum>(
    node: Option<&'a Node<N>>,
    target: &[N],
    dims: usize,
    depth: usize,
    bound: PruneBound,
    visited: &mut usize,
) -> Option<&'a Node<N>> {
    let node = node?;
    *visited += 1;

    let axis = depth % dims;
    let split = node.point[axis];
    let (near, far) = if target[axis] < split {
        (node.left(), node.right())
    } else {
        (node.right(), node.left())
    };

    let candidate = search_nearest(near, target, dims, depth + 1, bound, visited);
    let mut best = closest(candidate, node, target);

    if bound.explores_far(squared_distance(target, &best.point), target[axis], split) {
        let candidate = search_nearest(far, target, dims, depth + 1, bound, visited);
        best = closest(candidate, best, target);
    }

    Some(best)
}

/// Pick `candidate` only if it is strictly closer to `target` than `current`.
#[inline]
fn closest<'a, N: CoordNum>(
    candidate: Option<&'a Node<N>>,
    current: &'a Node<N>,
    target: &[N],
) -> &'a Node<N> {
    let Some(candidate) = candidate else {
        return current;
    };
    if squared_distance(&candidate.point, target) < squared_distance(&current.point, target) {
        candidate
    } else {
        current
    }
}

/// Collect every point below `node` lying within `[lower, upper]` on all axes.
///
/// This is a full scan with no spatial pruning. Points are pushed in right-subtree, node,
/// left-subtree order.
pub fn range_search<'a, N: CoordNum>(
    node: Option<&'a Node<N>>,
    lower: &[N],
    upper: &[N],
    out: &mut Vec<&'a Point<N>>,
) {
    let Some(node) = node else {
        return;
    };

    range_search(node.right(), lower, upper, out);
    if node.point.within(lower, upper) {
        out.push(&node.point);
    }
    range_search(node.left(), lower, upper, out);
}
