use crate::point::Point;
use crate::r#type::CoordNum;

/// A node of the tree: one stored point and two optional, exclusively owned children.
#[derive(Debug)]
pub struct Node<N: CoordNum> {
    pub(crate) point: Point<N>,
    pub(crate) left: Option<Box<Node<N>>>,
    pub(crate) right: Option<Box<Node<N>>>,
}

impl<N: CoordNum> Node<N> {
    /// Allocate a childless node holding a copy of `coords`.
    pub(crate) fn new(coords: &[N]) -> Self {
        Self {
            point: Point::new(coords),
            left: None,
            right: None,
        }
    }

    /// The point stored in this node.
    #[inline]
    pub fn point(&self) -> &Point<N> {
        &self.point
    }

    /// The subtree holding points strictly below this node on its splitting axis.
    #[inline]
    pub fn left(&self) -> Option<&Node<N>> {
        self.left.as_deref()
    }

    /// The subtree holding points at or above this node on its splitting axis.
    #[inline]
    pub fn right(&self) -> Option<&Node<N>> {
        self.right.as_deref()
    }

    /// Returns `true` if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Hand every node below `root` to `release`, children before their parent.
///
/// A node is only released once it has no children left. Pending nodes are held on a heap stack,
/// so the call stack stays flat however deep the tree is.
pub(crate) fn release_post_order<N: CoordNum>(
    root: Option<Box<Node<N>>>,
    mut release: impl FnMut(Box<Node<N>>),
) {
    let mut stack: Vec<Box<Node<N>>> = root.into_iter().collect();
    while let Some(top) = stack.last_mut() {
        match top.left.take().or_else(|| top.right.take()) {
            Some(child) => stack.push(child),
            None => {
                if let Some(node) = stack.pop() {
                    release(node);
                }
            }
        }
    }
}
