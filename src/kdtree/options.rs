use crate::point::SquaredDistance;
use crate::r#type::CoordNum;

/// How insertion treats an incoming point that ties an existing node on the splitting axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Discard the incoming point whenever it ties a node on that node's splitting axis, even if
    /// the remaining coordinates differ.
    #[default]
    SplittingAxis,

    /// Discard the incoming point only if every coordinate equals the node's. Other ties descend
    /// into the right subtree.
    FullPoint,
}

impl DuplicatePolicy {
    #[inline]
    pub(crate) fn discards<N: CoordNum>(self, incoming: &[N], existing: &[N]) -> bool {
        match self {
            Self::SplittingAxis => true,
            Self::FullPoint => incoming == existing,
        }
    }
}

/// The bound used by nearest-neighbor search to decide whether the far subtree of a node must be
/// explored.
///
/// The far side is visited whenever the best distance found so far is `>=` the gap described
/// here. The comparison is made on exact squared values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PruneBound {
    /// `target[axis] - node[axis]`, without taking the absolute value.
    ///
    /// When the target lies below the splitting value the gap is negative and the far side is
    /// always searched. Results are still exact; only pruning on that side is lost.
    #[default]
    Signed,

    /// `|target[axis] - node[axis]|`, the usual branch-and-bound test.
    Absolute,
}

impl PruneBound {
    /// Whether a subtree across the split must be searched, given the squared distance to the
    /// best point found so far.
    #[inline]
    pub(crate) fn explores_far<N: CoordNum>(
        self,
        best: SquaredDistance,
        target: N,
        split: N,
    ) -> bool {
        let gap = target.as_i128() - split.as_i128();
        if self == Self::Signed && gap <= 0 {
            return true;
        }
        best >= SquaredDistance::of(gap.unsigned_abs())
    }
}

/// Options fixed for the lifetime of a [`KDTree`][super::KDTree].
///
/// The default reproduces the reference behavior of the index: splitting-axis de-duplication and
/// the signed pruning bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KDTreeOptions {
    /// How ties on the splitting axis are handled during insertion.
    pub duplicates: DuplicatePolicy,

    /// The pruning test used by nearest-neighbor search.
    pub prune: PruneBound,
}

impl KDTreeOptions {
    /// Set the duplicate policy.
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Set the pruning bound.
    pub fn with_prune(mut self, prune: PruneBound) -> Self {
        self.prune = prune;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prune_test_is_exact_on_wide_coordinates() {
        let split = 1i64 << 60;
        let best = SquaredDistance::of(1);

        // A split 2 away cannot hide anything within distance 1
        assert!(!PruneBound::Signed.explores_far(best, split + 2, split));
        assert!(!PruneBound::Absolute.explores_far(best, split + 2, split));
        assert!(PruneBound::Absolute.explores_far(SquaredDistance::of(2), split + 2, split));

        // Below the split only the absolute bound prunes
        assert!(PruneBound::Signed.explores_far(best, split - 2, split));
        assert!(!PruneBound::Absolute.explores_far(best, split - 2, split));

        assert!(PruneBound::Absolute.explores_far(best, u64::MAX, u64::MAX));
        assert!(!PruneBound::Absolute.explores_far(best, u64::MAX, 0));
    }
}
