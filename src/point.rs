//! Fixed-dimension integer points and the Euclidean metric over them.

use std::fmt;
use std::ops::{Deref, Index};

use crate::r#type::CoordNum;

/// An ordered sequence of `k` integer coordinates.
///
/// A point is immutable once created. Points stored in a [`KDTree`][crate::kdtree::KDTree] own
/// their own copy of the coordinates they were inserted with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point<N: CoordNum> {
    coords: Box<[N]>,
}

impl<N: CoordNum> Point<N> {
    /// Create a new point, copying the provided coordinates.
    pub fn new(coords: &[N]) -> Self {
        Self {
            coords: Box::from(coords),
        }
    }

    /// The coordinates of this point.
    #[inline]
    pub fn coords(&self) -> &[N] {
        &self.coords
    }

    /// The number of coordinates of this point.
    #[inline]
    pub fn dims(&self) -> usize {
        self.coords.len()
    }

    /// Euclidean distance from this point to `other`.
    #[inline]
    pub fn distance(&self, other: &[N]) -> f64 {
        distance(&self.coords, other)
    }

    /// Returns `true` if `lower[i] <= self[i] <= upper[i]` on every axis.
    pub fn within(&self, lower: &[N], upper: &[N]) -> bool {
        self.coords
            .iter()
            .zip(lower)
            .zip(upper)
            .all(|((c, lo), hi)| lo <= c && c <= hi)
    }
}

impl<N: CoordNum> Deref for Point<N> {
    type Target = [N];

    fn deref(&self) -> &[N] {
        &self.coords
    }
}

impl<N: CoordNum> AsRef<[N]> for Point<N> {
    fn as_ref(&self) -> &[N] {
        &self.coords
    }
}

impl<N: CoordNum> Index<usize> for Point<N> {
    type Output = N;

    #[inline]
    fn index(&self, axis: usize) -> &N {
        &self.coords[axis]
    }
}

impl<N: CoordNum> From<Vec<N>> for Point<N> {
    fn from(value: Vec<N>) -> Self {
        Self {
            coords: value.into_boxed_slice(),
        }
    }
}

impl<N: CoordNum> From<&[N]> for Point<N> {
    fn from(value: &[N]) -> Self {
        Self::new(value)
    }
}

impl<N: CoordNum, const D: usize> From<[N; D]> for Point<N> {
    fn from(value: [N; D]) -> Self {
        Self::new(&value)
    }
}

impl<N: CoordNum> fmt::Display for Point<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Euclidean distance between two points of equal dimension.
///
/// The squared distance is summed exactly and only the final square root is taken in `f64`.
#[inline]
pub fn distance<N: CoordNum>(p1: &[N], p2: &[N]) -> f64 {
    squared_distance(p1, p2).to_f64().sqrt()
}

/// An exact squared Euclidean distance.
///
/// A single squared difference of two 64-bit coordinates fits in a `u128`, but a sum of them may
/// not, so overflow out of `lo` is counted in `hi`. Fields are ordered so the derived `Ord`
/// compares the full 256-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub(crate) struct SquaredDistance {
    hi: u128,
    lo: u128,
}

impl SquaredDistance {
    /// The square of `value`. Exact for any `value` below `2^64`.
    #[inline]
    pub(crate) fn of(value: u128) -> Self {
        Self {
            hi: 0,
            lo: value * value,
        }
    }

    #[inline]
    fn add(self, other: Self) -> Self {
        let (lo, carry) = self.lo.overflowing_add(other.lo);
        Self {
            hi: self.hi + other.hi + carry as u128,
            lo,
        }
    }

    pub(crate) fn to_f64(self) -> f64 {
        self.hi as f64 * 2f64.powi(128) + self.lo as f64
    }
}

/// The squared Euclidean distance between two points of equal dimension, without rounding.
#[inline]
pub(crate) fn squared_distance<N: CoordNum>(p1: &[N], p2: &[N]) -> SquaredDistance {
    debug_assert_eq!(p1.len(), p2.len(), "points must have equal dimension");
    p1.iter()
        .zip(p2)
        .map(|(a, b)| SquaredDistance::of((a.as_i128() - b.as_i128()).unsigned_abs()))
        .fold(SquaredDistance::default(), SquaredDistance::add)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn euclidean_distance() {
        assert_eq!(distance(&[0, 0], &[3, 4]), 5.0);
        assert_eq!(distance(&[1, 2, 3], &[1, 2, 3]), 0.0);
        assert!((distance(&[4, 4], &[5, 5]) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn distance_does_not_overflow() {
        let d = distance(&[i32::MIN], &[i32::MAX]);
        assert!((d - u32::MAX as f64).abs() < 1e-3);

        let d = distance(&[0u8], &[255u8]);
        assert_eq!(d, 255.0);

        let d = distance(&[u64::MIN, u64::MIN], &[u64::MAX, u64::MAX]);
        assert!((d / (u64::MAX as f64 * 2f64.sqrt()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn squared_distance_is_exact() {
        let base = 1i64 << 60;
        let near = squared_distance(&[base + 1], &[base]);
        let far = squared_distance(&[base + 1], &[base + 3]);
        assert_eq!(near, SquaredDistance::of(1));
        assert_eq!(far, SquaredDistance::of(2));
        assert!(near < far);

        // Differences that collapse to the same f64
        let a = squared_distance(&[i64::MIN], &[i64::MAX]);
        let b = squared_distance(&[i64::MIN + 1], &[i64::MAX]);
        assert!(b < a);
    }

    #[test]
    fn squared_distance_carries_past_u128() {
        let far = squared_distance(&[u64::MAX, u64::MAX], &[0, 0]);
        let one_axis = squared_distance(&[u64::MAX, 0], &[0, 0]);
        assert_eq!(one_axis, SquaredDistance::of(u64::MAX as u128));
        assert!(far > one_axis);
        assert!(far > SquaredDistance::of(u64::MAX as u128).add(SquaredDistance::of(1)));
        assert_eq!(far.hi, 1);
    }

    #[test]
    fn within_is_inclusive() {
        let p = Point::from([2, 9]);
        assert!(p.within(&[2, 1], &[6, 9]));
        assert!(!p.within(&[3, 1], &[6, 9]));
        assert!(!p.within(&[2, 1], &[6, 8]));
    }

    #[test]
    fn display() {
        assert_eq!(Point::from([5, -5, 0]).to_string(), "5 -5 0");
        assert_eq!(Point::from(vec![7u16]).to_string(), "7");
    }
}
