//! Bulk loading of points from whitespace-separated text.
//!
//! The format is a header of two integers `n k`, followed by `n * k` integers in row-major order:
//! the `k` coordinates of point 0, then of point 1, and so on. Line breaks carry no meaning.

use std::fs::File;
use std::io::{BufReader, Read};
use std::num::ParseIntError;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use crate::error::{KdIndexError, Result};
use crate::kdtree::KDTree;
use crate::r#type::CoordNum;

/// Counts describing one completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Points read from the input.
    pub read: usize,
    /// Points stored in the tree.
    pub inserted: usize,
    /// Points dropped as duplicates.
    pub discarded: usize,
}

impl<N: CoordNum> KDTree<N> {
    /// Build a new tree from a point file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Build a new tree from point text read from `reader`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut tree = Self::new();
        tree.load_into(reader)?;
        Ok(tree)
    }

    /// Insert every point read from `reader` into this tree, in input order.
    ///
    /// The `k` announced by the input must match the tree's dimensions if those are already
    /// set, and becomes the tree's dimensions otherwise, even when no points follow. Points
    /// inserted before an error is hit stay in the tree.
    pub fn load_into<R: Read>(&mut self, mut reader: R) -> Result<LoadSummary> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let mut tokens = text.split_whitespace();

        let n: usize = next_value(&mut tokens, "point count")?;
        let k: usize = next_value(&mut tokens, "dimension count")?;
        if k == 0 {
            return Err(KdIndexError::EmptyPoint);
        }
        match self.dims {
            Some(dims) if dims != k => {
                return Err(KdIndexError::DimensionMismatch {
                    expected: dims,
                    actual: k,
                })
            }
            Some(_) => {}
            // An empty file still fixes the dimensions
            None => self.dims = Some(k),
        }

        let mut summary = LoadSummary::default();
        let mut point: Vec<N> = Vec::with_capacity(k);
        for _ in 0..n {
            point.clear();
            for _ in 0..k {
                point.push(next_value(&mut tokens, "coordinate")?);
            }
            summary.read += 1;
            if self.insert(&point)?.is_inserted() {
                summary.inserted += 1;
            } else {
                summary.discarded += 1;
            }
        }

        log::debug!(
            "loaded {} points of {} dimensions: {} inserted, {} discarded",
            summary.read,
            k,
            summary.inserted,
            summary.discarded
        );
        Ok(summary)
    }
}

fn next_value<T>(tokens: &mut SplitWhitespace<'_>, what: &'static str) -> Result<T>
where
    T: FromStr<Err = ParseIntError>,
{
    let token = tokens.next().ok_or(KdIndexError::UnexpectedEof(what))?;
    token.parse().map_err(|source| KdIndexError::Parse {
        token: token.to_string(),
        source,
    })
}

#[cfg(test)]
mod test {
    use crate::kdtree::{KDTree, KDTreeIndex};
    use crate::{KdIndexError, LoadSummary};

    #[test]
    fn loads_points_in_order() {
        let input = "4 2\n5 5\n3 2\n8 1\n2 9\n";
        let tree = KDTree::<i32>::from_reader(input.as_bytes()).unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.dims(), Some(2));
        let root = tree.root().unwrap();
        assert_eq!(root.point().coords(), &[5, 5]);
    }

    #[test]
    fn line_breaks_are_not_significant() {
        let input = "3 3 1 2 3\n4\n5 6 7 8\n 9";
        let tree = KDTree::<i64>::from_reader(input.as_bytes()).unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.dims(), Some(3));
    }

    #[test]
    fn reports_discarded_duplicates() {
        let mut tree = KDTree::<i32>::new();
        let summary = tree.load_into("3 2 5 5 5 9 1 1".as_bytes()).unwrap();

        assert_eq!(summary.read, 3);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.discarded, 1);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn truncated_input() {
        let err = KDTree::<i32>::from_reader("2 2 1 2 3".as_bytes()).unwrap_err();
        assert!(matches!(err, KdIndexError::UnexpectedEof("coordinate")));

        let err = KDTree::<i32>::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, KdIndexError::UnexpectedEof("point count")));
    }

    #[test]
    fn malformed_token() {
        let err = KDTree::<i32>::from_reader("1 2 4 x".as_bytes()).unwrap_err();
        match err {
            KdIndexError::Parse { token, .. } => assert_eq!(token, "x"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn out_of_range_coordinate() {
        let err = KDTree::<u8>::from_reader("1 1 256".as_bytes()).unwrap_err();
        assert!(matches!(err, KdIndexError::Parse { .. }));
    }

    #[test]
    fn second_load_must_match_dimensions() {
        let mut tree = KDTree::<i32>::new();
        tree.load_into("1 2 0 0".as_bytes()).unwrap();
        tree.load_into("1 2 1 1".as_bytes()).unwrap();
        assert_eq!(tree.len(), 2);

        let err = tree.load_into("1 3 1 1 1".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            KdIndexError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn empty_load_fixes_dimensions() {
        let mut tree = KDTree::<i32>::new();
        let summary = tree.load_into("0 3".as_bytes()).unwrap();
        assert_eq!(summary, LoadSummary::default());
        assert!(tree.is_empty());
        assert_eq!(tree.dims(), Some(3));

        let err = tree.load_into("1 2 1 1".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            KdIndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert!(tree.is_empty());
        assert_eq!(tree.nearest(&[1, 2, 3]).unwrap(), None);
    }

    #[test]
    fn zero_dimensions() {
        let err = KDTree::<i32>::from_reader("0 0".as_bytes()).unwrap_err();
        assert!(matches!(err, KdIndexError::EmptyPoint));
    }

    #[test]
    fn missing_file() {
        let err = KDTree::<i32>::from_path("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, KdIndexError::Io(_)));
    }
}
