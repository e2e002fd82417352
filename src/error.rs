use std::fmt::Debug;
use std::num::ParseIntError;

use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum KdIndexError {
    /// A point's length does not match the dimensionality of the tree.
    #[error("Dimension mismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A point with zero coordinates was supplied.
    #[error("Points must have at least one coordinate")]
    EmptyPoint,

    /// A token in a point file could not be parsed as an integer.
    #[error("Invalid integer {token:?}: {source}")]
    Parse {
        token: String,
        #[source]
        source: ParseIntError,
    },

    /// A point file ended before all announced values were read.
    #[error("Unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KdIndexError>;
