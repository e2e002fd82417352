#![doc = include_str!("../README.md")]

mod error;
pub mod kdtree;
mod load;
mod point;
mod r#type;

pub use error::{KdIndexError, Result};
pub use load::LoadSummary;
pub use point::{distance, Point};
pub use r#type::CoordNum;
