use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::num::ParseIntError;
use std::str::FromStr;

use num_traits::{PrimInt, ToPrimitive};

/// A trait for types that can be used as point coordinates.
///
/// Only primitive integers are supported. This trait is sealed and cannot be implemented for
/// external types.
pub trait CoordNum:
    private::Sealed
    + PrimInt
    + Hash
    + Debug
    + Display
    + Send
    + Sync
    + FromStr<Err = ParseIntError>
{
    /// Widen this coordinate to `i128` for exact distance arithmetic.
    #[inline]
    fn as_i128(self) -> i128 {
        // Every supported integer fits in i128
        ToPrimitive::to_i128(&self).unwrap_or_default()
    }
}

impl CoordNum for i8 {}
impl CoordNum for u8 {}
impl CoordNum for i16 {}
impl CoordNum for u16 {}
impl CoordNum for i32 {}
impl CoordNum for u32 {}
impl CoordNum for i64 {}
impl CoordNum for u64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for i8 {}
    impl Sealed for u8 {}
    impl Sealed for i16 {}
    impl Sealed for u16 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
}
