//! Capabilities required of element types and code types.

use std::cmp::Ordering;

/// A type whose values can be collected into a sorted, deduplicated pool.
///
/// `pool_cmp` must be a total order, and `Default` provides the base value
/// stored under missing positions.
pub trait PoolValue : Clone + Default {
    /// Compares two values in pool order.
    fn pool_cmp(&self, other: &Self) -> Ordering;
    /// Whether two values occupy the same pool entry.
    #[inline(always)]
    fn pool_eq(&self, other: &Self) -> bool {
        self.pool_cmp(other) == Ordering::Equal
    }
}

/// An implementation of `PoolValue` for types that are already `Ord`.
macro_rules! implement_ordered {
    ($($index_type:ty),*) => { $(
        impl PoolValue for $index_type {
            #[inline(always)]
            fn pool_cmp(&self, other: &Self) -> Ordering { self.cmp(other) }
        }
    )* }
}

implement_ordered!(u8, u16, u32, u64, u128, usize);
implement_ordered!(i8, i16, i32, i64, i128, isize);
implement_ordered!(bool, char, (), String);

impl<'a> PoolValue for &'a str {
    #[inline(always)]
    fn pool_cmp(&self, other: &Self) -> Ordering { self.cmp(other) }
}

// Floats pool by their IEEE total order: each `NaN` bit pattern is its own
// value, and `-0.0` sorts before (and apart from) `0.0`.
impl PoolValue for f32 {
    #[inline(always)]
    fn pool_cmp(&self, other: &Self) -> Ordering { self.total_cmp(other) }
}
impl PoolValue for f64 {
    #[inline(always)]
    fn pool_cmp(&self, other: &Self) -> Ordering { self.total_cmp(other) }
}

/// An unsigned integer used to reference pool entries.
///
/// The code `0` is reserved for missing; a pool entry at position `k` is
/// referenced by the code `k + 1`. A pool may hold at most `MAX` entries.
pub trait Code : Copy + Default + Eq + Ord + std::fmt::Debug + std::hash::Hash {
    /// The code marking a missing element.
    const NA: Self;
    /// The largest pool this code type can address.
    const MAX: usize;
    /// The code referencing the pool entry at `position`.
    ///
    /// Callers must ensure `position < Self::MAX`.
    fn from_position(position: usize) -> Self;
    /// The pool position this code references, or `None` for missing.
    fn position(self) -> Option<usize>;
    /// The code as a plain integer.
    fn as_usize(self) -> usize;
    #[inline(always)]
    fn is_na(self) -> bool { self == Self::NA }
}

macro_rules! implement_code {
    ($($index_type:ty),*) => { $(
        impl Code for $index_type {
            const NA: Self = 0;
            const MAX: usize = <$index_type>::MAX as usize;
            #[inline(always)]
            fn from_position(position: usize) -> Self {
                debug_assert!(position < <Self as Code>::MAX);
                (position + 1) as $index_type
            }
            #[inline(always)]
            fn position(self) -> Option<usize> {
                (self as usize).checked_sub(1)
            }
            #[inline(always)]
            fn as_usize(self) -> usize { self as usize }
        }
    )* }
}

implement_code!(u8, u16, u32);

#[cfg(test)]
mod test {

    use super::{Code, PoolValue};
    use std::cmp::Ordering;

    #[test]
    fn codes() {
        assert_eq!(<u8 as Code>::MAX, 255);
        assert_eq!(<u16 as Code>::MAX, 65535);
        assert!(0u16.is_na());
        assert_eq!(0u16.position(), None);
        assert_eq!(u16::from_position(0), 1);
        assert_eq!(u16::from_position(4).position(), Some(4));
        assert_eq!(u8::from_position(254), 255);
    }

    #[test]
    fn floats() {
        assert_eq!(1.5f64.pool_cmp(&2.0), Ordering::Less);
        assert!(f64::NAN.pool_eq(&f64::NAN));
        assert!(!(-0.0f64).pool_eq(&0.0));
        assert_eq!("b".pool_cmp(&"a"), Ordering::Greater);
    }
}
