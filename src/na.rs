//! The missing-value marker.

use crate::Len;

/// Marks a position that holds no value.
///
/// `NA` is zero-sized and only ever equal to itself. It converts into
/// `Option<T>` as `None` for every primitive, `String` and `&str`, so writes
/// that accept `impl Into<Option<T>>` also accept `NA` for those types.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NA;

impl NA {
    /// The shape of `NA`, which has no dimensions.
    #[inline(always)]
    pub const fn size(&self) -> [usize; 0] { [] }
}

// A lone `NA` behaves like a one-element sequence in bulk writes.
impl Len for NA {
    #[inline(always)] fn len(&self) -> usize { 1 }
}

/// Conversions from `NA` into `Option`s of each poolable type.
macro_rules! implement_from_na {
    ($($index_type:ty),*) => { $(
        impl From<NA> for Option<$index_type> {
            #[inline(always)] fn from(_: NA) -> Self { None }
        }
    )* }
}

implement_from_na!(u8, u16, u32, u64, u128, usize);
implement_from_na!(i8, i16, i32, i64, i128, isize);
implement_from_na!(f32, f64, bool, char, (), String);

impl<'a> From<NA> for Option<&'a str> {
    #[inline(always)] fn from(_: NA) -> Self { None }
}

impl std::fmt::Display for NA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NA")
    }
}

#[cfg(test)]
mod test {

    use super::NA;
    use crate::Len;

    #[test]
    fn marker() {
        assert_eq!(NA, NA);
        assert_eq!(NA.len(), 1);
        assert!(!NA.is_empty());
        assert_eq!(NA.size().len(), 0);
        assert_eq!(std::mem::size_of::<NA>(), 0);
        assert_eq!(Option::<i32>::from(NA), None);
        assert_eq!(Option::<f64>::from(NA), None);
        assert_eq!(Option::<&str>::from(NA), None);
        let text: Option<String> = NA.into();
        assert_eq!(text, None);
        assert_eq!(NA.to_string(), "NA");
    }
}
