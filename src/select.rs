//! Selections of positions for bulk reads and writes.
//!
//! A selection is either a boolean mask (a position is chosen where the mask
//! is true, and a missing mask entry counts as false) or a list of positions
//! (missing positions are dropped). Either way the chosen positions come out in
//! selection order, and every one is checked against the length of the target.

use crate::{DataVec, Error, Index, Result};

/// A type that chooses positions out of a column of length `len`.
pub trait Selector {
    /// The chosen positions, in order, each less than `len`.
    fn positions(&self, len: usize) -> Result<Vec<usize>>;
}

#[inline]
fn checked(index: usize, len: usize) -> Result<usize> {
    if index < len { Ok(index) } else { Err(Error::IndexOutOfBounds { index, len }) }
}

impl Selector for [bool] {
    fn positions(&self, len: usize) -> Result<Vec<usize>> {
        self.iter()
            .enumerate()
            .filter(|(_, chosen)| **chosen)
            .map(|(index, _)| checked(index, len))
            .collect()
    }
}
impl Selector for [Option<bool>] {
    fn positions(&self, len: usize) -> Result<Vec<usize>> {
        self.iter()
            .enumerate()
            .filter(|(_, chosen)| **chosen == Some(true))
            .map(|(index, _)| checked(index, len))
            .collect()
    }
}
impl Selector for [usize] {
    fn positions(&self, len: usize) -> Result<Vec<usize>> {
        self.iter().map(|index| checked(*index, len)).collect()
    }
}
impl Selector for [Option<usize>] {
    fn positions(&self, len: usize) -> Result<Vec<usize>> {
        self.iter().flatten().map(|index| checked(*index, len)).collect()
    }
}

impl Selector for DataVec<bool> {
    fn positions(&self, len: usize) -> Result<Vec<usize>> {
        self.iter()
            .enumerate()
            .filter(|(_, chosen)| *chosen == Some(&true))
            .map(|(index, _)| checked(index, len))
            .collect()
    }
}
impl Selector for DataVec<usize> {
    fn positions(&self, len: usize) -> Result<Vec<usize>> {
        self.iter_skip_na().map(|index| checked(*index, len)).collect()
    }
}

impl Selector for std::ops::Range<usize> {
    fn positions(&self, len: usize) -> Result<Vec<usize>> {
        if self.end > len && self.start < self.end {
            return Err(Error::IndexOutOfBounds { index: self.end - 1, len });
        }
        Ok(self.clone().collect())
    }
}

/// Forwards owned and fixed-size collections to their slice implementations.
macro_rules! implement_forwarding {
    ($($item_type:ty),*) => { $(
        impl Selector for Vec<$item_type> {
            #[inline(always)]
            fn positions(&self, len: usize) -> Result<Vec<usize>> { self[..].positions(len) }
        }
        impl<const N: usize> Selector for [$item_type; N] {
            #[inline(always)]
            fn positions(&self, len: usize) -> Result<Vec<usize>> { self[..].positions(len) }
        }
    )* }
}

implement_forwarding!(bool, Option<bool>, usize, Option<usize>);

#[cfg(test)]
mod test {

    use super::Selector;
    use crate::{DataVec, Error, IndexMut, NA};

    #[test]
    fn booleans() {
        assert_eq!([true, false, true].positions(3), Ok(vec![0, 2]));
        assert_eq!([Some(true), None, Some(true)].positions(3), Ok(vec![0, 2]));
        // A shorter mask leaves the tail unselected.
        assert_eq!(vec![false, true].positions(5), Ok(vec![1]));
        assert_eq!([false, false, true].positions(2), Err(Error::IndexOutOfBounds { index: 2, len: 2 }));

        let mut mask = DataVec::from(vec![true, true, false]);
        mask.set(0, NA).unwrap();
        assert_eq!(mask.positions(3), Ok(vec![1]));
    }

    #[test]
    fn integers() {
        assert_eq!([2usize, 0, 2].positions(3), Ok(vec![2, 0, 2]));
        assert_eq!([Some(2usize), None, Some(1)].positions(3), Ok(vec![2, 1]));
        assert_eq!([5usize].positions(3), Err(Error::IndexOutOfBounds { index: 5, len: 3 }));
        assert_eq!((1usize .. 3).positions(3), Ok(vec![1, 2]));
        assert!((1usize .. 4).positions(3).is_err());

        let indices: DataVec<usize> = vec![Some(1), None, Some(0)].into_iter().collect();
        assert_eq!(indices.positions(2), Ok(vec![1, 0]));
    }
}
