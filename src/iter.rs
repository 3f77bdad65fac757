//! Lazy, restartable sequences over the elements of a column.
//!
//! Each iterator borrows its column and keeps its own cursor, so every call to
//! `Index::iter` (and friends) starts afresh. The variants differ only in what
//! they do with a missing element: report it, fail on it, skip it, or replace it.

use crate::{Error, Index, Result};

/// Yields each element as `Some(value)` or `None` for missing.
pub struct Iter<'a, C: ?Sized> {
    index: usize,
    column: &'a C,
}

impl<'a, C: ?Sized> Iter<'a, C> {
    pub fn new(column: &'a C) -> Self {
        Self { index: 0, column }
    }
}

impl<'a, C: ?Sized> Clone for Iter<'a, C> {
    fn clone(&self) -> Self {
        Self { index: self.index, column: self.column }
    }
}

impl<'a, C: Index + ?Sized> Iterator for Iter<'a, C> {
    type Item = Option<C::Ref<'a>>;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        let column = self.column;
        if self.index < column.len() {
            let result = column.at(self.index);
            self.index += 1;
            Some(result)
        } else {
            None
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.column.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a, C: Index + ?Sized> ExactSizeIterator for Iter<'a, C> { }

/// Yields present elements, and `Error::HasMissingValue` at the first missing one.
///
/// The sequence ends after the error is produced.
pub struct FailNa<'a, C: ?Sized> {
    index: usize,
    failed: bool,
    column: &'a C,
}

impl<'a, C: ?Sized> FailNa<'a, C> {
    pub fn new(column: &'a C) -> Self {
        Self { index: 0, failed: false, column }
    }
}

impl<'a, C: Index + ?Sized> Iterator for FailNa<'a, C> {
    type Item = Result<C::Ref<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let column = self.column;
        if self.failed || self.index >= column.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;
        match column.at(index) {
            Some(item) => Some(Ok(item)),
            None => {
                self.failed = true;
                Some(Err(Error::HasMissingValue { index }))
            }
        }
    }
}

/// Yields present elements, silently stepping past missing ones.
pub struct SkipNa<'a, C: ?Sized> {
    index: usize,
    column: &'a C,
}

impl<'a, C: ?Sized> SkipNa<'a, C> {
    pub fn new(column: &'a C) -> Self {
        Self { index: 0, column }
    }
}

impl<'a, C: Index + ?Sized> Iterator for SkipNa<'a, C> {
    type Item = C::Ref<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let column = self.column;
        while self.index < column.len() {
            let index = self.index;
            self.index += 1;
            if let Some(item) = column.at(index) {
                return Some(item);
            }
        }
        None
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.column.len() - self.index))
    }
}

/// Yields every element, with `default` standing in for missing ones.
pub struct ReplaceNa<'a, C: Index + ?Sized + 'a> {
    index: usize,
    column: &'a C,
    default: C::Ref<'a>,
}

impl<'a, C: Index + ?Sized + 'a> ReplaceNa<'a, C> {
    pub fn new(column: &'a C, default: C::Ref<'a>) -> Self {
        Self { index: 0, column, default }
    }
}

impl<'a, C: Index + ?Sized + 'a> Iterator for ReplaceNa<'a, C> where C::Ref<'a>: Clone {
    type Item = C::Ref<'a>;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        let column = self.column;
        if self.index < column.len() {
            let result = column.at(self.index).unwrap_or_else(|| self.default.clone());
            self.index += 1;
            Some(result)
        } else {
            None
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.column.len() - self.index;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod test {

    use crate::{DataVec, Error, Index, PooledVec, NA};

    fn sample() -> DataVec<i32> {
        vec![Some(1), None, Some(3), None].into_iter().collect()
    }

    #[test]
    fn plain() {
        let column = sample();
        let items: Vec<_> = column.iter().collect();
        assert_eq!(items, vec![Some(&1), None, Some(&3), None]);
        assert_eq!(column.iter().len(), 4);
        // Each call starts from the beginning.
        assert_eq!(column.iter().count(), column.iter().count());
    }

    #[test]
    fn fail_fast() {
        let column = sample();
        let mut iter = column.iter_fail_na();
        assert_eq!(iter.next(), Some(Ok(&1)));
        assert_eq!(iter.next(), Some(Err(Error::HasMissingValue { index: 1 })));
        assert_eq!(iter.next(), None);

        let full = DataVec::from(vec![4, 5]);
        let collected: Result<Vec<_>, _> = full.iter_fail_na().collect();
        assert_eq!(collected, Ok(vec![&4, &5]));
    }

    #[test]
    fn skip_and_replace() {
        let column = sample();
        assert_eq!(column.iter_skip_na().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(column.iter_replace_na(&0).copied().collect::<Vec<_>>(), vec![1, 0, 3, 0]);
    }

    #[test]
    fn pooled() {
        let mut column = PooledVec::<&str>::from_values(&["b", "a", "b"]).unwrap();
        column.push(NA).unwrap();
        assert_eq!(column.iter_skip_na().copied().collect::<Vec<_>>(), vec!["b", "a", "b"]);
        assert_eq!(column.iter_replace_na(&"z").copied().collect::<Vec<_>>(), vec!["b", "a", "b", "z"]);
        assert!(column.iter_fail_na().any(|item| item.is_err()));
    }
}
