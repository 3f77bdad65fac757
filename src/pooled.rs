//! A dictionary-encoded vector, whose elements are codes into a pool of values.

use crate::encode::{self, PoolLookup};
use crate::select::Selector;
use crate::{Clear, Code, DataVec, Error, HeapSize, Index, IndexMut, Len, PoolValue, Result};

/// A stand-in for `Vec<Option<T>>` when few distinct values repeat often.
///
/// Each element is a code: `0` for missing, and `k + 1` for the value at
/// position `k` of `pool`. Every code is at most `pool.len()`, the pool holds
/// no two equal values, and it never holds more than `C::MAX` of them. Builders produce pools sorted in
/// ascending order; writes of new values append to the pool, and values that no
/// code references any longer stay in the pool until `compact` is called.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Parts<T, C>"))]
#[cfg_attr(feature = "serde", serde(bound(deserialize = "T: PoolValue + serde::Deserialize<'de>, C: Code + serde::Deserialize<'de>")))]
#[derive(Clone, Debug)]
pub struct PooledVec<T, C = u16> {
    codes: Vec<C>,
    pool: Vec<T>,
}

impl<T, C: Code> PooledVec<T, C> {
    pub fn new() -> Self {
        Self { codes: Vec::new(), pool: Vec::new() }
    }

    pub(crate) fn from_raw(codes: Vec<C>, pool: Vec<T>) -> Self {
        debug_assert!(codes.iter().all(|code| code.as_usize() <= pool.len()));
        Self { codes, pool }
    }

    #[inline(always)] pub fn codes(&self) -> &[C] { &self.codes }
    #[inline(always)] pub fn pool(&self) -> &[T] { &self.pool }
    pub fn into_parts(self) -> (Vec<C>, Vec<T>) { (self.codes, self.pool) }

    /// The code at `index`.
    pub fn code(&self, index: usize) -> Result<C> {
        self.codes
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfBounds { index, len: self.len() })
    }

    /// The number of missing elements.
    pub fn na_count(&self) -> usize {
        self.codes.iter().filter(|code| code.is_na()).count()
    }

    /// A permutation of positions that groups elements by code.
    ///
    /// Missing elements come first, then elements in the order of their pool
    /// entries, which is ascending value order for builder-produced pools.
    /// Equal codes keep their relative order.
    pub fn order(&self) -> Vec<usize> {
        // `starts[c]` becomes the first output slot for code `c`.
        let mut starts = vec![0usize; self.pool.len() + 2];
        for code in self.codes.iter() {
            starts[code.as_usize() + 1] += 1;
        }
        for index in 1 .. starts.len() {
            starts[index] += starts[index - 1];
        }
        let mut order = vec![0; self.codes.len()];
        for (index, code) in self.codes.iter().enumerate() {
            let slot = &mut starts[code.as_usize()];
            order[*slot] = index;
            *slot += 1;
        }
        order
    }

    /// Reorders the elements by `order`, leaving the pool as it is.
    pub fn sort(&mut self) {
        let order = self.order();
        self.codes = order.iter().map(|index| self.codes[*index]).collect();
    }

    /// Removes pool entries that no code references, renumbering the rest.
    ///
    /// The remaining entries keep their relative order.
    pub fn compact(&mut self) {
        let mut used = vec![false; self.pool.len()];
        for position in self.codes.iter().filter_map(|code| code.position()) {
            used[position] = true;
        }
        let mut remap = vec![C::NA; self.pool.len()];
        let mut kept = 0;
        for (position, live) in used.iter().enumerate() {
            if *live {
                remap[position] = C::from_position(kept);
                kept += 1;
            }
        }
        let dead = self.pool.len() - kept;
        let mut position = 0;
        self.pool.retain(|_| {
            position += 1;
            used[position - 1]
        });
        for code in self.codes.iter_mut() {
            if let Some(position) = code.position() {
                *code = remap[position];
            }
        }
        log::debug!("compacted pool, dropping {} unreferenced values", dead);
    }

    /// Removes the last element, returning `Some(None)` if it was missing.
    pub fn pop(&mut self) -> Option<Option<T>> where T: Clone {
        let code = self.codes.pop()?;
        Some(code.position().map(|position| self.pool[position].clone()))
    }

    /// Removes the first element, returning `Some(None)` if it was missing.
    pub fn pop_front(&mut self) -> Option<Option<T>> where T: Clone {
        if self.codes.is_empty() {
            return None;
        }
        let code = self.codes.remove(0);
        Some(code.position().map(|position| self.pool[position].clone()))
    }

    /// A new vector of the selected elements, in selection order, with the same pool.
    pub fn select<S: Selector + ?Sized>(&self, selection: &S) -> Result<Self> where T: Clone {
        let positions = selection.positions(self.len())?;
        let codes = positions.iter().map(|index| self.codes[*index]).collect();
        Ok(Self { codes, pool: self.pool.clone() })
    }
}

/// The first pool position holding a value equal to one at an earlier position.
fn first_duplicate<T: PoolValue>(pool: &[T]) -> Option<usize> {
    PoolLookup::new(pool)
        .positions()
        .windows(2)
        .filter(|pair| pool[pair[0]].pool_eq(&pool[pair[1]]))
        .map(|pair| pair[1])
        .min()
}

impl<T: PoolValue, C: Code> PooledVec<T, C> {
    /// Assembles a vector from codes and the pool they reference.
    ///
    /// Fails with `Error::PoolOverflow` if the pool is larger than `C` can
    /// address, with `Error::DuplicateValue` if the pool repeats a value, and
    /// with `Error::OutOfRange` if any code exceeds the pool length.
    pub fn from_parts(codes: Vec<C>, pool: Vec<T>) -> Result<Self> {
        if pool.len() > C::MAX {
            return Err(Error::PoolOverflow { size: pool.len(), max: C::MAX });
        }
        if let Some(index) = first_duplicate(&pool) {
            return Err(Error::DuplicateValue { index });
        }
        if let Some((index, code)) = codes.iter().enumerate().find(|(_, code)| code.as_usize() > pool.len()) {
            return Err(Error::OutOfRange { index, code: code.as_usize(), pool: pool.len() });
        }
        Ok(Self { codes, pool })
    }

    /// Replaces every pool entry at once, keeping all codes.
    ///
    /// Entries are matched by position, so the value at position `k` of `pool`
    /// becomes the value of every element that had the old entry `k`. Fails with
    /// `Error::LengthMismatch` unless `pool` has as many entries as the current
    /// pool, and with `Error::DuplicateValue` if it repeats a value.
    pub fn set_levels(&mut self, pool: Vec<T>) -> Result<()> {
        if pool.len() != self.pool.len() {
            return Err(Error::LengthMismatch { expected: self.pool.len(), found: pool.len() });
        }
        if let Some(index) = first_duplicate(&pool) {
            return Err(Error::DuplicateValue { index });
        }
        self.pool = pool;
        Ok(())
    }

    /// Encodes a slice of values, none of them missing.
    pub fn from_values(values: &[T]) -> Result<Self> {
        encode::build(values, &vec![false; values.len()])
    }

    /// Encodes a nullable vector, with missing elements as code `0`.
    pub fn encode(column: &DataVec<T>) -> Result<Self> {
        encode::encode(column)
    }

    /// The pool position holding `value`, found by scanning the pool.
    pub fn find(&self, value: &T) -> Option<usize> {
        self.pool.iter().position(|entry| entry.pool_eq(value))
    }

    /// The code for `item`, appending a new value to the pool if needed.
    fn intern(&mut self, item: Option<T>) -> Result<C> {
        let value = match item {
            Some(value) => value,
            None => return Ok(C::NA),
        };
        if let Some(position) = self.find(&value) {
            return Ok(C::from_position(position));
        }
        if self.pool.len() >= C::MAX {
            return Err(Error::PoolOverflow { size: self.pool.len() + 1, max: C::MAX });
        }
        self.pool.push(value);
        log::trace!("pool grew to {} values", self.pool.len());
        Ok(C::from_position(self.pool.len() - 1))
    }

    /// Appends an element, growing the pool if it holds a new value.
    pub fn push(&mut self, item: impl Into<Option<T>>) -> Result<()> {
        let code = self.intern(item.into())?;
        self.codes.push(code);
        Ok(())
    }

    /// Inserts an element at the front, growing the pool if it holds a new value.
    pub fn push_front(&mut self, item: impl Into<Option<T>>) -> Result<()> {
        let code = self.intern(item.into())?;
        self.codes.insert(0, code);
        Ok(())
    }

    /// Writes `values` to the selected positions, pairing them in order.
    ///
    /// Pairing stops at the shorter of the two. Nothing is written unless every
    /// position is valid and every new value fits in the pool.
    pub fn set_many<S, I>(&mut self, selection: &S, values: I) -> Result<()>
    where
        S: Selector + ?Sized,
        I: IntoIterator,
        I::Item: Into<Option<T>>,
    {
        let positions = selection.positions(self.len())?;
        let mut pool = self.pool.clone();
        let mut lookup = PoolLookup::new(&pool);
        let mut staged = Vec::with_capacity(positions.len());
        for (index, item) in positions.into_iter().zip(values) {
            let code = match item.into() {
                Some(value) => C::from_position(lookup.intern::<T, C>(&mut pool, value)?),
                None => C::NA,
            };
            staged.push((index, code));
        }
        self.pool = pool;
        for (index, code) in staged {
            self.codes[index] = code;
        }
        Ok(())
    }

    /// Writes one value (or missing) to every selected position.
    pub fn fill<S: Selector + ?Sized>(&mut self, selection: &S, item: impl Into<Option<T>>) -> Result<()> {
        let positions = selection.positions(self.len())?;
        if positions.is_empty() {
            return Ok(());
        }
        let code = self.intern(item.into())?;
        for index in positions {
            self.codes[index] = code;
        }
        Ok(())
    }

    /// Materializes the elements as a nullable vector.
    pub fn decode(&self) -> DataVec<T> {
        self.iter().map(|item| item.cloned()).collect()
    }

    /// Every pool entry once, followed by a missing element if any code is `0`.
    pub fn unique_values(&self) -> DataVec<T> {
        let mut levels = DataVec::from(self.pool.clone());
        if self.any_na() {
            crate::Push::push(&mut levels, None::<T>);
        }
        levels
    }

    /// Replaces every occurrence of `from` by `to`, where either may be missing.
    ///
    /// * Missing to missing does nothing.
    /// * A value to missing sets the codes of that value to `0`; its pool entry stays.
    /// * Missing to a value points every `0` code at the value, adding it to the pool if needed.
    /// * A value to a value merges into `to` if it is already pooled (the old
    ///   entry stays, unreferenced), and otherwise renames the pool entry in place.
    ///
    /// Fails with `Error::ValueNotFound` if `from` is a value not in the pool.
    /// Replacing a value by itself does nothing.
    pub fn replace(&mut self, from: impl Into<Option<T>>, to: impl Into<Option<T>>) -> Result<()> {
        match (from.into(), to.into()) {
            (None, None) => Ok(()),
            (Some(from), None) => {
                let position = self.find(&from).ok_or(Error::ValueNotFound)?;
                self.retarget(C::from_position(position), C::NA);
                Ok(())
            }
            (None, Some(to)) => {
                let code = self.intern(Some(to))?;
                self.retarget(C::NA, code);
                Ok(())
            }
            (Some(from), Some(to)) => {
                if from.pool_eq(&to) {
                    return Ok(());
                }
                let position = self.find(&from).ok_or(Error::ValueNotFound)?;
                match self.find(&to) {
                    Some(existing) => {
                        log::debug!("merging pool entry {} into {}", position, existing);
                        self.retarget(C::from_position(position), C::from_position(existing));
                    }
                    None => {
                        log::debug!("renaming pool entry {}", position);
                        self.pool[position] = to;
                    }
                }
                Ok(())
            }
        }
    }

    fn retarget(&mut self, from: C, to: C) {
        for code in self.codes.iter_mut().filter(|code| **code == from) {
            *code = to;
        }
    }
}

impl<T, C: Code> Default for PooledVec<T, C> {
    fn default() -> Self { Self::new() }
}

impl<T, C> Len for PooledVec<T, C> {
    #[inline(always)] fn len(&self) -> usize { self.codes.len() }
}

impl<T, C: Code> Index for PooledVec<T, C> {
    type Ref<'a> = &'a T where T: 'a, C: 'a;
    #[inline(always)]
    fn at(&self, index: usize) -> Option<Self::Ref<'_>> {
        self.codes[index].position().map(|position| &self.pool[position])
    }
    #[inline(always)]
    fn any_na(&self) -> bool {
        self.codes.iter().any(|code| code.is_na())
    }
}

impl<T: PoolValue, C: Code> IndexMut<T> for PooledVec<T, C> {
    /// Writes `item` at `index`, reusing a pool entry equal to it or appending one.
    fn set(&mut self, index: usize, item: impl Into<Option<T>>) -> Result<()> {
        if index >= self.len() {
            return Err(Error::IndexOutOfBounds { index, len: self.len() });
        }
        let code = self.intern(item.into())?;
        self.codes[index] = code;
        Ok(())
    }
}

impl<T, C> Clear for PooledVec<T, C> {
    fn clear(&mut self) {
        self.codes.clear();
        self.pool.clear();
    }
}

impl<T: HeapSize, C> HeapSize for PooledVec<T, C> {
    fn heap_size(&self) -> (usize, usize) {
        let cl = std::mem::size_of::<C>() * self.codes.len();
        let cc = std::mem::size_of::<C>() * self.codes.capacity();
        let (pl, pc) = self.pool.heap_size();
        (cl + pl, cc + pc)
    }
}

// Equal when the decoded elements are equal, however the pools are laid out.
impl<T: PoolValue, C: Code> PartialEq for PooledVec<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|pair| match pair {
                (Some(a), Some(b)) => a.pool_eq(b),
                (None, None) => true,
                _ => false,
            })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct Parts<T, C> {
    codes: Vec<C>,
    pool: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T: PoolValue, C: Code> TryFrom<Parts<T, C>> for PooledVec<T, C> {
    type Error = Error;
    fn try_from(parts: Parts<T, C>) -> Result<Self> {
        Self::from_parts(parts.codes, parts.pool)
    }
}

#[cfg(test)]
mod test {

    use super::PooledVec;
    use crate::{Clear, DataVec, Error, HeapSize, Index, IndexMut, Len, NA};

    /// `["b", "a", "b", NA]`, encoded as codes `[2, 1, 2, 0]` over `["a", "b"]`.
    fn letters() -> PooledVec<&'static str> {
        let column: DataVec<&str> = vec![Some("b"), Some("a"), Some("b"), None].into_iter().collect();
        PooledVec::encode(&column).unwrap()
    }

    fn in_bounds(column: &PooledVec<&str>) -> bool {
        column.codes().iter().all(|code| (*code as usize) <= column.pool().len())
    }

    #[test]
    fn encoded() {
        let column = letters();
        assert_eq!(column.pool(), &["a", "b"]);
        assert_eq!(column.codes(), &[2, 1, 2, 0]);
        assert_eq!(column.get(0), Ok(Some(&"b")));
        assert_eq!(column.get(3), Ok(None));
        assert_eq!(column.get(4), Err(Error::IndexOutOfBounds { index: 4, len: 4 }));
        assert_eq!(column.code(1), Ok(1));
        assert_eq!(column.na_count(), 1);
    }

    #[test]
    fn value_to_missing() {
        let mut column = letters();
        column.replace("a", NA).unwrap();
        assert_eq!(column.codes(), &[2, 0, 2, 0]);
        assert_eq!(column.pool(), &["a", "b"]);
        assert_eq!(column.replace("q", NA), Err(Error::ValueNotFound));
    }

    #[test]
    fn missing_to_value() {
        let mut column = PooledVec::from_parts(vec![2u16, 0, 2, 0], vec!["a", "b"]).unwrap();
        column.replace(NA, "c").unwrap();
        assert_eq!(column.pool(), &["a", "b", "c"]);
        assert_eq!(column.codes(), &[2, 3, 2, 3]);

        let mut column = letters();
        column.replace(None::<&str>, "a").unwrap();
        assert_eq!(column.pool(), &["a", "b"]);
        assert_eq!(column.codes(), &[2, 1, 2, 1]);
    }

    #[test]
    fn value_to_value() {
        // Renaming keeps the codes and rewrites the pool entry.
        let mut column = letters();
        column.replace("a", "z").unwrap();
        assert_eq!(column.pool(), &["z", "b"]);
        assert_eq!(column.codes(), &[2, 1, 2, 0]);

        // Merging retargets the codes and leaves the old entry unreferenced.
        let mut column = letters();
        column.replace("a", "b").unwrap();
        assert_eq!(column.pool(), &["a", "b"]);
        assert_eq!(column.codes(), &[2, 2, 2, 0]);

        assert_eq!(column.replace("q", "b"), Err(Error::ValueNotFound));
    }

    #[test]
    fn idempotent_replace() {
        let before = letters();
        for value in [Some("a"), Some("b"), Some("q"), None] {
            let mut column = letters();
            column.replace(value, value).unwrap();
            assert_eq!(column.codes(), before.codes());
            assert_eq!(column.pool(), before.pool());
        }
    }

    #[test]
    fn set_single() {
        let mut column = letters();
        column.set(3, "a").unwrap();
        assert_eq!(column.codes(), &[2, 1, 2, 1]);
        column.set(0, "c").unwrap();
        assert_eq!(column.pool(), &["a", "b", "c"]);
        assert_eq!(column.codes(), &[3, 1, 2, 1]);
        column.set(1, NA).unwrap();
        assert_eq!(column.codes(), &[3, 0, 2, 1]);
        assert_eq!(column.set(9, "a"), Err(Error::IndexOutOfBounds { index: 9, len: 4 }));
        assert!(in_bounds(&column));
    }

    #[test]
    fn construction() {
        assert_eq!(
            PooledVec::<&str, u16>::from_parts(vec![0, 3], vec!["a", "b"]).unwrap_err(),
            Error::OutOfRange { index: 1, code: 3, pool: 2 },
        );
        assert_eq!(
            PooledVec::<&str, u16>::from_parts(vec![1], vec!["b", "a", "c", "a", "b"]).unwrap_err(),
            Error::DuplicateValue { index: 3 },
        );
        let pool: Vec<u32> = (0 .. 256).collect();
        assert_eq!(
            PooledVec::<u32, u8>::from_parts(vec![], pool).unwrap_err(),
            Error::PoolOverflow { size: 256, max: 255 },
        );
    }

    #[test]
    fn overflow_on_set() {
        let values: Vec<u32> = (0 .. 255).collect();
        let mut column: PooledVec<u32, u8> = PooledVec::from_values(&values).unwrap();
        assert_eq!(column.set(0, 999u32), Err(Error::PoolOverflow { size: 256, max: 255 }));
        assert_eq!(column.push(999u32), Err(Error::PoolOverflow { size: 256, max: 255 }));
        assert_eq!(column.get(0), Ok(Some(&0)));
        assert_eq!(column.len(), 255);
        // Existing values and missing still fit.
        column.set(0, 7u32).unwrap();
        column.push(NA).unwrap();
        assert_eq!(column.code(0), Ok(8));
    }

    #[test]
    fn bulk_get() {
        let column = letters();
        let picked = column.select(&[3usize, 0]).unwrap();
        assert_eq!(picked.codes(), &[0, 2]);
        assert_eq!(picked.pool(), column.pool());
        let masked = column.select(&[true, true, false, false]).unwrap();
        assert_eq!(masked.decode().drop_na(), vec!["b", "a"]);
    }

    #[test]
    fn bulk_set() {
        let mut column = letters();
        column.set_many(&[0usize, 1, 3], vec![Some("c"), None]).unwrap();
        assert_eq!(column.pool(), &["a", "b", "c"]);
        assert_eq!(column.codes(), &[3, 0, 2, 0]);

        column.fill(&[false, true, false, true], "d").unwrap();
        assert_eq!(column.codes(), &[3, 4, 2, 4]);
        column.fill(&[0usize], NA).unwrap();
        assert_eq!(column.codes(), &[0, 4, 2, 4]);
        assert!(in_bounds(&column));

        // Selecting nothing leaves the pool alone.
        column.fill(&[false; 4], "e").unwrap();
        column.fill(&Vec::<usize>::new(), "f").unwrap();
        assert_eq!(column.pool(), &["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_fill_on_full_pool() {
        let values: Vec<u32> = (0 .. 255).collect();
        let mut column: PooledVec<u32, u8> = PooledVec::from_values(&values).unwrap();
        column.fill(&[false; 255], 999u32).unwrap();
        assert_eq!(column.pool().len(), 255);
        assert_eq!(column.fill(&[0usize], 999u32), Err(Error::PoolOverflow { size: 256, max: 255 }));
    }

    #[test]
    fn bulk_set_is_atomic() {
        let values: Vec<u32> = (0 .. 254).collect();
        let mut column: PooledVec<u32, u8> = PooledVec::from_values(&values).unwrap();
        let before = column.clone();
        // The first new value fits; the second overflows, so neither is written.
        let result = column.set_many(&[0usize, 1], [1000u32, 1001]);
        assert_eq!(result, Err(Error::PoolOverflow { size: 256, max: 255 }));
        assert_eq!(column, before);
        assert_eq!(column.pool().len(), 254);
        assert!(column.set_many(&[0usize, 900], [1u32, 2]).is_err());
        assert_eq!(column.codes(), before.codes());
    }

    #[test]
    fn levels() {
        let column = letters();
        assert_eq!(column.unique_values().iter().collect::<Vec<_>>(), vec![Some(&"a"), Some(&"b"), None]);
        let full: PooledVec<i32> = PooledVec::from_values(&[2, 1]).unwrap();
        assert_eq!(full.unique_values(), DataVec::from(vec![1, 2]));
    }

    #[test]
    fn sorting() {
        let mut column: PooledVec<i32> = PooledVec::from_values(&[3, 1, 2, 1]).unwrap();
        column.push(NA).unwrap();
        assert_eq!(column.order(), vec![4, 1, 3, 2, 0]);
        column.sort();
        assert_eq!(column.iter().collect::<Vec<_>>(), vec![None, Some(&1), Some(&1), Some(&2), Some(&3)]);
    }

    #[test]
    fn compacting() {
        let mut column = letters();
        column.replace("a", "b").unwrap();
        column.push("c").unwrap();
        let decoded = column.decode();
        column.compact();
        assert_eq!(column.pool(), &["b", "c"]);
        assert_eq!(column.codes(), &[1, 1, 1, 0, 2]);
        assert_eq!(column.decode(), decoded);
    }

    #[test]
    fn relabel() {
        let mut column = letters();
        column.set_levels(vec!["A", "B"]).unwrap();
        assert_eq!(column.decode().drop_na(), vec!["B", "A", "B"]);
        assert_eq!(column.set_levels(vec!["A"]), Err(Error::LengthMismatch { expected: 2, found: 1 }));

        // Equal levels would leave one value behind two pool entries.
        let mut column: PooledVec<i32> = PooledVec::from_values(&[1, 2, 2, 3]).unwrap();
        assert_eq!(column.set_levels(vec![1, 3, 3]), Err(Error::DuplicateValue { index: 2 }));
        assert_eq!(column.pool(), &[1, 2, 3]);
        column.replace(3, NA).unwrap();
        assert_eq!(column.iter().flatten().copied().collect::<Vec<_>>(), vec![1, 2, 2]);
    }

    #[test]
    fn ends() {
        let mut column = letters();
        column.push_front("c").unwrap();
        assert_eq!(column.codes(), &[3, 2, 1, 2, 0]);
        assert_eq!(column.pop(), Some(None));
        assert_eq!(column.pop_front(), Some(Some("c")));
        assert_eq!(column.len(), 3);
        column.clear();
        assert_eq!(column.pop(), None);
        assert_eq!(column.pop_front(), None);
    }

    #[test]
    fn equality_by_value() {
        let a = PooledVec::<&str, u16>::from_parts(vec![1, 2], vec!["x", "y"]).unwrap();
        let b = PooledVec::<&str, u16>::from_parts(vec![2, 1], vec!["y", "x"]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, letters());
    }

    #[test]
    fn heap_size() {
        let column = PooledVec::<u64, u16>::from_parts(vec![1; 10], vec![5]).unwrap();
        assert_eq!(column.heap_size(), (28, 28));
    }
}
