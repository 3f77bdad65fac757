//! A vector of values, any of which may be missing.

use crate::mask::Mask;
use crate::select::Selector;
use crate::{Clear, Error, HeapSize, Index, IndexMut, Len, PoolValue, Push, Result};

/// A stand-in for `Vec<Option<T>>` that keeps values and missingness apart.
///
/// The values live densely in `data`, and `mask` holds one bit per element that
/// is set when the element is missing. The two always have the same length.
/// Slots under a set bit hold the base value `T::default()` (or whatever was
/// supplied to `from_parts`), and are never read as meaningful.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Parts<T>"))]
#[derive(Clone, Debug)]
pub struct DataVec<T> {
    data: Vec<T>,
    mask: Mask,
}

impl<T> DataVec<T> {
    pub fn new() -> Self {
        Self { data: Vec::new(), mask: Mask::new() }
    }

    /// Assembles a vector from raw values and a mask of missing positions.
    ///
    /// Fails with `Error::LengthMismatch` unless both have the same length.
    pub fn from_parts(data: Vec<T>, mask: impl IntoIterator<Item=bool>) -> Result<Self> {
        Self::from_mask(data, mask.into_iter().collect())
    }

    pub(crate) fn from_mask(data: Vec<T>, mask: Mask) -> Result<Self> {
        if data.len() != mask.len() {
            return Err(Error::LengthMismatch { expected: data.len(), found: mask.len() });
        }
        Ok(Self { data, mask })
    }

    /// The raw values, including placeholders under missing positions.
    #[inline(always)] pub fn data(&self) -> &[T] { &self.data }
    #[inline(always)] pub fn mask(&self) -> &Mask { &self.mask }
    pub fn into_parts(self) -> (Vec<T>, Mask) { (self.data, self.mask) }

    /// A copy of the mask, `true` at each missing position.
    pub fn is_na_mask(&self) -> Vec<bool> {
        self.mask.iter().collect()
    }
    /// The number of missing elements.
    pub fn na_count(&self) -> usize {
        self.mask.count_ones()
    }

    /// Removes the last element, returning `Some(None)` if it was missing.
    pub fn pop(&mut self) -> Option<Option<T>> {
        let value = self.data.pop()?;
        let missing = self.mask.pop()?;
        Some(if missing { None } else { Some(value) })
    }

    /// Removes the first element, returning `Some(None)` if it was missing.
    pub fn pop_front(&mut self) -> Option<Option<T>> {
        if self.is_empty() {
            return None;
        }
        let value = self.data.remove(0);
        let missing = self.mask.remove(0);
        Some(if missing { None } else { Some(value) })
    }
}

impl<T: Default> DataVec<T> {
    /// A vector of `len` missing elements.
    pub fn all_na(len: usize) -> Self {
        let mut data = Vec::with_capacity(len);
        data.resize_with(len, T::default);
        Self { data, mask: Mask::repeat(true, len) }
    }

    /// Inserts an element at the front, shifting the rest back by one.
    pub fn push_front(&mut self, item: impl Into<Option<T>>) {
        let (value, missing) = match item.into() {
            Some(value) => (value, false),
            None => (T::default(), true),
        };
        self.data.insert(0, value);
        self.mask.insert(0, missing);
    }
}

impl<T: Clone> DataVec<T> {
    /// All values, failing with `Error::HasMissingValue` at the first missing one.
    pub fn fail_na(&self) -> Result<Vec<T>> {
        match self.mask.first_one() {
            Some(index) => Err(Error::HasMissingValue { index }),
            None => Ok(self.data.clone()),
        }
    }
    /// The present values, in order.
    pub fn drop_na(&self) -> Vec<T> {
        self.iter_skip_na().cloned().collect()
    }
    /// All values, with `default` in place of each missing one.
    pub fn replace_na(&self, default: T) -> Vec<T> {
        self.iter()
            .map(|item| item.cloned().unwrap_or_else(|| default.clone()))
            .collect()
    }

    /// A new vector of the selected elements, in selection order.
    pub fn select<S: Selector + ?Sized>(&self, selection: &S) -> Result<Self> {
        let positions = selection.positions(self.len())?;
        let data = positions.iter().map(|index| self.data[*index].clone()).collect();
        let mask = positions.iter().map(|index| self.mask.get(*index)).collect();
        Ok(Self { data, mask })
    }
}

impl<T: Clone + Default> DataVec<T> {
    /// Writes `values` to the selected positions, pairing them in order.
    ///
    /// Pairing stops at the shorter of the two. Positions are validated before
    /// anything is written.
    pub fn set_many<S, I>(&mut self, selection: &S, values: I) -> Result<()>
    where
        S: Selector + ?Sized,
        I: IntoIterator,
        I::Item: Into<Option<T>>,
    {
        let positions = selection.positions(self.len())?;
        for (index, item) in positions.into_iter().zip(values) {
            self.write(index, item.into());
        }
        Ok(())
    }

    /// Writes one value (or missing) to every selected position.
    pub fn fill<S: Selector + ?Sized>(&mut self, selection: &S, item: impl Into<Option<T>>) -> Result<()> {
        let positions = selection.positions(self.len())?;
        let item = item.into();
        for index in positions {
            self.write(index, item.clone());
        }
        Ok(())
    }
}

impl<T: Default> DataVec<T> {
    #[inline]
    fn write(&mut self, index: usize, item: Option<T>) {
        match item {
            Some(value) => {
                self.data[index] = value;
                self.mask.set(index, false);
            }
            None => {
                self.data[index] = T::default();
                self.mask.set(index, true);
            }
        }
    }
}

impl<T: PoolValue> DataVec<T> {
    /// The distinct present values in ascending order, followed by a missing
    /// element if any element is missing.
    pub fn unique(&self) -> Self {
        let mut distinct: Vec<&T> = self.iter_skip_na().collect();
        distinct.sort_by(|a, b| a.pool_cmp(b));
        distinct.dedup_by(|a, b| a.pool_eq(b));
        let mut result: Self = distinct.into_iter().cloned().collect::<Vec<_>>().into();
        if self.any_na() {
            result.push(None::<T>);
        }
        result
    }
}

impl<T> Default for DataVec<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Len for DataVec<T> {
    #[inline(always)] fn len(&self) -> usize { self.data.len() }
}

impl<T> Index for DataVec<T> {
    type Ref<'a> = &'a T where T: 'a;
    #[inline(always)]
    fn at(&self, index: usize) -> Option<Self::Ref<'_>> {
        if self.mask.get(index) { None } else { Some(&self.data[index]) }
    }
    #[inline(always)]
    fn any_na(&self) -> bool { self.mask.any() }
}

impl<T: Default> IndexMut<T> for DataVec<T> {
    fn set(&mut self, index: usize, item: impl Into<Option<T>>) -> Result<()> {
        if index >= self.len() {
            return Err(Error::IndexOutOfBounds { index, len: self.len() });
        }
        self.write(index, item.into());
        Ok(())
    }
}

impl<T: Default, I: Into<Option<T>>> Push<I> for DataVec<T> {
    #[inline]
    fn push(&mut self, item: I) {
        match item.into() {
            Some(value) => {
                self.data.push(value);
                self.mask.push(false);
            }
            None => {
                self.data.push(T::default());
                self.mask.push(true);
            }
        }
    }
}

impl<T> Clear for DataVec<T> {
    fn clear(&mut self) {
        self.data.clear();
        self.mask.clear();
    }
}

impl<T: HeapSize> HeapSize for DataVec<T> {
    fn heap_size(&self) -> (usize, usize) {
        let (l0, c0) = self.data.heap_size();
        let (l1, c1) = self.mask.heap_size();
        (l0 + l1, c0 + c1)
    }
}

// Raw slots under the mask are ignored: missing equals missing.
impl<T: PartialEq> PartialEq for DataVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> From<Vec<T>> for DataVec<T> {
    fn from(data: Vec<T>) -> Self {
        let mask = Mask::repeat(false, data.len());
        Self { data, mask }
    }
}

impl<T: Default> FromIterator<Option<T>> for DataVec<T> {
    fn from_iter<I: IntoIterator<Item=Option<T>>>(iter: I) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct Parts<T> {
    data: Vec<T>,
    mask: Mask,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<Parts<T>> for DataVec<T> {
    type Error = Error;
    fn try_from(parts: Parts<T>) -> Result<Self> {
        Self::from_mask(parts.data, parts.mask)
    }
}
