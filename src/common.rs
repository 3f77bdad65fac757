//! Common traits that are re-used throughout the crate.
//!
//! Both vector kinds present the same surface: a length, positional reads that
//! return either a value or `None` for missing, positional writes that accept
//! either, and lazy iteration under a choice of missing-value strategies.

use crate::iter::{FailNa, Iter, ReplaceNa, SkipNa};
use crate::{Error, Result};

/// A type with a length.
pub trait Len {
    /// The number of contained elements.
    fn len(&self) -> usize;
    /// Whether this contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: Len + ?Sized> Len for &L {
    #[inline(always)] fn len(&self) -> usize { L::len(*self) }
}
impl<L: Len + ?Sized> Len for &mut L {
    #[inline(always)] fn len(&self) -> usize { L::len(*self) }
}
impl<T> Len for Vec<T> {
    #[inline(always)] fn len(&self) -> usize { self.len() }
}
impl<T> Len for [T] {
    #[inline(always)] fn len(&self) -> usize { <[T]>::len(self) }
}

/// A type that can accept items of type `T`.
pub trait Push<T> {
    /// Pushes an item onto `self`.
    fn push(&mut self, item: T);
    /// Pushes elements of an iterator onto `self`.
    #[inline(always)] fn extend(&mut self, iter: impl IntoIterator<Item=T>) {
        for item in iter {
            self.push(item);
        }
    }
}

/// A type whose elements can be read by position, each either present or missing.
pub trait Index : Len {
    /// Type referencing a present element.
    type Ref<'a> where Self: 'a;

    /// The element at `index`, or `None` if it is missing.
    ///
    /// Panics if `index` is out of bounds; see `get` for the checked form.
    fn at(&self, index: usize) -> Option<Self::Ref<'_>>;

    /// The element at `index`, or `None` if it is missing.
    #[inline]
    fn get(&self, index: usize) -> Result<Option<Self::Ref<'_>>> {
        if index < self.len() {
            Ok(self.at(index))
        } else {
            Err(Error::IndexOutOfBounds { index, len: self.len() })
        }
    }

    /// Whether the element at `index` is missing.
    #[inline]
    fn is_na(&self, index: usize) -> Result<bool> {
        self.get(index).map(|item| item.is_none())
    }

    /// Whether any element is missing, stopping at the first one found.
    fn any_na(&self) -> bool {
        (0 .. self.len()).any(|index| self.at(index).is_none())
    }

    /// An iterator over all elements, missing ones as `None`.
    #[inline(always)]
    fn iter(&self) -> Iter<'_, Self> {
        Iter::new(self)
    }
    /// An iterator that yields an error at the first missing element, and then stops.
    #[inline(always)]
    fn iter_fail_na(&self) -> FailNa<'_, Self> {
        FailNa::new(self)
    }
    /// An iterator over present elements only.
    #[inline(always)]
    fn iter_skip_na(&self) -> SkipNa<'_, Self> {
        SkipNa::new(self)
    }
    /// An iterator that yields `default` in place of each missing element.
    #[inline(always)]
    fn iter_replace_na<'a>(&'a self, default: Self::Ref<'a>) -> ReplaceNa<'a, Self> {
        ReplaceNa::new(self, default)
    }
}

/// A type whose elements can be overwritten by position with a value or a missing marker.
pub trait IndexMut<T> : Index {
    /// Writes `item` at `index`, where `None` (or `NA`) marks the position missing.
    ///
    /// Fails with `Error::IndexOutOfBounds` and leaves `self` unchanged if `index` is out of bounds.
    fn set(&mut self, index: usize, item: impl Into<Option<T>>) -> Result<()>;
}

/// A type that can remove its contents and return to an empty state.
pub trait Clear {
    /// Clears `self`, without changing its capacity.
    fn clear(&mut self);
}
impl<T> Clear for Vec<T> {
    #[inline(always)] fn clear(&mut self) { self.clear() }
}

pub trait HeapSize {
    /// Active (len) and allocated (cap) heap sizes in bytes.
    /// This should not include the size of `self` itself.
    fn heap_size(&self) -> (usize, usize) { (0, 0) }
}

impl HeapSize for String {
    fn heap_size(&self) -> (usize, usize) {
        (self.len(), self.capacity())
    }
}
impl HeapSize for &str { }

// This implementation chases down the heap contributions of owned items,
// which matters for pools and vectors of strings.
impl<T: HeapSize> HeapSize for Vec<T> {
    fn heap_size(&self) -> (usize, usize) {
        let mut l = std::mem::size_of::<T>() * self.len();
        let mut c = std::mem::size_of::<T>() * self.capacity();
        for item in self.iter() {
            let (il, ic) = item.heap_size();
            l += il;
            c += ic;
        }
        (l, c)
    }
}

macro_rules! implement_heapsize {
    ($($index_type:ty),*) => { $(
        impl HeapSize for $index_type { }
    )* }
}

implement_heapsize!(u8, u16, u32, u64, u128, usize);
implement_heapsize!(i8, i16, i32, i64, i128, isize);
implement_heapsize!(f32, f64, bool, char, ());
