//! Building pools and codes from raw values.
//!
//! Every builder here produces a pool of distinct values sorted by `pool_cmp`,
//! and codes that reference it (`0` for missing). The pool depends only on the
//! set of distinct values, never on their order or multiplicity in the input.

use crate::{Code, Error, Index, PoolValue, PooledVec, Result};

/// A sorted view over a pool, for finding values by binary search.
///
/// The pool itself keeps its order; `order` lists pool positions sorted by value.
/// It is built for the duration of a bulk operation and kept in step with any
/// values appended through `intern`.
pub(crate) struct PoolLookup {
    order: Vec<usize>,
}

impl PoolLookup {
    pub(crate) fn new<T: PoolValue>(pool: &[T]) -> Self {
        let mut order: Vec<usize> = (0 .. pool.len()).collect();
        order.sort_by(|a, b| pool[*a].pool_cmp(&pool[*b]));
        Self { order }
    }

    /// Pool positions in ascending value order, equal values by position.
    pub(crate) fn positions(&self) -> &[usize] {
        &self.order
    }

    /// The pool position of `value`, or the slot in `order` where it would go.
    pub(crate) fn find<T: PoolValue>(&self, pool: &[T], value: &T) -> std::result::Result<usize, usize> {
        self.order
            .binary_search_by(|position| pool[*position].pool_cmp(value))
            .map(|slot| self.order[slot])
    }

    /// Records that the value at pool `position` sorts at `slot`, as returned by `find`.
    pub(crate) fn insert(&mut self, slot: usize, position: usize) {
        self.order.insert(slot, position);
    }

    /// The pool position of `value`, appending it to `pool` if absent.
    pub(crate) fn intern<T: PoolValue, C: Code>(&mut self, pool: &mut Vec<T>, value: T) -> Result<usize> {
        match self.find(pool, &value) {
            Ok(position) => Ok(position),
            Err(slot) => {
                if pool.len() >= C::MAX {
                    return Err(Error::PoolOverflow { size: pool.len() + 1, max: C::MAX });
                }
                pool.push(value);
                self.insert(slot, pool.len() - 1);
                Ok(pool.len() - 1)
            }
        }
    }
}

/// Sorts and deduplicates values into a pool, checking it fits the code type.
fn sorted_pool<'a, T: PoolValue + 'a, C: Code>(values: impl IntoIterator<Item=&'a T>) -> Result<Vec<T>> {
    let mut distinct: Vec<&T> = values.into_iter().collect();
    distinct.sort_by(|a, b| a.pool_cmp(b));
    distinct.dedup_by(|a, b| a.pool_eq(b));
    if distinct.len() > C::MAX {
        return Err(Error::PoolOverflow { size: distinct.len(), max: C::MAX });
    }
    Ok(distinct.into_iter().cloned().collect())
}

/// Maps each item to its code against a sorted `pool`.
fn assign<'a, T: PoolValue + 'a, C: Code>(pool: &[T], items: impl Iterator<Item=Option<&'a T>>) -> Result<Vec<C>> {
    items
        .enumerate()
        .map(|(index, item)| match item {
            None => Ok(C::NA),
            Some(value) => pool
                .binary_search_by(|entry| entry.pool_cmp(value))
                .map(C::from_position)
                .map_err(|_| Error::ValueNotInPool { index }),
        })
        .collect()
}

fn from_items<'a, T, C, I>(items: I) -> Result<PooledVec<T, C>>
where
    T: PoolValue + 'a,
    C: Code,
    I: Iterator<Item=Option<&'a T>> + Clone,
{
    let pool = sorted_pool::<T, C>(items.clone().flatten())?;
    let codes = assign(&pool, items)?;
    log::debug!("encoded {} elements against a pool of {} values", codes.len(), pool.len());
    Ok(PooledVec::from_raw(codes, pool))
}

/// Encodes raw values, treating positions where `mask` is true as missing.
///
/// Fails with `Error::LengthMismatch` if the lengths differ, and with
/// `Error::PoolOverflow` if there are more distinct values than `C` can address.
pub fn build<T: PoolValue, C: Code>(values: &[T], mask: &[bool]) -> Result<PooledVec<T, C>> {
    if values.len() != mask.len() {
        return Err(Error::LengthMismatch { expected: values.len(), found: mask.len() });
    }
    from_items(values.iter().zip(mask).map(|(value, missing)| if *missing { None } else { Some(value) }))
}

/// Encodes raw values against a caller-supplied pool.
///
/// The pool is sorted and deduplicated first. The pool never grows: any present
/// value absent from it fails with `Error::ValueNotInPool`.
pub fn build_with_pool<T: PoolValue, C: Code>(values: &[T], pool: &[T], mask: &[bool]) -> Result<PooledVec<T, C>> {
    if values.len() != mask.len() {
        return Err(Error::LengthMismatch { expected: values.len(), found: mask.len() });
    }
    let pool = sorted_pool::<T, C>(pool)?;
    let items = values.iter().zip(mask).map(|(value, missing)| if *missing { None } else { Some(value) });
    let codes = assign(&pool, items)?;
    Ok(PooledVec::from_raw(codes, pool))
}

/// Encodes any column whose elements reference values of type `T`.
pub fn encode<'a, T, C, I>(column: &'a I) -> Result<PooledVec<T, C>>
where
    T: PoolValue + 'a,
    C: Code,
    I: Index<Ref<'a> = &'a T> + ?Sized,
{
    from_items(column.iter())
}

/// Encodes two columns against one shared pool.
///
/// The pool is the sorted union of the distinct present values of both
/// columns; missing elements are encoded as `0` and never enter the pool. Each
/// result owns its own copy of the pool, so the two can be mutated separately
/// afterwards, but their codes are directly comparable until then.
pub fn shared_pool<'a, T, C, A, B>(a: &'a A, b: &'a B) -> Result<(PooledVec<T, C>, PooledVec<T, C>)>
where
    T: PoolValue + 'a,
    C: Code,
    A: Index<Ref<'a> = &'a T> + ?Sized,
    B: Index<Ref<'a> = &'a T> + ?Sized,
{
    let pool = sorted_pool::<T, C>(a.iter().flatten().chain(b.iter().flatten()))?;
    let codes_a = assign(&pool, a.iter())?;
    let codes_b = assign(&pool, b.iter())?;
    log::debug!(
        "encoded {} and {} elements against a shared pool of {} values",
        codes_a.len(),
        codes_b.len(),
        pool.len(),
    );
    Ok((PooledVec::from_raw(codes_a, pool.clone()), PooledVec::from_raw(codes_b, pool)))
}
