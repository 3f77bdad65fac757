//! Frequency tables over columns.

use crate::encode::PoolLookup;
use crate::{Code, DataVec, Index, PoolValue, PooledVec};

/// Counts of each observed value, and of missing elements.
///
/// Entries are ordered by value ascending, with the missing entry (if any
/// element was missing) last. Only observed values have entries, and the
/// counts sum to the length of the counted column.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table<T> {
    entries: Vec<(Option<T>, usize)>,
}

impl<T: PoolValue> Table<T> {
    /// Builds a table from a pool, a count per pool position, and a missing count.
    ///
    /// `lookup` orders the pool by value. Positions with a zero count are left out.
    fn from_counts(pool: &[T], counts: &[usize], lookup: &PoolLookup, missing: usize) -> Self {
        let mut entries: Vec<(Option<T>, usize)> = lookup
            .positions()
            .iter()
            .filter(|position| counts[**position] > 0)
            .map(|position| (Some(pool[*position].clone()), counts[*position]))
            .collect();
        if missing > 0 {
            entries.push((None, missing));
        }
        Self { entries }
    }

    /// The count for `value`, where `None` asks for the missing count.
    pub fn get(&self, value: Option<&T>) -> usize {
        match value {
            Some(value) => self.entries
                .binary_search_by(|(key, _)| match key {
                    Some(key) => key.pool_cmp(value),
                    None => std::cmp::Ordering::Greater,
                })
                .map(|slot| self.entries[slot].1)
                .unwrap_or(0),
            None => self.entries
                .last()
                .filter(|(key, _)| key.is_none())
                .map(|(_, count)| *count)
                .unwrap_or(0),
        }
    }
}

impl<T> Table<T> {
    /// The entries in order, each a value (or `None` for missing) and its count.
    pub fn iter(&self) -> impl Iterator<Item=(Option<&T>, usize)> + '_ {
        self.entries.iter().map(|(key, count)| (key.as_ref(), *count))
    }
    /// The number of distinct entries.
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    /// The sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
    pub fn into_entries(self) -> Vec<(Option<T>, usize)> { self.entries }
}

impl<T: PoolValue> DataVec<T> {
    /// Counts each distinct value and the missing elements, in one pass.
    ///
    /// Working space grows with the number of distinct values, not the length.
    pub fn table(&self) -> Table<T> {
        let mut pool: Vec<T> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        let mut lookup = PoolLookup::new(&pool);
        for value in self.iter_skip_na() {
            match lookup.find(&pool, value) {
                Ok(position) => counts[position] += 1,
                Err(slot) => {
                    lookup.insert(slot, pool.len());
                    pool.push(value.clone());
                    counts.push(1);
                }
            }
        }
        Table::from_counts(&pool, &counts, &lookup, self.na_count())
    }
}

impl<T: PoolValue, C: Code> PooledVec<T, C> {
    /// Counts each distinct value and the missing elements, in one pass over the codes.
    ///
    /// Pool entries no code references are left out.
    pub fn table(&self) -> Table<T> {
        let mut counts = vec![0usize; self.pool().len() + 1];
        for code in self.codes() {
            counts[code.as_usize()] += 1;
        }
        let lookup = PoolLookup::new(self.pool());
        Table::from_counts(self.pool(), &counts[1 ..], &lookup, counts[0])
    }
}
