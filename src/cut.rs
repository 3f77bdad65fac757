//! Bucketing numeric values into labelled intervals.
//!
//! Breakpoints `b0 < b1 < .. < bn` define the intervals `[b0,b1]`, `(b1,b2]`, ..,
//! `(bn-1,bn]`. The result is a pooled vector of interval labels whose pool lists
//! the intervals in order, so that code `k` is the `k`-th interval.

use std::cmp::Ordering;
use std::fmt::Display;

use smallvec::SmallVec;

use crate::{Code, DataVec, Error, Index, PooledVec, Result};

type Breaks<T> = SmallVec<[T; 8]>;

/// Whether `value` is ordered against itself, which rules out `NaN`.
#[inline(always)]
fn comparable<T: PartialOrd>(value: &T) -> bool {
    value.partial_cmp(value).is_some()
}

fn interval_labels<T: Display>(breaks: &[T]) -> Vec<String> {
    breaks
        .windows(2)
        .enumerate()
        .map(|(index, pair)| {
            let open = if index == 0 { '[' } else { '(' };
            format!("{}{},{}]", open, pair[0], pair[1])
        })
        .collect()
}

fn cut_items<T, C, I>(items: I, breaks: &[T]) -> Result<PooledVec<String, C>>
where
    T: Copy + PartialOrd + Display,
    C: Code,
    I: Iterator<Item=Option<T>> + Clone,
{
    let present = items.clone().flatten().filter(comparable);
    let (min, max) = present.fold((None, None), |(min, max): (Option<T>, Option<T>), value| {
        let min = match min { Some(m) if m <= value => Some(m), _ => Some(value) };
        let max = match max { Some(m) if m >= value => Some(m), _ => Some(value) };
        (min, max)
    });

    let mut points: Breaks<T> = breaks.iter().copied().filter(comparable).collect();
    points.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    points.dedup_by(|a, b| a == b);
    if let Some(min) = min {
        if points.first().map_or(true, |first| min < *first) {
            points.insert(0, min);
        }
    }
    if let Some(max) = max {
        if points.last().map_or(true, |last| max > *last) {
            points.push(max);
        }
    }
    // A lone breakpoint still bounds one (degenerate) interval.
    if let [only] = points[..] {
        points.push(only);
    }

    let intervals = points.len().saturating_sub(1);
    if intervals > C::MAX {
        return Err(Error::PoolOverflow { size: intervals, max: C::MAX });
    }
    log::debug!("cutting at {} breakpoints into {} intervals", points.len(), intervals);

    let codes = items
        .map(|item| match item {
            Some(value) if comparable(&value) => {
                if Some(value) == min {
                    C::from_position(0)
                } else {
                    let slot = points.partition_point(|point| *point < value);
                    C::from_position(slot.max(1) - 1)
                }
            }
            _ => C::NA,
        })
        .collect();
    PooledVec::from_parts(codes, interval_labels(&points))
}

/// Labels each value with the interval of `breaks` that contains it.
///
/// The breakpoints are sorted and deduplicated, and extended by the smallest
/// and largest values if those fall outside them. The smallest value always
/// lands in the first interval; any other value lands in the interval closed at
/// the first breakpoint at or above it. Values not ordered against themselves,
/// such as `NaN`, are missing in the result.
pub fn cut<T, C>(values: &[T], breaks: &[T]) -> Result<PooledVec<String, C>>
where
    T: Copy + PartialOrd + Display,
    C: Code,
{
    cut_items(values.iter().copied().map(Some), breaks)
}

/// Labels each value with one of `ngroups` quantile intervals.
///
/// The breakpoints are the `k / ngroups` quantiles of the non-`NaN` values, for
/// `k` from `0` to `ngroups`, interpolating linearly between order statistics.
/// Repeated values can merge quantiles, leaving fewer intervals than requested.
pub fn cut_groups<C: Code>(values: &[f64], ngroups: usize) -> Result<PooledVec<String, C>> {
    if ngroups == 0 {
        return Err(Error::InvalidGroupCount(ngroups));
    }
    let breaks = quantiles(values, ngroups);
    cut(values, &breaks)
}

fn quantiles(values: &[f64], ngroups: usize) -> Breaks<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|value| !value.is_nan()).collect();
    if sorted.is_empty() {
        return Breaks::new();
    }
    sorted.sort_by(f64::total_cmp);
    let last = (sorted.len() - 1) as f64;
    (0 ..= ngroups)
        .map(|k| {
            let rank = last * k as f64 / ngroups as f64;
            let lower = rank.floor() as usize;
            let upper = (lower + 1).min(sorted.len() - 1);
            sorted[lower] + (rank - lower as f64) * (sorted[upper] - sorted[lower])
        })
        .collect()
}

impl<T: Copy + PartialOrd + Display> DataVec<T> {
    /// Labels each element with the interval of `breaks` that contains it, as `cut` does.
    ///
    /// Missing elements stay missing.
    pub fn cut(&self, breaks: &[T]) -> Result<PooledVec<String>> {
        cut_items(self.iter().map(|item| item.copied()), breaks)
    }
}
