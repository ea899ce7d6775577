//! Sorting, searching and shuffling over closed ranges `[from, to]`.
//!
//! ```text
//! sort_range(data, from, to)          adaptive
//!     N = to - from + 1, quick_cost = N log2 N
//!     discrete keys with width < counting_sort_max_width
//!     and max(width, N) < quick_cost  → counting sort
//!     otherwise                       → quicksort
//!
//! quicksort_by   Bentley-McIlroy 3-way, not stable
//! mergesort_by   stable, merge skipped for ordered halves
//! ```
//!
//! Array-level entry points live on [`NdArray`]: `sort_range`, `sort`,
//! `view_sorted` and `view_sorted_by_column`.

mod counting;
mod merge;
mod quick;
mod search;
mod shuffle;

use std::cmp::Ordering;

use crate::array::NdArray;
use crate::config::{DEFAULT_INSERTION_SORT_CUTOFF, EngineConfig};
use crate::error::{ArrayError, Result};
use crate::scalar::{Scalar, SortKey};
use crate::storage::Storage;

pub use search::{binary_search, binary_search_by};
pub use shuffle::shuffle;

/// Algorithm chosen by the adaptive sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAlgorithm {
    Counting,
    Quick,
}

/// Validate a closed range `[from, to]` over `len` elements.
pub(crate) fn check_range(len: usize, from: usize, to: usize) -> Result<()> {
    if to >= len {
        return Err(ArrayError::OutOfRange {
            index: to,
            dim: 0,
            size: len,
        });
    }
    if from > to {
        return Err(ArrayError::SliceOutOfBounds {
            start: from,
            end: to + 1,
            dim: 0,
            size: len,
        });
    }
    Ok(())
}

/// Total order over `PartialOrd` values; incomparable pairs count as equal.
#[inline]
pub(crate) fn partial_order<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Stable for equal keys: insertion only moves strictly greater elements.
pub(crate) fn insertion_sort<T, F>(x: &mut [T], cmp: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..x.len() {
        let mut j = i;
        while j > 0 && cmp(&x[j - 1], &x[j]) == Ordering::Greater {
            x.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Quicksort `data[from..=to]` with a comparator. Not stable.
///
/// # Errors
///
/// Returns `OutOfRange` or `SliceOutOfBounds` for an invalid range.
pub fn quicksort_by<T, F>(data: &mut [T], from: usize, to: usize, mut cmp: F) -> Result<()>
where
    F: FnMut(&T, &T) -> Ordering,
{
    check_range(data.len(), from, to)?;
    quick::quicksort_slice(&mut data[from..=to], DEFAULT_INSERTION_SORT_CUTOFF, &mut cmp);
    Ok(())
}

/// Stable mergesort of `data[from..=to]` with a comparator.
///
/// # Example
///
/// ```
/// use ndviews::sorting::mergesort_by;
///
/// let mut people = vec![("bo", 30), ("al", 25), ("cy", 30), ("di", 25)];
/// mergesort_by(&mut people, 0, 3, |a, b| a.1.cmp(&b.1)).unwrap();
/// assert_eq!(people, vec![("al", 25), ("di", 25), ("bo", 30), ("cy", 30)]);
/// ```
pub fn mergesort_by<T, F>(data: &mut [T], from: usize, to: usize, cmp: F) -> Result<()>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    mergesort_by_with(&EngineConfig::default(), data, from, to, cmp)
}

/// [`mergesort_by`] with an explicit configuration.
pub fn mergesort_by_with<T, F>(
    config: &EngineConfig,
    data: &mut [T],
    from: usize,
    to: usize,
    mut cmp: F,
) -> Result<()>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    check_range(data.len(), from, to)?;
    merge::mergesort_slice(&mut data[from..=to], config.insertion_sort_cutoff, &mut cmp);
    Ok(())
}

/// Counting sort of `data[from..=to]`.
///
/// Elements without a discrete key cannot be counted; such ranges are
/// quicksorted instead.
pub fn counting_sort<T: SortKey>(data: &mut [T], from: usize, to: usize) -> Result<()> {
    check_range(data.len(), from, to)?;
    let run = &mut data[from..=to];
    match counting::key_bounds(run) {
        Some((min, max)) => counting::counting_sort_slice(run, min, max),
        None => {
            tracing::debug!("no discrete keys; counting sort falls back to quicksort");
            quick::quicksort_slice(run, DEFAULT_INSERTION_SORT_CUTOFF, &mut partial_order);
        }
    }
    Ok(())
}

/// Pick counting sort or quicksort for `run` and return the key bounds when
/// counting sort wins.
fn choose_algorithm<T: SortKey>(config: &EngineConfig, run: &[T]) -> (SortAlgorithm, Option<(i64, i64)>) {
    let n = run.len();
    let quick_cost = n as f64 * (n as f64).log2();
    if let Some((min, max)) = counting::key_bounds(run) {
        let width = counting::key_width(min, max);
        let counting_cost = width.max(n as u64) as f64;
        if width < config.counting_sort_max_width as u64 && counting_cost < quick_cost {
            return (SortAlgorithm::Counting, Some((min, max)));
        }
    }
    (SortAlgorithm::Quick, None)
}

/// Adaptive sort of `data[from..=to]`. Returns the algorithm used.
///
/// # Example
///
/// ```
/// use ndviews::sorting::{SortAlgorithm, sort_range};
///
/// let mut bytes = [5u8, 3, 3, 1, 2];
/// assert_eq!(sort_range(&mut bytes, 0, 4).unwrap(), SortAlgorithm::Counting);
/// assert_eq!(bytes, [1, 2, 3, 3, 5]);
///
/// let mut floats = [2.5, -1.0, 0.0];
/// assert_eq!(sort_range(&mut floats, 0, 2).unwrap(), SortAlgorithm::Quick);
/// ```
pub fn sort_range<T: SortKey>(data: &mut [T], from: usize, to: usize) -> Result<SortAlgorithm> {
    sort_range_with(&EngineConfig::default(), data, from, to)
}

/// [`sort_range`] with an explicit configuration.
pub fn sort_range_with<T: SortKey>(
    config: &EngineConfig,
    data: &mut [T],
    from: usize,
    to: usize,
) -> Result<SortAlgorithm> {
    check_range(data.len(), from, to)?;
    let run = &mut data[from..=to];
    let (algorithm, bounds) = choose_algorithm(config, run);
    tracing::debug!(len = run.len(), ?algorithm, "sort algorithm selected");
    match bounds {
        Some((min, max)) => counting::counting_sort_slice(run, min, max),
        None => quick::quicksort_slice(run, config.insertion_sort_cutoff, &mut partial_order),
    }
    Ok(algorithm)
}

/// Row order that stably sorts `keys`.
fn stable_order<T: SortKey>(config: &EngineConfig, keys: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    if order.len() > 1 {
        merge::mergesort_slice(&mut order, config.insertion_sort_cutoff, &mut |i: &usize, j: &usize| {
            partial_order(&keys[*i], &keys[*j])
        });
    }
    order
}

impl<T: SortKey> NdArray<T> {
    /// Adaptive in-place sort of elements `from..=to` of a vector.
    ///
    /// Contiguous dense vectors are sorted directly in storage; other
    /// layouts are gathered, sorted and written back.
    ///
    /// # Errors
    ///
    /// Returns `RankMismatch` for non-vectors and `OutOfRange` or
    /// `SliceOutOfBounds` for an invalid range.
    pub fn sort_range(&mut self, from: usize, to: usize) -> Result<SortAlgorithm> {
        self.sort_range_with(&EngineConfig::default(), from, to)
    }

    /// [`NdArray::sort_range`] with an explicit configuration.
    pub fn sort_range_with(&mut self, config: &EngineConfig, from: usize, to: usize) -> Result<SortAlgorithm> {
        if self.ndim() != 1 {
            return Err(ArrayError::RankMismatch {
                expected: 1,
                actual: self.ndim(),
            });
        }
        check_range(self.size(), from, to)?;
        if let Storage::Dense(cells) = self.storage() {
            if let Some((start, _)) = self.layout().contiguous_run() {
                let mut cells = cells.borrow_mut();
                let run = &mut cells.as_mut_slice()[start + from..=start + to];
                let last = run.len() - 1;
                return sort_range_with(config, run, 0, last);
            }
        }
        let mut part = self.sub_range(from, to)?;
        let mut values = part.to_vec();
        let last = values.len() - 1;
        let algorithm = sort_range_with(config, &mut values, 0, last)?;
        part.assign_slice(&values)?;
        Ok(algorithm)
    }

    /// Sort a whole vector in place. Empty vectors are left alone.
    pub fn sort(&mut self) -> Result<()> {
        if self.ndim() == 1 && self.is_empty() {
            return Ok(());
        }
        let last = self.size().saturating_sub(1);
        self.sort_range(0, last).map(|_| ())
    }

    /// Stably sorted selection view of a vector. No element is copied.
    ///
    /// # Example
    ///
    /// ```
    /// use ndviews::NdArray;
    ///
    /// let a = NdArray::from_vec(vec![3, 1, 2], &[3]).unwrap();
    /// let s = a.view_sorted().unwrap();
    /// assert_eq!(s.to_vec(), vec![1, 2, 3]);
    /// assert_eq!(a.to_vec(), vec![3, 1, 2]);
    /// ```
    pub fn view_sorted(&self) -> Result<Self> {
        self.view_sorted_with(&EngineConfig::default())
    }

    pub fn view_sorted_with(&self, config: &EngineConfig) -> Result<Self> {
        if self.ndim() != 1 {
            return Err(ArrayError::RankMismatch {
                expected: 1,
                actual: self.ndim(),
            });
        }
        let order = stable_order(config, &self.to_vec());
        self.select_indices(0, &order)
    }

    /// Matrix view with rows stably reordered by the values in `column`.
    pub fn view_sorted_by_column(&self, column: usize) -> Result<Self> {
        let keys = self.column(column)?.to_vec();
        let order = stable_order(&EngineConfig::default(), &keys);
        self.select_indices(0, &order)
    }
}

// Shuffling needs no ordering.
impl<T: Scalar> NdArray<T> {
    /// Randomly permute the elements of a vector in place.
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if self.ndim() != 1 {
            return Err(ArrayError::RankMismatch {
                expected: 1,
                actual: self.ndim(),
            });
        }
        if self.size() < 2 {
            return Ok(());
        }
        let mut values = self.to_vec();
        let last = values.len() - 1;
        shuffle(&mut values, 0, last, rng)?;
        self.assign_slice(&values)
    }
}
