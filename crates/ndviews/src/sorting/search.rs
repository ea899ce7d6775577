//! Binary search over a sorted closed range.

use std::cmp::Ordering;

use crate::error::Result;

use super::{check_range, partial_order};

/// Search sorted `data[from..=to]` for `key` using `cmp(element, key)`.
///
/// Returns the index of a matching element (any one, if there are
/// duplicates), or `-(insertion_point) - 1` where `insertion_point` is the
/// index of the first element greater than `key`, or `to + 1` if none is.
///
/// # Errors
///
/// Returns `OutOfRange` or `SliceOutOfBounds` for an invalid range.
pub fn binary_search_by<T, F>(data: &[T], from: usize, to: usize, mut cmp: F) -> Result<isize>
where
    F: FnMut(&T) -> Ordering,
{
    check_range(data.len(), from, to)?;
    let (mut lo, mut hi) = (from, to + 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match cmp(&data[mid]) {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Ok(mid as isize),
        }
    }
    Ok(-(lo as isize) - 1)
}

/// [`binary_search_by`] with the natural order of `T`.
///
/// # Example
///
/// ```
/// use ndviews::sorting::binary_search;
///
/// let data = [1, 3, 5, 7];
/// assert_eq!(binary_search(&data, 0, 3, &5).unwrap(), 2);
/// assert_eq!(binary_search(&data, 0, 3, &4).unwrap(), -3); // insert at 2
/// assert_eq!(binary_search(&data, 0, 3, &9).unwrap(), -5); // insert at 4
/// ```
pub fn binary_search<T: PartialOrd>(data: &[T], from: usize, to: usize, key: &T) -> Result<isize> {
    binary_search_by(data, from, to, |x| partial_order(x, key))
}
