//! Counting sort for element types with small discrete value ranges.

use crate::scalar::SortKey;

/// Inclusive `(min, max)` of the discrete keys of `x`.
///
/// Returns `None` if `x` is empty or any element has no discrete key.
pub(crate) fn key_bounds<T: SortKey>(x: &[T]) -> Option<(i64, i64)> {
    let mut keys = x.iter().map(T::discrete_key);
    let first = keys.next()??;
    keys.try_fold((first, first), |(lo, hi), k| {
        let k = k?;
        Some((lo.min(k), hi.max(k)))
    })
}

/// Number of distinct values between `min` and `max`, inclusive, saturating.
pub(crate) fn key_width(min: i64, max: i64) -> u64 {
    u64::try_from(i128::from(max) - i128::from(min) + 1).unwrap_or(u64::MAX)
}

/// Sort `x`, whose keys all lie in `min..=max`, in O(width + n).
///
/// Equal keys are indistinguishable values, so the output is trivially
/// stable.
pub(crate) fn counting_sort_slice<T: SortKey>(x: &mut [T], min: i64, max: i64) {
    let width = key_width(min, max) as usize;
    let mut counts = vec![0usize; width];
    for v in x.iter() {
        if let Some(k) = v.discrete_key() {
            counts[(k - min) as usize] += 1;
        }
    }
    let mut out = x.iter_mut();
    for (offset, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let value = T::from_discrete_key(min + offset as i64);
        for slot in out.by_ref().take(count) {
            *slot = value;
        }
    }
}
