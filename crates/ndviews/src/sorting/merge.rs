//! Stable mergesort.
//!
//! Top-down with a scratch copy of the input: each level sorts the halves of
//! one buffer using the other as workspace, then merges back. The merge is
//! omitted when the lower half's last element is not greater than the upper
//! half's first, which makes already-sorted input linear.

use std::cmp::Ordering;

use super::insertion_sort;

/// Stable sort of `x`. Runs shorter than `cutoff` are insertion-sorted.
pub(crate) fn mergesort_slice<T, F>(x: &mut [T], cutoff: usize, cmp: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    if x.len() < 2 {
        return;
    }
    let mut scratch = x.to_vec();
    merge_rec(&mut scratch, x, cutoff.max(2), cmp);
}

/// Sort `dest`; `src` holds the same elements on entry and is clobbered.
fn merge_rec<T, F>(src: &mut [T], dest: &mut [T], cutoff: usize, cmp: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = dest.len();
    if len < cutoff {
        insertion_sort(dest, cmp);
        return;
    }

    let mid = len / 2;
    {
        let (dest_lo, dest_hi) = dest.split_at_mut(mid);
        let (src_lo, src_hi) = src.split_at_mut(mid);
        merge_rec(dest_lo, src_lo, cutoff, cmp);
        merge_rec(dest_hi, src_hi, cutoff, cmp);
    }

    // Halves of `src` are sorted. Skip the merge if they are already in order.
    if cmp(&src[mid - 1], &src[mid]) != Ordering::Greater {
        dest.clone_from_slice(src);
        return;
    }

    let (mut p, mut q) = (0, mid);
    for slot in dest.iter_mut() {
        // Take from the lower half on ties to keep the sort stable.
        let take_lower = q >= len || (p < mid && cmp(&src[p], &src[q]) != Ordering::Greater);
        if take_lower {
            *slot = src[p].clone();
            p += 1;
        } else {
            *slot = src[q].clone();
            q += 1;
        }
    }
}
