//! Quicksort with Bentley-McIlroy three-way partitioning.
//!
//! Keys equal to the pivot are gathered at both ends during the scan and
//! swapped to the middle afterwards, so runs of duplicates are never
//! recursed into. Not stable.

use std::cmp::Ordering;

use super::insertion_sort;

/// Sort `x` with `cmp`. Runs shorter than `cutoff` are insertion-sorted.
pub(crate) fn quicksort_slice<T, F>(mut x: &mut [T], cutoff: usize, cmp: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    loop {
        let len = x.len();
        if len < cutoff.max(2) {
            insertion_sort(x, cmp);
            return;
        }

        let m = choose_pivot(x, cmp);
        x.swap(0, m);

        // Invariant: x[1..a] == pivot, x[a..b] < pivot, x[c+1..=d] > pivot,
        // x[d+1..] == pivot.
        let (mut a, mut b) = (1, 1);
        let (mut c, mut d) = (len - 1, len - 1);
        loop {
            while b <= c {
                let r = cmp(&x[b], &x[0]);
                if r == Ordering::Greater {
                    break;
                }
                if r == Ordering::Equal {
                    x.swap(a, b);
                    a += 1;
                }
                b += 1;
            }
            while c >= b {
                let r = cmp(&x[c], &x[0]);
                if r == Ordering::Less {
                    break;
                }
                if r == Ordering::Equal {
                    x.swap(c, d);
                    d -= 1;
                }
                c -= 1;
            }
            if b > c {
                break;
            }
            x.swap(b, c);
            b += 1;
            c -= 1;
        }

        // Move the equal blocks from both ends into the middle.
        let s = a.min(b - a);
        swap_blocks(x, 0, b - s, s);
        let s = (d - c).min(len - 1 - d);
        swap_blocks(x, b, len - s, s);

        let lower = b - a;
        let upper = d - c;
        let (left, rest) = std::mem::take(&mut x).split_at_mut(lower);
        let rest_len = rest.len();
        let right = &mut rest[rest_len - upper..];

        // Recurse into the smaller side, iterate on the larger.
        if left.len() < right.len() {
            quicksort_slice(left, cutoff, cmp);
            x = right;
        } else {
            quicksort_slice(right, cutoff, cmp);
            x = left;
        }
    }
}

fn swap_blocks<T>(x: &mut [T], a: usize, b: usize, n: usize) {
    for i in 0..n {
        x.swap(a + i, b + i);
    }
}

fn median_of_three<T, F>(x: &[T], a: usize, b: usize, c: usize, cmp: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let ab = cmp(&x[a], &x[b]) == Ordering::Less;
    let bc = cmp(&x[b], &x[c]) == Ordering::Less;
    let ac = cmp(&x[a], &x[c]) == Ordering::Less;
    if ab {
        if bc {
            b
        } else if ac {
            c
        } else {
            a
        }
    } else if !bc {
        b
    } else if !ac {
        c
    } else {
        a
    }
}

/// Middle element for short runs, median of three for medium ones and
/// Tukey's ninther for long ones.
fn choose_pivot<T, F>(x: &[T], cmp: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = x.len();
    let mut m = len / 2;
    if len > 7 {
        let mut l = 0;
        let mut n = len - 1;
        if len > 40 {
            let s = len / 8;
            l = median_of_three(x, l, l + s, l + 2 * s, cmp);
            m = median_of_three(x, m - s, m, m + s, cmp);
            n = median_of_three(x, n - 2 * s, n - s, n, cmp);
        }
        m = median_of_three(x, l, m, n, cmp);
    }
    m
}
