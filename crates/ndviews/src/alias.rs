//! Alias detection and copy-on-conflict.
//!
//! Two handles alias when they refer to the same storage. The check is
//! conservative: offsets and strides are ignored, so disjoint views of one
//! owner still count as aliased. An operation writing into `dest` while
//! reading `src` resolves the source first; on conflict it works from a deep
//! copy, which makes the result equal to "read all of `src`, then write all
//! of `dest`".

use std::ops::Deref;

use crate::array::NdArray;
use crate::scalar::Scalar;

/// Outcome of comparing a destination with a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AliasCheck {
    Disjoint,
    Conflict,
}

pub(crate) fn check<T: Scalar>(dest: &NdArray<T>, src: &NdArray<T>) -> AliasCheck {
    if have_shared_cells(dest, src) {
        AliasCheck::Conflict
    } else {
        AliasCheck::Disjoint
    }
}

/// True if `a` and `b` could reference the same cells.
///
/// Never returns `false` for handles that do overlap.
///
/// # Examples
///
/// ```
/// use ndviews::NdArray;
/// use ndviews::alias::have_shared_cells;
///
/// let a = NdArray::from_vec(vec![1, 2, 3, 4], &[4]).unwrap();
/// let left = a.sub_range(0, 1).unwrap();
/// let right = a.sub_range(2, 3).unwrap();
/// assert!(have_shared_cells(&left, &right)); // conservative
/// assert!(!have_shared_cells(&a, &a.copy()));
/// ```
pub fn have_shared_cells<T: Scalar>(a: &NdArray<T>, b: &NdArray<T>) -> bool {
    a.shares_storage_with(b)
}

/// A source array safe to read while writing a destination.
#[derive(Debug)]
pub enum Resolved<'a, T: Scalar> {
    /// The original source; it does not alias the destination.
    Borrowed(&'a NdArray<T>),
    /// A private deep copy taken because the source aliased the destination.
    Copied(NdArray<T>),
}

impl<T: Scalar> Resolved<'_, T> {
    pub fn is_copied(&self) -> bool {
        matches!(self, Resolved::Copied(_))
    }
}

impl<T: Scalar> Deref for Resolved<'_, T> {
    type Target = NdArray<T>;

    fn deref(&self) -> &NdArray<T> {
        match self {
            Resolved::Borrowed(a) => a,
            Resolved::Copied(a) => a,
        }
    }
}

/// Return `src`, or a deep copy of it if it aliases `dest`.
pub fn resolve_source<'a, T: Scalar>(dest: &NdArray<T>, src: &'a NdArray<T>) -> Resolved<'a, T> {
    match check(dest, src) {
        AliasCheck::Disjoint => Resolved::Borrowed(src),
        AliasCheck::Conflict => {
            tracing::debug!(
                src_shape = ?src.shape(),
                src_kind = ?src.kind(),
                "source aliases destination; reading from a copy"
            );
            Resolved::Copied(src.copy())
        }
    }
}
