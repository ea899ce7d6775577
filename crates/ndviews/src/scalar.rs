//! Scalar traits for array element types.

use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

use crate::backend::{GemmShape, faer_gemm_row_major};

pub use faer::c64;

/// Trait for element types supported by ndviews.
///
/// `zero()` is the identity element: sparse storage treats it as "absent"
/// and never materialises it.
pub trait Scalar:
    Copy
    + Debug
    + Default
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + 'static
{
    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }

    /// Returns the multiplicative identity (one).
    fn one() -> Self;

    /// Returns true if this value is the identity element.
    #[inline]
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Accelerated `dst = alpha * lhs * rhs + beta * dst` over contiguous
    /// row-major buffers.
    ///
    /// Returns `false` when the type has no accelerated backend, in which case
    /// `dst` is untouched and the caller runs the portable kernel.
    fn gemm_contiguous(
        _dst: &mut [Self],
        _lhs: &[Self],
        _rhs: &[Self],
        _shape: GemmShape,
        _alpha: Self,
        _beta: Self,
    ) -> bool {
        false
    }
}

macro_rules! impl_scalar_int {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            #[inline]
            fn one() -> Self {
                1
            }
        }
    )*};
}

impl_scalar_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Scalar for f32 {
    #[inline]
    fn one() -> Self {
        1.0
    }
}

impl Scalar for f64 {
    #[inline]
    fn one() -> Self {
        1.0
    }

    fn gemm_contiguous(
        dst: &mut [Self],
        lhs: &[Self],
        rhs: &[Self],
        shape: GemmShape,
        alpha: Self,
        beta: Self,
    ) -> bool {
        faer_gemm_row_major(dst, lhs, rhs, shape, alpha, beta);
        true
    }
}

impl Scalar for c64 {
    #[inline]
    fn one() -> Self {
        c64::new(1.0, 0.0)
    }

    fn gemm_contiguous(
        dst: &mut [Self],
        lhs: &[Self],
        rhs: &[Self],
        shape: GemmShape,
        alpha: Self,
        beta: Self,
    ) -> bool {
        faer_gemm_row_major(dst, lhs, rhs, shape, alpha, beta);
        true
    }
}

/// Orderable element type, optionally with a small discrete value range.
///
/// Types whose values map onto integers report a `discrete_key`; the adaptive
/// sort uses it to decide whether counting sort beats quicksort.
pub trait SortKey: Scalar + PartialOrd {
    /// Integer key of this value, or `None` for non-discrete types.
    fn discrete_key(&self) -> Option<i64>;

    /// Reconstruct a value from its discrete key.
    fn from_discrete_key(key: i64) -> Self;
}

macro_rules! impl_sort_key_int {
    ($($t:ty),*) => {$(
        impl SortKey for $t {
            #[inline]
            fn discrete_key(&self) -> Option<i64> {
                i64::try_from(*self).ok()
            }

            #[inline]
            fn from_discrete_key(key: i64) -> Self {
                key as $t
            }
        }
    )*};
}

impl_sort_key_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl SortKey for f32 {
    #[inline]
    fn discrete_key(&self) -> Option<i64> {
        None
    }

    #[inline]
    fn from_discrete_key(key: i64) -> Self {
        key as f32
    }
}

impl SortKey for f64 {
    #[inline]
    fn discrete_key(&self) -> Option<i64> {
        None
    }

    #[inline]
    fn from_discrete_key(key: i64) -> Self {
        key as f64
    }
}
