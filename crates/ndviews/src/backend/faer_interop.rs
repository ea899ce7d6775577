//! Row-major GEMM on faer.
//!
//! ndviews stores matrices in row-major order while faer is column-major.
//! A row-major `m x n` buffer is therefore a column-major `n x m` matrix,
//! i.e. the transpose, and `(A B)^T = B^T A^T` lets the GEMM run on the
//! buffers without copying.

use faer::linalg::matmul::matmul;
use faer::{Accum, MatMut, MatRef, Par};
use faer_traits::ComplexField;

use crate::scalar::Scalar;

/// Dimensions of a GEMM `C(m, n) = A(m, k) * B(k, n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemmShape {
    pub m: usize,
    pub k: usize,
    pub n: usize,
}

/// `dst = alpha * lhs * rhs + beta * dst` over contiguous row-major buffers.
///
/// # Panics
///
/// Panics if buffer lengths do not match `shape`.
pub fn faer_gemm_row_major<T: Scalar + ComplexField>(
    dst: &mut [T],
    lhs: &[T],
    rhs: &[T],
    shape: GemmShape,
    alpha: T,
    beta: T,
) {
    let GemmShape { m, k, n } = shape;
    assert_eq!(dst.len(), m * n, "destination must hold m*n elements");
    assert_eq!(lhs.len(), m * k, "lhs must hold m*k elements");
    assert_eq!(rhs.len(), k * n, "rhs must hold k*n elements");

    let accum = if beta.is_zero() {
        Accum::Replace
    } else {
        if beta != T::one() {
            for x in dst.iter_mut() {
                *x = *x * beta;
            }
        }
        Accum::Add
    };

    let mut dst_t = MatMut::from_column_major_slice_mut(dst, n, m);
    let lhs_t = MatRef::from_column_major_slice(lhs, k, m);
    let rhs_t = MatRef::from_column_major_slice(rhs, n, k);

    matmul(dst_t.as_mut(), accum, rhs_t, lhs_t, alpha, Par::Seq);
}
