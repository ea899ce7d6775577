//! Portable multiplication kernels.
//!
//! Each kernel computes the plain product `A · B` into a fresh row-major
//! buffer; scaling by `alpha` and accumulation into the result happen in
//! the caller. A vector right operand is treated as a `k x 1` matrix.

use crate::array::NdArray;
use crate::scalar::Scalar;

use super::select::MulKernel;

/// A rank-1 or rank-2 array seen as a `rows x cols` matrix.
#[derive(Clone, Copy)]
pub(crate) struct Operand<'a, T: Scalar> {
    pub array: &'a NdArray<T>,
    pub rows: usize,
    pub cols: usize,
}

impl<'a, T: Scalar> Operand<'a, T> {
    pub fn matrix(array: &'a NdArray<T>) -> Self {
        Self {
            array,
            rows: array.rows(),
            cols: array.columns(),
        }
    }

    /// Column vector view of a rank-1 array.
    pub fn column_vector(array: &'a NdArray<T>) -> Self {
        Self {
            array,
            rows: array.size(),
            cols: 1,
        }
    }

    #[inline]
    fn at(&self, r: usize, c: usize) -> T {
        if self.array.ndim() == 1 {
            self.array.get_quick(&[r])
        } else {
            self.array.get_quick(&[r, c])
        }
    }

    /// Stored entries as `(row, col, value)`, ascending by linear key.
    fn stored(&self) -> Vec<(usize, usize, T)> {
        let cols = self.cols.max(1);
        self.array
            .non_zeros()
            .into_iter()
            .map(|(key, v)| (key / cols, key % cols, v))
            .collect()
    }
}

/// `A · B` as a row-major `a.rows x b.cols` buffer.
pub(crate) fn product<T: Scalar>(kernel: MulKernel, a: Operand<'_, T>, b: Operand<'_, T>) -> Vec<T> {
    match kernel {
        MulKernel::DenseDense => dense_dense(a, b),
        MulKernel::SparseDense => sparse_dense(a, b),
        MulKernel::DenseSparse => dense_sparse(a, b),
        MulKernel::SparseSparse => sparse_sparse(a, b),
        MulKernel::Generic => generic(a, b),
    }
}

fn generic<T: Scalar>(a: Operand<'_, T>, b: Operand<'_, T>) -> Vec<T> {
    let (m, k, n) = (a.rows, a.cols, b.cols);
    let mut out = vec![T::zero(); m * n];
    for i in 0..m {
        for j in 0..n {
            let mut acc = T::zero();
            for p in 0..k {
                acc = acc + a.at(i, p) * b.at(p, j);
            }
            out[i * n + j] = acc;
        }
    }
    out
}

fn dense_dense<T: Scalar>(a: Operand<'_, T>, b: Operand<'_, T>) -> Vec<T> {
    let (Some(a_cells), Some(b_cells)) = (a.array.storage().dense_ref(), b.array.storage().dense_ref()) else {
        return generic(a, b);
    };
    let (m, k, n) = (a.rows, a.cols, b.cols);
    let lhs = &a_cells.as_slice()[..m * k];
    let rhs = &b_cells.as_slice()[..k * n];
    let mut out = vec![T::zero(); m * n];
    for i in 0..m {
        let a_row = &lhs[i * k..(i + 1) * k];
        for j in 0..n {
            let mut acc = T::zero();
            for (p, &x) in a_row.iter().enumerate() {
                acc = acc + x * rhs[p * n + j];
            }
            out[i * n + j] = acc;
        }
    }
    out
}

fn sparse_dense<T: Scalar>(a: Operand<'_, T>, b: Operand<'_, T>) -> Vec<T> {
    let n = b.cols;
    let mut out = vec![T::zero(); a.rows * n];
    for (i, p, x) in a.stored() {
        for j in 0..n {
            out[i * n + j] = out[i * n + j] + x * b.at(p, j);
        }
    }
    out
}

fn dense_sparse<T: Scalar>(a: Operand<'_, T>, b: Operand<'_, T>) -> Vec<T> {
    let (m, n) = (a.rows, b.cols);
    let mut out = vec![T::zero(); m * n];
    for (p, j, y) in b.stored() {
        for i in 0..m {
            out[i * n + j] = out[i * n + j] + a.at(i, p) * y;
        }
    }
    out
}

fn sparse_sparse<T: Scalar>(a: Operand<'_, T>, b: Operand<'_, T>) -> Vec<T> {
    let n = b.cols;
    // Rows of `b`, each in ascending column order.
    let mut b_rows: Vec<Vec<(usize, T)>> = vec![Vec::new(); b.rows];
    for (p, j, y) in b.stored() {
        b_rows[p].push((j, y));
    }
    let mut out = vec![T::zero(); a.rows * n];
    for (i, p, x) in a.stored() {
        for &(j, y) in &b_rows[p] {
            out[i * n + j] = out[i * n + j] + x * y;
        }
    }
    out
}
