//! Kernel selection for matrix products.

use crate::array::NdArray;
use crate::scalar::Scalar;
use crate::storage::StorageKind;

/// Multiplication kernel, chosen from the storage kinds of the two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulKernel {
    /// Element access through the address model; works for any operands.
    Generic,
    /// Both operands dense owners.
    DenseDense,
    /// Sparse left operand, dense right operand.
    SparseDense,
    /// Dense left operand, sparse right operand.
    DenseSparse,
    /// Both operands sparse owners.
    SparseSparse,
}

impl MulKernel {
    /// True if the kernel visits only stored entries of a sparse operand.
    pub fn is_sparse(self) -> bool {
        !matches!(self, MulKernel::Generic | MulKernel::DenseDense)
    }
}

/// Pick the kernel for `a · b`.
///
/// A view whose layout differs from a fresh owner's (offset, strided,
/// transposed or index-selected) forces [`MulKernel::Generic`]; the
/// specialised kernels read cells by linear index. A plain `view()` or a
/// leading sub-range keeps the owner layout and is dispatched like an owner.
///
/// # Example
///
/// ```
/// use ndviews::NdArray;
/// use ndviews::linalg::{MulKernel, select_kernel};
///
/// let a: NdArray<f64> = NdArray::sparse(&[3, 3]).unwrap();
/// let b: NdArray<f64> = NdArray::zeros(&[3, 2]).unwrap();
/// assert_eq!(select_kernel(&a, &b), MulKernel::SparseDense);
/// assert_eq!(select_kernel(&a.transpose().unwrap(), &b), MulKernel::Generic);
/// ```
pub fn select_kernel<T: Scalar>(a: &NdArray<T>, b: &NdArray<T>) -> MulKernel {
    if !a.layout().is_standard() || !b.layout().is_standard() {
        return MulKernel::Generic;
    }
    match (a.kind(), b.kind()) {
        (StorageKind::Dense, StorageKind::Dense) => MulKernel::DenseDense,
        (StorageKind::Sparse, StorageKind::Dense) => MulKernel::SparseDense,
        (StorageKind::Dense, StorageKind::Sparse) => MulKernel::DenseSparse,
        (StorageKind::Sparse, StorageKind::Sparse) => MulKernel::SparseSparse,
        _ => MulKernel::Generic,
    }
}
