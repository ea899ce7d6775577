//! Zero-copy views.
//!
//! Every constructor here derives a new [`AddressModel`] from the parent's
//! and returns a handle sharing the parent's storage:
//!
//! ```text
//! part     origin += start * stride, size = len
//! flip     origin += (size - 1) * stride, stride = -stride
//! strides  stride *= step
//! permute  dims reordered
//! row/col  base += contribution(i), dim removed
//! select   contributions materialised into an offset table
//! ```
//!
//! Nothing is copied. Views built from the same owner observe each other's
//! writes immediately.

use crate::address::AddressModel;
use crate::array::NdArray;
use crate::error::{ArrayError, Result};
use crate::scalar::Scalar;

/// Check that `perm` is a permutation of `0..ndim`.
pub(crate) fn validate_permutation(perm: &[usize], ndim: usize) -> Result<()> {
    let invalid = || ArrayError::InvalidPermutation {
        perm: perm.to_vec(),
        ndim,
    };
    if perm.len() != ndim {
        return Err(invalid());
    }
    let mut seen = [false; crate::address::MAX_RANK];
    for &p in perm {
        if p >= ndim || seen[p] {
            return Err(invalid());
        }
        seen[p] = true;
    }
    Ok(())
}

impl<T: Scalar> NdArray<T> {
    fn check_dim(&self, dim: usize) -> Result<()> {
        if dim >= self.ndim() {
            return Err(ArrayError::InvalidDimension {
                dim,
                ndim: self.ndim(),
            });
        }
        Ok(())
    }

    fn require_rank(&self, rank: usize) -> Result<()> {
        if self.ndim() != rank {
            return Err(ArrayError::RankMismatch {
                expected: rank,
                actual: self.ndim(),
            });
        }
        Ok(())
    }

    fn check_index(&self, dim: usize, index: usize) -> Result<()> {
        let size = self.layout().dims()[dim].size();
        if index >= size {
            return Err(ArrayError::OutOfRange { index, dim, size });
        }
        Ok(())
    }

    /// View of elements `from..=to` of a vector (inclusive bounds).
    ///
    /// # Errors
    ///
    /// Returns `RankMismatch` for non-vectors, `OutOfRange` if `to` is past
    /// the end and `SliceOutOfBounds` if `from > to`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndviews::NdArray;
    ///
    /// let a = NdArray::from_vec(vec![3, 1, 4, 1, 5], &[5]).unwrap();
    /// let mut v = a.sub_range(1, 3).unwrap();
    /// assert_eq!(v.to_vec(), vec![1, 4, 1]);
    ///
    /// v.set1(0, 9).unwrap();
    /// assert_eq!(a.to_vec(), vec![3, 9, 4, 1, 5]);
    /// ```
    pub fn sub_range(&self, from: usize, to: usize) -> Result<Self> {
        self.require_rank(1)?;
        self.check_index(0, to)?;
        if from > to {
            return Err(ArrayError::SliceOutOfBounds {
                start: from,
                end: to + 1,
                dim: 0,
                size: self.size(),
            });
        }
        self.view_part(0, from, to - from + 1)
    }

    /// View of `len` consecutive indices of dimension `dim` starting at `start`.
    pub fn view_part(&self, dim: usize, start: usize, len: usize) -> Result<Self> {
        self.check_dim(dim)?;
        let parent = &self.layout().dims()[dim];
        let end = start.checked_add(len);
        match end {
            Some(end) if end <= parent.size() => {}
            _ => {
                return Err(ArrayError::SliceOutOfBounds {
                    start,
                    end: start.saturating_add(len),
                    dim,
                    size: parent.size(),
                });
            }
        }
        let layout = self.layout().with_dim(dim, parent.part(start, len));
        Ok(self.derived(layout))
    }

    /// Rectangular block of a matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndviews::NdArray;
    ///
    /// let a = NdArray::from_vec((0..12).collect(), &[3, 4]).unwrap();
    /// let block = a.view_part_2d(1, 1, 2, 2).unwrap();
    /// assert_eq!(block.to_vec(), vec![5, 6, 9, 10]);
    /// ```
    pub fn view_part_2d(&self, row: usize, column: usize, height: usize, width: usize) -> Result<Self> {
        self.require_rank(2)?;
        self.view_part(0, row, height)?.view_part(1, column, width)
    }

    /// Swap the two dimensions of a matrix.
    pub fn transpose(&self) -> Result<Self> {
        self.require_rank(2)?;
        Ok(self.derived(self.layout().permuted(&[1, 0])))
    }

    /// Reorder dimensions: dimension `i` of the result is `perm[i]` of `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndviews::NdArray;
    ///
    /// let a = NdArray::from_vec((0..24).collect(), &[2, 3, 4]).unwrap();
    /// let p = a.permute_dims(&[2, 0, 1]).unwrap();
    /// assert_eq!(p.shape(), vec![4, 2, 3]);
    /// assert_eq!(p.get(&[3, 1, 2]).unwrap(), a.get(&[1, 2, 3]).unwrap());
    /// ```
    pub fn permute_dims(&self, perm: &[usize]) -> Result<Self> {
        validate_permutation(perm, self.ndim())?;
        Ok(self.derived(self.layout().permuted(perm)))
    }

    /// Row `i` of a matrix as a vector.
    pub fn row(&self, i: usize) -> Result<Self> {
        self.require_rank(2)?;
        self.check_index(0, i)?;
        Ok(self.derived(self.layout().fixed(0, i)))
    }

    /// Column `j` of a matrix as a vector.
    pub fn column(&self, j: usize) -> Result<Self> {
        self.require_rank(2)?;
        self.check_index(1, j)?;
        Ok(self.derived(self.layout().fixed(1, j)))
    }

    /// Slice `k` of a rank-3 array as a matrix.
    pub fn slice(&self, k: usize) -> Result<Self> {
        self.require_rank(3)?;
        self.check_index(0, k)?;
        Ok(self.derived(self.layout().fixed(0, k)))
    }

    /// Dimension `dim` traversed in reverse.
    pub fn view_flip(&self, dim: usize) -> Result<Self> {
        self.check_dim(dim)?;
        let flipped = self.layout().dims()[dim].flipped();
        Ok(self.derived(self.layout().with_dim(dim, flipped)))
    }

    /// Every `steps[d]`-th index along each dimension `d`.
    ///
    /// # Errors
    ///
    /// Returns `WrongNumberOfIndices` if `steps.len() != ndim()` and
    /// `ZeroStride` for a zero step.
    pub fn view_strides(&self, steps: &[usize]) -> Result<Self> {
        if steps.len() != self.ndim() {
            return Err(ArrayError::WrongNumberOfIndices {
                expected: self.ndim(),
                actual: steps.len(),
            });
        }
        let mut layout: AddressModel = self.layout().clone();
        for (d, &step) in steps.iter().enumerate() {
            if step == 0 {
                return Err(ArrayError::ZeroStride { dim: d });
            }
            let stepped = layout.dims()[d].stepped(step);
            layout = layout.with_dim(d, stepped);
        }
        Ok(self.derived(layout))
    }

    /// Index-selection view along `dim`.
    ///
    /// Indices may repeat or appear in any order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIndex` if any index is outside `[0, size)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndviews::{NdArray, StorageKind};
    ///
    /// let a = NdArray::from_vec(vec![10, 20, 30, 40], &[4]).unwrap();
    /// let s = a.select_indices(0, &[3, 0, 0]).unwrap();
    /// assert_eq!(s.to_vec(), vec![40, 10, 10]);
    /// assert_eq!(s.kind(), StorageKind::SelectedDense);
    /// ```
    pub fn select_indices(&self, dim: usize, indices: &[usize]) -> Result<Self> {
        self.check_dim(dim)?;
        let parent = &self.layout().dims()[dim];
        if let Some(&bad) = indices.iter().find(|&&i| i >= parent.size()) {
            return Err(ArrayError::InvalidIndex {
                index: bad,
                size: parent.size(),
            });
        }
        let layout = self.layout().with_dim(dim, parent.select(indices));
        Ok(self.derived(layout))
    }

    /// Select rows and columns of a matrix. `None` keeps every index.
    pub fn select_rows_columns(
        &self,
        rows: Option<&[usize]>,
        columns: Option<&[usize]>,
    ) -> Result<Self> {
        self.require_rank(2)?;
        let mut out = self.view();
        if let Some(rows) = rows {
            out = out.select_indices(0, rows)?;
        }
        if let Some(columns) = columns {
            out = out.select_indices(1, columns)?;
        }
        Ok(out)
    }

    /// Selection of the vector elements matching `predicate`.
    ///
    /// Reads every element once to build the selection table.
    pub fn select_where<F>(&self, predicate: F) -> Result<Self>
    where
        F: Fn(T) -> bool,
    {
        self.require_rank(1)?;
        let indices: Vec<usize> = self
            .to_vec()
            .into_iter()
            .enumerate()
            .filter(|&(_, v)| predicate(v))
            .map(|(i, _)| i)
            .collect();
        self.select_indices(0, &indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageKind;

    fn matrix_3x4() -> NdArray<i32> {
        NdArray::from_vec((0..12).collect(), &[3, 4]).unwrap()
    }

    #[test]
    fn test_sub_range_inclusive() {
        let a = NdArray::from_vec(vec![3, 1, 4, 1, 5], &[5]).unwrap();
        let v = a.sub_range(1, 3).unwrap();
        assert_eq!(v.to_vec(), vec![1, 4, 1]);
        assert!(v.is_view());
        assert_eq!(a.sub_range(4, 4).unwrap().to_vec(), vec![5]);
    }

    #[test]
    fn test_sub_range_errors() {
        let a = NdArray::from_vec(vec![1, 2, 3], &[3]).unwrap();
        assert_eq!(
            a.sub_range(0, 3).unwrap_err(),
            ArrayError::OutOfRange {
                index: 3,
                dim: 0,
                size: 3
            }
        );
        assert!(matches!(
            a.sub_range(2, 1),
            Err(ArrayError::SliceOutOfBounds { .. })
        ));
        assert!(matrix_3x4().sub_range(0, 1).is_err());
    }

    #[test]
    fn test_view_part_bounds() {
        let m = matrix_3x4();
        assert!(m.view_part(1, 2, 2).is_ok());
        assert!(m.view_part(1, 3, 2).is_err());
        assert!(m.view_part(1, usize::MAX, 2).is_err());
        assert_eq!(
            m.view_part(2, 0, 1).unwrap_err(),
            ArrayError::InvalidDimension { dim: 2, ndim: 2 }
        );
        // Empty parts are valid.
        assert_eq!(m.view_part(0, 3, 0).unwrap().size(), 0);
    }

    #[test]
    fn test_transpose() {
        let m = matrix_3x4();
        let t = m.transpose().unwrap();
        assert_eq!(t.shape(), vec![4, 3]);
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(m.get(&[i, j]).unwrap(), t.get(&[j, i]).unwrap());
            }
        }
        assert!(NdArray::from_vec(vec![1], &[1]).unwrap().transpose().is_err());
    }

    #[test]
    fn test_permute_dims_invalid() {
        let a: NdArray<f64> = NdArray::zeros(&[2, 3, 4]).unwrap();
        assert!(matches!(
            a.permute_dims(&[0, 0, 1]),
            Err(ArrayError::InvalidPermutation { .. })
        ));
        assert!(a.permute_dims(&[0, 1]).is_err());
        assert!(a.permute_dims(&[0, 1, 3]).is_err());
    }

    #[test]
    fn test_row_and_column() {
        let m = matrix_3x4();
        assert_eq!(m.row(1).unwrap().to_vec(), vec![4, 5, 6, 7]);
        assert_eq!(m.column(2).unwrap().to_vec(), vec![2, 6, 10]);
        assert!(m.row(3).is_err());
        assert!(m.column(4).is_err());
    }

    #[test]
    fn test_slice_of_rank3() {
        let a = NdArray::from_vec((0..24).collect::<Vec<i32>>(), &[2, 3, 4]).unwrap();
        let s = a.slice(1).unwrap();
        assert_eq!(s.shape(), vec![3, 4]);
        assert_eq!(s.get(&[0, 0]).unwrap(), 12);
        assert!(a.slice(2).is_err());
    }

    #[test]
    fn test_flip_and_strides() {
        let a = NdArray::from_vec(vec![0, 1, 2, 3, 4, 5, 6], &[7]).unwrap();
        assert_eq!(a.view_flip(0).unwrap().to_vec(), vec![6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(a.view_strides(&[3]).unwrap().to_vec(), vec![0, 3, 6]);
        assert_eq!(
            a.view_flip(0).unwrap().view_strides(&[2]).unwrap().to_vec(),
            vec![6, 4, 2, 0]
        );
        assert_eq!(a.view_strides(&[0]).unwrap_err(), ArrayError::ZeroStride { dim: 0 });
    }

    #[test]
    fn test_select_indices_invalid() {
        let m = matrix_3x4();
        assert_eq!(
            m.select_indices(1, &[0, 4]).unwrap_err(),
            ArrayError::InvalidIndex { index: 4, size: 4 }
        );
    }

    #[test]
    fn test_select_rows_columns() {
        let m = matrix_3x4();
        let s = m.select_rows_columns(Some(&[2, 0]), Some(&[3, 1])).unwrap();
        assert_eq!(s.to_vec(), vec![11, 9, 3, 1]);
        assert_eq!(s.kind(), StorageKind::SelectedDense);
        let rows_only = m.select_rows_columns(Some(&[1]), None).unwrap();
        assert_eq!(rows_only.to_vec(), vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_select_composes_with_views() {
        let m = matrix_3x4();
        // Column 3 of the transpose of a selection.
        let s = m.select_indices(0, &[2, 1]).unwrap();
        let t = s.transpose().unwrap();
        assert_eq!(t.row(3).unwrap().to_vec(), vec![11, 7]);
        let sub = t.row(3).unwrap().sub_range(1, 1).unwrap();
        assert_eq!(sub.to_vec(), vec![7]);
    }

    #[test]
    fn test_select_where() {
        let a = NdArray::from_vec(vec![5.0, -1.0, 2.0, -3.0], &[4]).unwrap();
        let mut negatives = a.select_where(|x| x < 0.0).unwrap();
        assert_eq!(negatives.to_vec(), vec![-1.0, -3.0]);
        negatives.fill(0.0);
        assert_eq!(a.to_vec(), vec![5.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_sparse_views_see_writes() {
        let a: NdArray<f64> = NdArray::sparse(&[4, 4]).unwrap();
        let mut r = a.row(2).unwrap();
        r.set1(3, 7.0).unwrap();
        assert_eq!(a.get(&[2, 3]).unwrap(), 7.0);
        let c = a.column(3).unwrap();
        assert_eq!(c.to_vec(), vec![0.0, 0.0, 7.0, 0.0]);
        assert_eq!(c.cardinality(), 1);
        assert_eq!(a.select_indices(0, &[2]).unwrap().kind(), StorageKind::SelectedSparse);
    }
}
