//! Logical array handle over shared dense or sparse storage.
//!
//! ```text
//! NdArray<T>
//! ├── storage: Storage<T>     - Rc handle to DenseStorage or SparseStorage
//! ├── layout:  AddressModel   - logical coordinates -> physical positions
//! └── is_view: bool           - derived from another handle
//! ```
//!
//! Owners and views are the same type. A view shares its parent's storage
//! handle and carries a derived [`AddressModel`]; see [`crate::view`].

use crate::address::{AddressModel, MAX_RANK};
use crate::error::{ArrayError, Result};
use crate::scalar::Scalar;
use crate::storage::{CellStorage, DenseStorage, SparseStorage, Storage, StorageKind};

/// A 1-, 2- or 3-dimensional array, dense or sparse, possibly a view.
///
/// Element writes take `&mut self` on the handle used for writing. Other
/// handles to the same storage observe the write immediately.
#[derive(Debug)]
pub struct NdArray<T: Scalar> {
    storage: Storage<T>,
    layout: AddressModel,
    is_view: bool,
}

fn check_rank(shape: &[usize]) -> Result<()> {
    if shape.is_empty() || shape.len() > MAX_RANK {
        return Err(ArrayError::UnsupportedRank { rank: shape.len() });
    }
    Ok(())
}

impl<T: Scalar> NdArray<T> {
    pub(crate) fn from_parts(storage: Storage<T>, layout: AddressModel, is_view: bool) -> Self {
        Self {
            storage,
            layout,
            is_view,
        }
    }

    /// A view sharing this array's storage with a new layout.
    pub(crate) fn derived(&self, layout: AddressModel) -> Self {
        Self::from_parts(self.storage.clone(), layout, true)
    }

    /// Dense owner from a buffer whose length is known to match `shape`.
    pub(crate) fn from_vec_unchecked(data: Vec<T>, shape: &[usize]) -> Self {
        Self::from_parts(
            Storage::dense(DenseStorage::from_vec(data)),
            AddressModel::standard(shape),
            false,
        )
    }

    /// Dense zero-filled array.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedRank` unless `shape` has 1 to 3 entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndviews::NdArray;
    ///
    /// let a: NdArray<f64> = NdArray::zeros(&[2, 3]).unwrap();
    /// assert_eq!(a.shape(), vec![2, 3]);
    /// assert_eq!(a.size(), 6);
    /// assert!(NdArray::<f64>::zeros(&[1, 1, 1, 1]).is_err());
    /// ```
    pub fn zeros(shape: &[usize]) -> Result<Self> {
        check_rank(shape)?;
        let len = shape.iter().product();
        Ok(Self::from_vec_unchecked(vec![T::zero(); len], shape))
    }

    /// Sparse array with no stored entries.
    pub fn sparse(shape: &[usize]) -> Result<Self> {
        check_rank(shape)?;
        let len = shape.iter().product();
        Ok(Self::from_parts(
            Storage::sparse(SparseStorage::new(len)),
            AddressModel::standard(shape),
            false,
        ))
    }

    /// Dense array from row-major data.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedRank` for a bad shape and `LengthMismatch` if
    /// `data.len()` differs from the element count.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndviews::NdArray;
    ///
    /// let a = NdArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
    /// assert_eq!(a.get(&[0, 2]).unwrap(), 3);
    /// assert_eq!(a.get(&[1, 0]).unwrap(), 4); // row-major
    /// ```
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        check_rank(shape)?;
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(ArrayError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::from_vec_unchecked(data, shape))
    }

    /// Sparse array holding the non-zero entries of row-major `data`.
    pub fn sparse_from_vec(data: &[T], shape: &[usize]) -> Result<Self> {
        let mut out = Self::sparse(shape)?;
        out.assign_slice(data)?;
        Ok(out)
    }

    /// Dense array with every element set to `value`.
    pub fn filled(shape: &[usize], value: T) -> Result<Self> {
        check_rank(shape)?;
        let len = shape.iter().product();
        Ok(Self::from_vec_unchecked(vec![value; len], shape))
    }

    pub fn ones(shape: &[usize]) -> Result<Self> {
        Self::filled(shape, T::one())
    }

    /// Fresh zero array of the same storage variant and shape.
    pub fn like(&self) -> Self {
        let shape = self.shape();
        Self::from_parts(
            self.storage.fresh_like(self.size()),
            AddressModel::standard(&shape),
            false,
        )
    }

    /// Fresh zero array of the same storage variant and the given shape.
    pub fn like_shape(&self, shape: &[usize]) -> Result<Self> {
        check_rank(shape)?;
        let len = shape.iter().product();
        Ok(Self::from_parts(
            self.storage.fresh_like(len),
            AddressModel::standard(shape),
            false,
        ))
    }

    /// Deep copy with the same storage variant, as a non-view owner.
    ///
    /// Selected views become plain dense or sparse arrays.
    pub fn copy(&self) -> Self {
        let shape = self.shape();
        let layout = AddressModel::standard(&shape);
        match &self.storage {
            Storage::Dense(_) => Self::from_vec_unchecked(self.to_vec(), &shape),
            Storage::Sparse(cells) => {
                let cells = cells.borrow();
                let sparse = if self.layout.is_standard() && cells.key_space() == self.size() {
                    cells.clone()
                } else {
                    let mut out = SparseStorage::new(self.size());
                    for (linear, pos) in self.layout.positions().enumerate() {
                        out.set(linear, cells.get(pos));
                    }
                    out
                };
                Self::from_parts(Storage::sparse(sparse), layout, false)
            }
        }
    }

    /// Shallow handle to the same cells, flagged as a view.
    pub fn view(&self) -> Self {
        self.derived(self.layout.clone())
    }

    #[inline]
    pub fn shape(&self) -> Vec<usize> {
        self.layout.shape()
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Number of logical elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Extent of the second-to-last dimension (1 for vectors).
    pub fn rows(&self) -> usize {
        let n = self.ndim();
        if n >= 2 { self.layout.dims()[n - 2].size() } else { 1 }
    }

    /// Extent of the last dimension.
    pub fn columns(&self) -> usize {
        self.layout.dims()[self.ndim() - 1].size()
    }

    /// Extent of the first dimension of a rank-3 array (1 otherwise).
    pub fn slices(&self) -> usize {
        if self.ndim() == 3 { self.layout.dims()[0].size() } else { 1 }
    }

    #[inline]
    pub fn is_view(&self) -> bool {
        self.is_view
    }

    pub fn kind(&self) -> StorageKind {
        match (self.storage.is_sparse(), self.layout.is_selected()) {
            (false, false) => StorageKind::Dense,
            (true, false) => StorageKind::Sparse,
            (false, true) => StorageKind::SelectedDense,
            (true, true) => StorageKind::SelectedSparse,
        }
    }

    #[inline]
    pub fn layout(&self) -> &AddressModel {
        &self.layout
    }

    #[inline]
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    /// Checked element read.
    ///
    /// # Errors
    ///
    /// Returns `WrongNumberOfIndices` or `OutOfRange`.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        let pos = self.layout.position_checked(indices)?;
        Ok(self.storage.get(pos))
    }

    /// Checked element write.
    pub fn set(&mut self, indices: &[usize], value: T) -> Result<()> {
        let pos = self.layout.position_checked(indices)?;
        self.storage.set(pos, value);
        Ok(())
    }

    /// Element read with the precondition assumed.
    ///
    /// The caller guarantees one in-bounds index per dimension. Out-of-range
    /// input either panics or reads an unrelated cell; it is never checked.
    #[inline]
    pub fn get_quick(&self, indices: &[usize]) -> T {
        self.storage.get(self.layout.position_quick(indices))
    }

    /// Element write with the precondition assumed. See [`NdArray::get_quick`].
    #[inline]
    pub fn set_quick(&mut self, indices: &[usize], value: T) {
        self.storage.set(self.layout.position_quick(indices), value);
    }

    /// Checked read of a rank-1 array.
    pub fn get1(&self, i: usize) -> Result<T> {
        self.get(&[i])
    }

    /// Checked write of a rank-1 array.
    pub fn set1(&mut self, i: usize, value: T) -> Result<()> {
        self.set(&[i], value)
    }

    /// Copy out every element in logical row-major order.
    ///
    /// The result never aliases the storage.
    pub fn to_vec(&self) -> Vec<T> {
        match &self.storage {
            Storage::Dense(cells) => {
                let cells = cells.borrow();
                if let Some((start, len)) = self.layout.contiguous_run() {
                    return cells.as_slice()[start..start + len].to_vec();
                }
                self.layout.positions().map(|p| cells.get(p)).collect()
            }
            Storage::Sparse(cells) => {
                let cells = cells.borrow();
                self.layout.positions().map(|p| cells.get(p)).collect()
            }
        }
    }

    /// Overwrite every element from row-major `values`.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` before any write if the lengths differ.
    pub fn assign_slice(&mut self, values: &[T]) -> Result<()> {
        if values.len() != self.size() {
            return Err(ArrayError::LengthMismatch {
                expected: self.size(),
                actual: values.len(),
            });
        }
        match &self.storage {
            Storage::Dense(cells) => {
                let mut cells = cells.borrow_mut();
                if let Some((start, len)) = self.layout.contiguous_run() {
                    cells.as_mut_slice()[start..start + len].copy_from_slice(values);
                } else {
                    for (pos, &v) in self.layout.positions().zip(values) {
                        cells.set(pos, v);
                    }
                }
            }
            Storage::Sparse(cells) => {
                let mut cells = cells.borrow_mut();
                for (pos, &v) in self.layout.positions().zip(values) {
                    cells.set(pos, v);
                }
            }
        }
        Ok(())
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        match &self.storage {
            Storage::Dense(cells) => {
                let mut cells = cells.borrow_mut();
                if let Some((start, len)) = self.layout.contiguous_run() {
                    cells.as_mut_slice()[start..start + len].fill(value);
                } else {
                    for pos in self.layout.positions() {
                        cells.set(pos, value);
                    }
                }
            }
            Storage::Sparse(cells) => {
                let mut cells = cells.borrow_mut();
                if value.is_zero() && !self.is_view {
                    cells.clear();
                } else {
                    for pos in self.layout.positions() {
                        cells.set(pos, value);
                    }
                }
            }
        }
    }

    /// Number of non-zero elements.
    ///
    /// For a sparse owner this is the occupied-key count. Views (and dense
    /// arrays) scan their visible cells, since the storage may hold entries
    /// outside the view.
    pub fn cardinality(&self) -> usize {
        match &self.storage {
            Storage::Sparse(cells) if !self.is_view => cells.borrow().cardinality(),
            Storage::Sparse(cells) => {
                let cells = cells.borrow();
                self.layout
                    .positions()
                    .filter(|&p| cells.contains(p))
                    .count()
            }
            Storage::Dense(cells) => {
                let cells = cells.borrow();
                self.layout
                    .positions()
                    .filter(|&p| !cells.get(p).is_zero())
                    .count()
            }
        }
    }

    /// Non-zero elements as `(row-major linear index, value)`, ascending.
    pub fn non_zeros(&self) -> Vec<(usize, T)> {
        if let Storage::Sparse(cells) = &self.storage {
            if self.layout.is_standard() {
                // Positions coincide with linear indices; a leading sub-range
                // sees a prefix of the stored keys.
                let size = self.size();
                return cells
                    .borrow()
                    .sorted_entries()
                    .into_iter()
                    .take_while(|&(k, _)| k < size)
                    .collect();
            }
        }
        self.to_vec()
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_zero())
            .collect()
    }

    /// Reserve room for `n` elements in the underlying storage.
    pub fn ensure_capacity(&self, n: usize) {
        self.storage.ensure_capacity(n);
    }

    /// Release unused capacity in the underlying storage.
    pub fn trim(&self) {
        self.storage.trim();
    }

    /// True if `self` and `other` are handles to the same storage.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        self.storage.ptr_eq(&other.storage)
    }
}

impl<T: Scalar> PartialEq for NdArray<T> {
    /// Equal shapes and equal logical contents, regardless of storage kind.
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.to_vec() == other.to_vec()
    }
}
