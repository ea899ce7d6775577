//! Address translation from logical coordinates to storage positions.
//!
//! Every array handle carries an [`AddressModel`]: a base offset plus one
//! [`Dim`] per dimension. A dimension contributes either
//!
//! ```text
//! strided:   origin + i * stride
//! selected:  table[origin + i * stride]
//! ```
//!
//! and the physical position of a coordinate is `base + Σ contribution_d(i_d)`.
//! The selected form adds one indirection through a materialised offset table,
//! which lets arbitrary (non arithmetic-progression) subsets of rows or
//! columns be viewed without copying. Dense and sparse storage share the same
//! positions; sparse storage uses them as hash keys.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::error::{ArrayError, Result};
use crate::strides::compute_strides;

/// Highest supported rank.
pub const MAX_RANK: usize = 3;

/// Addressing of one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Dim {
    size: usize,
    origin: isize,
    stride: isize,
    table: Option<Rc<[isize]>>,
}

impl Dim {
    /// A strided dimension.
    pub fn strided(size: usize, origin: isize, stride: isize) -> Self {
        Self {
            size,
            origin,
            stride,
            table: None,
        }
    }

    /// An index-selected dimension over a materialised offset table.
    pub fn selected(table: Rc<[isize]>) -> Self {
        Self {
            size: table.len(),
            origin: 0,
            stride: 1,
            table: Some(table),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn origin(&self) -> isize {
        self.origin
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.table.is_some()
    }

    /// Contribution of logical index `i` to the physical position.
    #[inline]
    pub fn contribution(&self, i: usize) -> isize {
        let raw = self.origin + i as isize * self.stride;
        match &self.table {
            None => raw,
            Some(table) => table[raw as usize],
        }
    }

    /// Sub-range `[start, start + len)` of this dimension.
    pub(crate) fn part(&self, start: usize, len: usize) -> Self {
        Self {
            size: len,
            origin: self.origin + start as isize * self.stride,
            stride: self.stride,
            table: self.table.clone(),
        }
    }

    /// The same cells in reverse order.
    pub(crate) fn flipped(&self) -> Self {
        if self.size == 0 {
            return self.clone();
        }
        Self {
            size: self.size,
            origin: self.origin + (self.size as isize - 1) * self.stride,
            stride: -self.stride,
            table: self.table.clone(),
        }
    }

    /// Every `step`-th cell, starting with the first.
    pub(crate) fn stepped(&self, step: usize) -> Self {
        let size = if self.size == 0 {
            0
        } else {
            (self.size - 1) / step + 1
        };
        Self {
            size,
            origin: self.origin,
            stride: self.stride * step as isize,
            table: self.table.clone(),
        }
    }

    /// Select the given logical indices. Caller validates them.
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        let table: Rc<[isize]> = indices.iter().map(|&i| self.contribution(i)).collect();
        Self::selected(table)
    }
}

/// Per-dimension address translation plus a base offset.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressModel {
    base: isize,
    dims: SmallVec<[Dim; MAX_RANK]>,
}

impl AddressModel {
    /// Row-major contiguous layout starting at position 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndviews::address::AddressModel;
    ///
    /// let m = AddressModel::standard(&[2, 3]);
    /// assert_eq!(m.position_quick(&[1, 2]), 5);
    /// assert!(m.is_standard());
    /// ```
    pub fn standard(shape: &[usize]) -> Self {
        let strides = compute_strides(shape);
        let dims = shape
            .iter()
            .zip(strides.iter())
            .map(|(&size, &stride)| Dim::strided(size, 0, stride as isize))
            .collect();
        Self { base: 0, dims }
    }

    /// Assemble a model from raw parts.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedRank` for rank outside 1..=3 and `ZeroStride` for a
    /// strided dimension with stride 0 and more than one element.
    pub fn from_parts(base: isize, dims: Vec<Dim>) -> Result<Self> {
        if dims.is_empty() || dims.len() > MAX_RANK {
            return Err(ArrayError::UnsupportedRank { rank: dims.len() });
        }
        for (d, dim) in dims.iter().enumerate() {
            if dim.stride == 0 && dim.size > 1 {
                return Err(ArrayError::ZeroStride { dim: d });
            }
        }
        Ok(Self {
            base,
            dims: dims.into_iter().collect(),
        })
    }

    #[inline]
    pub fn base(&self) -> isize {
        self.base
    }

    #[inline]
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(Dim::size).collect()
    }

    /// Number of addressable elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.dims.iter().map(Dim::size).product()
    }

    /// True if any dimension goes through an offset table.
    pub fn is_selected(&self) -> bool {
        self.dims.iter().any(Dim::is_selected)
    }

    /// Position of `indices`, precondition assumed.
    ///
    /// The caller guarantees `indices.len() == ndim()` and every index is in
    /// bounds. Hot loops validate once outside and then call this.
    #[inline]
    pub fn position_quick(&self, indices: &[usize]) -> usize {
        let mut pos = self.base;
        for (dim, &i) in self.dims.iter().zip(indices.iter()) {
            pos += dim.contribution(i);
        }
        pos as usize
    }

    /// Position of `indices` after validating rank and bounds.
    ///
    /// # Errors
    ///
    /// Returns `WrongNumberOfIndices` or `OutOfRange`.
    pub fn position_checked(&self, indices: &[usize]) -> Result<usize> {
        if indices.len() != self.dims.len() {
            return Err(ArrayError::WrongNumberOfIndices {
                expected: self.dims.len(),
                actual: indices.len(),
            });
        }
        for (d, (dim, &i)) in self.dims.iter().zip(indices.iter()).enumerate() {
            if i >= dim.size {
                return Err(ArrayError::OutOfRange {
                    index: i,
                    dim: d,
                    size: dim.size,
                });
            }
        }
        Ok(self.position_quick(indices))
    }

    /// Physical positions in logical row-major order.
    pub fn positions(&self) -> Positions<'_> {
        Positions {
            model: self,
            index: SmallVec::from_elem(0, self.dims.len()),
            remaining: self.size(),
        }
    }

    /// True for the layout of a freshly allocated owner.
    pub fn is_standard(&self) -> bool {
        if self.base != 0 {
            return false;
        }
        let strides = compute_strides(&self.shape());
        self.dims
            .iter()
            .zip(strides.iter())
            .all(|(dim, &s)| dim.table.is_none() && dim.origin == 0 && dim.stride == s as isize)
    }

    /// `(start, len)` if the logical elements occupy `start..start + len` in
    /// storage, in logical order.
    pub fn contiguous_run(&self) -> Option<(usize, usize)> {
        let len = self.size();
        if len == 0 {
            return Some((0, 0));
        }
        let mut expected = 1isize;
        for dim in self.dims.iter().rev() {
            if dim.table.is_some() {
                return None;
            }
            if dim.size > 1 && dim.stride != expected {
                return None;
            }
            expected *= dim.size as isize;
        }
        let start = self.base + self.dims.iter().map(|d| d.origin).sum::<isize>();
        Some((start as usize, len))
    }

    pub(crate) fn with_dim(&self, d: usize, dim: Dim) -> Self {
        let mut dims = self.dims.clone();
        dims[d] = dim;
        Self {
            base: self.base,
            dims,
        }
    }

    pub(crate) fn permuted(&self, perm: &[usize]) -> Self {
        Self {
            base: self.base,
            dims: perm.iter().map(|&p| self.dims[p].clone()).collect(),
        }
    }

    /// Fix dimension `d` at `index`, dropping it from the model.
    pub(crate) fn fixed(&self, d: usize, index: usize) -> Self {
        let base = self.base + self.dims[d].contribution(index);
        let dims = self
            .dims
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != d)
            .map(|(_, dim)| dim.clone())
            .collect();
        Self { base, dims }
    }
}

/// Iterator over physical positions in logical row-major order.
pub struct Positions<'a> {
    model: &'a AddressModel,
    index: SmallVec<[usize; MAX_RANK]>,
    remaining: usize,
}

impl Iterator for Positions<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let pos = self.model.position_quick(&self.index);
        self.remaining -= 1;
        for d in (0..self.index.len()).rev() {
            self.index[d] += 1;
            if self.index[d] < self.model.dims[d].size {
                break;
            }
            self.index[d] = 0;
        }
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Positions<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_positions() {
        let m = AddressModel::standard(&[2, 3]);
        let positions: Vec<usize> = m.positions().collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(m.contiguous_run(), Some((0, 6)));
    }

    #[test]
    fn test_quick_and_checked_agree() {
        let m = AddressModel::standard(&[3, 4, 5]);
        for i in 0..3 {
            for j in 0..4 {
                for k in 0..5 {
                    let idx = [i, j, k];
                    assert_eq!(m.position_checked(&idx).unwrap(), m.position_quick(&idx));
                }
            }
        }
    }

    #[test]
    fn test_checked_errors() {
        let m = AddressModel::standard(&[2, 3]);
        assert_eq!(
            m.position_checked(&[2, 0]),
            Err(ArrayError::OutOfRange {
                index: 2,
                dim: 0,
                size: 2
            })
        );
        assert_eq!(
            m.position_checked(&[0]),
            Err(ArrayError::WrongNumberOfIndices {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_part_and_flip() {
        let m = AddressModel::standard(&[6]);
        let part = m.with_dim(0, m.dims()[0].part(1, 3));
        assert_eq!(part.positions().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(part.contiguous_run(), Some((1, 3)));

        let flipped = part.with_dim(0, part.dims()[0].flipped());
        assert_eq!(flipped.positions().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(flipped.contiguous_run(), None);
    }

    #[test]
    fn test_stepped() {
        let m = AddressModel::standard(&[7]);
        let stepped = m.with_dim(0, m.dims()[0].stepped(3));
        assert_eq!(stepped.positions().collect::<Vec<_>>(), vec![0, 3, 6]);
    }

    #[test]
    fn test_select_composes() {
        let m = AddressModel::standard(&[3, 4]);
        // Select columns 3 and 1, then drop to row 2.
        let sel = m.with_dim(1, m.dims()[1].select(&[3, 1]));
        assert!(sel.is_selected());
        assert_eq!(sel.positions().collect::<Vec<_>>(), vec![3, 1, 7, 5, 11, 9]);
        let row = sel.fixed(0, 2);
        assert_eq!(row.positions().collect::<Vec<_>>(), vec![11, 9]);

        // Selecting again materialises through the existing table.
        let again = row.with_dim(0, row.dims()[0].select(&[1]));
        assert_eq!(again.positions().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_transpose_positions() {
        let m = AddressModel::standard(&[2, 3]).permuted(&[1, 0]);
        assert_eq!(m.shape(), vec![3, 2]);
        assert_eq!(m.positions().collect::<Vec<_>>(), vec![0, 3, 1, 4, 2, 5]);
        assert!(!m.is_standard());
    }

    #[test]
    fn test_from_parts_validation() {
        assert!(AddressModel::from_parts(0, vec![]).is_err());
        assert!(AddressModel::from_parts(0, vec![Dim::strided(3, 0, 0)]).is_err());
        let m = AddressModel::from_parts(10, vec![Dim::strided(3, 0, -2)]).unwrap();
        assert_eq!(m.positions().collect::<Vec<_>>(), vec![10, 8, 6]);
    }

    #[test]
    fn test_zero_size() {
        let m = AddressModel::standard(&[0, 3]);
        assert_eq!(m.size(), 0);
        assert_eq!(m.positions().count(), 0);
        assert_eq!(m.contiguous_run(), Some((0, 0)));
    }
}
