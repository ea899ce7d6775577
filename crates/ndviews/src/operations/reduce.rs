//! Reductions: sums, folds and dot products.
//!
//! All reductions accumulate left to right in logical index order, so the
//! floating-point result is deterministic for a given input.

use crate::array::NdArray;
use crate::error::{ArrayError, Result};
use crate::scalar::Scalar;
use crate::storage::Storage;

use super::check_same_shape;

/// Sum of all elements.
///
/// # Example
///
/// ```
/// use ndviews::NdArray;
/// use ndviews::operations::sum;
///
/// let a = NdArray::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
/// assert_eq!(sum(&a), 10);
/// ```
pub fn sum<T: Scalar>(array: &NdArray<T>) -> T {
    if let Storage::Sparse(cells) = array.storage() {
        if !array.is_view() {
            return cells
                .borrow()
                .sorted_entries()
                .into_iter()
                .fold(T::zero(), |acc, (_, v)| acc + v);
        }
    }
    aggregate(array, |a, b| a + b, |x| x).unwrap_or_else(T::zero)
}

/// Fold `map(x)` over all elements with `reduce`, in row-major order.
///
/// Returns `None` for an array with no elements.
///
/// # Example
///
/// ```
/// use ndviews::NdArray;
/// use ndviews::operations::aggregate;
///
/// let a = NdArray::from_vec(vec![3.0, -4.0], &[2]).unwrap();
/// let sum_sq = aggregate(&a, |acc, x| acc + x, |x| x * x);
/// assert_eq!(sum_sq, Some(25.0));
/// ```
pub fn aggregate<T, R, M>(array: &NdArray<T>, reduce: R, map: M) -> Option<T>
where
    T: Scalar,
    R: Fn(T, T) -> T,
    M: Fn(T) -> T,
{
    let storage = array.storage();
    let mut values = array.layout().positions().map(|p| map(storage.get(p)));
    let first = values.next()?;
    Some(values.fold(first, reduce))
}

fn require_vector<T: Scalar>(array: &NdArray<T>) -> Result<()> {
    if array.ndim() != 1 {
        return Err(ArrayError::RankMismatch {
            expected: 1,
            actual: array.ndim(),
        });
    }
    Ok(())
}

/// `Σ a[from + k] * b[from + k]` for `k` in `0..n`.
///
/// `n` is `length` clamped to the elements remaining in both vectors after
/// `from`. A negative `from` or `length` yields zero. A sparse owner operand
/// contributes only its stored entries, visited in ascending index order.
///
/// # Errors
///
/// Returns `RankMismatch` unless both operands are vectors.
///
/// # Example
///
/// ```
/// use ndviews::NdArray;
/// use ndviews::operations::dot;
///
/// let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[4]).unwrap();
/// let b = NdArray::from_vec(vec![1.0, 1.0, 1.0], &[3]).unwrap();
/// assert_eq!(dot(&a, &b, 1, 10).unwrap(), 5.0); // 2 + 3
/// assert_eq!(dot(&a, &b, -1, 2).unwrap(), 0.0);
/// ```
pub fn dot<T: Scalar>(a: &NdArray<T>, b: &NdArray<T>, from: isize, length: isize) -> Result<T> {
    require_vector(a)?;
    require_vector(b)?;
    if from < 0 || length < 0 {
        return Ok(T::zero());
    }
    let from = from as usize;
    let n = (length as usize)
        .min(a.size().saturating_sub(from))
        .min(b.size().saturating_sub(from));
    if n == 0 {
        return Ok(T::zero());
    }
    let end = from + n;

    let sparse_owner = |x: &NdArray<T>| x.storage().is_sparse() && !x.is_view();
    if sparse_owner(a) || sparse_owner(b) {
        let (stored, other) = if sparse_owner(a) { (a, b) } else { (b, a) };
        let entries = stored.non_zeros();
        let mut acc = T::zero();
        for (k, v) in entries.into_iter().filter(|&(k, _)| k >= from && k < end) {
            acc = acc + v * other.get_quick(&[k]);
        }
        return Ok(acc);
    }

    if let (Storage::Dense(a_cells), Storage::Dense(b_cells)) = (a.storage(), b.storage()) {
        if let (Some((sa, _)), Some((sb, _))) = (a.layout().contiguous_run(), b.layout().contiguous_run()) {
            let a_cells = a_cells.borrow();
            let b_cells = b_cells.borrow();
            let xs = &a_cells.as_slice()[sa + from..sa + end];
            let ys = &b_cells.as_slice()[sb + from..sb + end];
            return Ok(xs
                .iter()
                .zip(ys)
                .fold(T::zero(), |acc, (&x, &y)| acc + x * y));
        }
    }

    let mut acc = T::zero();
    for k in from..end {
        acc = acc + a.get_quick(&[k]) * b.get_quick(&[k]);
    }
    Ok(acc)
}

/// Dot product over every element of two same-shape arrays, row-major order.
///
/// # Errors
///
/// Returns `ShapeMismatch` if the shapes differ.
pub fn dot_all<T: Scalar>(a: &NdArray<T>, b: &NdArray<T>) -> Result<T> {
    check_same_shape(a, b)?;
    let (sa, sb) = (a.storage(), b.storage());
    Ok(a
        .layout()
        .positions()
        .zip(b.layout().positions())
        .fold(T::zero(), |acc, (pa, pb)| acc + sa.get(pa) * sb.get(pb)))
}

impl<T: Scalar> NdArray<T> {
    /// Sum of all elements. See [`sum`].
    pub fn sum(&self) -> T {
        sum(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sum_dense_and_view() {
        let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_relative_eq!(sum(&a), 21.0);
        assert_relative_eq!(a.column(2).unwrap().sum(), 9.0);
    }

    #[test]
    fn test_sum_sparse() {
        let a = NdArray::sparse_from_vec(&[0, 4, 0, 0, -1, 0], &[6]).unwrap();
        assert_eq!(sum(&a), 3);
        assert_eq!(a.sub_range(2, 5).unwrap().sum(), -1);
    }

    #[test]
    fn test_aggregate_empty_is_none() {
        let a: NdArray<f64> = NdArray::zeros(&[0]).unwrap();
        assert_eq!(aggregate(&a, |x, y| x + y, |x| x), None);
        assert_eq!(sum(&a), 0.0);
    }

    #[test]
    fn test_aggregate_max() {
        let a = NdArray::from_vec(vec![3, 9, -2, 7], &[4]).unwrap();
        assert_eq!(aggregate(&a, |x, y| x.max(y), |x| x), Some(9));
    }

    #[test]
    fn test_dot_boundaries() {
        let a = NdArray::from_vec(vec![1, 2, 3, 4, 5], &[5]).unwrap();
        let b = NdArray::from_vec(vec![1, 1, 1], &[3]).unwrap();
        assert_eq!(dot(&a, &b, 0, 100).unwrap(), 6);
        assert_eq!(dot(&a, &b, 2, 1).unwrap(), 3);
        assert_eq!(dot(&a, &b, -1, 3).unwrap(), 0);
        assert_eq!(dot(&a, &b, 0, -3).unwrap(), 0);
        assert_eq!(dot(&a, &b, 3, 2).unwrap(), 0);
        assert_eq!(dot(&a, &b, 7, 2).unwrap(), 0);
    }

    #[test]
    fn test_dot_sparse_matches_dense() {
        let data = [0.0, 1.5, 0.0, -2.0, 3.0];
        let dense = NdArray::from_vec(data.to_vec(), &[5]).unwrap();
        let sparse = NdArray::sparse_from_vec(&data, &[5]).unwrap();
        let w = NdArray::from_vec(vec![2.0, 2.0, 2.0, 0.5, 1.0], &[5]).unwrap();
        assert_relative_eq!(
            dot(&sparse, &w, 1, 3).unwrap(),
            dot(&dense, &w, 1, 3).unwrap()
        );
        assert_relative_eq!(dot(&w, &sparse, 0, 5).unwrap(), 5.0);
    }

    #[test]
    fn test_dot_strided_views() {
        let m = NdArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        let c0 = m.column(0).unwrap();
        let c2 = m.column(2).unwrap();
        assert_eq!(dot(&c0, &c2, 0, 2).unwrap(), 3 + 4 * 6);
    }

    #[test]
    fn test_dot_rank_mismatch() {
        let m: NdArray<f64> = NdArray::zeros(&[2, 2]).unwrap();
        assert!(dot(&m, &m, 0, 1).is_err());
    }

    #[test]
    fn test_dot_all() {
        let a = NdArray::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
        let t = a.transpose().unwrap();
        assert_eq!(dot_all(&a, &t).unwrap(), 1 + 2 * 3 + 3 * 2 + 16);
        let v: NdArray<i32> = NdArray::zeros(&[4]).unwrap();
        assert!(dot_all(&a, &v).is_err());
    }
}
