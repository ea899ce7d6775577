//! Value copies between arrays.

use crate::alias::resolve_source;
use crate::array::NdArray;
use crate::error::Result;
use crate::scalar::Scalar;
use crate::storage::{CellStorage, Storage};

use super::check_same_shape;

/// Copy every value of `src` into `dest`.
///
/// Works across storage kinds and through views. If `src` aliases `dest`,
/// values are read from a private copy, so overlapping self-assignment
/// behaves as if all of `src` were read before anything was written.
///
/// # Errors
///
/// Returns `ShapeMismatch` before any write if the shapes differ.
///
/// # Example
///
/// ```
/// use ndviews::NdArray;
/// use ndviews::operations::copy_into;
///
/// let src = NdArray::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
/// let mut dst: NdArray<f64> = NdArray::sparse(&[3]).unwrap();
/// copy_into(&mut dst, &src).unwrap();
/// assert_eq!(dst.to_vec(), vec![1.0, 2.0, 3.0]);
/// ```
pub fn copy_into<T: Scalar>(dest: &mut NdArray<T>, src: &NdArray<T>) -> Result<()> {
    check_same_shape(dest, src)?;
    let src = resolve_source(dest, src);
    copy_values(dest, &src);
    Ok(())
}

/// Copy values between same-shape arrays that do not alias.
pub(crate) fn copy_values<T: Scalar>(dest: &mut NdArray<T>, src: &NdArray<T>) {
    match (dest.storage(), src.storage()) {
        (Storage::Dense(d_cells), Storage::Dense(s_cells)) => {
            let runs = (dest.layout().contiguous_run(), src.layout().contiguous_run());
            if let (Some((sd, len)), Some((ss, _))) = runs {
                let mut d_cells = d_cells.borrow_mut();
                let s_cells = s_cells.borrow();
                d_cells.as_mut_slice()[sd..sd + len].copy_from_slice(&s_cells.as_slice()[ss..ss + len]);
                return;
            }
        }
        (Storage::Sparse(d_cells), _) if !dest.is_view() => {
            // Owner layout: logical linear index is the key.
            let non_zeros = src.non_zeros();
            let mut d_cells = d_cells.borrow_mut();
            d_cells.clear();
            for (k, v) in non_zeros {
                d_cells.set(k, v);
            }
            return;
        }
        _ => {}
    }
    for (pd, ps) in dest.layout().positions().zip(src.layout().positions()) {
        dest.storage().set(pd, src.storage().get(ps));
    }
}

impl<T: Scalar> NdArray<T> {
    /// Overwrite this array with the values of `src`. See [`copy_into`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ndviews::NdArray;
    ///
    /// let a = NdArray::from_vec(vec![1, 2, 3, 4, 5], &[5]).unwrap();
    /// let shifted = a.sub_range(1, 4).unwrap();
    /// let mut head = a.sub_range(0, 3).unwrap();
    /// head.assign_from(&shifted).unwrap();
    /// assert_eq!(a.to_vec(), vec![2, 3, 4, 5, 5]);
    /// ```
    pub fn assign_from(&mut self, src: &NdArray<T>) -> Result<()> {
        copy_into(self, src)
    }
}
