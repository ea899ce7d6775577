//! Stride computation utilities.
//!
//! Arrays are laid out in row-major order: the last index varies fastest.

/// Compute row-major strides from shape.
///
/// For shape [d0, d1, d2], returns strides [d1*d2, d2, 1].
///
/// # Examples
///
/// ```
/// use ndviews::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]), vec![20, 5, 1]);
/// assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
/// assert_eq!(compute_strides(&[5]), vec![1]);
/// assert_eq!(compute_strides(&[]), Vec::<usize>::new());
/// ```
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for (s, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
        *s = stride;
        stride *= dim;
    }
    strides
}

/// Convert cartesian indices to a linear index.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert a row-major linear index to cartesian indices.
///
/// # Examples
///
/// ```
/// use ndviews::strides::linear_to_cartesian;
///
/// assert_eq!(linear_to_cartesian(7, &[3, 4]), vec![1, 3]);
/// ```
pub fn linear_to_cartesian(mut linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];
    for (idx, &dim) in indices.iter_mut().zip(shape.iter()).rev() {
        if dim == 0 {
            continue;
        }
        *idx = linear % dim;
        linear /= dim;
    }
    indices
}
