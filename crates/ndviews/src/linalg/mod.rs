//! Matrix-vector and matrix-matrix products.
//!
//! The `*_into` entry points compute `result = beta * result + alpha * (A · B)`
//! in place. Shapes are validated before anything is written, and an operand
//! that shares storage with the result is read from a private copy.
//!
//! ```text
//! matmul_into(a, b, c, alpha, beta)
//!     ├── check shapes            RankMismatch / ShapeMismatch
//!     ├── resolve_source(c, a|b)  copy operands aliasing c
//!     ├── select_kernel(a, b)     Generic | DenseDense | SparseDense | ...
//!     ├── faer GEMM               DenseDense + GemmBackend::Faer + f64/c64
//!     └── kernel::product         portable fallback, then combine into c
//! ```

mod kernel;
mod select;

pub use select::{MulKernel, select_kernel};

use crate::alias::resolve_source;
use crate::array::NdArray;
use crate::backend::GemmShape;
use crate::config::{EngineConfig, GemmBackend};
use crate::error::{ArrayError, Result};
use crate::scalar::Scalar;
use crate::storage::Storage;

use kernel::Operand;

fn require_rank<T: Scalar>(array: &NdArray<T>, rank: usize) -> Result<()> {
    if array.ndim() != rank {
        return Err(ArrayError::RankMismatch {
            expected: rank,
            actual: array.ndim(),
        });
    }
    Ok(())
}

fn require_shape<T: Scalar>(array: &NdArray<T>, expected: Vec<usize>) -> Result<()> {
    let actual = array.shape();
    if actual != expected {
        return Err(ArrayError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

/// `y = beta * y + alpha * (A · x)` with the default configuration.
///
/// # Errors
///
/// Returns `RankMismatch` unless `a` is a matrix and `x`, `y` are vectors,
/// and `ShapeMismatch` if `x.size() != a.columns()` or `y.size() != a.rows()`.
///
/// # Example
///
/// ```
/// use ndviews::NdArray;
/// use ndviews::linalg::matvec_into;
///
/// let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
/// let x = NdArray::from_vec(vec![1.0, 1.0], &[2]).unwrap();
/// let mut y = NdArray::from_vec(vec![10.0, 10.0], &[2]).unwrap();
/// matvec_into(&a, &x, &mut y, 2.0, 1.0).unwrap();
/// assert_eq!(y.to_vec(), vec![16.0, 24.0]);
/// ```
pub fn matvec_into<T: Scalar>(
    a: &NdArray<T>,
    x: &NdArray<T>,
    y: &mut NdArray<T>,
    alpha: T,
    beta: T,
) -> Result<()> {
    matvec_into_with(&EngineConfig::default(), a, x, y, alpha, beta)
}

/// [`matvec_into`] with an explicit configuration.
pub fn matvec_into_with<T: Scalar>(
    config: &EngineConfig,
    a: &NdArray<T>,
    x: &NdArray<T>,
    y: &mut NdArray<T>,
    alpha: T,
    beta: T,
) -> Result<()> {
    require_rank(a, 2)?;
    require_rank(x, 1)?;
    require_rank(y, 1)?;
    require_shape(x, vec![a.columns()])?;
    require_shape(y, vec![a.rows()])?;

    let a = resolve_source(y, a);
    let x = resolve_source(y, x);
    multiply(config, Operand::matrix(&a), Operand::column_vector(&x), y, alpha, beta)
}

/// `c = beta * c + alpha * (A · B)` with the default configuration.
///
/// # Errors
///
/// Returns `RankMismatch` unless all three arrays are matrices, and
/// `ShapeMismatch` if `b.rows() != a.columns()` or `c` is not
/// `a.rows() x b.columns()`.
///
/// # Example
///
/// ```
/// use ndviews::NdArray;
/// use ndviews::linalg::matmul_into;
///
/// let a = NdArray::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
/// let b = NdArray::from_vec(vec![0, 1, 1, 0], &[2, 2]).unwrap();
/// let mut c: NdArray<i32> = NdArray::zeros(&[2, 2]).unwrap();
/// matmul_into(&a, &b, &mut c, 1, 0).unwrap();
/// assert_eq!(c.to_vec(), vec![2, 1, 4, 3]);
/// ```
pub fn matmul_into<T: Scalar>(
    a: &NdArray<T>,
    b: &NdArray<T>,
    c: &mut NdArray<T>,
    alpha: T,
    beta: T,
) -> Result<()> {
    matmul_into_with(&EngineConfig::default(), a, b, c, alpha, beta)
}

/// [`matmul_into`] with an explicit configuration.
pub fn matmul_into_with<T: Scalar>(
    config: &EngineConfig,
    a: &NdArray<T>,
    b: &NdArray<T>,
    c: &mut NdArray<T>,
    alpha: T,
    beta: T,
) -> Result<()> {
    require_rank(a, 2)?;
    require_rank(b, 2)?;
    require_rank(c, 2)?;
    if b.rows() != a.columns() {
        return Err(ArrayError::ShapeMismatch {
            expected: vec![a.columns(), b.columns()],
            actual: b.shape(),
        });
    }
    require_shape(c, vec![a.rows(), b.columns()])?;

    let a = resolve_source(c, a);
    let b = resolve_source(c, b);
    multiply(config, Operand::matrix(&a), Operand::matrix(&b), c, alpha, beta)
}

/// `A · x` as a new vector of the same storage variant as `a`.
///
/// # Example
///
/// ```
/// use ndviews::NdArray;
/// use ndviews::linalg::matvec;
///
/// let a = NdArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
/// let x = NdArray::from_vec(vec![1, 0, -1], &[3]).unwrap();
/// assert_eq!(matvec(&a, &x).unwrap().to_vec(), vec![-2, -2]);
/// ```
pub fn matvec<T: Scalar>(a: &NdArray<T>, x: &NdArray<T>) -> Result<NdArray<T>> {
    matvec_with(&EngineConfig::default(), a, x)
}

/// [`matvec`] with an explicit configuration.
pub fn matvec_with<T: Scalar>(config: &EngineConfig, a: &NdArray<T>, x: &NdArray<T>) -> Result<NdArray<T>> {
    require_rank(a, 2)?;
    let mut y = a.like_shape(&[a.rows()])?;
    matvec_into_with(config, a, x, &mut y, T::one(), T::zero())?;
    Ok(y)
}

/// `A · B` as a new matrix of the same storage variant as `a`.
pub fn matmul<T: Scalar>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<T>> {
    matmul_with(&EngineConfig::default(), a, b)
}

/// [`matmul`] with an explicit configuration.
pub fn matmul_with<T: Scalar>(config: &EngineConfig, a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<T>> {
    require_rank(a, 2)?;
    require_rank(b, 2)?;
    let mut c = a.like_shape(&[a.rows(), b.columns()])?;
    matmul_into_with(config, a, b, &mut c, T::one(), T::zero())?;
    Ok(c)
}

/// Shared tail of the `*_into` entry points. Operands no longer alias `out`.
fn multiply<T: Scalar>(
    config: &EngineConfig,
    a: Operand<'_, T>,
    b: Operand<'_, T>,
    out: &mut NdArray<T>,
    alpha: T,
    beta: T,
) -> Result<()> {
    let kernel = select_kernel(a.array, b.array);
    let shape = GemmShape {
        m: a.rows,
        k: a.cols,
        n: b.cols,
    };
    tracing::debug!(?kernel, m = shape.m, k = shape.k, n = shape.n, "selected multiplication kernel");

    if config.gemm_backend == GemmBackend::Faer
        && kernel == MulKernel::DenseDense
        && try_backend_gemm(a.array, b.array, out, shape, alpha, beta)
    {
        return Ok(());
    }

    let product = kernel::product(kernel, a, b);
    combine(out, &product, alpha, beta)
}

/// Run the accelerated GEMM when all three arrays are contiguous dense.
///
/// Returns `false` without touching `out` when the backend does not apply.
fn try_backend_gemm<T: Scalar>(
    a: &NdArray<T>,
    b: &NdArray<T>,
    out: &NdArray<T>,
    shape: GemmShape,
    alpha: T,
    beta: T,
) -> bool {
    let Some((start, len)) = out.layout().contiguous_run() else {
        return false;
    };
    let (Storage::Dense(dst), Some(lhs), Some(rhs)) =
        (out.storage(), a.storage().dense_ref(), b.storage().dense_ref())
    else {
        return false;
    };
    let mut dst = dst.borrow_mut();
    let used = T::gemm_contiguous(
        &mut dst.as_mut_slice()[start..start + len],
        &lhs.as_slice()[..shape.m * shape.k],
        &rhs.as_slice()[..shape.k * shape.n],
        shape,
        alpha,
        beta,
    );
    if used {
        tracing::trace!("dense product delegated to faer");
    }
    used
}

/// `out = beta * out + alpha * product`, row-major.
fn combine<T: Scalar>(out: &mut NdArray<T>, product: &[T], alpha: T, beta: T) -> Result<()> {
    let scaled = |p: T| if alpha == T::one() { p } else { alpha * p };
    let values: Vec<T> = if beta.is_zero() {
        product.iter().map(|&p| scaled(p)).collect()
    } else {
        let current = out.to_vec();
        if beta == T::one() {
            current.iter().zip(product).map(|(&y, &p)| y + scaled(p)).collect()
        } else {
            current.iter().zip(product).map(|(&y, &p)| beta * y + scaled(p)).collect()
        }
    };
    out.assign_slice(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matvec_beta_zero_ignores_nan() {
        let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let x = NdArray::from_vec(vec![1.0, -1.0], &[2]).unwrap();
        let mut y = NdArray::from_vec(vec![f64::NAN, f64::NAN], &[2]).unwrap();
        matvec_into(&a, &x, &mut y, 1.0, 0.0).unwrap();
        assert_eq!(y.to_vec(), vec![-1.0, -1.0]);
    }

    #[test]
    fn test_matmul_alpha_beta() {
        let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let b = NdArray::from_vec(vec![1.0, 0.0, 0.0, 1.0], &[2, 2]).unwrap();
        let mut c = NdArray::from_vec(vec![1.0, 1.0, 1.0, 1.0], &[2, 2]).unwrap();
        matmul_into(&a, &b, &mut c, 0.5, 2.0).unwrap();
        let got = c.to_vec();
        for (g, e) in got.iter().zip([2.5, 3.0, 3.5, 4.0]) {
            assert_relative_eq!(*g, e);
        }
    }

    #[test]
    fn test_shape_errors_leave_result_untouched() {
        let a: NdArray<f64> = NdArray::ones(&[2, 3]).unwrap();
        let x: NdArray<f64> = NdArray::ones(&[2]).unwrap();
        let mut y = NdArray::from_vec(vec![7.0, 7.0], &[2]).unwrap();
        assert!(matches!(
            matvec_into(&a, &x, &mut y, 1.0, 0.0),
            Err(ArrayError::ShapeMismatch { .. })
        ));
        assert_eq!(y.to_vec(), vec![7.0, 7.0]);

        let v: NdArray<f64> = NdArray::ones(&[3]).unwrap();
        let mut c: NdArray<f64> = NdArray::zeros(&[2, 2]).unwrap();
        assert!(matches!(
            matmul_into(&a, &v, &mut c, 1.0, 0.0),
            Err(ArrayError::RankMismatch { expected: 2, actual: 1 })
        ));
        let b: NdArray<f64> = NdArray::ones(&[3, 4]).unwrap();
        assert!(matches!(
            matmul_into(&a, &b, &mut c, 1.0, 0.0),
            Err(ArrayError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_result_aliases_operand() {
        // c = a · a where c is a itself.
        let mut a = NdArray::from_vec(vec![1, 1, 0, 1], &[2, 2]).unwrap();
        let operand = a.view();
        matmul_into(&operand, &operand, &mut a, 1, 0).unwrap();
        assert_eq!(a.to_vec(), vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_faer_backend_matches_naive() {
        let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let b = NdArray::from_vec(vec![1.0, -1.0, 0.5, 2.0, 0.0, 1.0], &[3, 2]).unwrap();
        let naive = matmul(&a, &b).unwrap();
        let config = EngineConfig::default().with_gemm_backend(GemmBackend::Faer);
        let fast = matmul_with(&config, &a, &b).unwrap();
        for (x, y) in naive.to_vec().iter().zip(fast.to_vec()) {
            assert_relative_eq!(*x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sparse_result_stays_sparse() {
        let a = NdArray::sparse_from_vec(&[0.0, 2.0, 0.0, 0.0], &[2, 2]).unwrap();
        let b = NdArray::from_vec(vec![1.0, 0.0, 0.0, 3.0], &[2, 2]).unwrap();
        let c = matmul(&a, &b).unwrap();
        assert!(c.storage().is_sparse());
        assert_eq!(c.to_vec(), vec![0.0, 6.0, 0.0, 0.0]);
        assert_eq!(c.cardinality(), 1);
    }
}
