//! Backend acceleration for dense kernels.
//!
//! The portable kernels in [`crate::linalg`] never need a backend. When
//! [`crate::config::GemmBackend::Faer`] is selected, contiguous dense
//! products over `f64`/`c64` are delegated to faer through the
//! [`crate::Scalar::gemm_contiguous`] hook.

mod faer_interop;

pub use faer_interop::{GemmShape, faer_gemm_row_major};
