//! ndviews - dense and sparse arrays with zero-copy views
//!
//! Arrays of rank 1 to 3 over shared storage. A view (sub-range, transpose,
//! flip, stride, index selection) is a new [`NdArray`] handle with its own
//! address model over the parent's cells; writes through either handle are
//! visible through both.
//!
//! # Architecture
//!
//! ```text
//! NdArray<T>                     handle: storage + address model
//! ├── storage    Dense | Sparse  Rc<RefCell<..>>, shared by views
//! ├── address    AddressModel    base + per-dimension origin/stride/table
//! └── view       derived handles, never copy elements
//!
//! operations     map/zip in place, copies, reductions (alias-safe)
//! sorting        adaptive counting/quick sort, stable merge sort, search
//! linalg         matvec/matmul with kernels per storage kind
//! backend        faer GEMM for contiguous f64/c64 products
//! ```
//!
//! # Example
//!
//! ```
//! use ndviews::NdArray;
//!
//! let a = NdArray::from_vec(vec![3, 1, 4, 1, 5], &[5]).unwrap();
//! let mut part = a.sub_range(1, 3).unwrap();
//! part.set1(0, 9).unwrap();
//! assert_eq!(a.to_vec(), vec![3, 9, 4, 1, 5]);
//! ```

pub mod address;
pub mod alias;
pub mod backend;
pub mod config;
pub mod error;
pub mod linalg;
pub mod operations;
pub mod random;
pub mod scalar;
pub mod sink;
pub mod sorting;
pub mod storage;
pub mod strides;

mod array;
mod view;

pub use array::NdArray;
pub use config::{EngineConfig, GemmBackend};
pub use error::{ArrayError, Result};
pub use scalar::{Scalar, SortKey, c64};
pub use storage::StorageKind;
