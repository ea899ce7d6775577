//! Element-wise operations, copies and reductions.
//!
//! ```text
//! map_in_place / zip_in_place    in-place, fast paths by function and kind
//!     → shape check (before any write)
//!     → alias resolution (source copied on conflict)
//!     → kind-specific loop or generic address walk
//!
//! copy_into / assign_from        alias-safe value copy
//! sum / aggregate / dot          index-order reductions
//! ```

mod copy;
mod elementwise;
mod reduce;

use crate::array::NdArray;
use crate::error::{ArrayError, Result};
use crate::scalar::Scalar;

pub use copy::copy_into;
pub use elementwise::{BinaryFn, UnaryFn};
pub use reduce::{aggregate, dot, dot_all, sum};

/// Fail with `ShapeMismatch` unless `a` and `b` have identical shapes.
pub(crate) fn check_same_shape<T: Scalar>(a: &NdArray<T>, b: &NdArray<T>) -> Result<()> {
    let (sa, sb) = (a.shape(), b.shape());
    if sa != sb {
        return Err(ArrayError::ShapeMismatch {
            expected: sa,
            actual: sb,
        });
    }
    Ok(())
}
