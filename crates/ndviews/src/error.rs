//! Error types for ndviews.

use thiserror::Error;

/// Errors that can occur in array operations.
///
/// Every variant describes a caller error (malformed shapes or indices).
/// Nothing here is transient, so no operation retries on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// A coordinate lies outside the declared bounds of its dimension.
    #[error("index {index} out of range for dimension {dim} with size {size}")]
    OutOfRange { index: usize, dim: usize, size: usize },

    /// Operand shapes are incompatible for the requested operation.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A selection array references a position outside `[0, size)`.
    #[error("invalid selection index {index} for dimension of size {size}")]
    InvalidIndex { index: usize, size: usize },

    /// Wrong number of coordinates supplied for the array rank.
    #[error("wrong number of indices: expected {expected}, got {actual}")]
    WrongNumberOfIndices { expected: usize, actual: usize },

    /// Operation requires an array of a specific rank.
    #[error("expected array of rank {expected}, got rank {actual}")]
    RankMismatch { expected: usize, actual: usize },

    /// Only ranks 1, 2 and 3 are supported.
    #[error("unsupported rank {rank}: arrays must have 1 to 3 dimensions")]
    UnsupportedRank { rank: usize },

    /// Part range out of bounds.
    #[error("range {start}..{end} out of bounds for dimension {dim} with size {size}")]
    SliceOutOfBounds {
        start: usize,
        end: usize,
        dim: usize,
        size: usize,
    },

    /// Dimension number outside `0..ndim`.
    #[error("dimension {dim} out of range for array with {ndim} dimensions")]
    InvalidDimension { dim: usize, ndim: usize },

    /// Invalid dimension permutation.
    #[error("invalid permutation {perm:?} for array with {ndim} dimensions")]
    InvalidPermutation { perm: Vec<usize>, ndim: usize },

    /// Zero strides would alias every element of a dimension onto one cell.
    #[error("stride 0 is not allowed for dimension {dim}")]
    ZeroStride { dim: usize },

    /// Flat buffer length does not match the element count.
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Storage could not grow to hold the requested number of elements.
    #[error("cannot grow storage by {requested} elements")]
    CapacityOverflow { requested: usize },

    /// Configuration value rejected by validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type for array operations.
pub type Result<T> = std::result::Result<T, ArrayError>;
