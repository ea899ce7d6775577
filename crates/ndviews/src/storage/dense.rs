//! Dense storage: a flat buffer addressed by physical position.

use std::collections::TryReserveError;

use crate::scalar::Scalar;

use super::CellStorage;

/// Contiguous buffer of elements.
///
/// The buffer length is the key space; positions produced by any
/// [`AddressModel`](crate::address::AddressModel) over this storage index it
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseStorage<T: Scalar> {
    data: Vec<T>,
}

impl<T: Scalar> DenseStorage<T> {
    /// Zero-initialised storage of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![T::zero(); len],
        }
    }

    /// Take ownership of an existing buffer.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Allocated slots, including slack beyond `len()`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Append one element.
    pub fn push(&mut self, value: T) {
        self.data.push(value);
    }

    /// Append a batch of elements.
    pub fn extend_from_slice(&mut self, values: &[T]) {
        self.data.extend_from_slice(values);
    }

    /// Reserve room for `additional` more elements, failing instead of aborting.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.data.try_reserve(additional)
    }

    /// Shorten the buffer to `len` elements. Views are not re-validated.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Scalar> CellStorage<T> for DenseStorage<T> {
    #[inline]
    fn get(&self, pos: usize) -> T {
        self.data[pos]
    }

    #[inline]
    fn set(&mut self, pos: usize, value: T) {
        self.data[pos] = value;
    }

    fn ensure_capacity(&mut self, n: usize) {
        if n > self.data.capacity() {
            // Vec::reserve grows geometrically, keeping appends amortised O(1).
            self.data.reserve(n - self.data.len());
        }
    }

    fn trim(&mut self) {
        self.data.shrink_to_fit();
    }

    #[inline]
    fn key_space(&self) -> usize {
        self.data.len()
    }
}
