//! Storage types for array data.
//!
//! ```text
//! CellStorage<T> (trait)
//! ├── DenseStorage<T>  - flat buffer
//! └── SparseStorage<T> - position -> value hash map
//! ```
//!
//! Array handles hold a [`Storage`], a reference-counted handle to one of
//! the two. Owners and all their views clone the same `Rc`, so storage lives
//! exactly as long as the last handle referencing it.

mod dense;
mod sparse;

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::scalar::Scalar;

pub use dense::DenseStorage;
pub use sparse::SparseStorage;

/// Operations shared by dense and sparse storage.
///
/// Positions are physical: they come out of an
/// [`AddressModel`](crate::address::AddressModel).
pub trait CellStorage<T: Scalar>: std::fmt::Debug {
    /// Value at `pos`. Sparse storage returns zero for absent keys.
    fn get(&self, pos: usize) -> T;

    /// Write `value` at `pos`. Sparse storage removes the key for zero.
    fn set(&mut self, pos: usize, value: T);

    /// Make room for at least `n` elements without losing contents.
    fn ensure_capacity(&mut self, n: usize);

    /// Release unused capacity.
    fn trim(&mut self);

    /// Number of addressable positions.
    fn key_space(&self) -> usize;
}

/// Closed set of storage kinds used for fast-path dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Dense,
    Sparse,
    /// Dense storage seen through an index selection.
    SelectedDense,
    /// Sparse storage seen through an index selection.
    SelectedSparse,
}

impl StorageKind {
    #[inline]
    pub fn is_sparse(self) -> bool {
        matches!(self, StorageKind::Sparse | StorageKind::SelectedSparse)
    }

    #[inline]
    pub fn is_selected(self) -> bool {
        matches!(
            self,
            StorageKind::SelectedDense | StorageKind::SelectedSparse
        )
    }
}

/// Shared handle to dense or sparse storage.
#[derive(Debug)]
pub enum Storage<T: Scalar> {
    Dense(Rc<RefCell<DenseStorage<T>>>),
    Sparse(Rc<RefCell<SparseStorage<T>>>),
}

impl<T: Scalar> Clone for Storage<T> {
    /// Shallow: the clone refers to the same cells.
    fn clone(&self) -> Self {
        match self {
            Storage::Dense(d) => Storage::Dense(Rc::clone(d)),
            Storage::Sparse(s) => Storage::Sparse(Rc::clone(s)),
        }
    }
}

impl<T: Scalar> Storage<T> {
    pub fn dense(storage: DenseStorage<T>) -> Self {
        Storage::Dense(Rc::new(RefCell::new(storage)))
    }

    pub fn sparse(storage: SparseStorage<T>) -> Self {
        Storage::Sparse(Rc::new(RefCell::new(storage)))
    }

    /// Fresh zero storage of the same variant.
    pub fn fresh_like(&self, key_space: usize) -> Self {
        match self {
            Storage::Dense(_) => Storage::dense(DenseStorage::zeros(key_space)),
            Storage::Sparse(_) => Storage::sparse(SparseStorage::new(key_space)),
        }
    }

    #[inline]
    pub fn is_sparse(&self) -> bool {
        matches!(self, Storage::Sparse(_))
    }

    /// True if both handles refer to the same cells.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Storage::Dense(a), Storage::Dense(b)) => Rc::ptr_eq(a, b),
            (Storage::Sparse(a), Storage::Sparse(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of handles (owner plus views) sharing these cells.
    pub fn handle_count(&self) -> usize {
        match self {
            Storage::Dense(d) => Rc::strong_count(d),
            Storage::Sparse(s) => Rc::strong_count(s),
        }
    }

    #[inline]
    pub fn get(&self, pos: usize) -> T {
        match self {
            Storage::Dense(d) => d.borrow().get(pos),
            Storage::Sparse(s) => s.borrow().get(pos),
        }
    }

    #[inline]
    pub fn set(&self, pos: usize, value: T) {
        match self {
            Storage::Dense(d) => d.borrow_mut().set(pos, value),
            Storage::Sparse(s) => s.borrow_mut().set(pos, value),
        }
    }

    pub fn ensure_capacity(&self, n: usize) {
        match self {
            Storage::Dense(d) => d.borrow_mut().ensure_capacity(n),
            Storage::Sparse(s) => s.borrow_mut().ensure_capacity(n),
        }
    }

    pub fn trim(&self) {
        match self {
            Storage::Dense(d) => d.borrow_mut().trim(),
            Storage::Sparse(s) => s.borrow_mut().trim(),
        }
    }

    pub fn key_space(&self) -> usize {
        match self {
            Storage::Dense(d) => d.borrow().key_space(),
            Storage::Sparse(s) => s.borrow().key_space(),
        }
    }

    /// Borrow the dense buffer, if this is dense storage.
    pub fn dense_ref(&self) -> Option<Ref<'_, DenseStorage<T>>> {
        match self {
            Storage::Dense(d) => Some(d.borrow()),
            Storage::Sparse(_) => None,
        }
    }

    pub fn dense_mut(&self) -> Option<RefMut<'_, DenseStorage<T>>> {
        match self {
            Storage::Dense(d) => Some(d.borrow_mut()),
            Storage::Sparse(_) => None,
        }
    }

    /// Borrow the sparse map, if this is sparse storage.
    pub fn sparse_ref(&self) -> Option<Ref<'_, SparseStorage<T>>> {
        match self {
            Storage::Sparse(s) => Some(s.borrow()),
            Storage::Dense(_) => None,
        }
    }

    pub fn sparse_mut(&self) -> Option<RefMut<'_, SparseStorage<T>>> {
        match self {
            Storage::Sparse(s) => Some(s.borrow_mut()),
            Storage::Dense(_) => None,
        }
    }
}
