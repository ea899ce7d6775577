//! In-place element-wise maps and zips.
//!
//! Recognised functions get fast paths:
//!
//! ```text
//! Scale(1), Shift(0), PlusMult(0)   no-op, O(1)
//! Scale(0), Fill(c)                 fill
//! Scale(c) on a sparse owner        stored entries only
//! PlusMult(c) with sparse owner b   b's stored entries only
//! Mult with sparse owner a          a's stored entries only
//! dense contiguous operands         slice loops
//! ```
//!
//! Everything else goes through the generic path, which walks the address
//! models of both operands.
//!
//! Custom closures may read any handle on the cells being written, so they
//! never run while a storage borrow is held: results are gathered first and
//! written afterwards.

use std::fmt;

use crate::alias::resolve_source;
use crate::array::NdArray;
use crate::error::Result;
use crate::scalar::Scalar;
use crate::storage::{CellStorage, Storage};
use crate::strides::linear_to_cartesian;

use super::check_same_shape;

/// Unary function applied by [`NdArray::map_in_place`].
#[derive(Clone, Copy)]
pub enum UnaryFn<'f, T> {
    /// `x * c`
    Scale(T),
    /// `x + c`
    Shift(T),
    /// `c`
    Fill(T),
    Custom(&'f dyn Fn(T) -> T),
}

impl<T: Scalar> UnaryFn<'_, T> {
    #[inline]
    pub fn apply(&self, x: T) -> T {
        match *self {
            UnaryFn::Scale(c) => x * c,
            UnaryFn::Shift(c) => x + c,
            UnaryFn::Fill(c) => c,
            UnaryFn::Custom(f) => f(x),
        }
    }

    /// True if applying the function leaves every value unchanged.
    pub fn is_identity(&self) -> bool {
        match *self {
            UnaryFn::Scale(c) => c == T::one(),
            UnaryFn::Shift(c) => c.is_zero(),
            _ => false,
        }
    }

    /// True if `f(0) == 0`, so absent sparse entries stay absent.
    fn preserves_zero(&self) -> bool {
        self.apply(T::zero()).is_zero()
    }
}

impl<T: fmt::Debug> fmt::Debug for UnaryFn<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryFn::Scale(c) => f.debug_tuple("Scale").field(c).finish(),
            UnaryFn::Shift(c) => f.debug_tuple("Shift").field(c).finish(),
            UnaryFn::Fill(c) => f.debug_tuple("Fill").field(c).finish(),
            UnaryFn::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Binary function applied by [`NdArray::zip_in_place`] as `f(a[i], b[i])`.
#[derive(Clone, Copy)]
pub enum BinaryFn<'f, T> {
    /// `a + c * b`
    PlusMult(T),
    /// `a * b`
    Mult,
    /// `b`
    Second,
    Custom(&'f dyn Fn(T, T) -> T),
}

impl<T: Scalar> BinaryFn<'_, T> {
    #[inline]
    pub fn apply(&self, a: T, b: T) -> T {
        match *self {
            BinaryFn::PlusMult(c) => a + c * b,
            BinaryFn::Mult => a * b,
            BinaryFn::Second => b,
            BinaryFn::Custom(f) => f(a, b),
        }
    }

    /// True if the result always equals `a`.
    pub fn is_identity(&self) -> bool {
        matches!(*self, BinaryFn::PlusMult(c) if c.is_zero())
    }
}

impl<T: fmt::Debug> fmt::Debug for BinaryFn<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryFn::PlusMult(c) => f.debug_tuple("PlusMult").field(c).finish(),
            BinaryFn::Mult => f.write_str("Mult"),
            BinaryFn::Second => f.write_str("Second"),
            BinaryFn::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl<T: Scalar> NdArray<T> {
    /// `a[i] = f(a[i])` for every element.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndviews::NdArray;
    /// use ndviews::operations::UnaryFn;
    ///
    /// let mut a = NdArray::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
    /// a.map_in_place(UnaryFn::Scale(2.0));
    /// a.map_in_place(UnaryFn::Shift(-1.0));
    /// assert_eq!(a.to_vec(), vec![1.0, 3.0, 5.0]);
    /// ```
    pub fn map_in_place(&mut self, f: UnaryFn<'_, T>) {
        if f.is_identity() {
            tracing::trace!(?f, "identity map skipped");
            return;
        }
        match f {
            UnaryFn::Fill(c) => return self.fill(c),
            UnaryFn::Scale(c) if c.is_zero() => return self.fill(T::zero()),
            UnaryFn::Custom(_) => return map_detached(self, f),
            _ => {}
        }

        match self.storage() {
            Storage::Sparse(cells) if !self.is_view() && f.preserves_zero() => {
                cells.borrow_mut().map_stored(|v| f.apply(v));
            }
            Storage::Dense(cells) => {
                let mut cells = cells.borrow_mut();
                if let Some((start, len)) = self.layout().contiguous_run() {
                    for x in &mut cells.as_mut_slice()[start..start + len] {
                        *x = f.apply(*x);
                    }
                } else {
                    for pos in self.layout().positions() {
                        let v = cells.get(pos);
                        cells.set(pos, f.apply(v));
                    }
                }
            }
            Storage::Sparse(cells) => {
                let mut cells = cells.borrow_mut();
                for pos in self.layout().positions() {
                    let v = cells.get(pos);
                    cells.set(pos, f.apply(v));
                }
            }
        }
    }

    /// Apply a closure to every element.
    pub fn map_in_place_with<F: Fn(T) -> T>(&mut self, f: F) {
        self.map_in_place(UnaryFn::Custom(&f));
    }

    /// `a[i] = f(a[i], b[i])` for every element.
    ///
    /// The result equals reading every `b[i]` before writing any `a[i]`, even
    /// when `b` is a view of `a`.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` before any write if the shapes differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndviews::NdArray;
    /// use ndviews::operations::BinaryFn;
    ///
    /// let mut y = NdArray::from_vec(vec![1.0, 1.0, 1.0], &[3]).unwrap();
    /// let x = NdArray::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
    /// y.zip_in_place(&x, BinaryFn::PlusMult(2.0)).unwrap();
    /// assert_eq!(y.to_vec(), vec![3.0, 5.0, 7.0]);
    /// ```
    pub fn zip_in_place(&mut self, other: &NdArray<T>, f: BinaryFn<'_, T>) -> Result<()> {
        check_same_shape(self, other)?;
        if f.is_identity() {
            tracing::trace!(?f, "identity zip skipped");
            return Ok(());
        }
        let src = resolve_source(self, other);
        let src: &NdArray<T> = &src;

        match f {
            BinaryFn::Second => {
                super::copy::copy_values(self, src);
                return Ok(());
            }
            BinaryFn::Custom(_) => {
                zip_detached(self, src, f);
                return Ok(());
            }
            _ => {}
        }

        match (self.storage(), src.storage(), f) {
            (_, Storage::Sparse(b_cells), BinaryFn::PlusMult(c)) if !src.is_view() => {
                let entries = b_cells.borrow().sorted_entries();
                let shape = self.shape();
                for (k, v) in entries {
                    let pos = self.layout().position_quick(&linear_to_cartesian(k, &shape));
                    let a = self.storage().get(pos);
                    self.storage().set(pos, a + c * v);
                }
            }
            (Storage::Sparse(a_cells), _, BinaryFn::Mult) if !self.is_view() => {
                let entries = a_cells.borrow().sorted_entries();
                let shape = self.shape();
                let mut a_cells = a_cells.borrow_mut();
                for (k, v) in entries {
                    let b = src.get_quick(&linear_to_cartesian(k, &shape));
                    a_cells.set(k, v * b);
                }
            }
            (Storage::Dense(a_cells), Storage::Dense(b_cells), _) => {
                let runs = (self.layout().contiguous_run(), src.layout().contiguous_run());
                if let (Some((sa, len)), Some((sb, _))) = runs {
                    let mut a_cells = a_cells.borrow_mut();
                    let b_cells = b_cells.borrow();
                    let a_slice = &mut a_cells.as_mut_slice()[sa..sa + len];
                    let b_slice = &b_cells.as_slice()[sb..sb + len];
                    for (x, &y) in a_slice.iter_mut().zip(b_slice) {
                        *x = f.apply(*x, y);
                    }
                } else {
                    zip_generic(self, src, f);
                }
            }
            _ => zip_generic(self, src, f),
        }
        Ok(())
    }

    /// Combine with `other` using a closure `f(a, b)`.
    pub fn zip_in_place_with<F: Fn(T, T) -> T>(&mut self, other: &NdArray<T>, f: F) -> Result<()> {
        self.zip_in_place(other, BinaryFn::Custom(&f))
    }

    /// New array holding `alpha * self`, same storage variant.
    pub fn scaled(&self, alpha: T) -> NdArray<T> {
        let mut out = self.copy();
        out.map_in_place(UnaryFn::Scale(alpha));
        out
    }

    /// New array holding `f(self[i])`, same storage variant.
    pub fn map<F: Fn(T) -> T>(&self, f: F) -> NdArray<T> {
        let mut out = self.copy();
        out.map_in_place_with(f);
        out
    }
}

/// `map_in_place` for closures: no borrow is held while `f` runs.
fn map_detached<T: Scalar>(dest: &NdArray<T>, f: UnaryFn<'_, T>) {
    let updates: Vec<(usize, T)> = match dest.storage() {
        Storage::Sparse(cells) if !dest.is_view() && f.preserves_zero() => {
            let entries = cells.borrow().sorted_entries();
            entries.into_iter().map(|(k, v)| (k, f.apply(v))).collect()
        }
        storage => dest
            .layout()
            .positions()
            .map(|pos| (pos, f.apply(storage.get(pos))))
            .collect(),
    };
    for (pos, v) in updates {
        dest.storage().set(pos, v);
    }
}

/// `zip_in_place` for closures: every `f(a, b)` is evaluated before the
/// first write.
fn zip_detached<T: Scalar>(dest: &NdArray<T>, src: &NdArray<T>, f: BinaryFn<'_, T>) {
    let updates: Vec<(usize, T)> = dest
        .layout()
        .positions()
        .zip(src.layout().positions())
        .map(|(pa, pb)| (pa, f.apply(dest.storage().get(pa), src.storage().get(pb))))
        .collect();
    for (pos, v) in updates {
        dest.storage().set(pos, v);
    }
}

/// Walk both address models in logical order.
fn zip_generic<T: Scalar>(dest: &NdArray<T>, src: &NdArray<T>, f: BinaryFn<'_, T>) {
    for (pa, pb) in dest.layout().positions().zip(src.layout().positions()) {
        let v = f.apply(dest.storage().get(pa), src.storage().get(pb));
        dest.storage().set(pa, v);
    }
}
