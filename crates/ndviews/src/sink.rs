//! Batch append into storage.

use crate::error::{ArrayError, Result};
use crate::scalar::Scalar;
use crate::storage::DenseStorage;

/// Receiver of element batches.
///
/// A batch is accepted whole or not at all: on error the sink is unchanged.
pub trait BatchSink<T> {
    fn add_all_of(&mut self, batch: &[T]) -> Result<()>;
}

impl<T: Scalar> BatchSink<T> for DenseStorage<T> {
    /// Append `batch`, reserving room for all of it before copying.
    ///
    /// # Example
    ///
    /// ```
    /// use ndviews::sink::BatchSink;
    /// use ndviews::storage::DenseStorage;
    ///
    /// let mut d = DenseStorage::from_vec(vec![1, 2]);
    /// d.add_all_of(&[3, 4, 5]).unwrap();
    /// assert_eq!(d.as_slice(), &[1, 2, 3, 4, 5]);
    /// ```
    fn add_all_of(&mut self, batch: &[T]) -> Result<()> {
        self.try_reserve(batch.len())
            .map_err(|_| ArrayError::CapacityOverflow { requested: batch.len() })?;
        self.extend_from_slice(batch);
        Ok(())
    }
}

impl<T> BatchSink<T> for Vec<T>
where
    T: Clone,
{
    fn add_all_of(&mut self, batch: &[T]) -> Result<()> {
        self.try_reserve(batch.len())
            .map_err(|_| ArrayError::CapacityOverflow { requested: batch.len() })?;
        self.extend_from_slice(batch);
        Ok(())
    }
}
