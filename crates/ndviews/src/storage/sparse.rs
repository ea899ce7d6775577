//! Sparse storage: a hash map from physical position to non-zero value.

use std::collections::HashMap;

use crate::scalar::Scalar;

use super::CellStorage;

/// Map from physical position to element value.
///
/// Absent keys read as zero. Zero is never stored: writing it removes the
/// key, so the number of occupied keys is always the number of non-zero
/// cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseStorage<T: Scalar> {
    map: HashMap<usize, T>,
    key_space: usize,
}

impl<T: Scalar> SparseStorage<T> {
    /// Empty storage over positions `0..key_space`.
    pub fn new(key_space: usize) -> Self {
        Self {
            map: HashMap::new(),
            key_space,
        }
    }

    /// Number of stored (non-zero) entries.
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.map.contains_key(&pos)
    }

    /// Stored entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.map.iter().map(|(&k, &v)| (k, v))
    }

    /// Stored entries in ascending key order.
    pub fn sorted_entries(&self) -> Vec<(usize, T)> {
        let mut entries: Vec<(usize, T)> = self.iter().collect();
        entries.sort_unstable_by_key(|&(k, _)| k);
        entries
    }

    /// Apply `f` to every stored value, dropping entries that become zero.
    pub fn map_stored<F: FnMut(T) -> T>(&mut self, mut f: F) {
        self.map.retain(|_, v| {
            *v = f(*v);
            !v.is_zero()
        });
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<T: Scalar> CellStorage<T> for SparseStorage<T> {
    #[inline]
    fn get(&self, pos: usize) -> T {
        self.map.get(&pos).copied().unwrap_or_else(T::zero)
    }

    #[inline]
    fn set(&mut self, pos: usize, value: T) {
        if value.is_zero() {
            self.map.remove(&pos);
        } else {
            self.map.insert(pos, value);
        }
    }

    fn ensure_capacity(&mut self, n: usize) {
        self.map.reserve(n.saturating_sub(self.map.len()));
    }

    fn trim(&mut self) {
        self.map.shrink_to_fit();
    }

    #[inline]
    fn key_space(&self) -> usize {
        self.key_space
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_reads_zero() {
        let s: SparseStorage<f64> = SparseStorage::new(16);
        assert_eq!(s.get(3), 0.0);
        assert_eq!(s.cardinality(), 0);
        assert_eq!(s.key_space(), 16);
    }

    #[test]
    fn test_set_zero_removes_key() {
        let mut s = SparseStorage::new(16);
        s.set(2, 1.5);
        s.set(9, -2.0);
        assert_eq!(s.cardinality(), 2);
        s.set(2, 0.0);
        assert_eq!(s.cardinality(), 1);
        assert!(!s.contains(2));
        assert_eq!(s.get(2), 0.0);
        // Removing an absent key is a no-op.
        s.set(5, 0.0);
        assert_eq!(s.cardinality(), 1);
    }

    #[test]
    fn test_sorted_entries() {
        let mut s = SparseStorage::new(100);
        for k in [42, 7, 99, 0] {
            s.set(k, k as i64 + 1);
        }
        assert_eq!(s.sorted_entries(), vec![(0, 1), (7, 8), (42, 43), (99, 100)]);
    }

    #[test]
    fn test_map_stored_drops_zeros() {
        let mut s = SparseStorage::new(10);
        s.set(1, 2);
        s.set(3, 5);
        s.map_stored(|v| v - 2);
        assert_eq!(s.sorted_entries(), vec![(3, 3)]);
    }

    #[test]
    fn test_capacity_and_trim() {
        let mut s: SparseStorage<f32> = SparseStorage::new(1000);
        s.ensure_capacity(64);
        s.set(10, 1.0);
        s.trim();
        assert_eq!(s.get(10), 1.0);
        s.clear();
        assert_eq!(s.cardinality(), 0);
    }
}
