//! Integration tests for sparse arrays.

use ndviews::operations::{BinaryFn, UnaryFn, sum};
use ndviews::{NdArray, StorageKind};

#[test]
fn test_cardinality_tracks_writes() {
    let mut a: NdArray<f64> = NdArray::sparse(&[4, 4]).unwrap();
    assert_eq!(a.kind(), StorageKind::Sparse);
    a.set(&[0, 1], 2.5).unwrap();
    a.set(&[3, 3], -1.0).unwrap();
    assert_eq!(a.cardinality(), 2);

    a.set(&[0, 1], 0.0).unwrap();
    assert_eq!(a.cardinality(), 1);
    assert_eq!(a.get(&[0, 1]).unwrap(), 0.0);
    assert_eq!(a.non_zeros(), vec![(15, -1.0)]);
}

#[test]
fn test_reads_of_absent_cells_are_zero() {
    let a: NdArray<i32> = NdArray::sparse(&[2, 3, 4]).unwrap();
    assert!(a.to_vec().iter().all(|&x| x == 0));
    assert_eq!(a.cardinality(), 0);
    assert_eq!(a.storage().sparse_ref().map(|s| s.cardinality()), Some(0));
}

#[test]
fn test_view_cardinality_counts_visible_cells() {
    let a = NdArray::sparse_from_vec(&[1, 0, 2, 0, 0, 3], &[2, 3]).unwrap();
    let row = a.row(1).unwrap();
    assert_eq!(row.kind(), StorageKind::Sparse);
    assert_eq!(row.cardinality(), 1);
    assert_eq!(row.non_zeros(), vec![(2, 3)]);

    let sel = a.select_indices(1, &[2, 0]).unwrap();
    assert_eq!(sel.kind(), StorageKind::SelectedSparse);
    assert_eq!(sel.to_vec(), vec![2, 1, 3, 0]);
}

#[test]
fn test_writes_through_sparse_view() {
    let a: NdArray<i64> = NdArray::sparse(&[3, 3]).unwrap();
    let mut diag = a.view_strides(&[1, 1]).unwrap();
    for i in 0..3 {
        diag.set(&[i, i], 1).unwrap();
    }
    assert_eq!(a.cardinality(), 3);
    let mut t = a.transpose().unwrap();
    t.set(&[2, 0], 7).unwrap();
    assert_eq!(a.get(&[0, 2]).unwrap(), 7);
    assert_eq!(a.cardinality(), 4);
}

#[test]
fn test_scale_and_fill() {
    let mut a = NdArray::sparse_from_vec(&[0.0, 2.0, 0.0, 4.0], &[4]).unwrap();
    a.map_in_place(UnaryFn::Scale(0.5));
    assert_eq!(a.to_vec(), vec![0.0, 1.0, 0.0, 2.0]);
    assert_eq!(a.cardinality(), 2);

    // Shift(1) does not preserve zero, so every cell becomes stored.
    a.map_in_place(UnaryFn::Shift(1.0));
    assert_eq!(a.cardinality(), 4);

    a.map_in_place(UnaryFn::Scale(0.0));
    assert_eq!(a.cardinality(), 0);

    a.fill(3.0);
    assert_eq!(sum(&a), 12.0);
    a.fill(0.0);
    assert_eq!(a.cardinality(), 0);
}

#[test]
fn test_cancellation_removes_entries() {
    let mut a = NdArray::sparse_from_vec(&[1, 2, 3], &[3]).unwrap();
    let b = NdArray::from_vec(vec![1, 0, 3], &[3]).unwrap();
    a.zip_in_place(&b, BinaryFn::PlusMult(-1)).unwrap();
    assert_eq!(a.to_vec(), vec![0, 2, 0]);
    assert_eq!(a.cardinality(), 1);
}

#[test]
fn test_copy_and_like_keep_variant() {
    let a = NdArray::sparse_from_vec(&[0, 5, 0, 0], &[2, 2]).unwrap();
    let c = a.transpose().unwrap().copy();
    assert_eq!(c.kind(), StorageKind::Sparse);
    assert_eq!(c.to_vec(), vec![0, 0, 5, 0]);
    assert_eq!(c.cardinality(), 1);

    let z = a.like();
    assert_eq!(z.kind(), StorageKind::Sparse);
    assert_eq!(z.shape(), vec![2, 2]);
    assert_eq!(z.cardinality(), 0);
}

#[test]
fn test_dense_and_sparse_compare_equal() {
    let d = NdArray::from_vec(vec![0, 1, 0, 2], &[4]).unwrap();
    let s = NdArray::sparse_from_vec(&[0, 1, 0, 2], &[4]).unwrap();
    assert_eq!(d, s);
    assert_eq!(d.non_zeros(), s.non_zeros());
}
