//! Integration tests for sorting, searching and shuffling.

use ndviews::sorting::{
    SortAlgorithm, binary_search, counting_sort, mergesort_by, quicksort_by, shuffle, sort_range,
    sort_range_with,
};
use ndviews::{ArrayError, EngineConfig, NdArray, StorageKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_small_byte_range_uses_counting_sort() {
    let mut data = [5u8, 3, 3, 1, 2];
    assert_eq!(sort_range(&mut data, 0, 4).unwrap(), SortAlgorithm::Counting);
    assert_eq!(data, [1, 2, 3, 3, 5]);

    let mut same = [5u8, 3, 3, 1, 2];
    quicksort_by(&mut same, 0, 4, |a, b| a.cmp(b)).unwrap();
    assert_eq!(same, data);
}

#[test]
fn test_wide_range_uses_quicksort() {
    let mut data = [1_000_000i64, -1_000_000, 0, 5];
    assert_eq!(sort_range(&mut data, 0, 3).unwrap(), SortAlgorithm::Quick);
    assert_eq!(data, [-1_000_000, 0, 5, 1_000_000]);
}

#[test]
fn test_width_threshold_is_configurable() {
    let mut rng = StdRng::seed_from_u64(17);
    let data: Vec<i32> = (0..2000).map(|_| rng.random_range(0..500)).collect();

    let mut a = data.clone();
    assert_eq!(sort_range(&mut a, 0, 1999).unwrap(), SortAlgorithm::Counting);

    let narrow = EngineConfig::default().with_counting_sort_max_width(100);
    let mut b = data.clone();
    assert_eq!(sort_range_with(&narrow, &mut b, 0, 1999).unwrap(), SortAlgorithm::Quick);
    assert_eq!(a, b);
}

#[test]
fn test_range_bounds_respected() {
    let mut data = [9, 8, 7, 6, 5, 4];
    sort_range(&mut data, 1, 4).unwrap();
    assert_eq!(data, [9, 5, 6, 7, 8, 4]);

    assert!(matches!(sort_range(&mut data, 0, 6), Err(ArrayError::OutOfRange { .. })));
    assert!(matches!(sort_range(&mut data, 4, 3), Err(ArrayError::SliceOutOfBounds { .. })));
    assert!(counting_sort(&mut data, 0, 10).is_err());
}

#[test]
fn test_floats_with_duplicates() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut data: Vec<f64> = (0..500).map(|_| f64::from(rng.random_range(0..20)) * 0.5).collect();
    let mut expected = data.clone();
    expected.sort_by(|a, b| a.total_cmp(b));
    let last = data.len() - 1;
    assert_eq!(sort_range(&mut data, 0, last).unwrap(), SortAlgorithm::Quick);
    assert_eq!(data, expected);
}

#[test]
fn test_mergesort_stability() {
    let mut records: Vec<(u32, char)> = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e'), (2, 'f')];
    mergesort_by(&mut records, 0, 5, |x, y| x.0.cmp(&y.0)).unwrap();
    assert_eq!(
        records,
        vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c'), (2, 'f')]
    );
}

#[test]
fn test_binary_search_after_sort() {
    let mut data = [40, 10, 30, 20];
    sort_range(&mut data, 0, 3).unwrap();
    assert_eq!(binary_search(&data, 0, 3, &30).unwrap(), 2);
    assert_eq!(binary_search(&data, 0, 3, &25).unwrap(), -3);
    assert_eq!(binary_search(&data, 0, 3, &5).unwrap(), -1);
}

#[test]
fn test_shuffle_reproducible() {
    let mut a: Vec<u16> = (0..50).collect();
    let mut b = a.clone();
    shuffle(&mut a, 0, 49, &mut StdRng::seed_from_u64(99)).unwrap();
    shuffle(&mut b, 0, 49, &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(a, b);
    a.sort_unstable();
    assert_eq!(a, (0..50).collect::<Vec<_>>());
}

#[test]
fn test_array_sort_on_strided_view() {
    let a = NdArray::from_vec(vec![9, 0, 7, 0, 8, 0, 1, 0], &[8]).unwrap();
    let mut evens = a.view_strides(&[2]).unwrap();
    evens.sort().unwrap();
    assert_eq!(a.to_vec(), vec![1, 0, 7, 0, 8, 0, 9, 0]);
}

#[test]
fn test_array_sort_range_contiguous() {
    let mut a = NdArray::from_vec(vec![3.0, 2.0, 1.0, 0.0], &[4]).unwrap();
    let algorithm = a.sort_range(0, 2).unwrap();
    assert_eq!(algorithm, SortAlgorithm::Quick);
    assert_eq!(a.to_vec(), vec![1.0, 2.0, 3.0, 0.0]);

    let mut m: NdArray<f64> = NdArray::zeros(&[2, 2]).unwrap();
    assert!(matches!(m.sort_range(0, 1), Err(ArrayError::RankMismatch { .. })));
}

#[test]
fn test_view_sorted_is_selection() {
    let a = NdArray::from_vec(vec![4, 1, 3, 1], &[4]).unwrap();
    let mut s = a.view_sorted().unwrap();
    assert_eq!(s.kind(), StorageKind::SelectedDense);
    assert_eq!(s.to_vec(), vec![1, 1, 3, 4]);
    assert_eq!(a.to_vec(), vec![4, 1, 3, 1]);

    // Writing the smallest element writes the original cell.
    s.set1(0, 100).unwrap();
    assert_eq!(a.to_vec(), vec![4, 100, 3, 1]);
}

#[test]
fn test_view_sorted_by_column() {
    let m = NdArray::from_vec(vec![3, 10, 1, 20, 2, 30, 1, 40], &[4, 2]).unwrap();
    let sorted = m.view_sorted_by_column(0).unwrap();
    // Rows with key 1 keep their original relative order.
    assert_eq!(sorted.to_vec(), vec![1, 20, 1, 40, 2, 30, 3, 10]);
    assert!(m.view_sorted_by_column(2).is_err());
}

#[test]
fn test_array_shuffle_keeps_elements() {
    let mut a = NdArray::sparse_from_vec(&[0, 1, 2, 3, 4, 5], &[6]).unwrap();
    a.shuffle(&mut StdRng::seed_from_u64(8)).unwrap();
    let mut v = a.to_vec();
    v.sort_unstable();
    assert_eq!(v, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(a.cardinality(), 5);
}
