//! Matrix Engine Tests
//!
//! Tests for generator matrix construction and Gauss-Jordan inversion over
//! GF(2^8), including deliberately malformed matrices.

use reed_solomon_ffi::reed_solomon::matrix::{check_shard_counts, vandermonde};
use reed_solomon_ffi::reed_solomon::{build_generator_matrix, Galois8, Matrix, RsError};

/// Every k-combination of 0..n, in lexicographic order
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    fn walk(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            walk(i + 1, n, k, current, out);
            current.pop();
        }
    }
    walk(0, n, k, &mut current, &mut out);
    out
}

// ============================================================================
// Generator Matrix
// ============================================================================

#[test]
fn test_generator_top_block_is_identity() {
    for (k, m) in [(1, 0), (1, 5), (4, 2), (10, 4), (17, 3)] {
        let g = build_generator_matrix(k, m).unwrap();
        assert_eq!(g.rows(), k + m);
        assert_eq!(g.cols(), k);
        assert_eq!(g.sub_matrix(0, 0, k, k).unwrap(), Matrix::identity(k));
    }
}

#[test]
fn test_every_row_selection_invertible_small_layouts() {
    for total in 1..=9 {
        for k in 1..=total {
            let g = build_generator_matrix(k, total - k).unwrap();
            for rows in combinations(total, k) {
                let sub = g.select_rows(&rows).unwrap();
                let inv = sub
                    .invert()
                    .unwrap_or_else(|e| panic!("{k}+{} rows {rows:?}: {e}", total - k));
                assert_eq!(sub.multiply(&inv).unwrap(), Matrix::identity(k));
            }
        }
    }
}

#[test]
fn test_parity_rows_invertible_at_field_limit() {
    // Selecting the last k rows exercises only parity coefficients
    for (k, m) in [(128, 128), (200, 56), (1, 255), (255, 1)] {
        let g = build_generator_matrix(k, m).unwrap();
        let rows: Vec<usize> = (k + m - k..k + m).collect();
        assert!(g.select_rows(&rows).unwrap().invert().is_ok(), "{k}+{m}");
    }
}

#[test]
fn test_shard_count_limits() {
    assert!(check_shard_counts(1, 0).is_ok());
    assert!(check_shard_counts(1, 255).is_ok());
    assert!(check_shard_counts(256, 0).is_ok());
    assert!(check_shard_counts(0, 1).is_err());
    assert!(check_shard_counts(256, 1).is_err());
    assert!(check_shard_counts(usize::MAX, 1).is_err());
}

#[test]
fn test_vandermonde_rows_are_powers() {
    let vm = vandermonde(5, 3).unwrap();
    for r in 0..5 {
        for c in 0..3 {
            assert_eq!(vm.get(r, c), Galois8::new(r as u8).pow(c));
        }
    }
    assert!(vandermonde(257, 3).is_err());
}

// ============================================================================
// Malformed Matrices
// ============================================================================

#[test]
fn test_duplicate_rows_are_singular() {
    let g = build_generator_matrix(3, 2).unwrap();
    let sub = g.select_rows(&[3, 3, 1]).unwrap();
    assert_eq!(sub.invert(), Err(RsError::SingularMatrix));
}

#[test]
fn test_zero_column_is_singular() {
    let a = Matrix::from_rows(&[[1u8, 0, 2], [3, 0, 4], [5, 0, 6]]).unwrap();
    assert_eq!(a.invert(), Err(RsError::SingularMatrix));
}

#[test]
fn test_zero_pivot_recovered_by_swap() {
    let a = Matrix::from_rows(&[[0u8, 0, 1], [0, 1, 0], [1, 0, 0]]).unwrap();
    let inv = a.invert().unwrap();
    assert_eq!(a.multiply(&inv).unwrap(), Matrix::identity(3));
}

#[test]
fn test_shape_errors() {
    let wide = Matrix::zero(2, 3);
    assert!(matches!(
        wide.invert(),
        Err(RsError::DimensionMismatch {
            left_rows: 2,
            left_cols: 3,
            ..
        })
    ));
    assert!(matches!(
        wide.multiply(&wide),
        Err(RsError::DimensionMismatch { .. })
    ));
    assert!(wide.augment(&Matrix::zero(3, 1)).is_err());
    assert!(wide.sub_matrix(0, 0, 3, 1).is_err());
}

#[test]
fn test_multiply_is_associative() {
    let a = Matrix::from_rows(&[[1u8, 2], [3, 4], [5, 6]]).unwrap();
    let b = Matrix::from_rows(&[[7u8, 8, 9], [10, 11, 12]]).unwrap();
    let c = Matrix::from_rows(&[[13u8], [14], [15]]).unwrap();
    let left = a.multiply(&b).unwrap().multiply(&c).unwrap();
    let right = a.multiply(&b.multiply(&c).unwrap()).unwrap();
    assert_eq!(left, right);
}

#[test]
fn test_display_hex_rows() {
    let a = Matrix::from_rows(&[[0x01u8, 0xab], [0x00, 0x10]]).unwrap();
    assert_eq!(a.to_string(), "01 ab\n00 10\n");
}
