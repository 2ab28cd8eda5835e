//! Galois Field (GF(2^8)) Arithmetic Tests
//!
//! Tests for Galois8 field operations including addition, multiplication,
//! division, powers, and special properties.

use reed_solomon_ffi::reed_solomon::galois::{GaloisTable, GF8_GENERATOR};
use reed_solomon_ffi::reed_solomon::{divide, invert, multiply, power, Galois8, RsError};

// ============================================================================
// Basic Arithmetic Operations
// ============================================================================

#[test]
fn test_galois8_basic_operations() {
    let a = Galois8::new(5);
    let b = Galois8::new(3);

    // Test addition (XOR in GF)
    assert_eq!((a + b).value(), 6);

    // Test subtraction (same as addition in GF(2^n))
    assert_eq!((a - b).value(), 6);
}

#[test]
fn test_galois8_multiplicative_identity() {
    for v in 0..=255u8 {
        assert_eq!((Galois8::new(v) * Galois8::ONE).value(), v);
    }
}

#[test]
fn test_galois8_multiplication_by_zero() {
    for v in 0..=255u8 {
        assert_eq!(multiply(v, 0), 0);
        assert_eq!(multiply(0, v), 0);
    }
}

#[test]
fn test_galois8_every_nonzero_element_has_inverse() {
    for a in 1..=255u8 {
        let inv = invert(a).unwrap();
        assert_eq!(multiply(a, inv), 1, "a = {a:#04x}");
        assert_eq!(divide(1, a).unwrap(), inv);
    }
}

#[test]
fn test_galois8_division_by_zero() {
    for a in 0..=255u8 {
        assert_eq!(divide(a, 0), Err(RsError::DivideByZero));
    }
    assert_eq!(Galois8::ZERO.inverse(), Err(RsError::DivideByZero));
}

#[test]
fn test_galois8_division_undoes_multiplication() {
    for a in 0..=255u8 {
        for b in 1..=255u8 {
            assert_eq!(divide(multiply(a, b), b).unwrap(), a);
        }
    }
}

// ============================================================================
// Power Operations
// ============================================================================

#[test]
fn test_galois8_power_matches_repeated_multiplication() {
    for a in [0u8, 1, 2, 3, 0x1D, 0xFF] {
        let mut expected = 1u8;
        for n in 0..600 {
            assert_eq!(power(a, n), expected, "{a}^{n}");
            expected = multiply(expected, a);
        }
    }
}

#[test]
fn test_galois8_generator_has_full_order() {
    // 2 is primitive for 0x11D: its powers hit all 255 nonzero elements
    let mut seen = [false; 256];
    for n in 0..255 {
        seen[power(2, n) as usize] = true;
    }
    assert_eq!(seen.iter().filter(|&&s| s).count(), 255);
    assert_eq!(power(2, 255), 1);
}

#[test]
fn test_galois8_log_exp_agree() {
    for v in 1..=255u8 {
        let g = Galois8::new(v);
        let log = g.log().unwrap();
        assert_eq!(Galois8::exp(log as usize), g);
    }
    assert_eq!(Galois8::ZERO.log(), None);
}

#[test]
fn test_table_uses_standard_polynomial() {
    assert_eq!(GF8_GENERATOR, 0x11D);
    let table = GaloisTable::new();
    assert_eq!(table.antilog[8], 0x1D);
    assert_eq!(table.log[2], 1);
}
