//! Galois Field GF(2^8) arithmetic for Reed-Solomon erasure coding
//!
//! ## Field Polynomial
//!
//! Elements are bytes interpreted as polynomials over GF(2) reduced modulo
//! **0x11D** (x⁸ + x⁴ + x³ + x² + 1), with 2 as the primitive element. This is
//! the field used by the common byte-oriented erasure-coding libraries, so a
//! shard is just a vector of field elements and byte arithmetic never
//! overflows.
//!
//! ## Implementation Notes
//!
//! Multiplication and division go through 256-entry log/antilog tables that
//! are built once per process and shared read-only. Addition and subtraction
//! are both XOR.

use super::error::{RsError, RsResult};
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};
use std::sync::OnceLock;

/// GF(2^8) field polynomial: 0x11D (x⁸ + x⁴ + x³ + x² + 1)
pub const GF8_GENERATOR: u32 = 0x11D;

/// Number of elements in the field
pub const FIELD_SIZE: usize = 256;

/// Order of the multiplicative group
const LIMIT: usize = FIELD_SIZE - 1;

/// Galois Field lookup tables for fast arithmetic
pub struct GaloisTable {
    pub log: [u8; FIELD_SIZE],
    pub antilog: [u8; FIELD_SIZE],
}

impl Default for GaloisTable {
    fn default() -> Self {
        Self::new()
    }
}

impl GaloisTable {
    pub fn new() -> Self {
        let mut table = GaloisTable {
            log: [0; FIELD_SIZE],
            antilog: [0; FIELD_SIZE],
        };
        table.build_tables();
        table
    }

    fn build_tables(&mut self) {
        let mut b = 1u32;

        for l in 0..LIMIT {
            self.log[b as usize] = l as u8;
            self.antilog[l] = b as u8;

            b <<= 1;
            if b & FIELD_SIZE as u32 != 0 {
                b ^= GF8_GENERATOR;
            }
        }

        // log(0) is undefined; callers must special-case zero before lookup.
        self.log[0] = 0;
        self.antilog[LIMIT] = self.antilog[0];
    }

    /// Process-wide table, built on first use
    pub fn global() -> &'static GaloisTable {
        static TABLE: OnceLock<GaloisTable> = OnceLock::new();
        TABLE.get_or_init(GaloisTable::new)
    }
}

/// GF(2^8) field element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Galois8 {
    value: u8,
}

impl Galois8 {
    pub const ZERO: Self = Self { value: 0 };
    pub const ONE: Self = Self { value: 1 };

    #[inline]
    pub const fn new(value: u8) -> Self {
        Self { value }
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.value
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Power operation. `a^0 == 1` for every `a`, including zero.
    pub fn pow(&self, exponent: usize) -> Self {
        if exponent == 0 {
            return Self::ONE;
        }
        if self.value == 0 {
            return Self::ZERO;
        }

        let table = GaloisTable::global();
        let log_val = table.log[self.value as usize] as usize;
        let result_log = (log_val * (exponent % LIMIT)) % LIMIT;
        Self::new(table.antilog[result_log])
    }

    /// Division, failing on a zero divisor
    pub fn checked_div(&self, rhs: Self) -> RsResult<Self> {
        if rhs.value == 0 {
            return Err(RsError::DivideByZero);
        }
        if self.value == 0 {
            return Ok(Self::ZERO);
        }

        let table = GaloisTable::global();
        let log_diff = (table.log[self.value as usize] as usize + LIMIT
            - table.log[rhs.value as usize] as usize)
            % LIMIT;
        Ok(Self::new(table.antilog[log_diff]))
    }

    /// Multiplicative inverse; zero has none
    #[inline]
    pub fn inverse(&self) -> RsResult<Self> {
        Self::ONE.checked_div(*self)
    }

    /// Discrete logarithm base 2, `None` for zero
    pub fn log(&self) -> Option<u8> {
        if self.value == 0 {
            None
        } else {
            Some(GaloisTable::global().log[self.value as usize])
        }
    }

    /// Primitive element raised to `exponent`
    pub fn exp(exponent: usize) -> Self {
        Self::new(GaloisTable::global().antilog[exponent % LIMIT])
    }
}

// Addition (XOR in Galois fields)
impl Add for Galois8 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.value ^ rhs.value)
    }
}

impl AddAssign for Galois8 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.value ^= rhs.value;
    }
}

// Subtraction (same as addition in GF(2^n))
impl Sub for Galois8 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.value ^ rhs.value)
    }
}

impl SubAssign for Galois8 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.value ^= rhs.value;
    }
}

// Multiplication using log tables
impl Mul for Galois8 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.value == 0 || rhs.value == 0 {
            return Self::ZERO;
        }

        let table = GaloisTable::global();
        let log_sum =
            (table.log[self.value as usize] as usize + table.log[rhs.value as usize] as usize)
                % LIMIT;
        Self::new(table.antilog[log_sum])
    }
}

impl MulAssign for Galois8 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl From<u8> for Galois8 {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Galois8> for u8 {
    fn from(val: Galois8) -> Self {
        val.value
    }
}

impl std::fmt::Display for Galois8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::fmt::LowerHex for Galois8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::LowerHex::fmt(&self.value, f)
    }
}

/// Field product of two raw bytes
#[inline]
pub fn multiply(a: u8, b: u8) -> u8 {
    (Galois8::new(a) * Galois8::new(b)).value()
}

/// Field quotient of two raw bytes
#[inline]
pub fn divide(a: u8, b: u8) -> RsResult<u8> {
    Galois8::new(a).checked_div(Galois8::new(b)).map(|g| g.value())
}

/// `a` raised to `n` in the field
#[inline]
pub fn power(a: u8, n: usize) -> u8 {
    Galois8::new(a).pow(n).value()
}

/// Multiplicative inverse of a raw byte
#[inline]
pub fn invert(a: u8) -> RsResult<u8> {
    Galois8::new(a).inverse().map(|g| g.value())
}
