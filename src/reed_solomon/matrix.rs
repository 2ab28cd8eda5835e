//! Coefficient matrices over GF(2^8)
//!
//! This module provides the matrix engine used by the encoder and decoder:
//! - Row-major dense matrices of `Galois8` elements
//! - Multiplication with shape checking
//! - Gauss-Jordan inversion with row swapping on zero pivots
//! - The systematic Vandermonde-derived generator matrix

use super::error::{RsError, RsResult};
use super::galois::{Galois8, FIELD_SIZE};
use log::trace;

// ============================================================================
// Dense Matrix
// ============================================================================

/// Dense row-major matrix over GF(2^8)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Galois8>,
}

impl Matrix {
    /// Create a new zero matrix
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![Galois8::ZERO; rows * cols],
        }
    }

    /// Create an identity matrix
    pub fn identity(size: usize) -> Self {
        let mut matrix = Self::zero(size, size);
        for i in 0..size {
            matrix.set(i, i, Galois8::ONE);
        }
        matrix
    }

    /// Build a matrix from raw byte rows; every row must have the same width
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> RsResult<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut matrix = Self::zero(rows.len(), cols);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(RsError::DimensionMismatch {
                    left_rows: 1,
                    left_cols: cols,
                    right_rows: 1,
                    right_cols: row.len(),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                matrix.set(r, c, Galois8::new(value));
            }
        }
        Ok(matrix)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Get element at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Galois8 {
        self.data[row * self.cols + col]
    }

    /// Set element at (row, col)
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Galois8) {
        self.data[row * self.cols + col] = value;
    }

    /// Borrow a row
    #[inline]
    pub fn row(&self, row: usize) -> &[Galois8] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Borrow a row mutably
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [Galois8] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Copy a row out as raw bytes
    pub fn row_bytes(&self, row: usize) -> Vec<u8> {
        self.row(row).iter().map(Galois8::value).collect()
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for col in 0..self.cols {
            self.data.swap(a * self.cols + col, b * self.cols + col);
        }
    }

    /// Matrix product `self * rhs`
    pub fn multiply(&self, rhs: &Matrix) -> RsResult<Matrix> {
        if self.cols != rhs.rows {
            return Err(self.mismatch(rhs));
        }

        let mut result = Matrix::zero(self.rows, rhs.cols);
        for r in 0..self.rows {
            for c in 0..rhs.cols {
                let mut acc = Galois8::ZERO;
                for i in 0..self.cols {
                    acc += self.get(r, i) * rhs.get(i, c);
                }
                result.set(r, c, acc);
            }
        }
        Ok(result)
    }

    /// Place `rhs` to the right of `self`
    pub fn augment(&self, rhs: &Matrix) -> RsResult<Matrix> {
        if self.rows != rhs.rows {
            return Err(self.mismatch(rhs));
        }

        let mut result = Matrix::zero(self.rows, self.cols + rhs.cols);
        for r in 0..self.rows {
            result.row_mut(r)[..self.cols].copy_from_slice(self.row(r));
            result.row_mut(r)[self.cols..].copy_from_slice(rhs.row(r));
        }
        Ok(result)
    }

    /// Rectangular slice `[rmin, rmax) x [cmin, cmax)`
    pub fn sub_matrix(&self, rmin: usize, cmin: usize, rmax: usize, cmax: usize) -> RsResult<Matrix> {
        if rmin > rmax || cmin > cmax || rmax > self.rows || cmax > self.cols {
            return Err(RsError::DimensionMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: rmax.saturating_sub(rmin),
                right_cols: cmax.saturating_sub(cmin),
            });
        }

        let mut result = Matrix::zero(rmax - rmin, cmax - cmin);
        for r in rmin..rmax {
            result
                .row_mut(r - rmin)
                .copy_from_slice(&self.row(r)[cmin..cmax]);
        }
        Ok(result)
    }

    /// New matrix made of the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> RsResult<Matrix> {
        let mut result = Matrix::zero(indices.len(), self.cols);
        for (dst, &src) in indices.iter().enumerate() {
            if src >= self.rows {
                return Err(RsError::IndexOutOfRange {
                    index: src,
                    total: self.rows,
                });
            }
            result.row_mut(dst).copy_from_slice(self.row(src));
        }
        Ok(result)
    }

    /// Inverse via Gauss-Jordan elimination
    pub fn invert(&self) -> RsResult<Matrix> {
        if !self.is_square() {
            return Err(self.mismatch(self));
        }

        let size = self.rows;
        let mut work = self.augment(&Matrix::identity(size))?;
        work.gaussian_eliminate()?;
        work.sub_matrix(0, size, size, size * 2)
    }

    /// Reduce the left square block of an augmented matrix to the identity
    fn gaussian_eliminate(&mut self) -> RsResult<()> {
        let size = self.rows;

        for pivot_row in 0..size {
            // Find a nonzero pivot, swapping a lower row up if necessary
            if self.get(pivot_row, pivot_row).is_zero() {
                let swap_with = ((pivot_row + 1)..size)
                    .find(|&r| !self.get(r, pivot_row).is_zero())
                    .ok_or(RsError::SingularMatrix)?;
                trace!("Swapping rows {} and {} for pivot", pivot_row, swap_with);
                self.swap_rows(pivot_row, swap_with);
            }

            // Scale pivot row so the pivot becomes one
            let pivot = self.get(pivot_row, pivot_row);
            if pivot != Galois8::ONE {
                let scale = pivot.inverse()?;
                for value in self.row_mut(pivot_row) {
                    *value *= scale;
                }
            }

            // Eliminate the pivot column from every other row
            for row in 0..size {
                if row == pivot_row {
                    continue;
                }
                let factor = self.get(row, pivot_row);
                if factor.is_zero() {
                    continue;
                }
                for col in 0..self.cols {
                    let scaled = factor * self.get(pivot_row, col);
                    let current = self.get(row, col);
                    self.set(row, col, current - scaled);
                }
            }
        }

        Ok(())
    }

    fn mismatch(&self, rhs: &Matrix) -> RsError {
        RsError::DimensionMismatch {
            left_rows: self.rows,
            left_cols: self.cols,
            right_rows: rhs.rows,
            right_cols: rhs.cols,
        }
    }
}

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.rows {
            let row: Vec<String> = self.row(r).iter().map(|v| format!("{:02x}", v)).collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

// ============================================================================
// Generator Matrix Construction
// ============================================================================

/// Vandermonde matrix with `rows` evaluation points `0..rows`: `V[r][c] = r^c`
///
/// Any `cols` rows drawn from it are linearly independent because the
/// evaluation points are distinct field elements.
pub fn vandermonde(rows: usize, cols: usize) -> RsResult<Matrix> {
    if rows > FIELD_SIZE {
        return Err(RsError::InvalidShardCount {
            data_shards: cols,
            parity_shards: rows.saturating_sub(cols),
        });
    }

    let mut matrix = Matrix::zero(rows, cols);
    for r in 0..rows {
        let point = Galois8::new(r as u8);
        for c in 0..cols {
            matrix.set(r, c, point.pow(c));
        }
    }
    Ok(matrix)
}

/// Reject layouts the field cannot express: at least one data shard and at
/// most 256 shards in total
pub fn check_shard_counts(data_shards: usize, parity_shards: usize) -> RsResult<()> {
    match data_shards.checked_add(parity_shards) {
        Some(total) if data_shards >= 1 && total <= FIELD_SIZE => Ok(()),
        _ => Err(RsError::InvalidShardCount {
            data_shards,
            parity_shards,
        }),
    }
}

/// Systematic generator matrix for `data_shards + parity_shards` shards
///
/// Built as `V * inverse(V_top)`: the top block becomes the identity and the
/// any-k-rows-invertible property of the Vandermonde matrix is preserved.
pub fn build_generator_matrix(data_shards: usize, parity_shards: usize) -> RsResult<Matrix> {
    check_shard_counts(data_shards, parity_shards)?;

    let total = data_shards + parity_shards;
    let vm = vandermonde(total, data_shards)?;
    let top = vm.sub_matrix(0, 0, data_shards, data_shards)?;
    vm.multiply(&top.invert()?)
}
