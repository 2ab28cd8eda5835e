//! Byte-slice Galois Field operations for Reed-Solomon
//!
//! Every parity byte and every recovered byte is a field dot product of one
//! matrix row with the corresponding bytes of a set of shards. This module
//! provides the slice kernels those dot products are built from.
//!
//! ## Key Components
//!
//! - **`MulTable`**: 256-entry lookup table for multiplying by one coefficient
//! - **`WriteOp`**: Operation mode (direct write vs XOR accumulate)
//! - **`process_slice_multiply`**: output (=|^=) coefficient * input
//! - **`dot_product_into`**: output = Σ coefficient[i] * input[i]

use super::galois::{Galois8, GaloisTable, FIELD_SIZE};

/// Specifies how to combine the multiplication result with the output buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// Direct write: output = coefficient * input (replaces contents)
    Direct,
    /// Accumulate: output = output XOR (coefficient * input)
    Add,
}

/// Products of one coefficient with every field element
///
/// ```text
/// result = table[input_byte]
/// ```
pub struct MulTable {
    pub table: [u8; FIELD_SIZE],
}

impl MulTable {
    #[inline]
    pub fn lookup(&self, value: u8) -> u8 {
        self.table[value as usize]
    }
}

/// Build the multiplication table for a coefficient
///
/// # Example
/// ```
/// use reed_solomon_ffi::reed_solomon::{build_mul_table, Galois8};
///
/// let tables = build_mul_table(Galois8::new(2));
/// assert_eq!(tables.lookup(0x80), 0x1D);
/// ```
pub fn build_mul_table(coefficient: Galois8) -> MulTable {
    let mut table = [0u8; FIELD_SIZE];
    let coeff_val = coefficient.value();

    if coeff_val == 0 {
        return MulTable { table };
    }

    if coeff_val == 1 {
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as u8;
        }
        return MulTable { table };
    }

    let galois_table = GaloisTable::global();
    let coeff_log = galois_table.log[coeff_val as usize] as usize;
    for (i, entry) in table.iter_mut().enumerate().skip(1) {
        let log_sum = (galois_table.log[i] as usize + coeff_log) % (FIELD_SIZE - 1);
        *entry = galois_table.antilog[log_sum];
    }

    MulTable { table }
}

/// Multiply `input` by the table's coefficient into `output`
///
/// Only the common prefix of the two slices is touched.
#[inline]
pub fn process_slice_multiply(input: &[u8], output: &mut [u8], tables: &MulTable, op: WriteOp) {
    match op {
        WriteOp::Direct => {
            for (out, &inp) in output.iter_mut().zip(input) {
                *out = tables.table[inp as usize];
            }
        }
        WriteOp::Add => {
            for (out, &inp) in output.iter_mut().zip(input) {
                *out ^= tables.table[inp as usize];
            }
        }
    }
}

/// output = Σ coefficients[i] * inputs[i]
///
/// Zero coefficients are skipped and a coefficient of one degenerates to a
/// plain copy or XOR.
pub fn dot_product_into<S: AsRef<[u8]>>(coefficients: &[Galois8], inputs: &[S], output: &mut [u8]) {
    output.fill(0);

    for (&coefficient, input) in coefficients.iter().zip(inputs) {
        let input = input.as_ref();
        match coefficient.value() {
            0 => {}
            1 => {
                for (out, &inp) in output.iter_mut().zip(input) {
                    *out ^= inp;
                }
            }
            _ => {
                let tables = build_mul_table(coefficient);
                process_slice_multiply(input, output, &tables, WriteOp::Add);
            }
        }
    }
}
