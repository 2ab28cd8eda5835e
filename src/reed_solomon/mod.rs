//! Reed-Solomon Erasure Coding Module
//!
//! This module provides systematic Reed-Solomon erasure coding over the
//! Galois Field GF(2^8) with the 0x11D field polynomial: any `data_shards` of
//! the `data_shards + parity_shards` encoded shards are enough to recover the
//! payload.

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod galois;
pub mod matrix;
pub mod scalar;

pub use cache::generator_matrix;
pub use codec::{decode, encode, ReedSolomon, MAX_TOTAL_SHARDS};
pub use config::CodecConfig;
pub use error::{RsError, RsResult};
pub use galois::{divide, invert, multiply, power, Galois8, GaloisTable};
pub use matrix::{build_generator_matrix, Matrix};
pub use scalar::{build_mul_table, process_slice_multiply, MulTable, WriteOp};
