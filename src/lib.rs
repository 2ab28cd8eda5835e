//! Reed-Solomon erasure coding over GF(2^8)
//!
//! Splits a payload into data shards, computes parity shards, and recovers
//! the payload from any sufficient subset of shards. The engine lives in
//! [`reed_solomon`]; [`boundary`] and [`ffi`] expose it to callers that
//! exchange flat buffers, including C callers via `include/reedsolomon.h`.

pub mod args;
pub mod boundary;
pub mod ffi;
pub mod reed_solomon;
pub mod shard_files;

pub use args::build_cli;
pub use reed_solomon::{decode, encode, CodecConfig, ReedSolomon, RsError, RsResult};
