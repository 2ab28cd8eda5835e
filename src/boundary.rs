//! Flat-buffer adapter between callers and the codec
//!
//! Callers on the far side of a foreign-function boundary exchange one
//! contiguous buffer of concatenated shards instead of a list of shards.
//! These helpers validate and reshape such buffers; the C entry points in
//! [`crate::ffi`] are thin wrappers around them.

use crate::reed_solomon::{ReedSolomon, RsError, RsResult};

/// Encode `data` and concatenate every shard in index order
///
/// Returns the flat buffer and the common shard length.
pub fn encode_flat(
    data: &[u8],
    data_shards: usize,
    parity_shards: usize,
) -> RsResult<(Vec<u8>, usize)> {
    let shards = crate::reed_solomon::encode(data, data_shards, parity_shards)?;
    let shard_len = shards.first().map_or(0, Vec::len);
    Ok((shards.concat(), shard_len))
}

/// View a flat buffer as `shard_count` blocks of `shard_len` bytes
pub fn split_flat(flat: &[u8], shard_count: usize, shard_len: usize) -> RsResult<Vec<&[u8]>> {
    if shard_len == 0 {
        return Err(RsError::EmptyInput);
    }
    match shard_count.checked_mul(shard_len) {
        Some(expected) if expected == flat.len() => Ok(flat.chunks_exact(shard_len).collect()),
        _ => Err(RsError::ShardSizeMismatch {
            expected: shard_count.saturating_mul(shard_len),
            found: flat.len(),
        }),
    }
}

/// Decode a flat buffer of `shard_count` concatenated shards
pub fn decode_flat(
    flat: &[u8],
    indices: &[usize],
    shard_count: usize,
    shard_len: usize,
    data_shards: usize,
    parity_shards: usize,
) -> RsResult<Vec<u8>> {
    let rs = ReedSolomon::new(data_shards, parity_shards)?;
    if indices.len() != shard_count {
        return Err(RsError::IndexCountMismatch {
            shards: shard_count,
            indices: indices.len(),
        });
    }
    if shard_count < data_shards {
        return Err(RsError::InsufficientShards {
            available: shard_count,
            required: data_shards,
        });
    }
    let shards = split_flat(flat, shard_count, shard_len)?;
    rs.decode(&shards, indices)
}
