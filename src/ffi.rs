//! C ABI entry points
//!
//! Ownership contract:
//! - Buffers returned through `out_ptr` are allocated by this library with the
//!   C allocator and must be released with [`rs_free`], never with a foreign
//!   deallocator.
//! - Caller-supplied input buffers are only read, never freed or retained.
//! - On failure nothing is allocated and the output pointer/length are zero.
//!
//! Every call returns `0` on success or a negative status code (see
//! `include/reedsolomon.h`). Panics are caught and reported as
//! [`RS_ERR_PANIC`]; they never unwind into the caller.

use crate::boundary::{decode_flat, encode_flat};
use crate::reed_solomon::matrix::check_shard_counts;
use crate::reed_solomon::{RsError, RsResult};
use log::error;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::slice;

pub const RS_OK: i32 = 0;
/// A required pointer argument was null
pub const RS_ERR_NULL_POINTER: i32 = -12;
/// The engine panicked; treated like an internal-invariant failure
pub const RS_ERR_PANIC: i32 = -13;

/// Copy `bytes` into a fresh C-allocated buffer
fn hand_off(bytes: &[u8]) -> RsResult<*mut u8> {
    // SAFETY: malloc with a nonzero size; the result is checked for null
    // before it is written to.
    let buf = unsafe { libc::malloc(bytes.len().max(1)) } as *mut u8;
    if buf.is_null() {
        return Err(RsError::AllocationFailure(bytes.len()));
    }
    // SAFETY: `buf` holds at least `bytes.len()` bytes and cannot overlap a
    // Rust-owned slice.
    unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), buf, bytes.len()) };
    Ok(buf)
}

/// Byte length of the caller's shard buffer
///
/// The layout and shard count are checked first, so an impossible length is
/// only reported for an otherwise valid request. A buffer can never exceed
/// `isize::MAX` bytes; in that case `expected` is the largest shard length
/// one allocation could hold for `shard_count` shards.
fn flat_len(
    shard_count: usize,
    shard_len: usize,
    data_shards: usize,
    parity_shards: usize,
) -> RsResult<usize> {
    check_shard_counts(data_shards, parity_shards)?;
    if shard_count < data_shards {
        return Err(RsError::InsufficientShards {
            available: shard_count,
            required: data_shards,
        });
    }
    shard_count
        .checked_mul(shard_len)
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or(RsError::ShardSizeMismatch {
            expected: isize::MAX as usize / shard_count,
            found: shard_len,
        })
}

/// Run `f`, converting errors and panics into status codes
fn guarded<F>(call: &str, f: F) -> Result<(*mut u8, usize), i32>
where
    F: FnOnce() -> RsResult<(*mut u8, usize)>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(out)) => Ok(out),
        Ok(Err(e)) => {
            if e.is_internal() {
                error!("{} hit an internal invariant violation: {}", call, e);
            }
            Err(e.status_code())
        }
        Err(_) => {
            error!("{} panicked", call);
            Err(RS_ERR_PANIC)
        }
    }
}

/// Encode `data_len` bytes into `data_shards + parity_shards` shards.
///
/// On success `*out_ptr` holds all shards concatenated in index order and
/// `*out_shard_len` the length of one shard; the buffer is
/// `(data_shards + parity_shards) * *out_shard_len` bytes long.
///
/// # Safety
///
/// `data_ptr` must be valid for `data_len` bytes (it may be null only when
/// `data_len` is zero). `out_ptr` and `out_shard_len` must be valid for
/// writes.
#[no_mangle]
pub unsafe extern "C" fn rs_encode(
    data_ptr: *const u8,
    data_len: usize,
    data_shards: usize,
    parity_shards: usize,
    out_ptr: *mut *mut u8,
    out_shard_len: *mut usize,
) -> i32 {
    if out_ptr.is_null() || out_shard_len.is_null() {
        return RS_ERR_NULL_POINTER;
    }
    *out_ptr = ptr::null_mut();
    *out_shard_len = 0;

    if data_ptr.is_null() && data_len != 0 {
        return RS_ERR_NULL_POINTER;
    }
    let data: &[u8] = if data_len == 0 {
        &[]
    } else {
        slice::from_raw_parts(data_ptr, data_len)
    };

    let result = guarded("rs_encode", || {
        let (flat, shard_len) = encode_flat(data, data_shards, parity_shards)?;
        Ok((hand_off(&flat)?, shard_len))
    });

    match result {
        Ok((buf, shard_len)) => {
            *out_ptr = buf;
            *out_shard_len = shard_len;
            RS_OK
        }
        Err(code) => code,
    }
}

/// Recover the (padded) payload from `shard_count` surviving shards.
///
/// `shards_ptr` holds `shard_count` blocks of `shard_len` bytes and
/// `indices_ptr` the original position of each block.
///
/// # Safety
///
/// `shards_ptr` must be valid for `shard_count * shard_len` bytes and
/// `indices_ptr` for `shard_count` entries. `out_ptr` and `out_len` must be
/// valid for writes.
#[no_mangle]
pub unsafe extern "C" fn rs_decode(
    shards_ptr: *const u8,
    indices_ptr: *const usize,
    shard_count: usize,
    shard_len: usize,
    data_shards: usize,
    parity_shards: usize,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> i32 {
    if out_ptr.is_null() || out_len.is_null() {
        return RS_ERR_NULL_POINTER;
    }
    *out_ptr = ptr::null_mut();
    *out_len = 0;

    let total_len = match flat_len(shard_count, shard_len, data_shards, parity_shards) {
        Ok(len) => len,
        Err(e) => return e.status_code(),
    };
    if (shards_ptr.is_null() && total_len != 0) || (indices_ptr.is_null() && shard_count != 0) {
        return RS_ERR_NULL_POINTER;
    }
    let flat: &[u8] = if total_len == 0 {
        &[]
    } else {
        slice::from_raw_parts(shards_ptr, total_len)
    };
    let indices: &[usize] = if shard_count == 0 {
        &[]
    } else {
        slice::from_raw_parts(indices_ptr, shard_count)
    };

    let result = guarded("rs_decode", || {
        let data = decode_flat(
            flat,
            indices,
            shard_count,
            shard_len,
            data_shards,
            parity_shards,
        )?;
        Ok((hand_off(&data)?, data.len()))
    });

    match result {
        Ok((buf, len)) => {
            *out_ptr = buf;
            *out_len = len;
            RS_OK
        }
        Err(code) => code,
    }
}

/// Release a buffer returned by [`rs_encode`] or [`rs_decode`].
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from this library that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn rs_free(ptr: *mut u8) {
    if !ptr.is_null() {
        libc::free(ptr as *mut libc::c_void);
    }
}
