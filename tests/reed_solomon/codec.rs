//! Encoder and Decoder Tests
//!
//! End-to-end erasure scenarios: encode a payload, drop shards, and recover
//! it from what survives.

use reed_solomon_ffi::reed_solomon::{
    decode, encode, generator_matrix, CodecConfig, ReedSolomon, RsError,
};
use std::sync::Arc;

/// Positions `0..total` with `lost` removed, plus the matching shards
fn survivors(shards: &[Vec<u8>], lost: &[usize]) -> (Vec<Vec<u8>>, Vec<usize>) {
    (0..shards.len())
        .filter(|i| !lost.contains(i))
        .map(|i| (shards[i].clone(), i))
        .unzip()
}

// ============================================================================
// Reference Scenario
// ============================================================================

#[test]
fn test_four_plus_two_survives_any_two_losses() {
    let payload: Vec<u8> = (0..16).collect();
    let shards = encode(&payload, 4, 2).unwrap();
    assert_eq!(shards.len(), 6);
    assert!(shards.iter().all(|s| s.len() == 4));

    let mut scenarios = 0;
    for a in 0..6 {
        for b in (a + 1)..6 {
            let (kept, indices) = survivors(&shards, &[a, b]);
            let recovered = decode(&kept, &indices, 4, 2).unwrap();
            assert_eq!(recovered, payload, "lost shards {a} and {b}");
            scenarios += 1;
        }
    }
    assert_eq!(scenarios, 15);
}

#[test]
fn test_four_plus_two_three_losses_fail() {
    let payload: Vec<u8> = (0..16).collect();
    let shards = encode(&payload, 4, 2).unwrap();
    let (kept, indices) = survivors(&shards, &[0, 2, 5]);
    assert_eq!(
        decode(&kept, &indices, 4, 2),
        Err(RsError::InsufficientShards {
            available: 3,
            required: 4
        })
    );
}

// ============================================================================
// Layout Edge Cases
// ============================================================================

#[test]
fn test_payload_is_zero_padded() {
    let payload = b"thirteen byte";
    let shards = encode(payload, 4, 2).unwrap();
    assert!(shards.iter().all(|s| s.len() == 4));

    let recovered = decode(&shards[2..], &[2, 3, 4, 5], 4, 2).unwrap();
    assert_eq!(recovered.len(), 16);
    assert_eq!(&recovered[..13], payload);
    assert_eq!(&recovered[13..], &[0, 0, 0]);

    let rs = ReedSolomon::new(4, 2).unwrap();
    assert_eq!(rs.join(&shards, payload.len()).unwrap(), payload);
}

#[test]
fn test_no_parity_layout() {
    let payload = b"plain split";
    let shards = encode(payload, 3, 0).unwrap();
    assert_eq!(shards.len(), 3);
    let recovered = decode(&shards, &[0, 1, 2], 3, 0).unwrap();
    assert_eq!(&recovered[..payload.len()], payload);
}

#[test]
fn test_largest_layout() {
    let payload: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
    let shards = encode(&payload, 200, 56).unwrap();
    assert_eq!(shards.len(), 256);

    // Drop the first 56 shards so only 144 data shards remain
    let lost: Vec<usize> = (0..56).collect();
    let (kept, indices) = survivors(&shards, &lost);
    let recovered = decode(&kept, &indices, 200, 56).unwrap();
    assert_eq!(&recovered[..payload.len()], &payload[..]);
}

#[test]
fn test_single_byte_payload() {
    let shards = encode(&[0xAB], 3, 3).unwrap();
    assert!(shards.iter().all(|s| s.len() == 1));
    let recovered = decode(&shards[3..], &[3, 4, 5], 3, 3).unwrap();
    assert_eq!(recovered, vec![0xAB, 0, 0]);
}

#[test]
fn test_extra_shards_are_accepted() {
    let payload: Vec<u8> = (0..40).collect();
    let shards = encode(&payload, 5, 3).unwrap();
    let (kept, indices) = survivors(&shards, &[1]);
    assert_eq!(kept.len(), 7);
    assert_eq!(decode(&kept, &indices, 5, 3).unwrap(), payload);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_encode_errors() {
    assert_eq!(encode(&[], 4, 2), Err(RsError::EmptyInput));
    assert!(matches!(
        encode(b"x", 0, 2),
        Err(RsError::InvalidShardCount { .. })
    ));
    assert!(matches!(
        encode(b"x", 250, 7),
        Err(RsError::InvalidShardCount { .. })
    ));
}

#[test]
fn test_decode_errors() {
    let shards = encode(&[1, 2, 3, 4, 5, 6, 7, 8], 4, 2).unwrap();

    assert_eq!(
        decode(&shards[..4], &[0, 1, 2], 4, 2),
        Err(RsError::IndexCountMismatch {
            shards: 4,
            indices: 3
        })
    );
    assert_eq!(
        decode(&shards[..4], &[0, 1, 2, 6], 4, 2),
        Err(RsError::IndexOutOfRange { index: 6, total: 6 })
    );
    assert_eq!(
        decode(&shards[..4], &[0, 1, 1, 3], 4, 2),
        Err(RsError::DuplicateIndex(1))
    );

    let mut ragged = shards[..4].to_vec();
    ragged[2].push(0);
    assert!(matches!(
        decode(&ragged, &[0, 1, 2, 3], 4, 2),
        Err(RsError::ShardSizeMismatch { .. })
    ));

    let empty: Vec<Vec<u8>> = vec![Vec::new(); 4];
    assert_eq!(
        decode(&empty, &[0, 1, 2, 3], 4, 2),
        Err(RsError::EmptyInput)
    );
}

// ============================================================================
// Codec Object
// ============================================================================

#[test]
fn test_reconstruct_restores_every_shard() {
    let rs = ReedSolomon::new(5, 3).unwrap();
    let shards = rs.encode(b"reconstruct every missing shard").unwrap();

    let mut damaged: Vec<Option<Vec<u8>>> = shards.iter().cloned().map(Some).collect();
    damaged[0] = None;
    damaged[4] = None;
    damaged[6] = None;
    rs.reconstruct(&mut damaged).unwrap();

    let restored: Vec<Vec<u8>> = damaged.into_iter().flatten().collect();
    assert_eq!(restored, shards);
    assert!(rs.verify(&restored).unwrap());
}

#[test]
fn test_verify_detects_corruption() {
    let rs = ReedSolomon::new(3, 2).unwrap();
    let mut shards = rs.encode(b"corruptible payload").unwrap();
    assert!(rs.verify(&shards).unwrap());
    shards[4][0] ^= 0x01;
    assert!(!rs.verify(&shards).unwrap());
}

#[test]
fn test_parallel_matches_sequential() {
    let payload: Vec<u8> = (0..64 * 1024).map(|i| (i * 31 % 256) as u8).collect();
    let sequential = ReedSolomon::with_config(8, 4, CodecConfig::sequential()).unwrap();
    let parallel = ReedSolomon::with_config(
        8,
        4,
        CodecConfig::new(4, true).with_parallel_threshold(1),
    )
    .unwrap();

    let a = sequential.encode(&payload).unwrap();
    let b = parallel.encode(&payload).unwrap();
    assert_eq!(a, b);

    let (kept, indices) = survivors(&a, &[0, 3, 5, 7]);
    assert_eq!(
        sequential.decode(&kept, &indices).unwrap(),
        parallel.decode(&kept, &indices).unwrap()
    );
}

#[test]
fn test_generator_matrix_is_shared() {
    let a = ReedSolomon::new(6, 3).unwrap();
    let b = ReedSolomon::new(6, 3).unwrap();
    assert!(std::ptr::eq(a.generator(), b.generator()));
    assert!(Arc::ptr_eq(
        &generator_matrix(6, 3).unwrap(),
        &generator_matrix(6, 3).unwrap()
    ));
}
