//! Process-wide cache of generator matrices
//!
//! Generator matrices depend only on `(data_shards, parity_shards)`, so each
//! one is built at most once per process and shared read-only afterwards.
//! The map lock is held only long enough to fetch or insert a per-key slot;
//! the matrix itself is built inside that slot's `OnceLock`, so concurrent
//! first use of one key computes once while other keys proceed independently.

use super::error::RsResult;
use super::matrix::{build_generator_matrix, check_shard_counts, Matrix};
use log::debug;
use rustc_hash::FxHashMap as HashMap;
use std::sync::{Arc, Mutex, OnceLock};

type Slot = Arc<OnceLock<RsResult<Arc<Matrix>>>>;

fn slots() -> &'static Mutex<HashMap<(usize, usize), Slot>> {
    static SLOTS: OnceLock<Mutex<HashMap<(usize, usize), Slot>>> = OnceLock::new();
    SLOTS.get_or_init(|| Mutex::new(HashMap::default()))
}

/// Fetch (building on first use) the generator matrix for a shard layout
///
/// Entries are never evicted. There are 32,896 valid layouts, and a matrix
/// takes `(data_shards + parity_shards) * data_shards` bytes, so a caller that
/// sweeps every layout keeps roughly 0.5 GiB alive. Typical callers use a
/// handful of layouts.
pub fn generator_matrix(data_shards: usize, parity_shards: usize) -> RsResult<Arc<Matrix>> {
    // Invalid layouts never reach the map.
    check_shard_counts(data_shards, parity_shards)?;

    let key = (data_shards, parity_shards);
    let slot = {
        let mut map = slots()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(map.entry(key).or_default())
    };

    slot.get_or_init(|| {
        debug!(
            "Building generator matrix for {} data + {} parity shards",
            data_shards, parity_shards
        );
        build_generator_matrix(data_shards, parity_shards).map(Arc::new)
    })
    .clone()
}

/// Number of layouts with a built matrix
pub fn cached_layouts() -> usize {
    let map = slots()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    map.values()
        .filter(|slot| matches!(slot.get(), Some(Ok(_))))
        .count()
}
