//! Systematic Reed-Solomon encoder and decoder
//!
//! ## Overview
//!
//! A `ReedSolomon` codec is bound to one `(data_shards, parity_shards)`
//! layout and the cached generator matrix for it. Encoding zero-pads the
//! payload to a multiple of `data_shards`, splits it into equal data shards
//! and computes each parity shard as the dot product of one parity row of
//! the generator matrix with the data shards.
//!
//! Decoding takes any `data_shards` or more surviving shards together with
//! their original positions. When every data shard survived the payload is
//! simply concatenated; otherwise the generator rows of a `data_shards`-sized
//! selection are inverted and the missing data shards are rebuilt from the
//! inverse.
//!
//! Output is always padded: callers that need the exact payload length must
//! record it themselves and trim (see [`ReedSolomon::join`]).

use super::cache::generator_matrix;
use super::config::CodecConfig;
use super::error::{RsError, RsResult};
use super::galois::{Galois8, FIELD_SIZE};
use super::matrix::{check_shard_counts, Matrix};
use super::scalar::dot_product_into;
use log::{debug, error, trace};
use rayon::prelude::*;
use smallvec::SmallVec;
use std::sync::Arc;

/// Largest total shard count the field supports
pub const MAX_TOTAL_SHARDS: usize = FIELD_SIZE;

/// Shard positions chosen for one reconstruction
type Selection = SmallVec<[usize; 32]>;

/// Reed-Solomon codec for one shard layout
#[derive(Debug, Clone)]
pub struct ReedSolomon {
    data_shards: usize,
    parity_shards: usize,
    generator: Arc<Matrix>,
    config: CodecConfig,
}

impl ReedSolomon {
    /// Create a codec with the default configuration
    pub fn new(data_shards: usize, parity_shards: usize) -> RsResult<Self> {
        Self::with_config(data_shards, parity_shards, CodecConfig::default())
    }

    pub fn with_config(
        data_shards: usize,
        parity_shards: usize,
        config: CodecConfig,
    ) -> RsResult<Self> {
        let generator = generator_matrix(data_shards, parity_shards)?;
        Ok(Self {
            data_shards,
            parity_shards,
            generator,
            config,
        })
    }

    #[inline]
    pub fn data_shards(&self) -> usize {
        self.data_shards
    }

    #[inline]
    pub fn parity_shards(&self) -> usize {
        self.parity_shards
    }

    #[inline]
    pub fn total_shards(&self) -> usize {
        self.data_shards + self.parity_shards
    }

    pub fn generator(&self) -> &Matrix {
        &self.generator
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Per-shard length for a payload of `data_len` bytes
    pub fn shard_len(&self, data_len: usize) -> usize {
        data_len.div_ceil(self.data_shards)
    }

    /// Zero-pad `data` and cut it into `data_shards` equal shards
    pub fn split(&self, data: &[u8]) -> RsResult<Vec<Vec<u8>>> {
        if data.is_empty() {
            return Err(RsError::EmptyInput);
        }

        let shard_len = self.shard_len(data.len());
        let shards = (0..self.data_shards)
            .map(|i| {
                let mut shard = vec![0u8; shard_len];
                let start = (i * shard_len).min(data.len());
                let end = ((i + 1) * shard_len).min(data.len());
                shard[..end - start].copy_from_slice(&data[start..end]);
                shard
            })
            .collect();
        Ok(shards)
    }

    /// Split `data` and append the parity shards
    pub fn encode(&self, data: &[u8]) -> RsResult<Vec<Vec<u8>>> {
        let mut shards = self.split(data)?;
        let parity = self.encode_parity(&shards)?;
        debug!(
            "Encoded {} bytes into {} + {} shards of {} bytes",
            data.len(),
            self.data_shards,
            self.parity_shards,
            shards[0].len()
        );
        shards.extend(parity);
        Ok(shards)
    }

    /// Parity shards for already-split data shards
    pub fn encode_parity<S: AsRef<[u8]> + Sync>(&self, data: &[S]) -> RsResult<Vec<Vec<u8>>> {
        if data.len() < self.data_shards {
            return Err(RsError::InsufficientShards {
                available: data.len(),
                required: self.data_shards,
            });
        }
        if data.len() > self.data_shards {
            return Err(RsError::ShardCountMismatch {
                expected: self.data_shards,
                found: data.len(),
            });
        }
        let shard_len = uniform_len(data.iter().map(AsRef::as_ref))?;

        let rows: Vec<&[Galois8]> = (self.data_shards..self.total_shards())
            .map(|r| self.generator.row(r))
            .collect();
        Ok(self.compute_rows(&rows, data, shard_len))
    }

    /// Check that the parity shards match the data shards
    pub fn verify<S: AsRef<[u8]> + Sync>(&self, shards: &[S]) -> RsResult<bool> {
        self.check_slot_count(shards.len())?;
        uniform_len(shards.iter().map(AsRef::as_ref))?;

        let parity = self.encode_parity(&shards[..self.data_shards])?;
        Ok(parity
            .iter()
            .zip(&shards[self.data_shards..])
            .all(|(computed, stored)| computed.as_slice() == stored.as_ref()))
    }

    /// Recover the padded payload from surviving shards and their positions
    pub fn decode<S: AsRef<[u8]> + Sync>(&self, shards: &[S], indices: &[usize]) -> RsResult<Vec<u8>> {
        if shards.len() != indices.len() {
            return Err(RsError::IndexCountMismatch {
                shards: shards.len(),
                indices: indices.len(),
            });
        }
        if shards.len() < self.data_shards {
            return Err(RsError::InsufficientShards {
                available: shards.len(),
                required: self.data_shards,
            });
        }
        let slots = self.index_slots(indices)?;
        let shard_len = uniform_len(shards.iter().map(AsRef::as_ref))?;

        let mut output = Vec::with_capacity(self.data_shards * shard_len);

        // Fast path: every data shard survived
        if slots[..self.data_shards].iter().all(Option::is_some) {
            debug!("All {} data shards present, concatenating", self.data_shards);
            for slot in slots[..self.data_shards].iter().flatten() {
                output.extend_from_slice(shards[*slot].as_ref());
            }
            return Ok(output);
        }

        let selection = self.select(&slots);
        let inputs: Vec<&[u8]> = selection
            .iter()
            .filter_map(|&idx| slots[idx])
            .map(|slot| shards[slot].as_ref())
            .collect();
        let recovered = self.recover_data(&selection, &inputs, &slots, shard_len)?;

        let mut recovered = recovered.into_iter();
        for slot in &slots[..self.data_shards] {
            match slot {
                Some(slot) => output.extend_from_slice(shards[*slot].as_ref()),
                None => {
                    if let Some(shard) = recovered.next() {
                        output.extend_from_slice(&shard);
                    }
                }
            }
        }
        Ok(output)
    }

    /// Fill every missing shard, data and parity, in place
    ///
    /// `shards` must have one slot per shard position; `None` marks a lost
    /// shard.
    pub fn reconstruct(&self, shards: &mut [Option<Vec<u8>>]) -> RsResult<()> {
        self.check_slot_count(shards.len())?;

        let present = shards.iter().filter(|s| s.is_some()).count();
        if present < self.data_shards {
            return Err(RsError::InsufficientShards {
                available: present,
                required: self.data_shards,
            });
        }
        let shard_len = uniform_len(shards.iter().flatten().map(Vec::as_slice))?;
        if present == self.total_shards() {
            return Ok(());
        }

        // Identity slot table: position i lives at shards[i]
        let slots: Vec<Option<usize>> = shards
            .iter()
            .enumerate()
            .map(|(i, s)| s.as_ref().map(|_| i))
            .collect();

        if slots[..self.data_shards].iter().any(Option::is_none) {
            let selection = self.select(&slots);
            let recovered = {
                let inputs: Vec<&[u8]> = selection
                    .iter()
                    .map(|&idx| shards[idx].as_deref().unwrap_or(&[]))
                    .collect();
                self.recover_data(&selection, &inputs, &slots, shard_len)?
            };

            let missing = (0..self.data_shards).filter(|&i| slots[i].is_none());
            for (idx, shard) in missing.zip(recovered) {
                shards[idx] = Some(shard);
            }
        }

        let missing_parity: Vec<usize> = (self.data_shards..self.total_shards())
            .filter(|&i| shards[i].is_none())
            .collect();
        if !missing_parity.is_empty() {
            let rows: Vec<&[Galois8]> = missing_parity
                .iter()
                .map(|&r| self.generator.row(r))
                .collect();
            let rebuilt = {
                let data: Vec<&[u8]> = shards[..self.data_shards]
                    .iter()
                    .map(|s| s.as_deref().unwrap_or(&[]))
                    .collect();
                self.compute_rows(&rows, &data, shard_len)
            };
            for (idx, shard) in missing_parity.into_iter().zip(rebuilt) {
                shards[idx] = Some(shard);
            }
        }

        debug!(
            "Reconstructed {} missing shards",
            self.total_shards() - present
        );
        Ok(())
    }

    /// Concatenate the data shards and trim to the original payload length
    pub fn join<S: AsRef<[u8]>>(&self, shards: &[S], data_len: usize) -> RsResult<Vec<u8>> {
        if shards.len() < self.data_shards {
            return Err(RsError::InsufficientShards {
                available: shards.len(),
                required: self.data_shards,
            });
        }
        let data = &shards[..self.data_shards];
        let shard_len = uniform_len(data.iter().map(AsRef::as_ref))?;
        let available = shard_len * self.data_shards;
        if data_len > available {
            return Err(RsError::ShardSizeMismatch {
                expected: data_len,
                found: available,
            });
        }

        let mut output = Vec::with_capacity(available);
        for shard in data {
            output.extend_from_slice(shard.as_ref());
        }
        output.truncate(data_len);
        Ok(output)
    }

    fn check_slot_count(&self, slots: usize) -> RsResult<()> {
        if slots != self.total_shards() {
            return Err(RsError::ShardCountMismatch {
                expected: self.total_shards(),
                found: slots,
            });
        }
        Ok(())
    }

    /// Map each shard position to where it sits in the caller's list,
    /// rejecting out-of-range and repeated positions
    fn index_slots(&self, indices: &[usize]) -> RsResult<Vec<Option<usize>>> {
        let total = self.total_shards();
        let mut slots = vec![None; total];
        for (slot, &index) in indices.iter().enumerate() {
            if index >= total {
                return Err(RsError::IndexOutOfRange { index, total });
            }
            if slots[index].replace(slot).is_some() {
                return Err(RsError::DuplicateIndex(index));
            }
        }
        Ok(slots)
    }

    /// Pick `data_shards` surviving positions: data shards first, then
    /// parity shards in ascending order
    fn select(&self, slots: &[Option<usize>]) -> Selection {
        let present = |i: &usize| slots[*i].is_some();
        (0..self.data_shards)
            .filter(present)
            .chain((self.data_shards..self.total_shards()).filter(present))
            .take(self.data_shards)
            .collect()
    }

    /// Rebuild the missing data shards, in ascending position order
    fn recover_data(
        &self,
        selection: &[usize],
        inputs: &[&[u8]],
        slots: &[Option<usize>],
        shard_len: usize,
    ) -> RsResult<Vec<Vec<u8>>> {
        debug!("Recovering data shards from positions {:?}", selection);

        let decode_matrix = self
            .generator
            .select_rows(selection)
            .and_then(|sub| sub.invert())
            .inspect_err(|e| {
                error!(
                    "Generator rows {:?} for {}+{} layout are not invertible: {}",
                    selection, self.data_shards, self.parity_shards, e
                )
            })?;

        let rows: Vec<&[Galois8]> = (0..self.data_shards)
            .filter(|&i| slots[i].is_none())
            .map(|i| decode_matrix.row(i))
            .collect();
        Ok(self.compute_rows(&rows, inputs, shard_len))
    }

    /// One output shard per coefficient row
    fn compute_rows<S: AsRef<[u8]> + Sync>(
        &self,
        rows: &[&[Galois8]],
        inputs: &[S],
        shard_len: usize,
    ) -> Vec<Vec<u8>> {
        let compute = |row: &&[Galois8]| {
            trace!("Computing shard row over {} inputs", inputs.len());
            let mut out = vec![0u8; shard_len];
            dot_product_into(row, inputs, &mut out);
            out
        };

        if self.config.use_parallel(shard_len, rows.len()) {
            rows.par_iter().map(compute).collect()
        } else {
            rows.iter().map(compute).collect()
        }
    }
}

/// Common length of a set of shards; zero-length shards are empty input
fn uniform_len<'a>(mut shards: impl Iterator<Item = &'a [u8]>) -> RsResult<usize> {
    let expected = shards.next().map(<[u8]>::len).ok_or(RsError::EmptyInput)?;
    if expected == 0 {
        return Err(RsError::EmptyInput);
    }
    for shard in shards {
        if shard.len() != expected {
            return Err(RsError::ShardSizeMismatch {
                expected,
                found: shard.len(),
            });
        }
    }
    Ok(expected)
}

/// Encode `data` into `data_shards + parity_shards` equal-length shards
pub fn encode(data: &[u8], data_shards: usize, parity_shards: usize) -> RsResult<Vec<Vec<u8>>> {
    check_shard_counts(data_shards, parity_shards)?;
    if data.is_empty() {
        return Err(RsError::EmptyInput);
    }
    ReedSolomon::new(data_shards, parity_shards)?.encode(data)
}

/// Recover the padded payload from surviving shards and their positions
///
/// Like [`encode`], this uses the default [`CodecConfig`], so large shards
/// are processed on the rayon pool.
pub fn decode<S: AsRef<[u8]> + Sync>(
    shards: &[S],
    indices: &[usize],
    data_shards: usize,
    parity_shards: usize,
) -> RsResult<Vec<u8>> {
    ReedSolomon::new(data_shards, parity_shards)?.decode(shards, indices)
}
