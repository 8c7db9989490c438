//! Range-sharding of the word-id space.
//!
//! A sharder cuts `[0, V)` into a fixed number of contiguous,
//! near-equal ranges. Because the vocabulary assigns ids in
//! hash-shuffled order, equal id ranges carry comparable probability
//! mass, so range sharding doubles as load balancing.

use std::collections::BTreeMap;

use crate::error::{Result, TemasError};
use crate::hist::SparseHistogram;
use crate::model::Model;

/// Allocation of word ids into a fixed number of near-equal buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sharder {
    shards: usize,
}

impl Sharder {
    /// Creates a sharder over `shards` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`TemasError::InvalidArgument`] when `shards` is zero.
    pub fn new(shards: usize) -> Result<Self> {
        if shards == 0 {
            return Err(TemasError::invalid_argument("shards", shards, "must be > 0"));
        }
        Ok(Self { shards })
    }

    /// Number of buckets.
    #[must_use]
    pub fn shards(&self) -> usize {
        self.shards
    }

    /// Splits a model's word-topic histograms into per-shard maps.
    ///
    /// When V does not divide evenly, the first `V mod B` buckets take
    /// one extra id. Words without an allocated histogram are skipped;
    /// histograms are deep copies, so shards can travel independently.
    #[must_use]
    pub fn shard_model(&self, model: &Model) -> Vec<BTreeMap<usize, SparseHistogram>> {
        let v = model.vocab_size();
        let b = self.shards.min(v.max(1));
        let bucket_size = v / b;
        let extended_buckets = v % b;

        let mut shards: Vec<BTreeMap<usize, SparseHistogram>> = vec![BTreeMap::new(); self.shards];
        let mut next = 0;
        for (j, shard) in shards.iter_mut().take(b).enumerate() {
            let size = if j < extended_buckets {
                bucket_size + 1
            } else {
                bucket_size
            };
            for word in next..next + size {
                if let Some(h) = model.word_topic(word) {
                    shard.insert(word, h.clone());
                }
            }
            next += size;
        }
        shards
    }
}
