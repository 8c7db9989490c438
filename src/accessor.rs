//! Smoothed posterior lookup with a frequency-bounded cache.
//!
//! The smoothed word-topic posterior
//! `φ_{k,w} = (β + N_{k|w}) / (V·β + N_k)` decomposes into a
//! smoothing-only floor `β / (V·β + N_k)` — shared by every word — plus
//! a per-topic correction at exactly the topics where the word has been
//! observed. The accessor materializes full K-length distributions only
//! for the most frequent words (amortizing their O(K) reconstruction)
//! and rebuilds everything else from the shared floor on demand.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::hist::Histogram;
use crate::model::Model;

const F64_SIZE: usize = std::mem::size_of::<f64>();
const SLOT_SIZE: usize = std::mem::size_of::<usize>();

/// Read-only view of a [`Model`] with cached word-topic distributions.
///
/// The cached set is chosen once at construction — the `C` words with
/// the largest total counts, where `C` is derived from the byte budget —
/// and never changes, so lookups are safe to share across threads.
#[derive(Debug)]
pub struct ModelAccessor<'a> {
    model: &'a Model,
    word_topic_dists: Vec<Option<Vec<f64>>>,
    smoothing_only: Vec<f64>,
}

impl<'a> ModelAccessor<'a> {
    /// Wraps `model`, caching distributions within `cache_bytes`.
    ///
    /// A negative budget caches every word. Otherwise the number of
    /// cached distributions is
    /// `max(0, (cache_bytes - V·ptr) / (K·f64))`.
    #[must_use]
    pub fn new(model: &'a Model, cache_bytes: i64) -> Self {
        let mut a = Self {
            model,
            word_topic_dists: vec![None; model.vocab_size()],
            smoothing_only: build_smoothing_only(model),
        };

        let cached = if cache_bytes < 0 {
            model.vocab_size()
        } else {
            let table = (model.vocab_size() * SLOT_SIZE) as i64;
            let per_dist = (model.num_topics() * F64_SIZE) as i64;
            ((cache_bytes - table) / per_dist).max(0) as usize
        };

        if cached > 0 {
            // Keep the `cached` most frequent words in a min-heap.
            let mut heap: BinaryHeap<Reverse<(i64, usize)>> = BinaryHeap::with_capacity(cached);
            for word in 0..model.vocab_size() {
                let freq = model.word_topic(word).map_or(0, |h| h.total());
                if heap.len() < cached {
                    heap.push(Reverse((freq, word)));
                } else if freq > heap.peek().map_or(i64::MIN, |r| r.0 .0) {
                    heap.pop();
                    heap.push(Reverse((freq, word)));
                }
            }
            for Reverse((_, word)) in heap {
                let dist = a.build_dist(word);
                a.word_topic_dists[word] = Some(dist);
            }
        }
        a
    }

    /// The wrapped model.
    #[must_use]
    pub fn model(&self) -> &Model {
        self.model
    }

    /// The shared smoothing-only vector `β / (V·β + N_k)`.
    #[must_use]
    pub fn smoothing_only(&self) -> &[f64] {
        &self.smoothing_only
    }

    /// The cached distribution of `word`, when it was selected at
    /// construction.
    #[must_use]
    pub fn cached_dist(&self, word: usize) -> Option<&[f64]> {
        self.word_topic_dists[word].as_deref()
    }

    /// Materializes φ_{·,word} from the smoothing floor plus the word's
    /// sparse posterior corrections.
    #[must_use]
    pub fn build_dist(&self, word: usize) -> Vec<f64> {
        let mut dist = self.smoothing_only.clone();
        self.cumulate_posterior(&mut dist, word);
        dist
    }

    fn cumulate_posterior(&self, dist: &mut [f64], word: usize) {
        if let Some(h) = self.model.word_topic(word) {
            for (topic, count) in h.iter() {
                dist[topic] = (count as f64 + self.model.word_prior())
                    / (self.model.word_prior_sum() + self.model.global_topic().at(topic) as f64);
            }
        }
    }

    /// The word's full topic distribution — borrowed when cached,
    /// computed otherwise.
    #[must_use]
    pub fn word_topic_dist(&self, word: usize) -> Cow<'_, [f64]> {
        match self.cached_dist(word) {
            Some(dist) => Cow::Borrowed(dist),
            None => Cow::Owned(self.build_dist(word)),
        }
    }
}

fn build_smoothing_only(model: &Model) -> Vec<f64> {
    let mut dist = vec![0.0; model.num_topics()];
    for (topic, count) in model.global_topic().iter() {
        dist[topic] = model.word_prior() / (model.word_prior_sum() + count as f64);
    }
    dist
}

/// Per-pass memo of distributions for words outside the accessor cache.
///
/// An evaluator or interpreter call touches the same word many times;
/// this keeps each uncached word's O(K) materialization to once per
/// call without growing the accessor's immutable cache.
#[derive(Debug)]
pub(crate) struct DistCache<'a> {
    accessor: &'a ModelAccessor<'a>,
    computed: HashMap<usize, Vec<f64>>,
}

impl<'a> DistCache<'a> {
    pub(crate) fn new(accessor: &'a ModelAccessor<'a>) -> Self {
        Self {
            accessor,
            computed: HashMap::new(),
        }
    }

    pub(crate) fn get(&mut self, word: usize) -> &[f64] {
        if let Some(dist) = self.accessor.cached_dist(word) {
            return dist;
        }
        let accessor = self.accessor;
        self.computed
            .entry(word)
            .or_insert_with(|| accessor.build_dist(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::testing_model;

    const EXPECTED_DISTS: [[f64; 2]; 4] = [
        [0.25, 0.004_901_960_784_313_725], // tiger
        [0.25, 0.495_098_039_215_686_3],   // orange
        [0.25, 0.004_901_960_784_313_725], // cat
        [0.25, 0.495_098_039_215_686_3],   // apple
    ];

    #[test]
    fn test_cache_all_materializes_exact_distributions() {
        let m = testing_model();
        let a = ModelAccessor::new(&m, -1);
        for (word, expected) in EXPECTED_DISTS.iter().enumerate() {
            let dist = a.cached_dist(word).expect("negative budget caches all");
            assert_eq!(dist, expected.as_slice());
        }
    }

    #[test]
    fn test_byte_budget_derives_cache_size() {
        let m = testing_model();
        // Budget for exactly one distribution beyond the slot table.
        let budget = (m.vocab_size() * std::mem::size_of::<usize>()
            + m.num_topics() * std::mem::size_of::<f64>()) as i64;
        let a = ModelAccessor::new(&m, budget);
        let cached: Vec<usize> = (0..m.vocab_size())
            .filter(|&w| a.cached_dist(w).is_some())
            .collect();
        assert_eq!(cached.len(), 1);
        // The single cached word is one of the two with observations.
        assert!(cached[0] == 1 || cached[0] == 3);
    }

    #[test]
    fn test_zero_budget_still_computes_on_demand() {
        let m = testing_model();
        let a = ModelAccessor::new(&m, 0);
        for (word, expected) in EXPECTED_DISTS.iter().enumerate() {
            assert!(a.cached_dist(word).is_none());
            assert_eq!(a.word_topic_dist(word).as_ref(), expected.as_slice());
        }
    }

    #[test]
    fn test_smoothing_only_floor() {
        let m = testing_model();
        let a = ModelAccessor::new(&m, 0);
        assert_eq!(a.smoothing_only(), &[0.25, 0.004_901_960_784_313_725]);
    }

    #[test]
    fn test_dist_cache_memoizes() {
        let m = testing_model();
        let a = ModelAccessor::new(&m, 0);
        let mut cache = DistCache::new(&a);
        let first = cache.get(3).to_vec();
        let second = cache.get(3).to_vec();
        assert_eq!(first, second);
        assert_eq!(first, EXPECTED_DISTS[3]);
    }
}
