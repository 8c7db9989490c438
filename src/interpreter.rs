//! Single-document topic inference on a frozen model.
//!
//! The interpreter answers "which topics is this text about?" with a
//! short Gibbs chain over just the query document, holding the model
//! fixed. Because the model does not move, the word-topic part of the
//! sampling distribution collapses to the precomputed φ values, and the
//! smoothing bucket sum per word is a constant
//! `S_w = Σ_k α_k·φ_{k,w}` — so each resample needs only the two
//! remaining buckets.
//!
//! The RNG seed is the FNV-1a fingerprint of the TAB-joined input
//! tokens: identical queries always produce identical answers, which
//! makes serving reproducible and cacheable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::accessor::{DistCache, ModelAccessor};
use crate::document::Document;
use crate::error::{Result, TemasError};
use crate::hist::{Histogram, SparseHistogram};
use crate::model::Model;
use crate::vocab::{fingerprint, Vocabulary};

/// One topic with its inferred probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicProb {
    /// Topic id
    pub topic: usize,
    /// Inferred probability mass
    pub prob: f64,
}

/// Topics of an interpreted document, heaviest first.
pub type TopicDist = Vec<TopicProb>;

/// Infers topic mixtures of new documents against a frozen [`Model`].
///
/// The model is never mutated, so one interpreter serves any number of
/// queries and is safe to share read-only across threads as long as
/// each call works on its own document and RNG — which `interpret`
/// arranges internally.
#[derive(Debug)]
pub struct Interpreter<'a> {
    accessor: ModelAccessor<'a>,
    vocab: &'a Vocabulary,
    smoothing_only_sum: Vec<f64>,
}

impl<'a> Interpreter<'a> {
    /// Wraps a model and vocabulary, precomputing the per-word
    /// smoothing bucket sums.
    #[must_use]
    pub fn new(model: &'a Model, vocab: &'a Vocabulary, cache_bytes: i64) -> Self {
        let accessor = ModelAccessor::new(model, cache_bytes);
        let smoothing_only_sum = word_topic_prior_sums(&accessor);
        Self {
            accessor,
            vocab,
            smoothing_only_sum,
        }
    }

    /// Infers the topic distribution of `words`.
    ///
    /// Runs `iters` Gibbs iterations over the query document and
    /// accumulates the topic histogram of every iteration strictly
    /// after `burnin`.
    ///
    /// # Errors
    ///
    /// Returns [`TemasError::EmptyDocument`] when no token is in the
    /// vocabulary.
    ///
    /// # Panics
    ///
    /// Panics when `iters <= burnin`.
    pub fn interpret<S: AsRef<str>>(
        &self,
        words: &[S],
        burnin: usize,
        iters: usize,
    ) -> Result<TopicDist> {
        assert!(iters > burnin, "iters ({iters}) <= burnin ({burnin})");

        let joined = words
            .iter()
            .map(|w| w.as_ref())
            .collect::<Vec<&str>>()
            .join("\t");
        let mut rng = StdRng::seed_from_u64(fingerprint(&joined));

        let num_topics = self.accessor.model().num_topics();
        let mut doc = Document::initialize(words, self.vocab, num_topics, &mut rng);
        if doc.is_empty() {
            return Err(TemasError::EmptyDocument);
        }

        let mut cache = DistCache::new(&self.accessor);
        let mut accumulated = SparseHistogram::new();
        let mut norm = 0.0;

        for iter in 0..iters {
            for j in 0..doc.len() {
                let word = doc.words[j];
                let old_topic = doc.topics[j];
                doc.topic_hist.dec(old_topic, 1);
                let dist = cache.get(word);
                let new_topic = self.sample_topic(&doc, word, dist, &mut rng);
                doc.topics[j] = new_topic;
                doc.topic_hist.inc(new_topic, 1);
            }

            if iter > burnin {
                for (topic, count) in doc.topic_hist.iter() {
                    accumulated.inc(topic, count);
                    norm += count as f64;
                }
            }
        }

        let mut dist: TopicDist = accumulated
            .iter()
            .map(|(topic, count)| TopicProb {
                topic,
                prob: count as f64 / norm,
            })
            .collect();
        dist.sort_by(|a, b| {
            b.prob
                .partial_cmp(&a.prob)
                .expect("probabilities are finite")
                .then(a.topic.cmp(&b.topic))
        });
        Ok(dist)
    }

    // Two-bucket inverse CDF: the document-topic bucket weights each of
    // the document's topics by count·φ, and the smoothing-only bucket
    // covers all K topics with α_k·φ_k. The landing test is `draw <= 0`
    // to absorb float drift; running off the end means the state is
    // corrupt.
    fn sample_topic<R: Rng>(
        &self,
        doc: &Document,
        word: usize,
        dist: &[f64],
        rng: &mut R,
    ) -> usize {
        let mut doc_topic_sum = 0.0;
        for (topic, count) in doc.topic_hist.iter() {
            doc_topic_sum += count as f64 * dist[topic];
        }

        let model = self.accessor.model();
        let mut draw = rng.gen::<f64>() * (doc_topic_sum + self.smoothing_only_sum[word]);

        if draw < doc_topic_sum {
            for (topic, count) in doc.topic_hist.iter() {
                draw -= count as f64 * dist[topic];
                if draw <= 0.0 {
                    return topic;
                }
            }
        } else {
            draw -= doc_topic_sum;
            for (topic, phi) in dist.iter().enumerate() {
                draw -= phi * model.topic_prior()[topic];
                if draw <= 0.0 {
                    return topic;
                }
            }
        }

        panic!(
            "sampling failed: draw fell off the cumulative distribution \
             (doc bucket {doc_topic_sum:e}, smoothing {:e})",
            self.smoothing_only_sum[word]
        );
    }
}

fn word_topic_prior_sums(accessor: &ModelAccessor<'_>) -> Vec<f64> {
    let model = accessor.model();
    let mut sums = vec![0.0; model.vocab_size()];
    for (word, s) in sums.iter_mut().enumerate() {
        let dist = accessor.word_topic_dist(word);
        for (topic, phi) in dist.iter().enumerate() {
            *s += model.topic_prior()[topic] * phi;
        }
    }
    sums
}
