//! The LDA model state: topic counts and Dirichlet priors.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TemasError};
use crate::hist::{DenseHistogram, Histogram, OrderedSparseHistogram, SparseHistogram};
use crate::vocab::Vocabulary;

/// Counts and priors of a trained (or in-training) LDA model.
///
/// The state is the global topic histogram N_k, one sparse topic
/// histogram N_{k|w} per word (absent until the word is first seen —
/// absence is distinct from an allocated empty histogram and survives
/// serialization), the asymmetric topic prior α with its cached sum,
/// and the symmetric word prior β with its cached V·β.
///
/// Exactly one sampler may mutate a model at a time; clones are deep,
/// which is what shard-parallel training uses to give each sampler a
/// private copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub(crate) global_topic: DenseHistogram,
    pub(crate) word_topics: Vec<Option<SparseHistogram>>,
    pub(crate) topic_prior: Vec<f64>,
    pub(crate) topic_prior_sum: f64,
    pub(crate) word_prior: f64,
    pub(crate) word_prior_sum: f64,
}

impl Model {
    /// Creates a model with a symmetric starting prior.
    ///
    /// # Errors
    ///
    /// Returns [`TemasError::InvalidArgument`] when `num_topics < 2`,
    /// `vocab_size < 2`, `topic_prior <= 0`, or `word_prior <= 0`.
    pub fn new(
        num_topics: usize,
        vocab_size: usize,
        topic_prior: f64,
        word_prior: f64,
    ) -> Result<Self> {
        if num_topics < 2 {
            return Err(TemasError::invalid_argument(
                "num_topics",
                num_topics,
                "must be >= 2",
            ));
        }
        if vocab_size < 2 {
            return Err(TemasError::invalid_argument(
                "vocab_size",
                vocab_size,
                "must be >= 2",
            ));
        }
        if topic_prior <= 0.0 {
            return Err(TemasError::invalid_argument(
                "topic_prior",
                topic_prior,
                "must be > 0",
            ));
        }
        if word_prior <= 0.0 {
            return Err(TemasError::invalid_argument(
                "word_prior",
                word_prior,
                "must be > 0",
            ));
        }
        Ok(Self {
            global_topic: DenseHistogram::new(num_topics),
            word_topics: vec![None; vocab_size],
            topic_prior: vec![topic_prior; num_topics],
            topic_prior_sum: topic_prior * num_topics as f64,
            word_prior,
            word_prior_sum: word_prior * vocab_size as f64,
        })
    }

    /// Number of topics K.
    #[must_use]
    pub fn num_topics(&self) -> usize {
        self.global_topic.len()
    }

    /// Vocabulary size V.
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.word_topics.len()
    }

    /// The global topic histogram N_k.
    #[must_use]
    pub fn global_topic(&self) -> &DenseHistogram {
        &self.global_topic
    }

    /// The topic histogram of `word`, if the word has ever been seen.
    #[must_use]
    pub fn word_topic(&self, word: usize) -> Option<&SparseHistogram> {
        self.word_topics[word].as_ref()
    }

    /// The topic histogram of `word`, allocated on first access.
    pub fn word_topic_mut(&mut self, word: usize) -> &mut SparseHistogram {
        self.word_topics[word].get_or_insert_with(SparseHistogram::new)
    }

    /// The asymmetric topic prior α.
    #[must_use]
    pub fn topic_prior(&self) -> &[f64] {
        &self.topic_prior
    }

    /// Cached Σα.
    #[must_use]
    pub fn topic_prior_sum(&self) -> f64 {
        self.topic_prior_sum
    }

    /// The symmetric word prior β.
    #[must_use]
    pub fn word_prior(&self) -> f64 {
        self.word_prior
    }

    /// Cached V·β.
    #[must_use]
    pub fn word_prior_sum(&self) -> f64 {
        self.word_prior_sum
    }

    /// Replaces the topic prior and its sum as one unit.
    ///
    /// # Panics
    ///
    /// Panics when `prior` does not have one entry per topic.
    pub fn swap_topic_prior(&mut self, prior: Vec<f64>, sum: f64) {
        assert_eq!(
            prior.len(),
            self.num_topics(),
            "prior must have one entry per topic"
        );
        self.topic_prior = prior;
        self.topic_prior_sum = sum;
    }

    /// Merges a shard of signed word-topic deltas into this model.
    ///
    /// When the local slot for a word is absent the shard histogram is
    /// adopted wholesale; otherwise each signed count flows through
    /// inc/dec. The global histogram receives the same deltas. This is
    /// the one code path where histograms legitimately carry negative
    /// counts (diffs recorded by a sampler).
    pub fn accumulate(&mut self, shard: BTreeMap<usize, SparseHistogram>) {
        for (word, h) in shard {
            h.for_each(|topic, count| {
                if count > 0 {
                    self.global_topic.inc(topic, count);
                } else if count < 0 {
                    self.global_topic.dec(topic, -count);
                }
            });

            match &mut self.word_topics[word] {
                slot @ None => *slot = Some(h),
                Some(local) => {
                    h.for_each(|topic, count| {
                        if count > 0 {
                            local.inc(topic, count);
                        } else if count < 0 {
                            local.dec(topic, -count);
                        }
                    });
                }
            }
        }
    }

    /// Words observed in `topic` with their counts, heaviest first.
    ///
    /// Returns `None` when no word has been observed in the topic.
    #[must_use]
    pub fn top_words(&self, topic: usize) -> Option<OrderedSparseHistogram> {
        let mut word_hist = SparseHistogram::new();
        for (word, h) in self.word_topics.iter().enumerate() {
            if let Some(h) = h {
                let count = h.at(topic);
                if count > 0 {
                    word_hist.inc(word, count);
                }
            }
        }
        if word_hist.is_empty() {
            None
        } else {
            Some(OrderedSparseHistogram::from_histogram(&word_hist))
        }
    }

    /// The smallest heaviest-first prefix of [`top_words`](Self::top_words)
    /// whose cumulative count reaches `percentage` of the topic's total.
    #[must_use]
    pub fn top_n_words(&self, topic: usize, percentage: f64) -> Option<OrderedSparseHistogram> {
        let mut h = self.top_words(topic)?;
        let threshold = self.global_topic.at(topic) as f64 * percentage;
        let mut accum = 0_i64;
        for i in 0..h.len() {
            accum += i64::from(h.counts()[i]);
            if accum as f64 >= threshold {
                h.truncate(i + 1);
                break;
            }
        }
        Some(h)
    }

    /// Writes every topic with all of its words, one line per topic.
    ///
    /// # Errors
    ///
    /// Returns [`TemasError::Io`] when writing fails.
    pub fn write_topics<W: Write>(&self, w: &mut W, vocab: &Vocabulary) -> Result<()> {
        self.write_topics_top_n(w, vocab, 1.0)
    }

    /// Writes every topic as `Topic kkkkk Nt nnnnn: word (count)…`,
    /// truncated to the heaviest words covering `percentage` of the
    /// topic's mass.
    ///
    /// # Errors
    ///
    /// Returns [`TemasError::Io`] when writing fails.
    pub fn write_topics_top_n<W: Write>(
        &self,
        w: &mut W,
        vocab: &Vocabulary,
        percentage: f64,
    ) -> Result<()> {
        let io_err = |e: std::io::Error| TemasError::Io {
            path: "<topics>".to_string(),
            message: e.to_string(),
        };
        for topic in 0..self.num_topics() {
            write!(w, "Topic {:05} Nt {:05}:", topic, self.global_topic.at(topic)).map_err(io_err)?;
            if let Some(h) = self.top_n_words(topic, percentage) {
                for (word, count) in h.iter() {
                    write!(w, " {} ({})", vocab.token(word), count).map_err(io_err)?;
                }
            }
            writeln!(w).map_err(io_err)?;
        }
        Ok(())
    }

    /// Saves the model to a binary file using bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self).map_err(|e| TemasError::Serialization {
            message: e.to_string(),
        })?;
        fs::write(&path, bytes).map_err(|e| TemasError::Io {
            path: path.as_ref().display().to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Loads a model from a binary file.
    ///
    /// # Errors
    ///
    /// Returns an error if file reading or deserialization fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(&path).map_err(|e| TemasError::Io {
            path: path.as_ref().display().to_string(),
            message: e.to_string(),
        })?;
        bincode::deserialize(&bytes).map_err(|e| TemasError::Serialization {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{
        testing_model, testing_vocabulary, TESTING_ALPHA, TESTING_BETA, TESTING_K, TESTING_V,
    };

    fn sparse(pairs: &[(usize, i32)]) -> SparseHistogram {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_new_model_shape() {
        let m = testing_model();
        assert_eq!(m.num_topics(), TESTING_K);
        assert_eq!(m.vocab_size(), TESTING_V);
        assert_eq!(m.topic_prior(), &[TESTING_ALPHA; 2]);
        assert!((m.topic_prior_sum() - 0.2).abs() < 1e-15);
        assert!((m.word_prior_sum() - 0.04).abs() < 1e-15);
    }

    #[test]
    fn test_new_model_rejects_bad_arguments() {
        assert!(Model::new(1, TESTING_V, TESTING_ALPHA, TESTING_BETA).is_err());
        assert!(Model::new(TESTING_K, 1, TESTING_ALPHA, TESTING_BETA).is_err());
        assert!(Model::new(TESTING_K, TESTING_V, 0.0, TESTING_BETA).is_err());
        assert!(Model::new(TESTING_K, TESTING_V, TESTING_ALPHA, -0.01).is_err());
    }

    #[test]
    fn test_word_topic_mut_allocates_lazily() {
        let mut m = Model::new(TESTING_K, TESTING_V, TESTING_ALPHA, TESTING_BETA)
            .expect("valid model arguments");
        assert!(m.word_topic(0).is_none());
        m.word_topic_mut(0).inc(1, 1);
        assert_eq!(m.word_topic(0).expect("now allocated").at(1), 1);
    }

    #[test]
    fn test_accumulate_adopts_and_merges() {
        let mut m = testing_model();
        let mut shard = BTreeMap::new();
        shard.insert(0, sparse(&[(0, 10), (1, 10)]));
        shard.insert(1, sparse(&[(1, 20)]));
        m.accumulate(shard);

        assert_eq!(m.word_topic(0), Some(&sparse(&[(0, 10), (1, 10)])));
        assert_eq!(m.word_topic(1), Some(&sparse(&[(1, 21)])));
        assert_eq!(m.word_topic(2), None);
        assert_eq!(m.word_topic(3), Some(&sparse(&[(1, 1)])));
        assert_eq!(m.global_topic().at(0), 10);
        assert_eq!(m.global_topic().at(1), 32);
    }

    #[test]
    fn test_accumulate_signed_deltas() {
        let mut m = testing_model();
        let mut shard = BTreeMap::new();
        let mut diff = SparseHistogram::new();
        diff.inc(0, 3);
        diff.dec(1, 1);
        shard.insert(3, diff);
        m.accumulate(shard);

        assert_eq!(m.word_topic(3), Some(&sparse(&[(0, 3)])));
        assert_eq!(m.global_topic().at(0), 3);
        assert_eq!(m.global_topic().at(1), 1);
    }

    #[test]
    fn test_clone_is_deep_and_equal() {
        let m = testing_model();
        let mut c = m.clone();
        assert_eq!(m, c);
        c.word_topic_mut(3).inc(0, 1);
        assert_ne!(m, c);
        assert_eq!(m.word_topic(3), Some(&sparse(&[(1, 1)])));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let m = testing_model();
        let bytes = bincode::serialize(&m).expect("model should encode");
        let r: Model = bincode::deserialize(&bytes).expect("model should decode");
        assert_eq!(m, r);
    }

    #[test]
    fn test_serialization_keeps_absent_distinct_from_empty() {
        let mut m = testing_model();
        // Allocate an empty histogram for "tiger" while "cat" stays absent.
        m.word_topic_mut(0);
        let bytes = bincode::serialize(&m).expect("model should encode");
        let r: Model = bincode::deserialize(&bytes).expect("model should decode");
        assert_eq!(r.word_topic(0), Some(&SparseHistogram::new()));
        assert_eq!(r.word_topic(2), None);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("model.bin");
        let m = testing_model();
        m.save(&path).expect("model should save");
        let r = Model::load(&path).expect("model should load");
        assert_eq!(m, r);
    }

    #[test]
    fn test_top_words() {
        let m = testing_model();
        assert!(m.top_words(0).is_none());
        let h = m.top_words(1).expect("topic 1 has words");
        assert_eq!(format!("{h}"), "[ 1:1 3:1 ]");
    }

    #[test]
    fn test_top_n_words_truncates_at_mass() {
        let m = testing_model();
        assert!(m.top_n_words(0, 0.5).is_none());
        let h = m.top_n_words(1, 0.5).expect("topic 1 has words");
        assert_eq!(format!("{h}"), "[ 1:1 ]");
    }

    #[test]
    fn test_write_topics_format() {
        let v = testing_vocabulary();
        let m = testing_model();
        let mut buf = Vec::new();
        m.write_topics(&mut buf, &v).expect("write should succeed");
        let s = String::from_utf8(buf).expect("output is UTF-8");
        assert_eq!(
            s,
            "Topic 00000 Nt 00000:\nTopic 00001 Nt 00002: orange (1) apple (1)\n"
        );
    }
}
