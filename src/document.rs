//! Tokenized documents with per-position topic assignments.

use rand::Rng;

use crate::error::{Result, TemasError};
use crate::hist::{Histogram, OrderedSparseHistogram};
use crate::model::Model;
use crate::vocab::Vocabulary;

/// A document as token ids, the current topic of every position, and
/// the document topic histogram derived from those assignments.
///
/// The histogram is redundant with `topics` by construction; the
/// sampler and interpreter keep the two in lockstep as they resample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub(crate) words: Vec<usize>,
    pub(crate) topics: Vec<usize>,
    pub(crate) topic_hist: OrderedSparseHistogram,
}

impl Document {
    /// Builds a document from raw tokens, dropping those that are out
    /// of vocabulary and assigning each survivor a uniform random topic
    /// in `[0, num_topics)`.
    ///
    /// The result may be empty when no token is in the vocabulary.
    pub fn initialize<S: AsRef<str>, R: Rng>(
        words: &[S],
        vocab: &Vocabulary,
        num_topics: usize,
        rng: &mut R,
    ) -> Self {
        let mut d = Document {
            words: Vec::with_capacity(words.len()),
            topics: Vec::with_capacity(words.len()),
            topic_hist: OrderedSparseHistogram::with_capacity(words.len()),
        };
        for word in words {
            if let Some(id) = vocab.id(word.as_ref()) {
                let topic = rng.gen_range(0..num_topics);
                d.words.push(id);
                d.topics.push(topic);
                d.topic_hist.inc(topic, 1);
            }
        }
        d
    }

    /// Rebuilds a document from explicit word ids and topic
    /// assignments, e.g. when restoring checkpointed shard state.
    ///
    /// # Errors
    ///
    /// Returns [`TemasError::InvalidArgument`] when the two slices
    /// differ in length.
    pub fn from_assignments(words: Vec<usize>, topics: Vec<usize>) -> Result<Self> {
        if words.len() != topics.len() {
            return Err(TemasError::invalid_argument(
                "topics",
                topics.len(),
                &format!("must have one topic per word ({} words)", words.len()),
            ));
        }
        let mut topic_hist = OrderedSparseHistogram::with_capacity(words.len());
        for &topic in &topics {
            topic_hist.inc(topic, 1);
        }
        Ok(Document {
            words,
            topics,
            topic_hist,
        })
    }

    /// Number of in-vocabulary tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true when no token survived vocabulary filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Token ids by position.
    #[must_use]
    pub fn words(&self) -> &[usize] {
        &self.words
    }

    /// Current topic assignment by position.
    #[must_use]
    pub fn topics(&self) -> &[usize] {
        &self.topics
    }

    /// The document topic histogram.
    #[must_use]
    pub fn topic_hist(&self) -> &OrderedSparseHistogram {
        &self.topic_hist
    }

    /// Adds this document's assignments to the model's word-topic and
    /// global histograms.
    pub fn apply_to_model(&self, model: &mut Model) {
        for i in 0..self.words.len() {
            model.word_topic_mut(self.words[i]).inc(self.topics[i], 1);
            model.global_topic.inc(self.topics[i], 1);
        }
    }
}
