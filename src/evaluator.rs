//! Log-likelihood and perplexity of documents under a model.
//!
//! The likelihood of token t in document m with the document-topic
//! posterior mean as mixture weights is
//!
//! ```text
//!                              n_mk + α_k
//! L(m,t) = Σ_k φ_kt · ------------------
//!                             L_m + Σ_k α_k
//!
//!                  1
//!        = ----------- · [ o(t) + Σ_k φ_kt·n_mk ]      o(t) = Σ_k φ_kt·α_k
//!           L_m + Σα
//! ```
//!
//! which is fast to evaluate because o(t) is precomputable per word,
//! n_mk is sparse, Σα is cached on the model, and L_m is the document
//! length. o(t) itself reduces to the sampler's smoothing-only bucket
//! sum plus a sparse correction:
//!
//! ```text
//! o(t) = Σ_k α_k·β/(βV + N_k)  +  Σ_k α_k·n_kt/(βV + N_k)
//!      = SM                    +  O(non-zeros of n_kt)
//! ```
//!
//! so a borrowed sampler turns the per-word precomputation from O(K)
//! into O(non-zeros).

use crate::accessor::{DistCache, ModelAccessor};
use crate::document::Document;
use crate::hist::Histogram;
use crate::model::Model;
use crate::sampler::Sampler;

/// Computes log-likelihood and perplexity of documents given a model.
#[derive(Debug)]
pub struct Evaluator<'a> {
    accessor: ModelAccessor<'a>,
    cached_coeff: Vec<f64>,
}

impl<'a> Evaluator<'a> {
    /// Wraps `model` and precomputes the per-word coefficient o(t) for
    /// every word with an allocated topic histogram.
    ///
    /// When `sampler` is given its smoothing-only bucket sum shortcuts
    /// the precomputation to O(non-zeros) per word; both paths yield
    /// the same coefficients up to rounding.
    #[must_use]
    pub fn new(model: &'a Model, cache_bytes: i64, sampler: Option<&Sampler>) -> Self {
        let accessor = ModelAccessor::new(model, cache_bytes);
        let cached_coeff = evaluation_coeff(&accessor, sampler);
        Self {
            accessor,
            cached_coeff,
        }
    }

    /// Log-likelihood of `doc` and its length.
    ///
    /// Document perplexity is `exp(-logl / len)`; summing the pairs
    /// over a corpus before dividing gives corpus perplexity. An empty
    /// document contributes `(0.0, 0)`.
    #[must_use]
    pub fn perplexity(&self, doc: &Document) -> (f64, usize) {
        if doc.is_empty() {
            return (0.0, 0);
        }

        let model = self.accessor.model();
        let mut cache = DistCache::new(&self.accessor);
        let mut logl = 0.0;
        for &word in doc.words() {
            let dist = cache.get(word);
            let mut prob = 0.0;
            for (topic, count) in doc.topic_hist().iter() {
                prob += dist[topic] * count as f64;
            }
            logl += ((self.cached_coeff[word] + prob)
                / (doc.len() as f64 + model.topic_prior_sum()))
            .ln();
        }
        (logl, doc.len())
    }

    /// Corpus perplexity `exp(-Σ logl / Σ len)` over `docs`.
    ///
    /// Returns `None` when every document is empty.
    #[must_use]
    pub fn corpus_perplexity(&self, docs: &[Document]) -> Option<f64> {
        let mut logl = 0.0;
        let mut len = 0;
        for doc in docs {
            let (l, n) = self.perplexity(doc);
            logl += l;
            len += n;
        }
        if len == 0 {
            None
        } else {
            Some((-logl / len as f64).exp())
        }
    }
}

fn evaluation_coeff(accessor: &ModelAccessor<'_>, sampler: Option<&Sampler>) -> Vec<f64> {
    let model = accessor.model();
    let mut coeff = vec![0.0; model.vocab_size()];
    for (word, c) in coeff.iter_mut().enumerate() {
        let Some(hist) = model.word_topic(word) else {
            continue;
        };
        match sampler {
            Some(s) => {
                for (topic, count) in hist.iter() {
                    *c += model.topic_prior()[topic] * count as f64
                        / (model.word_prior_sum() + model.global_topic().at(topic) as f64);
                }
                *c += s.smoothing_only_size();
            }
            None => {
                let dist = accessor.word_topic_dist(word);
                for (topic, phi) in dist.iter().enumerate() {
                    *c += phi * model.topic_prior()[topic];
                }
            }
        }
    }
    coeff
}
