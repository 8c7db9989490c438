//! Fixed-point optimization of the asymmetric Dirichlet topic prior.
//!
//! Implements Minka's fixed-point iteration with the digamma recurrence
//! relation, as described in
//!
//! > Hanna M. Wallach. *Structured Topic Models for Language.* Ph.D.
//! > thesis, University of Cambridge, 2008.
//!
//! The optimizer collects, over the documents of an iteration, how many
//! documents contain each topic n times and the histogram of document
//! lengths, then refits α so that topics with heavy document support
//! get a larger base rate.

use crate::document::Document;
use crate::hist::{DenseHistogram, Histogram, SparseHistogram};
use crate::model::Model;

/// Collects per-document statistics and refits the topic prior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimizer {
    // Histogram of document lengths.
    doc_len_hist: SparseHistogram,
    // topic_doc_hists[k] counts, indexed by n, the documents in which
    // topic k occurs n times.
    topic_doc_hists: Vec<SparseHistogram>,
}

impl Optimizer {
    /// Creates an optimizer for `num_topics` topics.
    #[must_use]
    pub fn new(num_topics: usize) -> Self {
        Self {
            doc_len_hist: SparseHistogram::new(),
            topic_doc_hists: vec![SparseHistogram::new(); num_topics],
        }
    }

    /// Records one document's topic occupancy and length.
    pub fn collect_document_statistics(&mut self, doc: &Document) {
        for (topic, count) in doc.topic_hist().iter() {
            self.topic_doc_hists[topic].inc(count as usize, 1);
        }
        self.doc_len_hist.inc(doc.len(), 1);
    }

    /// Statistics collected so far, as `(doc_len_hist, topic_doc_hists)`.
    #[must_use]
    pub fn statistics(&self) -> (&SparseHistogram, &[SparseHistogram]) {
        (&self.doc_len_hist, &self.topic_doc_hists)
    }

    /// Runs `iterations` fixed-point sweeps over the topic prior of
    /// `model`, with a Gamma(shape, scale) hyperprior.
    ///
    /// Σα is recomputed incrementally inside each sweep, so the update
    /// of topic k sees the new α of topics before it; the trajectory
    /// depends on this update order. After
    /// optimizing, the caller must invoke
    /// [`Sampler::after_optimization`](crate::Sampler::after_optimization)
    /// to rebuild the smoothing bucket and coefficients.
    pub fn optimize_topic_priors(
        &self,
        model: &mut Model,
        shape: f64,
        scale: f64,
        iterations: usize,
    ) {
        let mut prior = model.topic_prior().to_vec();
        let mut prior_sum = model.topic_prior_sum();

        for _ in 0..iterations {
            let mut diff_digamma = 0.0;
            let mut denominator = 0.0;
            let d = approximate_hist(&self.doc_len_hist);
            for i in 1..d.len() {
                diff_digamma += 1.0 / (i as f64 - 1.0 + prior_sum);
                denominator += d.at(i) as f64 * diff_digamma;
            }
            denominator -= 1.0 / scale;

            prior_sum = 0.0;
            for (k, h) in self.topic_doc_hists.iter().enumerate() {
                let mut diff_digamma = 0.0;
                let mut numerator = 0.0;
                let d = approximate_hist(h);
                for i in 1..d.len() {
                    diff_digamma += 1.0 / (i as f64 - 1.0 + prior[k]);
                    numerator += d.at(i) as f64 * diff_digamma;
                }
                prior[k] = (prior[k] * numerator + shape) / denominator;
                prior_sum += prior[k];
            }
        }

        model.swap_topic_prior(prior, prior_sum);
    }
}

// Materializes a sparse histogram as a dense prefix up to its maximum
// index, which is what the digamma recurrences walk.
fn approximate_hist(s: &SparseHistogram) -> DenseHistogram {
    let Some(max_idx) = s.iter().map(|(k, _)| k).max() else {
        return DenseHistogram::new(0);
    };
    let mut d = DenseHistogram::new(max_idx + 1);
    s.for_each(|k, v| d.inc(k, v));
    d
}
