//! The SparseLDA collapsed Gibbs sampler.
//!
//! Resampling position i of document d draws a topic with probability
//!
//! ```text
//! P(k | ·) ∝ (α_k + n_dk) · (β + N_kw) / (V·β + N_k)
//! ```
//!
//! Expanding the product splits the unnormalized posterior into three
//! additive buckets, each maintained incrementally together with its
//! scalar sum:
//!
//! - smoothing-only: `α_k·β / (V·β + N_k)` — depends only on the model;
//!   rebuilt at construction, after prior optimization, and adjusted
//!   around each resample for the single touched topic;
//! - document-topic: `n_dk·β / (V·β + N_k)` — non-zero only on topics
//!   present in the document; rebuilt per document;
//! - topic-word: `q_k·N_kw` with the cached coefficient
//!   `q_k = (α_k + n_dk) / (V·β + N_k)` — non-zero only on topics where
//!   the current word has been observed; rebuilt per token.
//!
//! Since `n_dk` and `N_kw` are sparse in k, a resample costs
//! O(non-zeros) rather than O(K) except for the rare draw that lands in
//! the small smoothing bucket. This is the algorithm of Yao, Mimno and
//! McCallum, *Topic Model Inference on Streaming Document Collections*
//! (KDD 2009), extended with an asymmetric topic prior.

use rand::Rng;

use crate::document::Document;
use crate::hist::Histogram;
use crate::model::Model;

/// Incremental SparseLDA sampler state.
///
/// The sampler holds only derived state — the three bucket vectors,
/// their sums, and the coefficient vector — and borrows the model (plus
/// an optional diff model recording signed deltas) for the duration of
/// each call. All of it can be rebuilt from the model at any time;
/// exactly one sampler must mutate a given model at a time.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use temas::{Document, Model, Sampler, Vocabulary};
///
/// let vocab = Vocabulary::load("apple\norange\ncat\ntiger".as_bytes())
///     .expect("vocabulary should load");
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut doc = Document::initialize(&["apple", "orange"], &vocab, 2, &mut rng);
///
/// let mut model = Model::new(2, vocab.len(), 0.1, 0.01).expect("valid arguments");
/// doc.apply_to_model(&mut model);
///
/// let mut sampler = Sampler::new(&model);
/// for _ in 0..10 {
///     sampler.sample(&mut model, &mut doc, &mut rng);
/// }
/// ```
#[derive(Debug)]
pub struct Sampler {
    smoothing_only_size: f64,
    smoothing_only_factors: Vec<f64>,
    document_topic_size: f64,
    document_topic_factors: Vec<f64>,
    topic_word_size: f64,
    topic_word_factors: Vec<f64>,
    coefficients: Vec<f64>,
}

impl Sampler {
    /// Creates a sampler for models shaped like `model`, with the
    /// smoothing bucket and coefficients built from its current state.
    #[must_use]
    pub fn new(model: &Model) -> Self {
        let k = model.num_topics();
        let mut s = Self {
            smoothing_only_size: 0.0,
            smoothing_only_factors: vec![0.0; k],
            document_topic_size: 0.0,
            document_topic_factors: vec![0.0; k],
            topic_word_size: 0.0,
            topic_word_factors: vec![0.0; k],
            coefficients: vec![0.0; k],
        };
        s.build_smoothing_only_bucket(model);
        s.cache_coefficients(model);
        s
    }

    /// Rebuilds the smoothing bucket and coefficients after the topic
    /// prior changed (e.g. by the optimizer).
    pub fn after_optimization(&mut self, model: &Model) {
        self.build_smoothing_only_bucket(model);
        self.cache_coefficients(model);
    }

    /// The smoothing-only bucket sum; the evaluator's accelerated
    /// coefficient path reuses it.
    #[must_use]
    pub fn smoothing_only_size(&self) -> f64 {
        self.smoothing_only_size
    }

    /// Resamples every position of `doc`, mutating `model` in place.
    pub fn sample<R: Rng>(&mut self, model: &mut Model, doc: &mut Document, rng: &mut R) {
        self.sample_impl(model, None, doc, rng);
    }

    /// Like [`sample`](Self::sample), additionally recording every
    /// count delta as a signed update in `diff` (word-topic and global
    /// histograms only; priors are not mirrored).
    ///
    /// A driver gives each shard's sampler a private model clone and an
    /// empty diff, then merges the diffs into the authoritative model
    /// with [`Model::accumulate`].
    pub fn sample_recording<R: Rng>(
        &mut self,
        model: &mut Model,
        diff: &mut Model,
        doc: &mut Document,
        rng: &mut R,
    ) {
        self.sample_impl(model, Some(diff), doc, rng);
    }

    fn sample_impl<R: Rng>(
        &mut self,
        model: &mut Model,
        mut diff: Option<&mut Model>,
        doc: &mut Document,
        rng: &mut R,
    ) {
        self.build_document_topic_bucket(model, doc);
        self.update_coefficients(model, doc);
        for i in 0..doc.len() {
            let token = doc.words[i];
            let old_topic = doc.topics[i];
            self.neglect_word(model, diff.as_deref_mut(), doc, token, old_topic);
            self.build_topic_word_bucket(model, token);
            let new_topic = self.sample_new_topic(model, doc, token, rng);
            doc.topics[i] = new_topic;
            self.consider_word(model, diff.as_deref_mut(), doc, token, new_topic);
        }
        self.reset_coefficients(model, doc);
    }

    fn build_smoothing_only_bucket(&mut self, model: &Model) {
        self.smoothing_only_size = 0.0;
        for factor in &mut self.smoothing_only_factors {
            *factor = 0.0;
        }
        for t in 0..model.num_topics() {
            self.smoothing_only_factors[t] = model.topic_prior()[t] * model.word_prior()
                / (model.word_prior_sum() + model.global_topic().at(t) as f64);
            self.smoothing_only_size += self.smoothing_only_factors[t];
        }
    }

    fn build_document_topic_bucket(&mut self, model: &Model, doc: &Document) {
        self.document_topic_size = 0.0;
        for factor in &mut self.document_topic_factors {
            *factor = 0.0;
        }
        for (t, count) in doc.topic_hist.iter() {
            self.document_topic_factors[t] = model.word_prior() * count as f64
                / (model.word_prior_sum() + model.global_topic().at(t) as f64);
            self.document_topic_size += self.document_topic_factors[t];
        }
    }

    // Assumes the coefficients are current for the enclosing document.
    fn build_topic_word_bucket(&mut self, model: &Model, token: usize) {
        self.topic_word_size = 0.0;
        for factor in &mut self.topic_word_factors {
            *factor = 0.0;
        }
        if let Some(h) = model.word_topic(token) {
            for (t, count) in h.iter() {
                self.topic_word_factors[t] = self.coefficients[t] * count as f64;
                self.topic_word_size += self.topic_word_factors[t];
            }
        }
    }

    // The smoothing-only form of the coefficient, valid outside any
    // document. update_coefficients overlays the document-aware form
    // for topics present in the document; reset_coefficients undoes
    // exactly those entries afterwards.
    fn cache_coefficients(&mut self, model: &Model) {
        for t in 0..model.num_topics() {
            self.coefficients[t] = model.topic_prior()[t]
                / (model.word_prior_sum() + model.global_topic().at(t) as f64);
        }
    }

    fn update_coefficients(&mut self, model: &Model, doc: &Document) {
        for (t, count) in doc.topic_hist.iter() {
            self.coefficients[t] = (model.topic_prior()[t] + count as f64)
                / (model.word_prior_sum() + model.global_topic().at(t) as f64);
        }
    }

    fn reset_coefficients(&mut self, model: &Model, doc: &Document) {
        for (t, _) in doc.topic_hist.iter() {
            self.coefficients[t] = model.topic_prior()[t]
                / (model.word_prior_sum() + model.global_topic().at(t) as f64);
        }
    }

    fn neglect_word(
        &mut self,
        model: &mut Model,
        diff: Option<&mut Model>,
        doc: &mut Document,
        token: usize,
        topic: usize,
    ) {
        model.word_topic_mut(token).dec(topic, 1);
        model.global_topic.dec(topic, 1);
        doc.topic_hist.dec(topic, 1);
        if let Some(diff) = diff {
            diff.word_topic_mut(token).dec(topic, 1);
            diff.global_topic.dec(topic, 1);
        }
        self.refresh_topic(model, doc, topic);
    }

    fn consider_word(
        &mut self,
        model: &mut Model,
        diff: Option<&mut Model>,
        doc: &mut Document,
        token: usize,
        topic: usize,
    ) {
        model.word_topic_mut(token).inc(topic, 1);
        model.global_topic.inc(topic, 1);
        doc.topic_hist.inc(topic, 1);
        if let Some(diff) = diff {
            diff.word_topic_mut(token).inc(topic, 1);
            diff.global_topic.inc(topic, 1);
        }
        self.refresh_topic(model, doc, topic);
    }

    // Re-derives the smoothing and document factors, both sums, and the
    // coefficient of the one topic whose counts just changed.
    fn refresh_topic(&mut self, model: &Model, doc: &Document, topic: usize) {
        self.smoothing_only_size -= self.smoothing_only_factors[topic];
        self.document_topic_size -= self.document_topic_factors[topic];

        let doc_topic_count = doc.topic_hist.at(topic) as f64;
        let global_topic_count = model.global_topic().at(topic) as f64;
        let denominator = model.word_prior_sum() + global_topic_count;

        self.smoothing_only_factors[topic] =
            model.topic_prior()[topic] * model.word_prior() / denominator;
        self.document_topic_factors[topic] = doc_topic_count * model.word_prior() / denominator;

        self.smoothing_only_size += self.smoothing_only_factors[topic];
        self.document_topic_size += self.document_topic_factors[topic];

        self.coefficients[topic] = (model.topic_prior()[topic] + doc_topic_count) / denominator;
    }

    // Inverse-CDF draw over the three buckets. The topic-word bucket is
    // checked first because it concentrates most of the mass for
    // frequent words; the document bucket second; the smoothing bucket
    // last — it has full support, so its walk is O(K), but its mass is
    // small. The landing test is `draw <= 0` so that tiny negative
    // drift from float subtraction cannot skip a topic.
    fn sample_new_topic<R: Rng>(
        &self,
        model: &Model,
        doc: &Document,
        token: usize,
        rng: &mut R,
    ) -> usize {
        let norm = self.smoothing_only_size + self.document_topic_size + self.topic_word_size;
        let mut draw = rng.gen::<f64>() * norm;

        if draw < self.topic_word_size {
            if let Some(h) = model.word_topic(token) {
                for (topic, _) in h.iter() {
                    draw -= self.topic_word_factors[topic];
                    if draw <= 0.0 {
                        return topic;
                    }
                }
            }
        } else {
            draw -= self.topic_word_size;
            if draw < self.document_topic_size {
                for &topic in doc.topic_hist.topics() {
                    draw -= self.document_topic_factors[topic];
                    if draw <= 0.0 {
                        return topic;
                    }
                }
            } else {
                draw -= self.document_topic_size;
                for topic in 0..model.num_topics() {
                    draw -= self.smoothing_only_factors[topic];
                    if draw <= 0.0 {
                        return topic;
                    }
                }
            }
        }

        panic!(
            "sampling failed: draw fell off the cumulative distribution \
             (bucket sums {:e} {:e} {:e})",
            self.smoothing_only_size, self.document_topic_size, self.topic_word_size
        );
    }
}
