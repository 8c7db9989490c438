//! Shared fixtures for unit tests.
//!
//! The canonical tiny setup: a four-token vocabulary, a two-token
//! testing document with pinned topic assignments, and the model that
//! document induces. The pinned state
//!
//! ```text
//!   word states:   topic 0    topic 1
//!        tiger:    (absent)
//!       orange:    -          1
//!          cat:    (absent)
//!        apple:    -          1
//!   global states: 0          2
//! ```
//!
//! makes every bucket factor, coefficient, φ vector and log-likelihood
//! a closed-form constant that the tests assert exactly.

use rand::Rng;

use crate::document::Document;
use crate::model::Model;
use crate::vocab::Vocabulary;

pub const TESTING_V: usize = 4;
pub const TESTING_K: usize = 2;
pub const TESTING_ALPHA: f64 = 0.1;
pub const TESTING_BETA: f64 = 0.01;
pub const TESTING_ITERATIONS: usize = 110;

pub fn testing_vocabulary() -> Vocabulary {
    Vocabulary::load("apple 100\norange\twhatever\n\ncat\ntiger".as_bytes())
        .expect("testing vocabulary should load")
}

/// The document `[apple, orange]` with both positions pinned to
/// topic 1 (ids 3 and 1 under the testing vocabulary).
pub fn testing_document() -> Document {
    Document::from_assignments(vec![3, 1], vec![1, 1]).expect("parallel slices")
}

/// The model induced by applying [`testing_document`] to a fresh
/// (K=2, V=4, α=0.1, β=0.01) model.
pub fn testing_model() -> Model {
    let mut m = Model::new(TESTING_K, TESTING_V, TESTING_ALPHA, TESTING_BETA)
        .expect("valid testing parameters");
    testing_document().apply_to_model(&mut m);
    m
}

/// The four-document corpus `[apple orange] [orange apple] [cat tiger]
/// [tiger cat]` with random initial topics, and its initialized model.
pub fn testing_corpus<R: Rng>(vocab: &Vocabulary, rng: &mut R) -> (Model, Vec<Document>) {
    let corpus: Vec<Document> = [
        ["apple", "orange"],
        ["orange", "apple"],
        ["cat", "tiger"],
        ["tiger", "cat"],
    ]
    .iter()
    .map(|words| Document::initialize(words, vocab, TESTING_K, rng))
    .collect();

    let mut model = Model::new(TESTING_K, TESTING_V, TESTING_ALPHA, TESTING_BETA)
        .expect("valid testing parameters");
    for d in &corpus {
        d.apply_to_model(&mut model);
    }
    (model, corpus)
}
