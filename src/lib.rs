//! Temas: SparseLDA topic modeling in pure Rust.
//!
//! Temas learns Latent Dirichlet Allocation models from tokenized
//! corpora with an incremental collapsed Gibbs sampler (the SparseLDA
//! three-bucket decomposition of Yao, Mimno and McCallum), refits the
//! asymmetric topic prior with Minka's fixed-point iteration, evaluates
//! perplexity with shared algebraic structure, and infers the topic
//! mixture of new documents against a frozen model.
//!
//! # Quick Start
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use temas::prelude::*;
//!
//! let vocab = Vocabulary::load("apple\norange\ncat\ntiger".as_bytes())
//!     .expect("vocabulary should load");
//!
//! // One document per line; out-of-vocabulary tokens are dropped.
//! let mut rng = StdRng::seed_from_u64(42);
//! let corpus_text = "apple orange\norange apple\ncat tiger\ntiger cat";
//! let mut corpus = load_corpus(corpus_text.as_bytes(), &vocab, 2, 1, -1, &mut rng)
//!     .expect("corpus should load");
//!
//! // Train a 2-topic model with 50 Gibbs iterations.
//! let mut model = initialize_model(&corpus, &vocab, 2, 0.1, 0.01)
//!     .expect("valid model parameters");
//! let mut sampler = Sampler::new(&model);
//! for _ in 0..50 {
//!     for doc in &mut corpus {
//!         sampler.sample(&mut model, doc, &mut rng);
//!     }
//! }
//!
//! // Evaluate and interpret.
//! let evaluator = Evaluator::new(&model, 0, Some(&sampler));
//! let perplexity = evaluator.corpus_perplexity(&corpus).expect("non-empty corpus");
//! assert!(perplexity > 1.0);
//!
//! let interpreter = Interpreter::new(&model, &vocab, -1);
//! let topics = interpreter.interpret(&["apple"], 10, 30).expect("known token");
//! assert!(!topics.is_empty());
//! ```
//!
//! # Modules
//!
//! - [`hist`]: dense, sparse and count-ordered topic histograms
//! - [`vocab`]: token↔id bijection with hash-shuffled ordering
//! - [`document`]: tokenized documents with topic assignments
//! - [`model`]: counts, priors, shard accumulation, serialization
//! - [`accessor`]: smoothed posterior lookup with a bounded cache
//! - [`sampler`]: the SparseLDA collapsed Gibbs sampler
//! - [`evaluator`]: log-likelihood and perplexity
//! - [`optimizer`]: asymmetric-prior fixed-point optimization
//! - [`interpreter`]: topic inference for new documents
//! - [`sharder`]: word-id range sharding for data-parallel training
//! - [`io`]: corpus, vocabulary and translation loading

pub mod accessor;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod hist;
pub mod interpreter;
pub mod io;
pub mod model;
pub mod optimizer;
pub mod prelude;
pub mod sampler;
pub mod sharder;
pub mod vocab;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::{Result, TemasError};
pub use model::Model;
pub use sampler::Sampler;
pub use vocab::Vocabulary;
pub use document::Document;
pub use evaluator::Evaluator;
pub use interpreter::Interpreter;
pub use optimizer::Optimizer;
