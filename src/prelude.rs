//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use temas::prelude::*;
//! ```

pub use crate::accessor::ModelAccessor;
pub use crate::document::Document;
pub use crate::error::{Result, TemasError};
pub use crate::evaluator::Evaluator;
pub use crate::hist::{DenseHistogram, Histogram, OrderedSparseHistogram, SparseHistogram};
pub use crate::interpreter::{Interpreter, TopicDist, TopicProb};
pub use crate::io::{initialize_model, load_corpus, read_corpus, read_vocabulary, Translation};
pub use crate::model::Model;
pub use crate::optimizer::Optimizer;
pub use crate::sampler::Sampler;
pub use crate::sharder::Sharder;
pub use crate::vocab::{fingerprint, Vocabulary};
