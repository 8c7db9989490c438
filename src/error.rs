//! Error types for model construction and I/O.
//!
//! Errors carry actionable context and fail fast with clear diagnostic
//! messages. Conditions that corrupt inference state (count overflow,
//! histogram underflow, a draw falling off the cumulative distribution)
//! are not recoverable and panic instead; see the sampler documentation.

use std::fmt;

/// Result type for topic-model operations.
pub type Result<T> = std::result::Result<T, TemasError>;

/// Errors that can occur while building or loading a topic model.
#[derive(Debug, Clone, PartialEq)]
pub enum TemasError {
    /// A constructor argument violated its constraint.
    InvalidArgument {
        /// Parameter name
        param: String,
        /// Value provided, rendered as a string
        value: String,
        /// Constraint violated
        constraint: String,
    },

    /// Every token of an interpreted document was out of vocabulary.
    EmptyDocument,

    /// A translation file defined the same source token twice.
    DuplicateToken {
        /// The offending source token
        token: String,
    },

    /// IO error during file operations.
    Io {
        /// Path to the file
        path: String,
        /// Error message
        message: String,
    },

    /// Model encoding or decoding failed.
    Serialization {
        /// Error description
        message: String,
    },
}

impl fmt::Display for TemasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid argument '{param}' = {value}. Constraint: {constraint}"
                )
            }

            Self::EmptyDocument => {
                write!(f, "Empty document: no token is in the vocabulary")
            }

            Self::DuplicateToken { token } => {
                write!(f, "Duplicate source token '{token}' in translation file")
            }

            Self::Io { path, message } => {
                write!(f, "IO error for '{path}': {message}")
            }

            Self::Serialization { message } => {
                write!(f, "Serialization error: {message}")
            }
        }
    }
}

impl std::error::Error for TemasError {}

impl TemasError {
    /// Builds an [`TemasError::InvalidArgument`] from display-able parts.
    pub(crate) fn invalid_argument(
        param: &str,
        value: impl fmt::Display,
        constraint: &str,
    ) -> Self {
        Self::InvalidArgument {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}
