//! Token vocabulary with hash-shuffled ids.
//!
//! The vocabulary is the bijection between token strings and dense ids
//! in `[0, V)`. Tokens are sorted by (FNV-1a-64 fingerprint, lexical)
//! and their rank becomes their id, which deliberately interleaves
//! frequent and long-tail tokens: contiguous id ranges then carry
//! comparable total mass, so a sharder can split the id space into
//! equal ranges without skew.

use std::io::BufRead;

use crate::error::{Result, TemasError};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a hash of a string's UTF-8 bytes.
///
/// This is the fingerprint that orders the vocabulary and seeds the
/// interpreter's RNG; it is part of the data contract, so it is fixed
/// here rather than delegated to a hasher with unstable output.
#[must_use]
pub fn fingerprint(s: &str) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in s.as_bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Bijection between token strings and ids in `[0, V)`.
///
/// Immutable once loaded; freely shareable across threads.
///
/// # Examples
///
/// ```
/// use temas::Vocabulary;
///
/// let v = Vocabulary::load("apple\norange\ncat\ntiger".as_bytes())
///     .expect("vocabulary should load");
/// assert_eq!(v.len(), 4);
/// assert_eq!(v.token(v.id("cat").expect("cat is in the vocabulary")), "cat");
/// assert_eq!(v.id("durian"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    tokens: Vec<String>,
    ids: std::collections::HashMap<String, usize>,
}

impl Vocabulary {
    /// Loads a vocabulary from whitespace-delimited text.
    ///
    /// Each non-blank line contributes its first field as a token;
    /// remaining fields (frequencies, annotations) are ignored. The
    /// order of lines is irrelevant: tokens are re-sorted by
    /// (fingerprint, lexical).
    ///
    /// # Errors
    ///
    /// Returns [`TemasError::Io`] when reading fails.
    pub fn load<R: BufRead>(reader: R) -> Result<Self> {
        let mut tokens = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| TemasError::Io {
                path: "<vocabulary>".to_string(),
                message: e.to_string(),
            })?;
            if let Some(first) = line.split_whitespace().next() {
                tokens.push(first.to_string());
            }
        }
        Ok(Self::from_tokens(tokens))
    }

    /// Builds a vocabulary from a token list, applying the canonical
    /// (fingerprint, lexical) ordering.
    #[must_use]
    pub fn from_tokens(mut tokens: Vec<String>) -> Self {
        tokens.sort_by(|a, b| fingerprint(a).cmp(&fingerprint(b)).then_with(|| a.cmp(b)));
        let ids = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { tokens, ids }
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true when the vocabulary holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the id of `token`, or `None` when it is out of
    /// vocabulary.
    #[must_use]
    pub fn id(&self, token: &str) -> Option<usize> {
        self.ids.get(token).copied()
    }

    /// Returns the token with the given id.
    ///
    /// # Panics
    ///
    /// Panics when `id` is out of `[0, V)`.
    #[must_use]
    pub fn token(&self, id: usize) -> &str {
        assert!(
            id < self.tokens.len(),
            "id={id} out of range [0, {})",
            self.tokens.len()
        );
        &self.tokens[id]
    }

    /// Tokens in id order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Rewrites token spellings through a translation table for
    /// display, keeping the id assignment intact.
    ///
    /// Tokens without a translation keep their original spelling.
    /// [`id`](Self::id) keeps answering for the original spellings;
    /// only [`token`](Self::token) reflects the rewrite.
    pub fn translate(&mut self, trans: &crate::io::Translation) {
        for token in &mut self.tokens {
            if let Some(t) = trans.get(token) {
                *token = t.to_string();
            }
        }
    }
}
