//! Corpus, vocabulary and translation loading.
//!
//! File contracts:
//!
//! - vocabulary: UTF-8 text, one token per line; only the first
//!   whitespace field of each non-blank line is read;
//! - corpus: UTF-8 text, one document per line, whitespace-separated
//!   tokens; out-of-vocabulary tokens are silently dropped;
//! - translation: one line per token, `<source-token> <translation…>`;
//!   a duplicated source token is a hard error.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::Rng;

use crate::document::Document;
use crate::error::{Result, TemasError};
use crate::model::Model;
use crate::vocab::Vocabulary;

fn io_error(path: &str, e: &std::io::Error) -> TemasError {
    TemasError::Io {
        path: path.to_string(),
        message: e.to_string(),
    }
}

/// Loads a vocabulary from a file path.
///
/// # Errors
///
/// Returns [`TemasError::Io`] when the file cannot be read.
pub fn read_vocabulary<P: AsRef<Path>>(path: P) -> Result<Vocabulary> {
    let path_str = path.as_ref().display().to_string();
    let file = File::open(&path).map_err(|e| io_error(&path_str, &e))?;
    Vocabulary::load(BufReader::new(file))
}

/// Loads a corpus: one document per line, initialized with uniform
/// random topics.
///
/// Documents outside `[min_len, max_len]` after vocabulary filtering
/// are skipped; a non-positive bound means unbounded on that side.
///
/// # Errors
///
/// Returns [`TemasError::Io`] when reading fails.
pub fn load_corpus<R: BufRead, G: Rng>(
    reader: R,
    vocab: &Vocabulary,
    num_topics: usize,
    min_len: i64,
    max_len: i64,
    rng: &mut G,
) -> Result<Vec<Document>> {
    let mut corpus = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| io_error("<corpus>", &e))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let d = Document::initialize(&tokens, vocab, num_topics, rng);
        let len = d.len() as i64;
        if (min_len <= 0 || len >= min_len) && (max_len <= 0 || len <= max_len) {
            corpus.push(d);
        }
    }
    Ok(corpus)
}

/// Loads a corpus from a file path; see [`load_corpus`].
///
/// # Errors
///
/// Returns [`TemasError::Io`] when the file cannot be read.
pub fn read_corpus<P: AsRef<Path>, G: Rng>(
    path: P,
    vocab: &Vocabulary,
    num_topics: usize,
    min_len: i64,
    max_len: i64,
    rng: &mut G,
) -> Result<Vec<Document>> {
    let path_str = path.as_ref().display().to_string();
    let file = File::open(&path).map_err(|e| io_error(&path_str, &e))?;
    load_corpus(BufReader::new(file), vocab, num_topics, min_len, max_len, rng)
}

/// Creates a model and applies every document's initial assignments.
///
/// # Errors
///
/// Returns [`TemasError::InvalidArgument`] for invalid model
/// parameters.
pub fn initialize_model(
    corpus: &[Document],
    vocab: &Vocabulary,
    num_topics: usize,
    alpha: f64,
    beta: f64,
) -> Result<Model> {
    let mut model = Model::new(num_topics, vocab.len(), alpha, beta)?;
    for d in corpus {
        d.apply_to_model(&mut model);
    }
    Ok(model)
}

/// Token-to-display-text mapping for reporting topics in another
/// language (e.g. translating opaque ids back to names).
#[derive(Debug, Clone, Default)]
pub struct Translation(HashMap<String, String>);

impl Translation {
    /// Loads a translation table.
    ///
    /// Each line is `<source-token> <translation…>`; the translation is
    /// everything after the first field. Lines with fewer than two
    /// fields and duplicate source tokens are hard errors.
    ///
    /// # Errors
    ///
    /// Returns [`TemasError::DuplicateToken`] on a duplicated source
    /// token and [`TemasError::Io`] on malformed lines or read
    /// failures.
    pub fn load<R: BufRead>(reader: R) -> Result<Self> {
        let mut map = HashMap::new();
        for line in reader.lines() {
            let line = line.map_err(|e| io_error("<translation>", &e))?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let source = fields.next().ok_or_else(|| TemasError::Io {
                path: "<translation>".to_string(),
                message: format!("line '{line}' has no fields"),
            })?;
            let translation = fields.collect::<Vec<_>>().join(" ");
            if translation.is_empty() {
                return Err(TemasError::Io {
                    path: "<translation>".to_string(),
                    message: format!("line '{line}' has less than 2 fields"),
                });
            }
            if map
                .insert(source.to_string(), translation)
                .is_some()
            {
                return Err(TemasError::DuplicateToken {
                    token: source.to_string(),
                });
            }
        }
        Ok(Self(map))
    }

    /// Loads a translation table from a file path.
    ///
    /// # Errors
    ///
    /// See [`Translation::load`]; file-open failures add
    /// [`TemasError::Io`].
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let file = File::open(&path).map_err(|e| io_error(&path_str, &e))?;
        Self::load(BufReader::new(file))
    }

    /// Translation of `token`, if any.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<&str> {
        self.0.get(token).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::test_fixtures::{testing_vocabulary, TESTING_K};

    #[test]
    fn test_load_corpus_drops_unknown_and_filters_lengths() {
        let v = testing_vocabulary();
        let text = "apple orange\nunknown\ncat tiger apple orange\n\ntiger\n";
        let mut rng = StdRng::seed_from_u64(5);

        let all = load_corpus(text.as_bytes(), &v, TESTING_K, 0, 0, &mut rng)
            .expect("corpus should load");
        // The blank line and the unknown-only line yield empty documents.
        assert_eq!(all.len(), 5);
        assert_eq!(all[1].len(), 0);

        let mut rng = StdRng::seed_from_u64(5);
        let bounded = load_corpus(text.as_bytes(), &v, TESTING_K, 1, 2, &mut rng)
            .expect("corpus should load");
        assert_eq!(bounded.len(), 2);
        assert!(bounded.iter().all(|d| d.len() >= 1 && d.len() <= 2));
    }

    #[test]
    fn test_initialize_model_applies_assignments() {
        let v = testing_vocabulary();
        let mut rng = StdRng::seed_from_u64(5);
        let corpus = load_corpus("apple orange\ncat tiger\n".as_bytes(), &v, TESTING_K, 1, -1, &mut rng)
            .expect("corpus should load");
        let m = initialize_model(&corpus, &v, TESTING_K, 0.1, 0.01).expect("valid arguments");
        assert_eq!(m.global_topic().total(), 4);
    }

    #[test]
    fn test_translation_load_and_lookup() {
        let t = Translation::load("a alpha beta\nb bravo\n\n".as_bytes())
            .expect("translation should load");
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("a"), Some("alpha beta"));
        assert_eq!(t.get("b"), Some("bravo"));
        assert_eq!(t.get("c"), None);
    }

    #[test]
    fn test_translation_duplicate_is_error() {
        let e = Translation::load("a alpha\na again\n".as_bytes());
        assert_eq!(
            e.err(),
            Some(TemasError::DuplicateToken {
                token: "a".to_string()
            })
        );
    }

    #[test]
    fn test_translation_short_line_is_error() {
        assert!(Translation::load("lonely\n".as_bytes()).is_err());
    }

    #[test]
    fn test_translate_vocabulary_keeps_ids_and_untranslated() {
        let mut v = testing_vocabulary();
        let t = Translation::load("apple pomme\n".as_bytes()).expect("translation should load");
        v.translate(&t);
        assert_eq!(v.token(3), "pomme");
        assert_eq!(v.token(0), "tiger");
        // Lookups keep answering for the original spellings.
        assert_eq!(v.id("apple"), Some(3));
    }
}
