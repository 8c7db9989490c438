//! Subcommand implementations.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use temas::prelude::*;

/// Flags of `temas train`.
pub struct TrainConfig {
    pub vocab: PathBuf,
    pub corpus: PathBuf,
    pub topics: usize,
    pub alpha: f64,
    pub beta: f64,
    pub gibbs_iter: usize,
    pub optim_start: usize,
    pub optim_iter: usize,
    pub shape: f64,
    pub scale: f64,
    pub eval_lag: usize,
    pub minlen: i64,
    pub maxlen: i64,
    pub model: Option<PathBuf>,
    pub cache: i64,
    pub seed: u64,
}

pub fn train(cfg: &TrainConfig) -> Result<()> {
    eprintln!("Loading vocabulary {} ...", cfg.vocab.display());
    let vocab = read_vocabulary(&cfg.vocab)?;
    eprintln!("Done: {} tokens.", vocab.len());

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    eprintln!("Loading corpus {} ...", cfg.corpus.display());
    let mut corpus = read_corpus(
        &cfg.corpus,
        &vocab,
        cfg.topics,
        cfg.minlen,
        cfg.maxlen,
        &mut rng,
    )?;
    if corpus.is_empty() {
        return Err(TemasError::Io {
            path: cfg.corpus.display().to_string(),
            message: "corpus contains no valid document".to_string(),
        });
    }
    eprintln!("Done: {} documents.", corpus.len());

    let mut model = initialize_model(&corpus, &vocab, cfg.topics, cfg.alpha, cfg.beta)?;
    let mut sampler = Sampler::new(&model);

    for iter in 0..cfg.gibbs_iter {
        let mut optimizer = Optimizer::new(cfg.topics);
        for doc in &mut corpus {
            sampler.sample(&mut model, doc, &mut rng);
            if iter > cfg.optim_start {
                optimizer.collect_document_statistics(doc);
            }
        }

        if iter > cfg.optim_start {
            optimizer.optimize_topic_priors(&mut model, cfg.shape, cfg.scale, cfg.optim_iter);
            sampler.after_optimization(&model);
        }

        if cfg.eval_lag > 0 && iter % cfg.eval_lag == 0 {
            let evaluator = Evaluator::new(&model, cfg.cache, Some(&sampler));
            match evaluator.corpus_perplexity(&corpus) {
                Some(pp) => eprintln!("Iteration {iter:04} perplexity {pp:.6}"),
                None => eprintln!("Iteration {iter:04} done"),
            }
        } else {
            eprintln!("Iteration {iter:04} done");
        }
    }

    if let Some(path) = &cfg.model {
        model.save(path)?;
        eprintln!("Saved model to {}.", path.display());
    }
    Ok(())
}

pub fn print_model(
    model: &Path,
    vocab: &Path,
    trans: Option<&Path>,
    percentage: f64,
) -> Result<()> {
    let model = Model::load(model)?;
    let vocab = load_display_vocabulary(vocab, trans)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    model.write_topics_top_n(&mut out, &vocab, percentage)
}

pub fn interpret(
    model: &Path,
    vocab_path: &Path,
    trans: Option<&Path>,
    cache: i64,
    burnin: usize,
    iters: usize,
    words: usize,
) -> Result<()> {
    if iters <= burnin {
        return Err(TemasError::InvalidArgument {
            param: "iters".to_string(),
            value: iters.to_string(),
            constraint: format!("must exceed burnin ({burnin})"),
        });
    }

    let model = Model::load(model)?;
    // Queries tokenize against the original spellings; the translated
    // copy is display-only.
    let query_vocab = read_vocabulary(vocab_path)?;
    let display_vocab = load_display_vocabulary(vocab_path, trans)?;
    let interpreter = Interpreter::new(&model, &query_vocab, cache);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| TemasError::Io {
            path: "<stdin>".to_string(),
            message: e.to_string(),
        })?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        match interpreter.interpret(&tokens, burnin, iters) {
            Ok(dist) => {
                for p in dist.iter().take(10) {
                    write_topic_line(&mut out, &model, &display_vocab, p, words)?;
                }
                writeln!(out).map_err(stdout_error)?;
            }
            Err(TemasError::EmptyDocument) => {
                writeln!(out, "(no token in vocabulary)").map_err(stdout_error)?;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn write_topic_line<W: Write>(
    out: &mut W,
    model: &Model,
    vocab: &Vocabulary,
    p: &TopicProb,
    words: usize,
) -> Result<()> {
    write!(out, "topic {} p={:.4}:", p.topic, p.prob).map_err(stdout_error)?;
    if let Some(h) = model.top_words(p.topic) {
        for (word, count) in h.iter().take(words) {
            write!(out, " {} ({count})", vocab.token(word)).map_err(stdout_error)?;
        }
    }
    writeln!(out).map_err(stdout_error)
}

fn load_display_vocabulary(vocab: &Path, trans: Option<&Path>) -> Result<Vocabulary> {
    let mut v = read_vocabulary(vocab)?;
    if let Some(path) = trans {
        let t = Translation::read(path)?;
        v.translate(&t);
    }
    Ok(v)
}

fn stdout_error(e: io::Error) -> TemasError {
    TemasError::Io {
        path: "<stdout>".to_string(),
        message: e.to_string(),
    }
}
