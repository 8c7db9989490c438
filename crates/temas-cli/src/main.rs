//! temas - Topic model operations CLI
//!
//! Usage:
//!   temas train --vocab vocab.txt --corpus corpus.txt --topics 10 \
//!       --model model.bin          # Train a model
//!   temas print-model --model model.bin --vocab vocab.txt
//!                                  # Show topics with their top words
//!   temas interpret --model model.bin --vocab vocab.txt
//!                                  # Infer topics for stdin queries

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

/// temas - SparseLDA training, inspection and interpretation.
#[derive(Parser)]
#[command(name = "temas")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a topic model with collapsed Gibbs sampling
    Train {
        /// Vocabulary file, one token per line
        #[arg(long)]
        vocab: PathBuf,

        /// Corpus file, one whitespace-tokenized document per line
        #[arg(long)]
        corpus: PathBuf,

        /// Number of topics to be learned
        #[arg(long, default_value_t = 10)]
        topics: usize,

        /// Starting topic prior
        #[arg(long, default_value_t = 0.01)]
        alpha: f64,

        /// Word prior
        #[arg(long, default_value_t = 0.01)]
        beta: f64,

        /// Gibbs sampling iterations
        #[arg(long, default_value_t = 100)]
        gibbs_iter: usize,

        /// Iteration after which hyperparameter optimization starts
        #[arg(long, default_value_t = 10)]
        optim_start: usize,

        /// Fixed-point iterations per optimization
        #[arg(long, default_value_t = 10)]
        optim_iter: usize,

        /// Gamma hyperprior shape
        #[arg(long, default_value_t = 0.0)]
        shape: f64,

        /// Gamma hyperprior scale
        #[arg(long, default_value_t = 1e7)]
        scale: f64,

        /// Evaluate corpus perplexity every this many iterations
        #[arg(long, default_value_t = 1)]
        eval_lag: usize,

        /// Minimum document length (non-positive: unbounded)
        #[arg(long, default_value_t = 1)]
        minlen: i64,

        /// Maximum document length (non-positive: unbounded)
        #[arg(long, default_value_t = -1)]
        maxlen: i64,

        /// Model output path (omit to skip saving)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Evaluator distribution cache budget in bytes (negative: all)
        #[arg(long, default_value_t = 0)]
        cache: i64,

        /// Training seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Print every topic of a model with its top words
    PrintModel {
        /// Model file written by `temas train`
        #[arg(long)]
        model: PathBuf,

        /// Vocabulary file the model was trained with
        #[arg(long)]
        vocab: PathBuf,

        /// Optional token translation file
        #[arg(long)]
        trans: Option<PathBuf>,

        /// Probability-mass fraction of each topic to print
        #[arg(long, default_value_t = 1.0)]
        len: f64,
    },

    /// Infer topic mixtures for queries read from stdin
    Interpret {
        /// Model file written by `temas train`
        #[arg(long)]
        model: PathBuf,

        /// Vocabulary file the model was trained with
        #[arg(long)]
        vocab: PathBuf,

        /// Optional token translation file
        #[arg(long)]
        trans: Option<PathBuf>,

        /// Distribution cache budget in bytes (negative: all)
        #[arg(long, default_value_t = -1)]
        cache: i64,

        /// Burn-in iterations
        #[arg(long, default_value_t = 50)]
        burnin: usize,

        /// Total Gibbs iterations (must exceed burn-in)
        #[arg(long, default_value_t = 100)]
        iters: usize,

        /// Top words to show per reported topic
        #[arg(long, default_value_t = 10)]
        words: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Train {
            vocab,
            corpus,
            topics,
            alpha,
            beta,
            gibbs_iter,
            optim_start,
            optim_iter,
            shape,
            scale,
            eval_lag,
            minlen,
            maxlen,
            model,
            cache,
            seed,
        } => commands::train(&commands::TrainConfig {
            vocab,
            corpus,
            topics,
            alpha,
            beta,
            gibbs_iter,
            optim_start,
            optim_iter,
            shape,
            scale,
            eval_lag,
            minlen,
            maxlen,
            model,
            cache,
            seed,
        }),
        Commands::PrintModel {
            model,
            vocab,
            trans,
            len,
        } => commands::print_model(&model, &vocab, trans.as_deref(), len),
        Commands::Interpret {
            model,
            vocab,
            trans,
            cache,
            burnin,
            iters,
            words,
        } => commands::interpret(&model, &vocab, trans.as_deref(), cache, burnin, iters, words),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
