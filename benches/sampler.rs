//! Benchmarks for the SparseLDA sampler and evaluator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use temas::prelude::*;

fn synthetic_setup(
    vocab_size: usize,
    num_docs: usize,
    doc_len: usize,
    num_topics: usize,
) -> (Vocabulary, Model, Vec<Document>) {
    let tokens: Vec<String> = (0..vocab_size).map(|i| format!("tok{i:04}")).collect();
    let vocab = Vocabulary::from_tokens(tokens);

    let mut rng = StdRng::seed_from_u64(42);
    let corpus: Vec<Document> = (0..num_docs)
        .map(|_| {
            let words: Vec<String> = (0..doc_len)
                .map(|_| format!("tok{:04}", rng.gen_range(0..vocab_size)))
                .collect();
            Document::initialize(&words, &vocab, num_topics, &mut rng)
        })
        .collect();

    let model =
        initialize_model(&corpus, &vocab, num_topics, 0.1, 0.01).expect("valid parameters");
    (vocab, model, corpus)
}

fn bench_sample_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_pass");

    for &num_topics in &[10, 50, 200] {
        let (_, model, corpus) = synthetic_setup(500, 50, 40, num_topics);

        group.bench_with_input(
            BenchmarkId::from_parameter(num_topics),
            &num_topics,
            |b, _| {
                b.iter_batched(
                    || (model.clone(), corpus.clone(), StdRng::seed_from_u64(7)),
                    |(mut model, mut corpus, mut rng)| {
                        let mut sampler = Sampler::new(&model);
                        for doc in &mut corpus {
                            sampler.sample(black_box(&mut model), doc, &mut rng);
                        }
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_perplexity(c: &mut Criterion) {
    let mut group = c.benchmark_group("perplexity");

    for &cache_bytes in &[0_i64, -1] {
        let (_, model, corpus) = synthetic_setup(500, 50, 40, 50);
        let evaluator = Evaluator::new(&model, cache_bytes, None);

        group.bench_with_input(
            BenchmarkId::from_parameter(cache_bytes),
            &cache_bytes,
            |b, _| {
                b.iter(|| {
                    let mut logl = 0.0;
                    for doc in &corpus {
                        logl += evaluator.perplexity(black_box(doc)).0;
                    }
                    logl
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sample_pass, bench_perplexity);
criterion_main!(benches);
