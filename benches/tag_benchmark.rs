use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use postag::{Corpus, MarkovModel, MaxEntModel, MemmOptions, MmOptions, Tagger, Trainer};

fn tag_all<T: Tagger>(tagger: &T, sentences: &[Vec<String>]) -> usize {
    sentences.iter().map(|s| tagger.decode(s.as_slice()).len()).sum()
}

fn tag_benchmark(c: &mut Criterion) {
    let corpus = Corpus::open(Path::new("tests/data/sample.tsv")).expect("failed to read corpus");
    let sentences: Vec<Vec<String>> = corpus.iter().map(|s| s.tokens().to_vec()).collect();

    let mut mm = MarkovModel::new();
    mm.train(&corpus, &MmOptions::default()).expect("failed to train");
    c.bench_function("tag mm", |b| b.iter(|| tag_all(&mm, black_box(&sentences))));

    let mut memm = MaxEntModel::new();
    let opts = MemmOptions {
        min_feature_occurrences: 2,
        seed: Some(0),
        ..Default::default()
    };
    memm.train(&corpus, &opts).expect("failed to train");
    c.bench_function("tag memm", |b| b.iter(|| tag_all(&memm, black_box(&sentences))));
}

criterion_group!(benchmarks, tag_benchmark);
criterion_main!(benchmarks);
