use std::{path::Path, time::Duration};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use postag::{Corpus, MarkovModel, MaxEntModel, MemmOptions, MmOptions, Trainer};

/// The sample corpus repeated until it is large enough to time.
fn corpus(fpath: &Path) -> Corpus {
    let sample = Corpus::open(fpath).expect("failed to read corpus");
    (0..200).flat_map(|_| sample.iter().cloned()).collect()
}

fn train_benchmark(c: &mut Criterion) {
    let corpus = corpus(Path::new("tests/data/sample.tsv"));
    c.bench_function("train mm", |b| {
        b.iter(|| {
            let mut model = MarkovModel::new();
            model.train(black_box(&corpus), &MmOptions::default()).expect("failed to train");
        })
    });
    let opts = MemmOptions {
        seed: Some(0),
        ..Default::default()
    };
    c.bench_function("train memm", |b| {
        b.iter(|| {
            let mut model = MaxEntModel::new();
            model.train(black_box(&corpus), &opts).expect("failed to train");
        })
    });
}

criterion_group! {
    name = benchmarks;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = train_benchmark
}

criterion_main!(benchmarks);
