use std::path::PathBuf;

use postag::{Corpus, Error, MarkovModel, MaxEntModel, MemmOptions, MmOptions, Model, Tagger, Trainer};

fn corpus() -> Corpus {
    Corpus::open("tests/data/sample.tsv").unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("postag-{}-{name}", std::process::id()))
}

fn dump<M: Model>(model: &M) -> String {
    let mut buf = Vec::new();
    model.write(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

const SENTENCES: &[&[&str]] = &[
    &["The", "dog", "runs", "."],
    &["You", "can", "swim", "."],
    &["A", "zebra", "is", "well-known", "."],
];

#[test]
fn test_markov_model_save_load() {
    let mut model = MarkovModel::new();
    model.train(&corpus(), &MmOptions::default()).unwrap();
    let path = temp_path("mm.model");
    model.save(&path).unwrap();
    let loaded = MarkovModel::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(dump(&model), dump(&loaded));
    for sentence in SENTENCES {
        assert_eq!(model.decode(*sentence), loaded.decode(*sentence));
    }
}

#[test]
fn test_maxent_model_save_load() {
    let mut model = MaxEntModel::new();
    let opts = MemmOptions {
        min_feature_occurrences: 2,
        seed: Some(5),
        ..Default::default()
    };
    model.train(&corpus(), &opts).unwrap();
    let path = temp_path("memm.model");
    model.save(&path).unwrap();
    let loaded = MaxEntModel::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(dump(&model), dump(&loaded));
    for sentence in SENTENCES {
        assert_eq!(model.decode(*sentence), loaded.decode(*sentence));
    }
}

#[test]
fn test_open_not_existing_model_does_not_panic() {
    match MarkovModel::load("tests/does-not-exist.model") {
        Err(Error::Io(..)) => {}
        other => panic!("unexpected: {other:?}"),
    }
    assert!(MaxEntModel::load("tests/does-not-exist.model").is_err());
}

#[test]
fn test_read_empty_model() {
    let model = MarkovModel::read("".as_bytes()).unwrap();
    assert_eq!(model.decode(&["a", "b"]), ["", ""]);
    let model = MaxEntModel::read("".as_bytes()).unwrap();
    assert_eq!(model.decode(&["a"]), [""]);
}
