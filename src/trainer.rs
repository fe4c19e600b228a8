use crate::{dataset::Corpus, errors::Result};

/// Fits a model to a labelled corpus, discarding any previous state.
pub trait Trainer {
    type Options;

    fn train(&mut self, corpus: &Corpus, options: &Self::Options) -> Result<()>;
}
