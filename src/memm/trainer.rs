use std::{borrow::Cow, time::Instant};

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    dataset::{fold_case, Corpus},
    errors::Result,
    options::MemmOptions,
    quark::{Quark, StringTable, TextVectorizer},
    trainer::Trainer,
};

use super::{
    features::Features,
    model::MaxEntModel,
    perceptron::{Example, TagWeights},
};

impl Trainer for MaxEntModel {
    type Options = MemmOptions;

    fn train(&mut self, corpus: &Corpus, options: &MemmOptions) -> Result<()> {
        let begin = Instant::now();
        self.case_fold = options.case_fold;
        self.reset();

        let folded: Vec<Vec<Cow<'_, str>>> = corpus
            .iter()
            .map(|s| s.tokens().iter().map(|t| fold_case(t, self.case_fold)).collect())
            .collect();
        let all = || folded.iter().flatten().map(|t| &**t);
        self.tokens = Quark::with_min_freq(all(), options.min_token_occurrences);
        self.features = Quark::with_min_freq(all(), options.min_feature_occurrences);
        let dim = self.dim();

        self.known = vec![TagWeights::default(); self.tokens.len()];
        let mut known_examples: Vec<Vec<Example>> = vec![Vec::new(); self.tokens.len()];
        let mut unknown_examples = Vec::new();
        for (sentence, tokens) in corpus.iter().zip(&folded) {
            for (i, tag) in sentence.tags().iter().enumerate() {
                let tag = self.tags.find_or_insert(tag);
                let example = Example {
                    tag,
                    features: Features::extract(&self.features, tokens.as_slice(), i),
                };
                match self.tokens.to_id(&tokens[i]) {
                    Some(id) => {
                        self.known[id].entry(tag, dim);
                        known_examples[id].push(example);
                    }
                    None => {
                        self.unknown.entry(tag, dim);
                        unknown_examples.push(example);
                    }
                }
            }
        }

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut converged = 0;
        for (id, (weights, examples)) in self.known.iter_mut().zip(&mut known_examples).enumerate() {
            let c = weights.train(examples, options.max_epochs, &mut rng);
            if c.converged {
                converged += 1;
            }
            log::debug!(
                "token {:?}: {} epochs, {} updates, converged: {}",
                self.tokens.to_str(id).unwrap_or_default(),
                c.epochs,
                c.updates,
                c.converged
            );
        }
        let c = self.unknown.train(&mut unknown_examples, options.max_epochs, &mut rng);
        log::debug!(
            "unknown tokens: {} examples, {} epochs, {} updates, converged: {}",
            unknown_examples.len(),
            c.epochs,
            c.updates,
            c.converged
        );

        log::info!(
            "trained perceptron model (rows: {}, tags: {}, tokens: {}, features: {}, converged: {}/{}, time cost: {:?})",
            corpus.total_rows(),
            self.tags.len(),
            self.tokens.len(),
            self.features.len(),
            converged,
            self.known.len(),
            begin.elapsed()
        );
        Ok(())
    }
}
