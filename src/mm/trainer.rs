use std::time::Instant;

use crate::{
    dataset::{fold_case, Corpus, Sentence},
    errors::Result,
    options::MmOptions,
    quark::{StringTable, TextVectorizer},
    trainer::Trainer,
};

use super::{
    counts::{TagId, TokenId},
    model::MarkovModel,
    shape::{suffix_of, Shape},
};

impl Trainer for MarkovModel {
    type Options = MmOptions;

    fn train(&mut self, corpus: &Corpus, options: &MmOptions) -> Result<()> {
        let begin = Instant::now();
        self.case_fold = options.case_fold;
        self.reset();
        for sentence in corpus {
            self.count_sentence(sentence);
        }
        if options.min_token_occurrences > 1 {
            self.prune(options.min_token_occurrences as u64);
        }
        log::info!(
            "trained markov model (rows: {}, tags: {}, tokens: {}, suffixes: {}, trigrams: {}, bigrams: {}, time cost: {:?})",
            corpus.total_rows(),
            self.tags.len(),
            self.tokens.len(),
            self.suffixes.len(),
            self.trigrams.len(),
            self.bigrams.len(),
            begin.elapsed()
        );
        Ok(())
    }
}

impl MarkovModel {
    fn count_sentence(&mut self, sentence: &Sentence) {
        let mut two_prev: Option<TagId> = None;
        let mut prev: Option<TagId> = None;
        let mut prev_token: Option<TokenId> = None;

        for (token, tag) in sentence.rows() {
            let token = fold_case(token, self.case_fold);
            let tag = self.tags.find_or_insert(tag);
            let id = self.vocab.find_or_insert(&token);

            self.tokens.increment(id, tag);
            if let Some(suffix) = suffix_of(&token) {
                self.suffixes.increment(suffix, tag);
            }
            let shape = Shape::of(&token);
            if shape.contains(Shape::NUMBER) {
                self.number.increment(tag);
            }
            if shape.contains(Shape::HYPHEN) {
                self.hyphen.increment(tag);
            }
            if shape.contains(Shape::CAPITALIZED) {
                self.capitalized.increment(tag);
            }

            if let Some(p) = prev {
                self.transitions.increment(p, tag);
                if let Some(pp) = two_prev {
                    self.trigrams.increment((pp, p), tag);
                }
                if let Some(pt) = prev_token {
                    self.bigrams.increment((pt, id), (p, tag));
                }
            }

            two_prev = prev;
            prev = Some(tag);
            prev_token = Some(id);
        }
    }

    /// Folds tokens seen fewer than `min` times into the unknown class and
    /// drops rare suffix, trigram and token-bigram rows.
    fn prune(&mut self, min: u64) {
        let rare = self.tokens.remove_where(|_, row| row.total() < min);
        for (_, row) in &rare {
            self.unknown.merge(row);
        }
        let suffixes = self.suffixes.remove_where(|_, row| row.total() < min).len();
        let bigrams = self.bigrams.remove_where(|_, row| row.total() < min).len();
        let trigrams = self.trigrams.remove_where(|_, row| row.total() < min).len();
        log::debug!(
            "pruned below {min}: {} tokens into unknown, {suffixes} suffixes, {bigrams} bigrams, {trigrams} trigrams",
            rare.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        let s = "The\tDT\ndog\tNN\nruns\tVBZ\n.\t.\n\nA\tDT\ncat\tNN\nsleeps\tVBZ\n.\t.\n";
        Corpus::from(s.lines())
    }

    fn train(min: usize, case_fold: bool) -> MarkovModel {
        let mut model = MarkovModel::new();
        let opts = MmOptions {
            min_token_occurrences: min,
            case_fold,
        };
        model.train(&corpus(), &opts).unwrap();
        model
    }

    #[test]
    fn counts_every_table() {
        let model = train(1, false);
        assert_eq!(model.num_known_tokens(), 7);
        assert_eq!(model.count(model.token_row(".").unwrap(), "."), 2);
        // "runs" and "sleeps" both land in "s"; nothing reaches "es"
        assert_eq!(model.count(model.suffix_row("s").unwrap(), "VBZ"), 2);
        assert!(model.suffix_row("es").is_none());
        assert_eq!(model.number_row().total(), 2);
        assert_eq!(model.capitalized_row().total(), 2);
        assert_eq!(model.hyphen_row().total(), 0);
        assert_eq!(model.count(model.transition_row("DT").unwrap(), "NN"), 2);
        assert!(model.transition_row(".").is_none());
        assert_eq!(model.count(model.trigram_row("DT", "NN").unwrap(), "VBZ"), 2);
        assert!(model.bigram_row("The", "dog").is_some());
        // sentence boundaries break the history
        assert!(model.bigram_row(".", "A").is_none());
        assert!(model.trigram_row("VBZ", ".").is_none());
        assert!(model.unknown_row().is_empty());
        assert!(model.totals_consistent());
    }

    #[test]
    fn prune_merges_rare_tokens() {
        let model = train(2, false);
        assert_eq!(model.num_known_tokens(), 1);
        assert!(model.token_row("dog").is_none());
        let unknown = model.unknown_row();
        assert_eq!(unknown.total(), 6);
        assert_eq!(model.count(unknown, "DT"), 2);
        assert_eq!(model.count(unknown, "NN"), 2);
        assert_eq!(model.count(unknown, "VBZ"), 2);
        // every token bigram was seen once
        assert!(model.bigram_row("The", "dog").is_none());
        assert!(model.trigram_row("DT", "NN").is_some());
        assert!(model.totals_consistent());
    }

    #[test]
    fn case_fold_lowercases_tokens() {
        let model = train(1, true);
        assert!(model.token_row("the").is_some());
        assert!(model.token_row("The").is_none());
        assert!(model.capitalized_row().is_empty());
        assert!(model.case_fold());
    }

    #[test]
    fn retrain_resets() {
        let mut model = train(1, false);
        let small = Corpus::from("x\tNN".lines());
        model.train(&small, &MmOptions::default()).unwrap();
        assert!(model.token_row("dog").is_none());
        assert_eq!(model.unknown_row().total(), 1);
        assert!(model.transition_row("DT").is_none());
    }
}
