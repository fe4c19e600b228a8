use std::borrow::Cow;

use crate::{dataset::fold_case, quark::StringTable, tagger::Tagger};

use super::{
    counts::{TagCounts, TagId, TagPairCounts, TokenId},
    model::MarkovModel,
    shape::{Shape, SUFFIXES},
};

/// A sentence prepared for decoding: folded surfaces and vocabulary ids.
struct Observation<'a> {
    tokens: Vec<Cow<'a, str>>,
    ids: Vec<Option<TokenId>>,
}

impl Observation<'_> {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn id(&self, i: usize) -> Option<TokenId> {
        self.ids.get(i).copied().flatten()
    }
}

/// Probability of `tag` under `row`; a missing context counts as zero.
fn factor(row: Option<&TagCounts>, tag: TagId) -> f64 {
    row.map_or(0.0, |r| r.probability(tag))
}

/// Share of the tag bigrams under `row` whose first tag is `tag`.
fn first_tag_share(row: &TagPairCounts, tag: TagId) -> f64 {
    let matched: u64 = row
        .iter()
        .filter(|((first, _), _)| *first == tag)
        .map(|(_, n)| n)
        .sum();
    if matched == 0 || row.total() == 0 {
        return 0.0;
    }
    matched as f64 / row.total() as f64
}

impl MarkovModel {
    fn observe<'a, S: AsRef<str>>(&self, sentence: &'a [S]) -> Observation<'a> {
        let tokens: Vec<Cow<'a, str>> = sentence
            .iter()
            .map(|s| fold_case(s.as_ref(), self.case_fold))
            .collect();
        let ids = tokens.iter().map(|t| self.vocab.to_id(t)).collect();
        Observation { tokens, ids }
    }

    /// First suffix class, in priority order, that `token` ends with and
    /// that survived pruning.
    fn suffix_source(&self, token: &str) -> Option<&TagCounts> {
        SUFFIXES
            .iter()
            .filter(|s| token.ends_with(*s))
            .find_map(|s| self.suffixes.get(s))
    }

    /// Likelihood of every candidate tag at position `i`, given the two
    /// preceding tags. Candidates come in the order of the source table.
    fn likelihoods(
        &self,
        obs: &Observation<'_>,
        i: usize,
        prev_tag: Option<TagId>,
        two_prev_tag: Option<TagId>,
    ) -> Vec<(TagId, f64)> {
        let token: &str = &obs.tokens[i];
        let id = obs.id(i);

        let known = id.and_then(|id| self.tokens.get(&id));
        let (source, shape) = match known {
            Some(row) => (row, Shape::empty()),
            None => (
                self.suffix_source(token).unwrap_or(&self.unknown),
                Shape::of(token),
            ),
        };
        let total = source.total();
        if total == 0 {
            return Vec::new();
        }

        // `Some(None)`: a previous tag whose context was pruned or never seen
        let transition: Option<Option<&TagCounts>> = prev_tag.map(|p| {
            two_prev_tag
                .and_then(|pp| self.trigrams.get(&(pp, p)))
                .or_else(|| self.transitions.get(&p))
        });
        let prev_bigram = match (i.checked_sub(1).and_then(|j| obs.id(j)), id, prev_tag) {
            (Some(a), Some(b), Some(p)) => self.bigrams.get(&(a, b)).map(|row| (row, p)),
            _ => None,
        };
        let next_bigram = match (id, obs.id(i + 1)) {
            (Some(a), Some(b)) => self.bigrams.get(&(a, b)),
            _ => None,
        };

        let mut out = Vec::with_capacity(source.len());
        for (tag, count) in source.iter() {
            let mut p = count as f64 / total as f64;
            if let Some(row) = transition {
                p *= factor(row, tag);
            }
            if shape.contains(Shape::NUMBER) {
                p *= self.number.probability(tag);
            }
            if shape.contains(Shape::HYPHEN) {
                p *= self.hyphen.probability(tag);
            }
            if shape.contains(Shape::CAPITALIZED) {
                p *= self.capitalized.probability(tag);
            }
            if let Some((row, p_tag)) = prev_bigram {
                p *= row.probability((p_tag, tag));
            }
            if let Some(row) = next_bigram {
                p *= first_tag_share(row, tag);
            }
            if p > 0.0 {
                out.push((tag, p));
            }
        }

        if out.is_empty() {
            // keep every candidate, scored by the plain bigram transition
            for (tag, count) in source.iter() {
                let mut p = count as f64 / total as f64;
                if let Some(prev) = prev_tag {
                    p *= factor(self.transitions.get(&prev), tag);
                }
                out.push((tag, p));
            }
        }
        out
    }

    /// Chooses the tag of position `i` by scoring every path of up to three
    /// tags starting there. Later paths win ties.
    fn commit(
        &self,
        obs: &Observation<'_>,
        i: usize,
        prev: Option<TagId>,
        two_prev: Option<TagId>,
    ) -> Option<TagId> {
        let n = obs.len();
        let mut best = None;
        let mut highest = 0.0;
        for (tag, p) in self.likelihoods(obs, i, prev, two_prev) {
            if i + 1 >= n {
                if p >= highest {
                    highest = p;
                    best = Some(tag);
                }
                continue;
            }
            for (next_tag, next_p) in self.likelihoods(obs, i + 1, Some(tag), prev) {
                if i + 2 >= n {
                    let score = next_p * p;
                    if score >= highest {
                        highest = score;
                        best = Some(tag);
                    }
                    continue;
                }
                for (_, third_p) in self.likelihoods(obs, i + 2, Some(next_tag), Some(tag)) {
                    let score = third_p * next_p * p;
                    if score >= highest {
                        highest = score;
                        best = Some(tag);
                    }
                }
            }
        }
        best
    }
}

impl Tagger for MarkovModel {
    fn decode<S: AsRef<str>>(&self, sentence: &[S]) -> Vec<String> {
        let obs = self.observe(sentence);
        let mut committed: Vec<Option<TagId>> = Vec::with_capacity(obs.len());
        for i in 0..obs.len() {
            let prev = committed.last().copied().flatten();
            let two_prev = committed.iter().rev().nth(1).copied().flatten();
            let tag = self.commit(&obs, i, prev, two_prev);
            committed.push(tag);
        }
        committed
            .into_iter()
            .map(|tag| {
                tag.and_then(|id| self.tags.to_str(id))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    fn is_known(&self, token: &str) -> bool {
        let token = fold_case(token, self.case_fold);
        self.vocab
            .to_id(&token)
            .map_or(false, |id| self.tokens.contains(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dataset::Corpus, options::MmOptions, trainer::Trainer};

    fn trained(text: &str, min: usize) -> MarkovModel {
        let mut model = MarkovModel::new();
        let opts = MmOptions {
            min_token_occurrences: min,
            case_fold: false,
        };
        model.train(&Corpus::from(text.lines()), &opts).unwrap();
        model
    }

    fn tags(model: &MarkovModel, sentence: &[&str]) -> Vec<String> {
        model.decode(sentence)
    }

    const TWO: &str = "The\tDT\ndog\tNN\nruns\tVBZ\n.\t.\n\nA\tDT\ncat\tNN\nsleeps\tVBZ\n.\t.\n";

    #[test]
    fn known_tokens() {
        let model = trained(TWO, 1);
        assert_eq!(tags(&model, &["A", "dog", "runs", "."]), ["DT", "NN", "VBZ", "."]);
        assert_eq!(tags(&model, &["The", "cat"]), ["DT", "NN"]);
    }

    #[test]
    fn likelihood_uses_trigram_context() {
        let model = trained(TWO, 1);
        let obs = model.observe(&["runs"]);
        let dt = model.tag_id("DT").unwrap();
        let nn = model.tag_id("NN").unwrap();
        let vbz = model.tag_id("VBZ").unwrap();
        assert_eq!(model.likelihoods(&obs, 0, Some(nn), Some(dt)), vec![(vbz, 1.0)]);
        // VBZ never follows DT: zeroed, then recovered by the fallback
        assert_eq!(model.likelihoods(&obs, 0, Some(dt), None), vec![(vbz, 0.0)]);
    }

    #[test]
    fn ambiguous_token_follows_context() {
        let text = "I\tPRP\ncan\tMD\nrun\tVB\n\nthe\tDT\ncan\tNN\nleaks\tVBZ\n\nyou\tPRP\ncan\tMD\nswim\tVB\n";
        let model = trained(text, 1);
        assert_eq!(tags(&model, &["the", "can"]), ["DT", "NN"]);
        assert_eq!(tags(&model, &["you", "can"]), ["PRP", "MD"]);
    }

    #[test]
    fn unknown_token_backs_off_to_suffix() {
        let text = "dogs\tNNS\nbark\tVBP\n\ncats\tNNS\nmeow\tVBP\n\ndogs\tNNS\nrun\tVBP\n";
        let model = trained(text, 2);
        // "birds" is unseen; the "s" class only knows NNS
        assert_eq!(tags(&model, &["birds"]), ["NNS"]);
        assert!(!model.is_known("birds"));
        assert!(model.is_known("dogs"));
    }

    #[test]
    fn unknown_token_backs_off_to_shape() {
        let text = "Bob\tNNP\nsat\tVBD\n\nrug\tNN\nsat\tVBD\n\nAnn\tNNP\nsat\tVBD\n\nmat\tNN\nsat\tVBD\n";
        let model = trained(text, 2);
        // only NNP was ever capitalized, so NN is zeroed
        assert_eq!(tags(&model, &["Zed", "sat"]), ["NNP", "VBD"]);
        assert_eq!(tags(&model, &["zed", "sat"]), ["NN", "VBD"]);

        let text = "3\tCD\nsat\tVBD\n\ndog-like\tJJ\nsat\tVBD\n\n5\tCD\nsat\tVBD\n\ncat-like\tJJ\nsat\tVBD\n";
        let model = trained(text, 2);
        assert_eq!(tags(&model, &["42", "sat"]), ["CD", "VBD"]);
        assert_eq!(tags(&model, &["red-hot", "sat"]), ["JJ", "VBD"]);
    }

    #[test]
    fn later_tag_wins_ties() {
        let model = trained("x\tA\n\nx\tB\n", 1);
        assert_eq!(tags(&model, &["x"]), ["B"]);

        // both paths through "y" score 0.125
        let model = trained("x\tA\ny\tC\n\nx\tB\ny\tC\n", 1);
        assert_eq!(tags(&model, &["x", "y"]), ["B", "C"]);
    }

    #[test]
    fn unknown_token_without_statistics() {
        // with no pruning the unknown class stays empty
        let model = trained(TWO, 1);
        assert_eq!(tags(&model, &["zebra"]), [""]);
        assert_eq!(tags(&model, &["The", "zebra", "runs"]).len(), 3);
    }

    #[test]
    fn empty_sentence() {
        let model = trained(TWO, 1);
        assert!(tags(&model, &[]).is_empty());
    }

    #[test]
    fn untrained_model_keeps_length() {
        let model = MarkovModel::new();
        assert_eq!(tags(&model, &["a", "b", "c", "d"]), ["", "", "", ""]);
    }

    #[test]
    fn first_tag_share_sums_matches() {
        let mut row = TagPairCounts::default();
        row.add((0, 1), 2);
        row.add((0, 2), 1);
        row.add((3, 1), 1);
        assert!((first_tag_share(&row, 0) - 0.75).abs() < 1e-12);
        assert_eq!(first_tag_share(&row, 1), 0.0);
    }
}
