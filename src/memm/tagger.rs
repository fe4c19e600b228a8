use std::borrow::Cow;

use crate::{dataset::fold_case, quark::StringTable, tagger::Tagger};

use super::{features::Features, model::MaxEntModel};

impl MaxEntModel {
    fn fold<'a, S: AsRef<str>>(&self, sentence: &'a [S]) -> Vec<Cow<'a, str>> {
        sentence
            .iter()
            .map(|s| fold_case(s.as_ref(), self.case_fold))
            .collect()
    }
}

impl Tagger for MaxEntModel {
    fn decode<S: AsRef<str>>(&self, sentence: &[S]) -> Vec<String> {
        let tokens = self.fold(sentence);
        (0..tokens.len())
            .map(|i| {
                let x = Features::extract(&self.features, tokens.as_slice(), i);
                self.weights_for(&tokens[i])
                    .best(&x)
                    .and_then(|tag| self.tags.to_str(tag))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    fn is_known(&self, token: &str) -> bool {
        let token = fold_case(token, self.case_fold);
        self.token_weights(&token).map_or(false, |w| !w.is_empty())
    }
}
