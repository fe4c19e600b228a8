use std::io::{BufRead, Write};

use crate::{
    errors::Result,
    mm::{TagId, TokenId},
    model::{parse_int, Model},
    quark::{Quark, StringTable, TextVectorizer},
};

use super::{
    features::WINDOW,
    perceptron::{TagWeights, Weights},
};

/// Per-token perceptron classifiers over window features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxEntModel {
    pub(super) case_fold: bool,
    pub(super) tags: Quark,
    /// Tokens with their own classifiers; `known` is parallel to it.
    pub(super) tokens: Quark,
    /// Tokens usable as window features.
    pub(super) features: Quark,
    pub(super) known: Vec<TagWeights>,
    pub(super) unknown: TagWeights,
}

impl Default for MaxEntModel {
    fn default() -> Self {
        Self::with_case_fold(true)
    }
}

impl MaxEntModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case_fold(case_fold: bool) -> Self {
        Self {
            case_fold,
            tags: Quark::default(),
            tokens: Quark::default(),
            features: Quark::default(),
            known: Vec::new(),
            unknown: TagWeights::default(),
        }
    }

    pub fn case_fold(&self) -> bool {
        self.case_fold
    }

    pub fn set_case_fold(&mut self, case_fold: bool) {
        self.case_fold = case_fold;
    }

    pub fn reset(&mut self) {
        *self = Self::with_case_fold(self.case_fold);
    }

    pub fn tag_id(&self, tag: &str) -> Option<TagId> {
        self.tags.to_id(tag)
    }

    pub fn tag_name(&self, id: TagId) -> Option<&str> {
        self.tags.to_str(id)
    }

    pub fn token_dictionary(&self) -> &Quark {
        &self.tokens
    }

    pub fn feature_dictionary(&self) -> &Quark {
        &self.features
    }

    /// Length of a window feature vector.
    pub fn dim(&self) -> usize {
        WINDOW.len() * self.features.len()
    }

    pub fn token_weights(&self, token: &str) -> Option<&TagWeights> {
        self.known.get(self.tokens.to_id(token)?)
    }

    pub fn unknown_weights(&self) -> &TagWeights {
        &self.unknown
    }

    /// Classifiers used for `token`: its own when it has any, otherwise the
    /// shared unknown set. `token` must already be case folded.
    pub(super) fn weights_for(&self, token: &str) -> &TagWeights {
        self.token_weights(token)
            .filter(|w| !w.is_empty())
            .unwrap_or(&self.unknown)
    }

    fn known_mut(&mut self, id: TokenId) -> &mut TagWeights {
        if self.known.len() <= id {
            self.known.resize_with(id + 1, TagWeights::default);
        }
        &mut self.known[id]
    }

    fn write_weights<W: Write>(&self, w: &mut W, weights: &TagWeights) -> std::io::Result<()> {
        for (tag, ws) in weights.iter() {
            writeln!(w, "TAG:\t{}", self.tags.to_str(tag).unwrap_or_default())?;
            write!(w, "BEST:\t")?;
            for (i, x) in ws.vector.iter().enumerate() {
                if i > 0 {
                    write!(w, " ")?;
                }
                write!(w, "{x}")?;
            }
            writeln!(w)?;
            writeln!(w, "BIAS:\t{}", ws.bias)?;
        }
        Ok(())
    }
}

fn write_list<'a, W: Write, I: Iterator<Item = &'a str>>(w: &mut W, items: I) -> std::io::Result<()> {
    for (i, s) in items.enumerate() {
        if i > 0 {
            write!(w, " ")?;
        }
        write!(w, "{s}")?;
    }
    writeln!(w)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Tokens,
    Features,
    Token(TokenId),
    Unknown,
}

impl MaxEntModel {
    fn weights_mut(&mut self, section: Section) -> Option<&mut TagWeights> {
        match section {
            Section::Token(id) => Some(self.known_mut(id)),
            Section::Unknown => Some(&mut self.unknown),
            _ => None,
        }
    }

    /// Handles one non-blank line; returns the section in effect afterwards.
    fn read_line(&mut self, section: Section, line: &str, lineno: usize) -> Result<Section> {
        if line.starts_with("TOKENS:\t") {
            return Ok(Section::Tokens);
        }
        if line.starts_with("FEATURES:\t") {
            return Ok(Section::Features);
        }
        if line.starts_with("UNKNOWN:\t") {
            self.unknown = TagWeights::default();
            return Ok(Section::Unknown);
        }
        if let Some(key) = line.strip_prefix("TOKEN:\t") {
            let id = self.tokens.find_or_insert(key.trim());
            *self.known_mut(id) = TagWeights::default();
            return Ok(Section::Token(id));
        }
        if let Some(key) = line.strip_prefix("TAG:\t") {
            let tag = self.tags.find_or_insert(key.trim());
            match self.weights_mut(section) {
                Some(weights) => weights.push(tag, Weights::default()),
                None => log::trace!("line {lineno}: tag outside of a token block"),
            }
            return Ok(section);
        }
        if let Some(values) = line.strip_prefix("BEST:\t") {
            let vector = values
                .split_whitespace()
                .map(|x| parse_int(x, lineno))
                .collect::<Result<Vec<i64>>>()?;
            match self.weights_mut(section).and_then(|w| w.last_mut()) {
                Some(weights) => weights.vector = vector,
                None => log::trace!("line {lineno}: weights without a tag"),
            }
            return Ok(section);
        }
        if let Some(value) = line.strip_prefix("BIAS:\t") {
            let bias = parse_int(value, lineno)?;
            match self.weights_mut(section).and_then(|w| w.last_mut()) {
                Some(weights) => weights.bias = bias,
                None => log::trace!("line {lineno}: bias without a tag"),
            }
            return Ok(section);
        }
        match section {
            Section::Tokens => {
                for token in line.split_whitespace() {
                    self.tokens.find_or_insert(token);
                }
            }
            Section::Features => {
                for token in line.split_whitespace() {
                    self.features.find_or_insert(token);
                }
            }
            _ => log::trace!("line {lineno}: ignored {line:?}"),
        }
        Ok(section)
    }
}

impl Model for MaxEntModel {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "TOKENS:\tTOKENS")?;
        write_list(w, self.tokens.iter())?;
        writeln!(w, "\n")?;
        writeln!(w, "FEATURES:\tFEATURES")?;
        write_list(w, self.features.iter())?;
        writeln!(w, "\n")?;
        for (token, weights) in self.tokens.iter().zip(&self.known) {
            if weights.is_empty() {
                continue;
            }
            writeln!(w, "TOKEN:\t{token}")?;
            self.write_weights(w, weights)?;
            writeln!(w)?;
        }
        writeln!(w, "\n")?;
        writeln!(w, "UNKNOWN:\tUNKNOWN")?;
        self.write_weights(w, &self.unknown)?;
        Ok(())
    }

    fn read<R: BufRead>(r: R) -> Result<Self> {
        let mut model = Self::default();
        let mut section = Section::None;
        for (i, line) in r.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            section = model.read_line(section, line, i + 1)?;
        }
        let n = model.tokens.len();
        model.known.resize_with(n, TagWeights::default);
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "TOKENS:\tTOKENS\nthe can\n\n\n\
FEATURES:\tFEATURES\ncan\n\n\n\
TOKEN:\tcan\nTAG:\tMD\nBEST:\t0 0 1 0 -1\nBIAS:\t-1\nTAG:\tNN\nBEST:\t0 0 -1 0 1\nBIAS:\t2\n\n\n\n\
UNKNOWN:\tUNKNOWN\nTAG:\tNN\nBEST:\t0 0 0 0 0\nBIAS:\t-1\n";

    #[test]
    fn read_blocks() {
        let model = MaxEntModel::read(MODEL.as_bytes()).unwrap();
        assert_eq!(model.token_dictionary().iter().collect::<Vec<_>>(), vec!["the", "can"]);
        assert_eq!(model.feature_dictionary().len(), 1);
        assert_eq!(model.dim(), 5);
        let can = model.token_weights("can").unwrap();
        let md = model.tag_id("MD").unwrap();
        let nn = model.tag_id("NN").unwrap();
        assert_eq!(can.get(md).unwrap().vector, vec![0, 0, 1, 0, -1]);
        assert_eq!(can.get(nn).unwrap().bias, 2);
        // "the" has no block, so it uses the shared classifiers
        assert!(model.token_weights("the").unwrap().is_empty());
        assert_eq!(model.weights_for("the"), model.unknown_weights());
        assert_eq!(model.unknown_weights().len(), 1);
    }

    #[test]
    fn write_is_stable() {
        let model = MaxEntModel::read(MODEL.as_bytes()).unwrap();
        let mut first = Vec::new();
        model.write(&mut first).unwrap();
        let reloaded = MaxEntModel::read(first.as_slice()).unwrap();
        assert_eq!(reloaded, model);
        let mut second = Vec::new();
        reloaded.write(&mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_model() {
        let mut out = Vec::new();
        MaxEntModel::new().write(&mut out).unwrap();
        let model = MaxEntModel::read(out.as_slice()).unwrap();
        assert!(model.token_dictionary().is_empty());
        assert!(model.unknown_weights().is_empty());
    }

    #[test]
    fn rejects_bad_weight() {
        let text = "TOKENS:\tTOKENS\ncan\nTOKEN:\tcan\nTAG:\tMD\nBEST:\t1 x 0\n";
        match MaxEntModel::read(text.as_bytes()) {
            Err(crate::Error::InvalidModel { line, .. }) => assert_eq!(line, 5),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn ignores_stray_lines() {
        let text = "junk\nBIAS:\t3\nUNKNOWN:\tUNKNOWN\nTAG:\tNN\nBIAS:\t-2\n";
        let model = MaxEntModel::read(text.as_bytes()).unwrap();
        let nn = model.tag_id("NN").unwrap();
        assert_eq!(model.unknown_weights().get(nn).unwrap().bias, -2);
        assert!(model.unknown_weights().get(nn).unwrap().vector.is_empty());
    }
}
