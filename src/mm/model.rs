use std::io::{BufRead, Write};

use crate::{
    errors::Result,
    model::{parse_int, Model},
    quark::{Quark, StringTable, TextVectorizer},
};

use super::{
    counts::{CountTable, Counts, TagCounts, TagId, TagPair, TagPairCounts, TokenId},
    shape::known_suffix,
};

/// Smoothed visible Markov model: lexical, morphological and tag-context
/// counts with back-off for unseen tokens.
#[derive(Debug, Clone, Default)]
pub struct MarkovModel {
    pub(super) case_fold: bool,
    pub(super) tags: Quark,
    /// Every token seen in training, pruned or not. Ids key the token and
    /// token-bigram tables.
    pub(super) vocab: Quark,
    pub(super) tokens: CountTable<TokenId, TagId>,
    pub(super) suffixes: CountTable<&'static str, TagId>,
    pub(super) number: TagCounts,
    pub(super) hyphen: TagCounts,
    pub(super) capitalized: TagCounts,
    pub(super) unknown: TagCounts,
    pub(super) transitions: CountTable<TagId, TagId>,
    pub(super) trigrams: CountTable<TagPair, TagId>,
    pub(super) bigrams: CountTable<(TokenId, TokenId), TagPair>,
}

impl MarkovModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case_fold(case_fold: bool) -> Self {
        Self {
            case_fold,
            ..Self::default()
        }
    }

    pub fn case_fold(&self) -> bool {
        self.case_fold
    }

    pub fn set_case_fold(&mut self, case_fold: bool) {
        self.case_fold = case_fold;
    }

    /// Clears every table, keeping the case folding setting.
    pub fn reset(&mut self) {
        *self = Self::with_case_fold(self.case_fold);
    }

    pub fn tag_id(&self, tag: &str) -> Option<TagId> {
        self.tags.to_id(tag)
    }

    pub fn tag_name(&self, id: TagId) -> Option<&str> {
        self.tags.to_str(id)
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    /// Number of tokens with their own count row.
    pub fn num_known_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// Tokens with their own count row, in insertion order.
    pub fn known_tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|(&id, _)| self.token(id))
    }

    pub fn token_row(&self, token: &str) -> Option<&TagCounts> {
        self.tokens.get(&self.vocab.to_id(token)?)
    }

    pub fn suffix_row(&self, suffix: &str) -> Option<&TagCounts> {
        self.suffixes.get(&known_suffix(suffix)?)
    }

    pub fn number_row(&self) -> &TagCounts {
        &self.number
    }

    pub fn hyphen_row(&self) -> &TagCounts {
        &self.hyphen
    }

    pub fn capitalized_row(&self) -> &TagCounts {
        &self.capitalized
    }

    pub fn unknown_row(&self) -> &TagCounts {
        &self.unknown
    }

    pub fn transition_row(&self, prev_tag: &str) -> Option<&TagCounts> {
        self.transitions.get(&self.tag_id(prev_tag)?)
    }

    pub fn trigram_row(&self, two_prev_tag: &str, prev_tag: &str) -> Option<&TagCounts> {
        self.trigrams
            .get(&(self.tag_id(two_prev_tag)?, self.tag_id(prev_tag)?))
    }

    pub fn bigram_row(&self, prev_token: &str, token: &str) -> Option<&TagPairCounts> {
        self.bigrams
            .get(&(self.vocab.to_id(prev_token)?, self.vocab.to_id(token)?))
    }

    /// Count of `tag` in `row`, zero when absent.
    pub fn count(&self, row: &TagCounts, tag: &str) -> u64 {
        self.tag_id(tag).and_then(|id| row.get(id)).unwrap_or(0)
    }

    /// Whether every table's total equals the sum of its entries.
    pub fn totals_consistent(&self) -> bool {
        self.tokens.is_consistent()
            && self.suffixes.is_consistent()
            && self.number.is_consistent()
            && self.hyphen.is_consistent()
            && self.capitalized.is_consistent()
            && self.unknown.is_consistent()
            && self.transitions.is_consistent()
            && self.trigrams.is_consistent()
            && self.bigrams.is_consistent()
    }

    fn tag(&self, id: TagId) -> &str {
        self.tags.to_str(id).unwrap_or_default()
    }

    fn token(&self, id: TokenId) -> &str {
        self.vocab.to_str(id).unwrap_or_default()
    }

    fn write_tag_row<W: Write>(&self, w: &mut W, row: &TagCounts) -> std::io::Result<()> {
        write!(w, "total {}", row.total())?;
        for (tag, n) in row.iter() {
            write!(w, "\t{} {}", self.tag(tag), n)?;
        }
        writeln!(w)
    }

    fn write_pair_row<W: Write>(&self, w: &mut W, row: &TagPairCounts) -> std::io::Result<()> {
        write!(w, "total {}", row.total())?;
        for ((a, b), n) in row.iter() {
            write!(w, "\t{} {} {}", self.tag(a), self.tag(b), n)?;
        }
        writeln!(w)
    }
}

#[derive(Debug, Clone, Copy)]
enum Section {
    None,
    Token(TokenId),
    Suffix(&'static str),
    Number,
    Hyphen,
    Capitalized,
    Unknown,
    Tag(TagId),
    Trigram(TagPair),
    Bigram((TokenId, TokenId)),
}

/// Splits a data line into its total and `(label fields, count)` entries.
fn parse_data_line<'a>(line: &'a str, lineno: usize) -> Result<(u64, Vec<(Vec<&'a str>, u64)>)> {
    let mut total = 0;
    let mut entries = Vec::new();
    for (i, field) in line.split('\t').enumerate() {
        let mut parts: Vec<&str> = field.split_whitespace().collect();
        let Some(count) = parts.pop() else {
            continue;
        };
        let count = parse_int(count, lineno)?;
        if i == 0 && parts == ["total"] {
            total = count;
        } else {
            entries.push((parts, count));
        }
    }
    Ok((total, entries))
}

impl MarkovModel {
    fn read_tag_row(&mut self, entries: Vec<(Vec<&str>, u64)>, total: u64) -> TagCounts {
        let labels = entries
            .into_iter()
            .filter_map(|(parts, n)| match parts.as_slice() {
                [tag] => Some((self.tags.find_or_insert(tag), n)),
                _ => None,
            })
            .collect();
        Counts::from_parts(total, labels)
    }

    fn read_pair_row(&mut self, entries: Vec<(Vec<&str>, u64)>, total: u64) -> TagPairCounts {
        let labels = entries
            .into_iter()
            .filter_map(|(parts, n)| match parts.as_slice() {
                [a, b] => Some(((self.tags.find_or_insert(a), self.tags.find_or_insert(b)), n)),
                _ => None,
            })
            .collect();
        Counts::from_parts(total, labels)
    }

    fn data_line(&mut self, section: Section, line: &str, lineno: usize) -> Result<()> {
        let (total, entries) = parse_data_line(line, lineno)?;
        match section {
            Section::None => log::trace!("line {lineno}: data outside of a section"),
            Section::Token(id) => {
                let row = self.read_tag_row(entries, total);
                self.tokens.insert(id, row);
            }
            Section::Suffix(suffix) => {
                let row = self.read_tag_row(entries, total);
                self.suffixes.insert(suffix, row);
            }
            Section::Number => self.number = self.read_tag_row(entries, total),
            Section::Hyphen => self.hyphen = self.read_tag_row(entries, total),
            Section::Capitalized => self.capitalized = self.read_tag_row(entries, total),
            Section::Unknown => self.unknown = self.read_tag_row(entries, total),
            Section::Tag(id) => {
                let row = self.read_tag_row(entries, total);
                self.transitions.insert(id, row);
            }
            Section::Trigram(key) => {
                let row = self.read_tag_row(entries, total);
                self.trigrams.insert(key, row);
            }
            Section::Bigram(key) => {
                let row = self.read_pair_row(entries, total);
                self.bigrams.insert(key, row);
            }
        }
        Ok(())
    }

    fn marker(&mut self, line: &str) -> Option<Section> {
        let section = if let Some(key) = line.strip_prefix("TOKEN:\t") {
            Section::Token(self.vocab.find_or_insert(key.trim()))
        } else if let Some(key) = line.strip_prefix("SUFFIX:\t") {
            known_suffix(key.trim()).map_or(Section::None, Section::Suffix)
        } else if line.starts_with("NUMBER:\t") {
            Section::Number
        } else if line.starts_with("HYPHEN:\t") {
            Section::Hyphen
        } else if line.starts_with("CAPITALIZED:\t") {
            Section::Capitalized
        } else if line.starts_with("UNKNOWN:\t") {
            Section::Unknown
        } else if let Some(key) = line.strip_prefix("TAG:\t") {
            Section::Tag(self.tags.find_or_insert(key.trim()))
        } else if let Some(key) = line.strip_prefix("TRAG:\t") {
            match key.trim().split_once(' ') {
                Some((a, b)) => Section::Trigram((self.tags.find_or_insert(a), self.tags.find_or_insert(b.trim()))),
                None => Section::None,
            }
        } else if let Some(key) = line.strip_prefix("BIGRAM:\t") {
            match key.trim().split_once(' ') {
                Some((a, b)) => Section::Bigram((self.vocab.find_or_insert(a), self.vocab.find_or_insert(b.trim()))),
                None => Section::None,
            }
        } else {
            return None;
        };
        Some(section)
    }
}

impl Model for MarkovModel {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        for (&id, row) in self.tokens.iter() {
            writeln!(w, "TOKEN:\t{}", self.token(id))?;
            self.write_tag_row(w, row)?;
        }
        writeln!(w, "\n")?;
        for (suffix, row) in self.suffixes.iter() {
            writeln!(w, "SUFFIX:\t{suffix}")?;
            self.write_tag_row(w, row)?;
        }
        writeln!(w, "\n")?;
        for (name, row) in [
            ("NUMBER", &self.number),
            ("HYPHEN", &self.hyphen),
            ("CAPITALIZED", &self.capitalized),
            ("UNKNOWN", &self.unknown),
        ] {
            writeln!(w, "{name}:\t{name}")?;
            self.write_tag_row(w, row)?;
            writeln!(w, "\n")?;
        }
        for (&prev, row) in self.transitions.iter() {
            writeln!(w, "TAG:\t{}", self.tag(prev))?;
            self.write_tag_row(w, row)?;
        }
        writeln!(w, "\n")?;
        for (&(a, b), row) in self.trigrams.iter() {
            writeln!(w, "TRAG:\t{} {}", self.tag(a), self.tag(b))?;
            self.write_tag_row(w, row)?;
        }
        writeln!(w, "\n")?;
        for (&(a, b), row) in self.bigrams.iter() {
            writeln!(w, "BIGRAM:\t{} {}", self.token(a), self.token(b))?;
            self.write_pair_row(w, row)?;
        }
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
            if let Some(next) = model.marker(line) {
                section = next;
            } else if line.starts_with("total ") {
                model.data_line(section, line, i + 1)?;
            } else {
                log::trace!("line {}: ignored {:?}", i + 1, line);
            }
        }
        Ok(model)
    }
}
