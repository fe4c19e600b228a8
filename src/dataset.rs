use std::{
    borrow::Cow,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::errors::Result;

/// One tagged sentence: parallel token and tag columns.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<String>,
    tags: Vec<String>,
}

impl Sentence {
    pub fn push<T: Into<String>, L: Into<String>>(&mut self, token: T, tag: L) {
        self.tokens.push(token.into());
        self.tags.push(tag.into());
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// `(token, tag)` rows in order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens
            .iter()
            .zip(&self.tags)
            .map(|(t, l)| (t.as_str(), l.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.tags.clear();
    }
}

/// Lowercases `token` when `case_fold` is set.
pub fn fold_case(token: &str, case_fold: bool) -> Cow<'_, str> {
    if case_fold {
        Cow::Owned(token.to_lowercase())
    } else {
        Cow::Borrowed(token)
    }
}

/// A labelled corpus grouped into sentences.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    sentences: Vec<Sentence>,
}

/// Splits a corpus row into `(token, tag)`. Rows that do not carry both
/// columns mark a sentence boundary.
fn split_row(line: &str) -> Option<(&str, &str)> {
    let (token, rest) = line.split_once('\t')?;
    let tag = rest.split('\t').next().unwrap_or_default().trim();
    let token = token.trim();
    if token.is_empty() || tag.is_empty() {
        return None;
    }
    Some((token, tag))
}

impl Corpus {
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut corpus = Self::default();
        let mut sentence = Sentence::default();
        for line in reader.lines() {
            corpus.feed(&line?, &mut sentence);
        }
        corpus.append(sentence);
        Ok(corpus)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path.as_ref())?;
        Self::read(BufReader::new(f))
    }

    fn feed(&mut self, line: &str, sentence: &mut Sentence) {
        match split_row(line) {
            Some((token, tag)) => sentence.push(token, tag),
            None => {
                if !line.trim().is_empty() {
                    log::debug!("treating row as sentence boundary: {line:?}");
                }
                self.append(std::mem::take(sentence));
            }
        }
    }

    pub fn append(&mut self, sentence: Sentence) {
        if !sentence.is_empty() {
            self.sentences.push(sentence);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sentence> {
        self.sentences.iter()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.sentences.iter().map(|x| x.len()).max().unwrap_or_default()
    }

    pub fn total_rows(&self) -> usize {
        self.sentences.iter().map(|x| x.len()).sum()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

impl<'a, I: Iterator<Item = &'a str>> From<I> for Corpus {
    fn from(lines: I) -> Self {
        let mut corpus = Self::default();
        let mut sentence = Sentence::default();
        for line in lines {
            corpus.feed(line, &mut sentence);
        }
        corpus.append(sentence);
        corpus
    }
}

impl FromIterator<Sentence> for Corpus {
    fn from_iter<T: IntoIterator<Item = Sentence>>(iter: T) -> Self {
        let mut corpus = Self::default();
        for sentence in iter {
            corpus.append(sentence);
        }
        corpus
    }
}

/// Reads untagged input: one token per line, blank lines between sentences.
/// Only the first tab-separated column of a line is used.
pub fn read_tokens<R: BufRead>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let token = line.split('\t').next().unwrap_or_default().trim();
        if token.is_empty() {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
        } else {
            current.push(token.to_string());
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }
    Ok(sentences)
}
