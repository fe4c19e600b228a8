use std::collections::HashMap;

/// Read access to an interned string table.
pub trait StringTable {
    fn to_str(&self, id: usize) -> Option<&str>;
    fn to_id(&self, s: &str) -> Option<usize>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, s: &str) -> bool {
        self.to_id(s).is_some()
    }
}

pub trait TextVectorizer {
    fn find_or_insert(&mut self, key: &str) -> usize;
}

/// Interns strings to dense ids in first-seen order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Quark {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl From<Vec<String>> for Quark {
    fn from(value: Vec<String>) -> Self {
        let mut quark = Self::default();
        for s in &value {
            quark.find_or_insert(s);
        }
        quark
    }
}

impl StringTable for Quark {
    fn to_str(&self, id: usize) -> Option<&str> {
        self.v.get(id).map(|x| x.as_str())
    }

    fn to_id(&self, s: &str) -> Option<usize> {
        self.m.get(s).copied()
    }

    fn len(&self) -> usize {
        self.v.len()
    }
}

impl TextVectorizer for Quark {
    fn find_or_insert(&mut self, key: &str) -> usize {
        if let Some(&idx) = self.m.get(key) {
            return idx;
        }
        let idx = self.v.len();
        self.m.insert(key.to_string(), idx);
        self.v.push(key.to_string());
        idx
    }
}

impl Quark {
    /// Strings in id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.v.iter().map(String::as_str)
    }

    /// Counts how often every string occurs and interns, in first-seen
    /// order, those whose frequency strictly exceeds `min_freq`.
    pub fn with_min_freq<'a, I>(items: I, min_freq: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = Quark::default();
        let mut freq: Vec<usize> = Vec::new();
        for s in items {
            let id = seen.find_or_insert(s);
            if id == freq.len() {
                freq.push(0);
            }
            freq[id] += 1;
        }
        let mut quark = Quark::default();
        for (s, &n) in seen.iter().zip(&freq) {
            if n > min_freq {
                quark.find_or_insert(s);
            }
        }
        quark
    }
}
