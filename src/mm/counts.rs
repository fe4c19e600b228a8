use std::{collections::HashMap, hash::Hash};

pub type TagId = usize;
pub type TokenId = usize;
pub type TagPair = (TagId, TagId);

/// Occurrence counts of labels observed under one context, kept in
/// first-seen order. `total` is stored explicitly next to the labels.
#[derive(Debug, Clone)]
pub struct Counts<L> {
    total: u64,
    labels: Vec<(L, u64)>,
    index: HashMap<L, usize>,
}

pub type TagCounts = Counts<TagId>;
pub type TagPairCounts = Counts<TagPair>;

impl<L> Default for Counts<L> {
    fn default() -> Self {
        Self {
            total: 0,
            labels: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<L: Copy + Eq + Hash> Counts<L> {
    /// Builds a record from persisted values. `total` is taken as given.
    pub(crate) fn from_parts(total: u64, labels: Vec<(L, u64)>) -> Self {
        let mut counts = Self::default();
        for (label, n) in labels {
            counts.add(label, n);
        }
        counts.total = total;
        counts
    }

    pub fn increment(&mut self, label: L) {
        self.add(label, 1);
    }

    pub fn add(&mut self, label: L, n: u64) {
        match self.index.get(&label) {
            Some(&i) => self.labels[i].1 += n,
            None => {
                self.index.insert(label, self.labels.len());
                self.labels.push((label, n));
            }
        }
        self.total += n;
    }

    /// Adds every count of `other` to this record.
    pub fn merge(&mut self, other: &Self) {
        for (label, n) in other.iter() {
            self.add(label, n);
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn get(&self, label: L) -> Option<u64> {
        self.index.get(&label).map(|&i| self.labels[i].1)
    }

    /// Relative frequency of `label`; zero when it was never seen here.
    pub fn probability(&self, label: L) -> f64 {
        match self.get(label) {
            Some(n) if self.total > 0 => n as f64 / self.total as f64,
            _ => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (L, u64)> + '_ {
        self.labels.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        self.labels.iter().map(|(_, n)| n).sum::<u64>() == self.total
    }
}

impl<L: PartialEq> PartialEq for Counts<L> {
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total && self.labels == other.labels
    }
}

/// Rows of counts keyed by a context, in first-seen order.
#[derive(Debug, Clone)]
pub struct CountTable<K, L> {
    rows: Vec<(K, Counts<L>)>,
    index: HashMap<K, usize>,
}

impl<K, L> Default for CountTable<K, L> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash, L: Copy + Eq + Hash> CountTable<K, L> {
    pub fn increment(&mut self, key: K, label: L) {
        self.row_mut(key).increment(label);
    }

    fn row_mut(&mut self, key: K) -> &mut Counts<L> {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.rows.len();
                self.index.insert(key.clone(), i);
                self.rows.push((key, Counts::default()));
                i
            }
        };
        &mut self.rows[i].1
    }

    /// Inserts a row, replacing an existing one in place.
    pub fn insert(&mut self, key: K, counts: Counts<L>) {
        *self.row_mut(key) = counts;
    }

    pub fn get(&self, key: &K) -> Option<&Counts<L>> {
        self.index.get(key).map(|&i| &self.rows[i].1)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Counts<L>)> {
        self.rows.iter().map(|(k, c)| (k, c))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Removes the rows matching `pred` and returns them in table order.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<(K, Counts<L>)>
    where
        F: FnMut(&K, &Counts<L>) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|(k, c)| pred(k, c));
        self.rows = kept;
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
        removed
    }

    pub fn is_consistent(&self) -> bool {
        self.rows.iter().all(|(_, c)| c.is_consistent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_follows_increments() {
        let mut counts = TagCounts::default();
        for tag in [3, 1, 3, 3, 2] {
            counts.increment(tag);
        }
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.iter().collect::<Vec<_>>(), vec![(3, 3), (1, 1), (2, 1)]);
        assert!((counts.probability(3) - 0.6).abs() < 1e-12);
        assert_eq!(counts.probability(9), 0.0);
        assert!(counts.is_consistent());
    }

    #[test]
    fn empty_record_has_zero_probability() {
        let counts = TagCounts::default();
        assert_eq!(counts.probability(0), 0.0);
        assert!(counts.is_consistent());
    }

    #[test]
    fn merge_adds_counts() {
        let mut a = TagCounts::default();
        a.add(0, 2);
        let mut b = TagCounts::default();
        b.add(1, 4);
        b.add(0, 1);
        a.merge(&b);
        assert_eq!(a.total(), 7);
        assert_eq!(a.get(0), Some(3));
        assert_eq!(a.get(1), Some(4));
    }

    #[test]
    fn remove_where_keeps_order() {
        let mut table: CountTable<&str, TagId> = CountTable::default();
        for (k, tag) in [("a", 0), ("b", 0), ("c", 1), ("b", 1), ("d", 0)] {
            table.increment(k, tag);
        }
        let removed = table.remove_where(|_, c| c.total() < 2);
        assert_eq!(removed.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec!["a", "c", "d"]);
        assert_eq!(table.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(table.get(&"b").map(Counts::total), Some(2));
        assert!(table.get(&"a").is_none());
        table.increment("e", 0);
        assert_eq!(table.get(&"e").map(Counts::total), Some(1));
    }
}
