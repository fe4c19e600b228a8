use rand::{seq::SliceRandom, Rng};

use crate::mm::TagId;

use super::features::Features;

/// Linear classifier of one tag: fires when `vector·x > bias`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Weights {
    pub vector: Vec<i64>,
    pub bias: i64,
}

impl Weights {
    pub fn zeros(dim: usize) -> Self {
        Self {
            vector: vec![0; dim],
            bias: 0,
        }
    }

    pub fn score(&self, x: &Features) -> i64 {
        x.dot(&self.vector) - self.bias
    }

    pub fn fires(&self, x: &Features) -> bool {
        x.dot(&self.vector) > self.bias
    }
}

/// A training row of one token: its gold tag and window features.
#[derive(Debug, Clone)]
pub struct Example {
    pub tag: TagId,
    pub features: Features,
}

/// Outcome of a perceptron run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    pub epochs: usize,
    pub updates: usize,
    pub converged: bool,
}

/// The per-tag classifiers of one token, in first-seen tag order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagWeights {
    entries: Vec<(TagId, Weights)>,
}

impl TagWeights {
    /// Weights of `tag`, created as zeros on first use.
    pub fn entry(&mut self, tag: TagId, dim: usize) -> &mut Weights {
        let pos = match self.entries.iter().position(|(t, _)| *t == tag) {
            Some(pos) => pos,
            None => {
                self.entries.push((tag, Weights::zeros(dim)));
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    pub fn get(&self, tag: TagId) -> Option<&Weights> {
        self.entries.iter().find(|(t, _)| *t == tag).map(|(_, w)| w)
    }

    pub(crate) fn push(&mut self, tag: TagId, weights: Weights) {
        self.entries.push((tag, weights));
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Weights> {
        self.entries.last_mut().map(|(_, w)| w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TagId, &Weights)> {
        self.entries.iter().map(|(t, w)| (*t, w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest scoring tag; the earliest tag wins ties.
    pub fn best(&self, x: &Features) -> Option<TagId> {
        let mut best: Option<(TagId, i64)> = None;
        for (tag, w) in self.iter() {
            let score = w.score(x);
            match best {
                Some((_, s)) if score <= s => {}
                _ => best = Some((tag, score)),
            }
        }
        best.map(|(tag, _)| tag)
    }

    /// One pass over `examples` in their current order. Returns the number
    /// of weight updates.
    pub fn train_epoch(&mut self, examples: &[Example]) -> usize {
        let mut updates = 0;
        for ex in examples {
            for (tag, w) in self.entries.iter_mut() {
                match (*tag == ex.tag, w.fires(&ex.features)) {
                    (true, false) => {
                        ex.features.add_to(&mut w.vector);
                        w.bias -= 1;
                        updates += 1;
                    }
                    (false, true) => {
                        ex.features.subtract_from(&mut w.vector);
                        w.bias += 1;
                        updates += 1;
                    }
                    _ => {}
                }
            }
        }
        updates
    }

    /// Runs epochs over reshuffled examples until one makes no update or
    /// `max_epochs` is reached.
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        examples: &mut [Example],
        max_epochs: usize,
        rng: &mut R,
    ) -> Convergence {
        let mut result = Convergence {
            epochs: 0,
            updates: 0,
            converged: false,
        };
        while result.epochs < max_epochs {
            examples.shuffle(rng);
            let updates = self.train_epoch(examples);
            result.epochs += 1;
            result.updates += updates;
            if updates == 0 {
                result.converged = true;
                break;
            }
        }
        result
    }
}
