use crate::quark::{Quark, StringTable};

/// Relative offsets of the context window, in concatenation order.
pub const WINDOW: [isize; 5] = [-2, -1, 0, 1, 2];

/// Concatenated one-hot window vector of one position, stored sparsely as
/// the indices of its ones. The dense length is `WINDOW.len() * |F|`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features {
    active: Vec<usize>,
}

impl Features {
    /// Window features of position `i`. Offsets outside the sentence and
    /// tokens missing from `dict` leave their window empty.
    pub fn extract<S: AsRef<str>>(dict: &Quark, tokens: &[S], i: usize) -> Self {
        let width = dict.len();
        let active = WINDOW
            .iter()
            .enumerate()
            .filter_map(|(slot, &offset)| {
                let j = usize::try_from(i as isize + offset).ok()?;
                let id = dict.to_id(tokens.get(j)?.as_ref())?;
                Some(slot * width + id)
            })
            .collect();
        Self { active }
    }

    pub fn indices(&self) -> &[usize] {
        &self.active
    }

    /// Dot product with a dense weight vector.
    pub fn dot(&self, w: &[i64]) -> i64 {
        self.active
            .iter()
            .map(|&k| w.get(k).copied().unwrap_or_default())
            .sum()
    }

    pub fn add_to(&self, w: &mut [i64]) {
        for &k in &self.active {
            if let Some(x) = w.get_mut(k) {
                *x += 1;
            }
        }
    }

    pub fn subtract_from(&self, w: &mut [i64]) {
        for &k in &self.active {
            if let Some(x) = w.get_mut(k) {
                *x -= 1;
            }
        }
    }

    pub fn to_dense(&self, dim: usize) -> Vec<i64> {
        let mut v = vec![0; dim];
        self.add_to(&mut v);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> Quark {
        Quark::from(vec!["the".to_string(), "dog".to_string(), "runs".to_string()])
    }

    #[test]
    fn window_at_sentence_start() {
        let tokens = ["the", "dog", "runs"];
        let x = Features::extract(&dict(), &tokens, 0);
        // slot 2 (self) = "the", slot 3 = "dog", slot 4 = "runs"
        assert_eq!(x.indices(), &[2 * 3, 3 * 3 + 1, 4 * 3 + 2]);
    }

    #[test]
    fn missing_tokens_leave_zero_windows() {
        let tokens = ["a", "dog", "barks"];
        let x = Features::extract(&dict(), &tokens, 2);
        assert_eq!(x.indices(), &[3 + 1]);
        assert_eq!(x.to_dense(15), vec![0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn empty_dictionary() {
        let x = Features::extract(&Quark::default(), &["the"], 0);
        assert!(x.indices().is_empty());
        assert_eq!(x.dot(&[]), 0);
    }

    #[test]
    fn dot_and_updates() {
        let tokens = ["the", "dog"];
        let x = Features::extract(&dict(), &tokens, 1);
        let mut w = vec![0; 15];
        x.add_to(&mut w);
        x.add_to(&mut w);
        assert_eq!(x.dot(&w), 4);
        x.subtract_from(&mut w);
        assert_eq!(x.dot(&w), 2);
    }
}
