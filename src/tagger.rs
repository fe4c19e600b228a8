/// A trained model that assigns one tag to every token of a sentence.
pub trait Tagger {
    /// Tags a sentence. The result has exactly one entry per token; a
    /// position the model cannot tag holds an empty string.
    fn decode<S: AsRef<str>>(&self, sentence: &[S]) -> Vec<String>;

    /// Whether the model has token-specific statistics for `token`.
    fn is_known(&self, token: &str) -> bool;
}
