use bitflags::bitflags;

/// Suffix classes in priority order. A token belongs to the first suffix
/// it ends with, not to the longest one.
pub const SUFFIXES: &[&str] = &[
    "acy", "al", "ance", "ence", "dom", "er", "or", "ism", "ist", "ity", "ty", "ment", "ness",
    "ship", "ation", "ition", "sion", "tion", "ion", "ate", "en", "ify", "fy", "ize", "ise",
    "able", "ible", "ial", "esque", "ful", "ic", "ical", "ious", "eous", "ous", "ish", "ative",
    "itive", "ive", "less", "ing", "est", "ly", "y", "ed", "es", "s",
];

pub fn suffix_of(token: &str) -> Option<&'static str> {
    SUFFIXES.iter().copied().find(|s| token.ends_with(s))
}

/// Looks up the static suffix equal to `s`.
pub(crate) fn known_suffix(s: &str) -> Option<&'static str> {
    SUFFIXES.iter().copied().find(|x| *x == s)
}

bitflags! {
    /// Orthographic classes of a token. A token may belong to several.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Shape: u8 {
        const NUMBER = 0b001;
        const HYPHEN = 0b010;
        const CAPITALIZED = 0b100;
    }
}

impl Shape {
    pub fn of(token: &str) -> Self {
        let mut shape = Shape::empty();
        if token.is_empty() {
            return shape;
        }
        if token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | ':' | ',' | '.'))
        {
            shape |= Shape::NUMBER;
        }
        if token.contains('-') {
            shape |= Shape::HYPHEN;
        }
        if token.chars().next().map_or(false, char::is_uppercase) {
            shape |= Shape::CAPITALIZED;
        }
        shape
    }
}
