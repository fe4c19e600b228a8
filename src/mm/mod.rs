//! Smoothed visible Markov model tagger.
//!
//! Training counts tokens, suffix classes, word shapes, tag transitions,
//! tag trigrams and token bigrams. Rare tokens are pruned into a shared
//! unknown class. Decoding commits one tag per position after scoring a
//! short lookahead of up to three tags.

pub mod counts;
pub mod model;
pub mod shape;
mod tagger;
mod trainer;

pub use self::counts::{CountTable, Counts, TagCounts, TagId, TagPair, TagPairCounts, TokenId};
pub use self::model::MarkovModel;
pub use self::shape::{Shape, SUFFIXES};
