//! Perceptron-trained maximum entropy Markov model.
//!
//! Every known token owns a set of per-tag linear classifiers over a
//! five-token window of one-hot features; all other tokens share one set.

pub mod features;
pub mod model;
pub mod perceptron;
mod tagger;
mod trainer;

pub use self::features::{Features, WINDOW};
pub use self::model::MaxEntModel;
pub use self::perceptron::{Convergence, Example, TagWeights, Weights};
