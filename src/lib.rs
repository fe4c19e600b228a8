//! Part-of-speech tagging with two engines: a smoothed visible Markov
//! model ([`MarkovModel`]) and a perceptron-trained maximum entropy Markov
//! model ([`MaxEntModel`]). Both train from a tab separated corpus, tag
//! sentences through [`Tagger`] and persist through [`Model`].

pub mod dataset;
pub mod errors;
pub mod evaluation;
pub mod memm;
pub mod mm;
pub mod model;
pub mod options;
pub mod quark;
pub mod tagger;
pub mod trainer;

pub use dataset::{Corpus, Sentence};
pub use errors::{Error, Result};
pub use evaluation::{evaluate_corpus, Evaluation};
pub use memm::MaxEntModel;
pub use mm::MarkovModel;
pub use model::Model;
pub use options::{Config, MemmOptions, MmOptions};
pub use tagger::Tagger;
pub use trainer::Trainer;
