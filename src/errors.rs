//! Definition of errors.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A model file holds a value that cannot be parsed.
    #[error("invalid model at line {line}: {msg}")]
    InvalidModel { line: usize, msg: String },

    #[error("invalid argument {arg}: {msg}")]
    InvalidArgument { arg: &'static str, msg: String },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_model<S: Into<String>>(line: usize, msg: S) -> Self {
        Self::InvalidModel {
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn invalid_argument<S: Into<String>>(arg: &'static str, msg: S) -> Self {
        Self::InvalidArgument {
            arg,
            msg: msg.into(),
        }
    }
}
