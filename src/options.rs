//! Training options of both engines.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Options of the Markov model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MmOptions {
    /// Tokens seen fewer times are merged into the unknown class.
    pub min_token_occurrences: usize,
    pub case_fold: bool,
}

impl Default for MmOptions {
    fn default() -> Self {
        Self {
            min_token_occurrences: 2,
            case_fold: false,
        }
    }
}

impl MmOptions {
    pub fn validate(&self) -> Result<()> {
        check_min_token_occurrences(self.min_token_occurrences)
    }
}

/// Options of the perceptron MEMM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemmOptions {
    /// A token gets its own classifier when seen more often than this.
    pub min_token_occurrences: usize,
    /// A token becomes a context feature when seen more often than this.
    pub min_feature_occurrences: usize,
    pub case_fold: bool,
    pub max_epochs: usize,
    /// Seed of the example shuffling. Random when absent.
    pub seed: Option<u64>,
}

impl Default for MemmOptions {
    fn default() -> Self {
        Self {
            min_token_occurrences: 2,
            min_feature_occurrences: 30,
            case_fold: true,
            max_epochs: 10,
            seed: None,
        }
    }
}

impl MemmOptions {
    pub fn validate(&self) -> Result<()> {
        check_min_token_occurrences(self.min_token_occurrences)?;
        if self.max_epochs == 0 {
            return Err(Error::invalid_argument("max_epochs", "must be positive"));
        }
        Ok(())
    }
}

fn check_min_token_occurrences(n: usize) -> Result<()> {
    if n < 2 {
        return Err(Error::invalid_argument(
            "min_token_occurrences",
            format!("must be at least 2, got {n}"),
        ));
    }
    Ok(())
}

/// Options of both engines, as read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mm: MmOptions,
    pub memm: MemmOptions,
}

impl Config {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(f))?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
