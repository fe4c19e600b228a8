use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand, ValueEnum};
use postag::{
    dataset::read_tokens, evaluate_corpus, Config, Corpus, MarkovModel, MaxEntModel, MemmOptions, MmOptions, Model,
    Result, Tagger, Trainer,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Engine {
    /// Smoothed visible Markov model
    Mm,
    /// Perceptron maximum entropy Markov model
    Memm,
}

#[derive(Debug, Parser)]
#[command(version, about)]
#[command(propagate_version = true)]
struct Argv {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train on a tagged corpus and report accuracy on it
    Train {
        #[arg(short, long, value_enum)]
        engine: Engine,
        #[arg(short, long)]
        input: PathBuf,
        /// Write the trained model here
        #[arg(short, long)]
        save: Option<PathBuf>,
        /// JSON file with `mm` and `memm` options
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Load a model and report its accuracy on a tagged corpus
    Test {
        #[arg(short, long, value_enum)]
        engine: Engine,
        #[arg(short, long)]
        model: PathBuf,
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Train with overridden options and report accuracy
    Tune {
        #[arg(short, long, value_enum)]
        engine: Engine,
        #[arg(short, long)]
        input: PathBuf,
        /// Minimum token occurrences, at least 2
        #[arg(long)]
        minimum: Option<usize>,
        #[arg(long)]
        lowercase: bool,
        #[arg(long)]
        epochs: Option<usize>,
        /// Minimum occurrences of a window feature token
        #[arg(long)]
        features: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Tag raw tokens, one per line, blank lines between sentences
    Tag {
        #[arg(short, long, value_enum)]
        engine: Engine,
        #[arg(short, long)]
        model: PathBuf,
        /// Read from stdin when absent
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let argv = Argv::parse();
    log::debug!("argv: {:?}", argv);
    match run(argv.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Train {
            engine,
            input,
            save,
            config,
        } => {
            let config = match config {
                Some(path) => Config::from_json_file(path)?,
                None => Config::default(),
            };
            let corpus = Corpus::open(&input)?;
            match engine {
                Engine::Mm => train(MarkovModel::new(), &corpus, &config.mm, save.as_deref()),
                Engine::Memm => train(MaxEntModel::new(), &corpus, &config.memm, save.as_deref()),
            }
        }
        Command::Test { engine, model, input } => {
            let corpus = Corpus::open(&input)?;
            match engine {
                Engine::Mm => report(&MarkovModel::load(&model)?, &corpus),
                Engine::Memm => report(&MaxEntModel::load(&model)?, &corpus),
            }
            Ok(())
        }
        Command::Tune {
            engine,
            input,
            minimum,
            lowercase,
            epochs,
            features,
            seed,
        } => {
            let corpus = Corpus::open(&input)?;
            match engine {
                Engine::Mm => {
                    let opts = tune_mm_options(minimum, lowercase);
                    opts.validate()?;
                    train(MarkovModel::new(), &corpus, &opts, None)
                }
                Engine::Memm => {
                    let opts = tune_memm_options(minimum, lowercase, epochs, features, seed);
                    opts.validate()?;
                    train(MaxEntModel::new(), &corpus, &opts, None)
                }
            }
        }
        Command::Tag { engine, model, file } => {
            let sentences = match file {
                Some(path) => read_tokens(BufReader::new(File::open(path)?))?,
                None => read_tokens(io::stdin().lock())?,
            };
            match engine {
                Engine::Mm => tag(&MarkovModel::load(&model)?, &sentences),
                Engine::Memm => tag(&MaxEntModel::load(&model)?, &sentences),
            }
        }
    }
}

/// Tuning runs case-sensitive unless `--lowercase` is given.
fn tune_mm_options(minimum: Option<usize>, lowercase: bool) -> MmOptions {
    let mut opts = MmOptions::default();
    if let Some(n) = minimum {
        opts.min_token_occurrences = n;
    }
    opts.case_fold = lowercase;
    opts
}

fn tune_memm_options(
    minimum: Option<usize>,
    lowercase: bool,
    epochs: Option<usize>,
    features: Option<usize>,
    seed: Option<u64>,
) -> MemmOptions {
    let mut opts = MemmOptions::default();
    if let Some(n) = minimum {
        opts.min_token_occurrences = n;
    }
    if let Some(n) = features {
        opts.min_feature_occurrences = n;
    }
    if let Some(n) = epochs {
        opts.max_epochs = n;
    }
    opts.case_fold = lowercase;
    opts.seed = seed;
    opts
}

fn train<M: Trainer + Tagger + Model>(mut model: M, corpus: &Corpus, options: &M::Options, save: Option<&Path>) -> Result<()> {
    log::info!("training on {} sentences", corpus.len());
    model.train(corpus, options)?;
    if let Some(path) = save {
        model.save(path)?;
    }
    report(&model, corpus);
    Ok(())
}

fn report<T: Tagger>(tagger: &T, corpus: &Corpus) {
    let eval = evaluate_corpus(tagger, corpus);
    print!("{eval}");
}

fn tag<T: Tagger>(tagger: &T, sentences: &[Vec<String>]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for sentence in sentences {
        let tags = tagger.decode(sentence.as_slice());
        for (token, tag) in sentence.iter().zip(&tags) {
            writeln!(out, "{token}\t{tag}")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tune_is_case_sensitive_without_lowercase() {
        assert!(!tune_memm_options(None, false, None, None, None).case_fold);
        assert!(tune_memm_options(None, true, None, None, None).case_fold);
        assert!(!tune_mm_options(None, false).case_fold);
        assert!(tune_mm_options(None, true).case_fold);
    }

    #[test]
    fn tune_overrides_options() {
        let opts = tune_memm_options(Some(3), false, Some(5), Some(4), Some(9));
        assert_eq!(opts.min_token_occurrences, 3);
        assert_eq!(opts.max_epochs, 5);
        assert_eq!(opts.min_feature_occurrences, 4);
        assert_eq!(opts.seed, Some(9));
        assert_eq!(tune_mm_options(Some(4), false).min_token_occurrences, 4);
        assert_eq!(tune_mm_options(None, false).min_token_occurrences, 2);
    }
}
