//! Split a tagged corpus into training, development and test sets
//!
//! The input has one token per line (a word followed by its tags) and a blank
//! line after each sentence, as in the CoNLL-2000 chunking data. Sentences are
//! shuffled with a seeded generator, so that a given seed always produces the
//! same partitions, and 80% of them go to the training set while the
//! development and test sets get 10% each.

mod config;
mod corpus;
mod progress;
mod split;
mod summary;
mod writer;

use crate::{
    config::Config,
    corpus::TaggedFile,
    progress::{ProgressConfig, ProgressReport, Work},
    split::Partitions,
    summary::Summary,
    writer::WriteStats,
};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

/// Shuffle the sentences of a tagged corpus and split them into train (80%),
/// dev (10%) and test (10%) files
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// Tagged corpus, with one token per line and sentences separated by a
    /// blank line
    input: PathBuf,

    /// Output file for the training set
    train: PathBuf,

    /// Output file for the development set
    dev: PathBuf,

    /// Output file for the test set
    test: PathBuf,

    /// Seed of the sentence shuffle
    ///
    /// Splitting the same corpus with the same seed always puts the same
    /// sentences in the same files.
    #[arg(short, long)]
    seed: u64,

    /// Log what is being done instead of printing a summary table
    ///
    /// Can be repeated for more details.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also save a JSON report of the split at this location
    #[arg(long)]
    report: Option<PathBuf>,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        let args = Args::parse();
        args.check()?;
        Ok(args)
    }

    /// Check CLI arguments for basic sanity
    ///
    /// Paths are compared after resolution, so that different spellings of
    /// the same file are caught.
    fn check(&self) -> Result<()> {
        let input = resolve_path(&self.input);
        let outputs = [&self.train, &self.dev, &self.test];
        let resolved = outputs.map(|output| resolve_path(output));
        for (idx, output) in outputs.iter().enumerate() {
            anyhow::ensure!(
                resolved[idx] != input,
                "output file {} would overwrite the input corpus",
                output.display()
            );
            anyhow::ensure!(
                !resolved[idx + 1..].contains(&resolved[idx]),
                "output file {} is used for more than one partition",
                output.display()
            );
        }
        Ok(())
    }
}

/// Absolute, symlink-free form of a path that may not exist yet
///
/// Existing files are canonicalized. Otherwise the parent directory is
/// canonicalized and the file name appended. Paths whose parent cannot be
/// resolved are returned as given.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return resolved;
    }
    let Some(file_name) = path.file_name() else {
        return path.to_owned();
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match std::fs::canonicalize(parent) {
        Ok(parent) => parent.join(file_name),
        Err(_) => path.to_owned(),
    }
}

fn main() -> Result<()> {
    // Decode CLI arguments
    let config = Config::new(Args::parse_and_check()?);

    // Set up logging
    setup_logging(&config);

    // Progress bars would garble verbose logs
    let report = if config.shows_progress() {
        ProgressReport::new()
    } else {
        ProgressReport::hidden()
    };

    // Do the splitting
    let summary = run(&config, &report)?;
    if let Some(path) = &config.report {
        summary.save(path)?;
    }

    // Display the outcome
    if config.is_verbose() {
        summary.log();
    } else {
        println!("{summary}");
    }
    Ok(())
}

/// Read the corpus, shuffle it, and write the partitions out
fn run(config: &Config, report: &ProgressReport) -> Result<Summary> {
    // Load all sentences into memory
    let corpus = TaggedFile::new(&config.input).load(report)?;
    log::info!(
        "Read {} sentences from {}",
        corpus.len(),
        config.input.display()
    );

    // Shuffle and slice them
    let num_sentences = corpus.len();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let partitions = split::shuffle_and_split(corpus, &mut rng);

    // Write each partition to its file
    let written = report.add(
        "Writing partitions",
        ProgressConfig::new(Work::Steps(num_sentences)).dont_show_rate_eta(),
    );
    let stats: Partitions<WriteStats> = partitions.try_map(|partition, sentences| {
        let path = config.outputs.get(partition);
        log::debug!(
            "Writing {} {partition} sentences to {}",
            sentences.len(),
            path.display()
        );
        writer::write_partition(path, &sentences, Some(&written))
    })?;
    written.finish();
    Ok(Summary::new(config, &stats))
}

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Set up logging
///
/// `RUST_LOG` takes precedence over the verbosity requested on the CLI.
fn setup_logging(config: &Config) {
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Sentence;
    use std::collections::HashSet;

    /// Tagged corpus with `num_sentences` distinct sentences
    fn make_corpus(num_sentences: usize) -> String {
        (0..num_sentences)
            .map(|i| format!("Sentence NN B-NP\nnumber NN I-NP\n{i} CD I-NP\n. . O\n\n"))
            .collect()
    }

    fn config_in(dir: &Path, seed: u64) -> Config {
        Config {
            input: dir.join("corpus.tag"),
            outputs: Partitions {
                train: dir.join("train.tag"),
                dev: dir.join("dev.tag"),
                test: dir.join("test.tag"),
            },
            seed,
            verbose: 0,
            report: None,
        }
    }

    fn read_back(path: &Path) -> Vec<Sentence> {
        TaggedFile::new(path)
            .sentences()
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    fn args(input: &str, train: &str, dev: &str, test: &str) -> Args {
        Args::try_parse_from(["split", input, train, dev, test, "--seed", "42"]).unwrap()
    }

    #[test]
    fn ten_sentences_split_eight_one_one() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 42);
        std::fs::write(&config.input, make_corpus(10)).unwrap();

        let summary = run(&config, &ProgressReport::hidden()).unwrap();
        let counts = summary
            .partitions
            .iter()
            .map(|p| p.stats.sentences)
            .collect::<Vec<_>>();
        assert_eq!(counts, [8, 1, 1]);
        assert_eq!(summary.total.sentences, 10);
        assert_eq!(summary.total.tokens, 40);
        assert_eq!(summary.total.lines, 50);

        let written = config
            .outputs
            .iter()
            .map(|(_, path)| read_back(path).len())
            .collect::<Vec<_>>();
        assert_eq!(written, [8, 1, 1]);
    }

    #[test]
    fn partitions_hold_every_sentence_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 7);
        std::fs::write(&config.input, make_corpus(57)).unwrap();
        run(&config, &ProgressReport::hidden()).unwrap();

        let original = read_back(&config.input);
        let mut seen = HashSet::new();
        for (_, path) in config.outputs.iter() {
            for sentence in read_back(path) {
                assert!(original.contains(&sentence));
                assert!(seen.insert(sentence), "sentence written twice");
            }
        }
        assert_eq!(seen.len(), original.len());
    }

    #[test]
    fn same_seed_writes_same_files() {
        let outputs = |seed| {
            let dir = tempfile::tempdir().unwrap();
            let config = config_in(dir.path(), seed);
            std::fs::write(&config.input, make_corpus(30)).unwrap();
            run(&config, &ProgressReport::hidden()).unwrap();
            config
                .outputs
                .iter()
                .map(|(_, path)| std::fs::read_to_string(path).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(outputs(1234), outputs(1234));
        assert_ne!(outputs(1234), outputs(4321));
    }

    #[test]
    fn empty_corpus_gives_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 42);
        std::fs::write(&config.input, "").unwrap();

        let summary = run(&config, &ProgressReport::hidden()).unwrap();
        assert_eq!(summary.total, WriteStats::default());
        for (_, path) in config.outputs.iter() {
            assert_eq!(std::fs::read(path).unwrap(), b"");
        }
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 42);
        assert!(run(&config, &ProgressReport::hidden()).is_err());
        assert!(!config.outputs.train.exists());
    }

    #[test]
    fn cli_arguments_map_to_config() {
        let args = Args::try_parse_from([
            "split", "in.tag", "a.tag", "b.tag", "c.tag", "--seed", "9", "-vv", "--report",
            "r.json",
        ])
        .unwrap();
        args.check().unwrap();
        let config = Config::new(args);
        assert_eq!(config.input, Path::new("in.tag"));
        assert_eq!(config.outputs.dev, Path::new("b.tag"));
        assert_eq!(config.seed, 9);
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
        assert_eq!(config.report.as_deref(), Some(Path::new("r.json")));
    }

    #[test]
    fn seed_is_required() {
        assert!(Args::try_parse_from(["split", "in.tag", "a.tag", "b.tag", "c.tag"]).is_err());
    }

    #[test]
    fn rejects_clashing_paths() {
        assert!(args("in.tag", "a.tag", "b.tag", "c.tag").check().is_ok());
        assert!(args("in.tag", "in.tag", "b.tag", "c.tag").check().is_err());
        assert!(args("in.tag", "a.tag", "b.tag", "a.tag").check().is_err());
        assert!(args("in.tag", "a.tag", "b.tag", "b.tag").check().is_err());
        assert!(args("in.tag", "./in.tag", "b.tag", "c.tag").check().is_err());
        assert!(args("in.tag", "a.tag", "./b.tag", "b.tag").check().is_err());
    }

    #[test]
    fn rejects_other_spellings_of_the_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 42);
        std::fs::write(&config.input, make_corpus(3)).unwrap();
        let input = config.input.to_str().unwrap();
        let dotted = dir.path().join(".").join("corpus.tag");
        let detour = dir.path().join("sub").join("..").join("corpus.tag");
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let train = config.outputs.train.to_str().unwrap();
        let dev = config.outputs.dev.to_str().unwrap();
        let test = config.outputs.test.to_str().unwrap();

        assert!(args(input, train, dev, test).check().is_ok());
        assert!(args(input, dotted.to_str().unwrap(), dev, test).check().is_err());
        assert!(args(input, train, detour.to_str().unwrap(), test).check().is_err());
        assert_eq!(std::fs::read_to_string(&config.input).unwrap(), make_corpus(3));
    }

    #[test]
    fn resolves_relative_and_absolute_spellings_alike() {
        let cwd = std::env::current_dir().unwrap().canonicalize().unwrap();
        assert_eq!(resolve_path(Path::new("in.tag")), cwd.join("in.tag"));
        assert_eq!(resolve_path(Path::new("./in.tag")), cwd.join("in.tag"));
        assert_eq!(resolve_path(&cwd.join("in.tag")), cwd.join("in.tag"));
    }
}
