//! Run configuration

use crate::{split::Partitions, Args};
use log::LevelFilter;
use std::path::PathBuf;

/// Final process configuration
///
/// This is the result of digesting the [`Args`]. Please refer to [`Args`] to
/// know more about individual fields.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    pub input: PathBuf,

    /// Output file of each partition
    pub outputs: Partitions<PathBuf>,

    pub seed: u64,
    pub verbose: u8,
    pub report: Option<PathBuf>,
}
//
impl Config {
    /// Determine process configuration from CLI arguments
    pub(crate) fn new(args: Args) -> Self {
        let Args {
            input,
            train,
            dev,
            test,
            seed,
            verbose,
            report,
        } = args;
        Self {
            input,
            outputs: Partitions { train, dev, test },
            seed,
            verbose,
            report,
        }
    }

    /// Truth that progress should go to the logs instead of a summary table
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    /// Truth that progress bars can be drawn without garbling log output
    pub fn shows_progress(&self) -> bool {
        self.log_level() <= LevelFilter::Warn
    }

    /// Most detailed log level that should be emitted
    pub fn log_level(&self) -> LevelFilter {
        if cfg!(feature = "log-trace") {
            return LevelFilter::Trace;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
