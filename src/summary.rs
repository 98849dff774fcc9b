//! Reporting of what went where

use crate::{
    config::Config,
    split::{Partition, Partitions},
    writer::WriteStats,
    Result,
};
use anyhow::Context;
use serde::Serialize;
use std::{
    fmt,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Outcome of a corpus split
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Summary {
    /// Corpus that was split
    pub input: PathBuf,

    /// Seed of the shuffle
    pub seed: u64,

    /// What was written for each partition
    pub partitions: Vec<PartitionSummary>,

    /// Sum over all partitions
    pub total: WriteStats,
}
//
impl Summary {
    /// Gather the output of each partition
    pub fn new(config: &Config, stats: &Partitions<WriteStats>) -> Self {
        let mut total = WriteStats::default();
        let partitions = stats
            .iter()
            .map(|(partition, &stats)| {
                total += stats;
                PartitionSummary {
                    partition,
                    path: config.outputs.get(partition).clone(),
                    stats,
                }
            })
            .collect();
        Self {
            input: config.input.clone(),
            seed: config.seed,
            partitions,
            total,
        }
    }

    /// Fraction of the corpus sentences that ended up in a partition, in %
    fn share(&self, stats: &WriteStats) -> f64 {
        if self.total.sentences == 0 {
            0.0
        } else {
            100.0 * stats.sentences as f64 / self.total.sentences as f64
        }
    }

    /// Report the outcome through logs
    pub fn log(&self) {
        for PartitionSummary {
            partition,
            path,
            stats,
        } in &self.partitions
        {
            log::info!(
                "Wrote {} {partition} sentences ({} tokens, {} lines) to {}",
                stats.sentences,
                stats.tokens,
                stats.lines,
                path.display()
            );
        }
        log::info!(
            "Split {} sentences ({} tokens) from {} with seed {}",
            self.total.sentences,
            self.total.tokens,
            self.input.display(),
            self.seed
        );
    }

    /// Save the outcome as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let context = || format!("saving run report to {}", path.display());
        let mut output = BufWriter::new(File::create(path).with_context(context)?);
        serde_json::to_writer_pretty(&mut output, self).with_context(context)?;
        output.flush().with_context(context)
    }
}
//
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<9} {:>9} {:>9} {:>9} {:>7}  path",
            "partition", "sentences", "tokens", "lines", "share"
        )?;
        for PartitionSummary {
            partition,
            path,
            stats,
        } in &self.partitions
        {
            writeln!(
                f,
                "{:<9} {:>9} {:>9} {:>9} {:>7}  {}",
                partition.name(),
                stats.sentences,
                stats.tokens,
                stats.lines,
                format!("{:.1}%", self.share(stats)),
                path.display()
            )?;
        }
        write!(
            f,
            "{:<9} {:>9} {:>9} {:>9} {:>7}",
            "total",
            self.total.sentences,
            self.total.tokens,
            self.total.lines,
            format!("{:.1}%", self.share(&self.total))
        )
    }
}

/// What was written for one partition
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PartitionSummary {
    pub partition: Partition,
    pub path: PathBuf,
    #[serde(flatten)]
    pub stats: WriteStats,
}
