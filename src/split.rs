//! Shuffling and partitioning of a corpus into train, dev and test sets

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use std::fmt;

/// Subset of the corpus that an output file is dedicated to
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    /// Training data, 80% of the corpus
    Train,

    /// Development data, 10% of the corpus
    Dev,

    /// Test data, 10% of the corpus
    Test,
}
//
impl Partition {
    /// All partitions, in output order
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Dev, Partition::Test];

    /// Short name of the partition
    pub fn name(self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Dev => "dev",
            Partition::Test => "test",
        }
    }
}
//
impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something for each of the train, dev and test partitions
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Partitions<T> {
    pub train: T,
    pub dev: T,
    pub test: T,
}
//
impl<T> Partitions<T> {
    /// Access the data of one partition
    pub fn get(&self, partition: Partition) -> &T {
        match partition {
            Partition::Train => &self.train,
            Partition::Dev => &self.dev,
            Partition::Test => &self.test,
        }
    }

    /// Iterate over partitions in output order
    pub fn iter(&self) -> impl Iterator<Item = (Partition, &T)> {
        Partition::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// Apply a fallible transform to every partition, in output order
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(Partition, T) -> Result<U, E>,
    ) -> Result<Partitions<U>, E> {
        let Self { train, dev, test } = self;
        Ok(Partitions {
            train: f(Partition::Train, train)?,
            dev: f(Partition::Dev, dev)?,
            test: f(Partition::Test, test)?,
        })
    }
}

/// Indices at which a corpus of `len` items is cut into train/dev/test
///
/// These are `floor(len/10*8)` and `floor(len/10*9)`, computed exactly.
pub fn split_points(len: usize) -> (usize, usize) {
    (len * 8 / 10, len * 9 / 10)
}

/// Shuffle a corpus and cut it into train, dev and test partitions
///
/// The shuffle order is entirely determined by the state of `rng`, so a
/// generator seeded with the same value always yields the same partitions.
pub fn shuffle_and_split<T>(mut corpus: Vec<T>, rng: &mut impl Rng) -> Partitions<Vec<T>> {
    corpus.shuffle(rng);
    let (dev_start, test_start) = split_points(corpus.len());
    let test = corpus.split_off(test_start);
    let dev = corpus.split_off(dev_start);
    log::debug!(
        "Split corpus into {} train, {} dev and {} test items",
        corpus.len(),
        dev.len(),
        test.len()
    );
    Partitions {
        train: corpus,
        dev,
        test,
    }
}
