//! Writing of corpus partitions back to disk

use crate::{corpus::Sentence, progress::ProgressTracker, Result};
use anyhow::Context;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    ops::AddAssign,
    path::Path,
};

/// What was written to an output file
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub struct WriteStats {
    /// Number of sentences
    pub sentences: usize,

    /// Number of tokens, i.e. non-blank lines
    pub tokens: usize,

    /// Number of lines, including the blank line after each sentence
    pub lines: usize,
}
//
impl AddAssign for WriteStats {
    fn add_assign(&mut self, rhs: Self) {
        self.sentences += rhs.sentences;
        self.tokens += rhs.tokens;
        self.lines += rhs.lines;
    }
}

/// Write sentences in tagged corpus format
///
/// Each token goes on its own line with fields separated by single spaces,
/// and every sentence (including the last one) is followed by a blank line.
pub fn write_sentences<'a>(
    output: &mut impl Write,
    sentences: impl IntoIterator<Item = &'a Sentence>,
    progress: Option<&ProgressTracker>,
) -> std::io::Result<WriteStats> {
    let mut stats = WriteStats::default();
    for sentence in sentences {
        for token in sentence.iter() {
            let mut fields = token.iter();
            if let Some(first) = fields.next() {
                output.write_all(first.as_bytes())?;
            }
            for field in fields {
                output.write_all(b" ")?;
                output.write_all(field.as_bytes())?;
            }
            output.write_all(b"\n")?;
        }
        output.write_all(b"\n")?;
        stats += WriteStats {
            sentences: 1,
            tokens: sentence.len(),
            lines: sentence.len() + 1,
        };
        if let Some(progress) = progress {
            progress.make_progress(1);
        }
    }
    Ok(stats)
}

/// Create (or truncate) a file and write a partition into it
pub fn write_partition(
    path: &Path,
    sentences: &[Sentence],
    progress: Option<&ProgressTracker>,
) -> Result<WriteStats> {
    let context = || format!("writing sentences to {}", path.display());
    let file = File::create(path).with_context(context)?;
    let mut output = BufWriter::new(file);
    let stats = write_sentences(&mut output, sentences, progress).with_context(context)?;
    output.flush().with_context(context)?;
    log::trace!("Wrote {stats:?} to {}", path.display());
    Ok(stats)
}
