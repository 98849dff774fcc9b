//! Reading of tagged corpus files
//!
//! A tagged corpus has one token per line, each token being made of
//! whitespace-separated fields (typically a word followed by its tags), and
//! sentences separated by blank lines.

use crate::{
    progress::{ProgressConfig, ProgressReport, Work},
    Result,
};
use anyhow::Context;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

/// Fields of a single token line, e.g. a word and its part-of-speech tag
pub type Token = Box<[Box<str>]>;

/// Tokens found between two blank lines
pub type Sentence = Box<[Token]>;

/// Split a non-blank line into the fields of a token
pub fn parse_token(line: &str) -> Token {
    line.split_whitespace().map(Box::from).collect()
}

/// Tagged corpus file on disk
///
/// Every call to [`TaggedFile::sentences()`] reopens the file, so the
/// sentences can be enumerated as many times as needed.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TaggedFile {
    path: PathBuf,
}
//
impl TaggedFile {
    /// Refer to a tagged corpus file, without opening it yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Start enumerating sentences from the beginning of the file
    pub fn sentences(&self) -> Result<Sentences<BufReader<File>>> {
        let file = File::open(&self.path)
            .with_context(|| format!("opening corpus file {}", self.path.display()))?;
        Ok(Sentences::new(BufReader::new(file)).with_source(&self.path))
    }

    /// Size of the file in bytes
    pub fn size(&self) -> Result<u64> {
        let metadata = std::fs::metadata(&self.path)
            .with_context(|| format!("querying size of corpus file {}", self.path.display()))?;
        Ok(metadata.len())
    }

    /// Read the whole corpus into memory, reporting progress as bytes go by
    pub fn load(&self, report: &ProgressReport) -> Result<Vec<Sentence>> {
        let mut sentences = self.sentences()?;
        let bytes = report.add(
            "Reading corpus",
            ProgressConfig::new(Work::Bytes(self.size()?)),
        );
        let mut corpus = Vec::new();
        while let Some(sentence) = sentences.next() {
            corpus.push(sentence?);
            bytes.set_progress(sentences.bytes_read());
        }
        bytes.finish();
        log::debug!(
            "Loaded {} sentences from {}",
            corpus.len(),
            self.path.display()
        );
        Ok(corpus)
    }
}

/// Lazy sequence of sentences read from a tagged corpus
#[derive(Debug)]
pub struct Sentences<R> {
    /// Source of lines
    reader: R,

    /// Name of the source in error messages
    source: Box<str>,

    /// Line buffer, reused across reads
    line: String,

    /// Number of the last line that was read (1-based)
    line_number: usize,

    /// Number of bytes consumed so far
    bytes_read: u64,

    /// Tokens of the sentence being accumulated
    tokens: Vec<Token>,

    /// Truth that the end of the input was reached
    exhausted: bool,
}
//
impl<R: BufRead> Sentences<R> {
    /// Read sentences from a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            source: "<input>".into(),
            line: String::new(),
            line_number: 0,
            bytes_read: 0,
            tokens: Vec::new(),
            exhausted: false,
        }
    }

    /// Name the input in error messages after this file
    fn with_source(self, path: &Path) -> Self {
        Self {
            source: path.display().to_string().into(),
            ..self
        }
    }

    /// Number of bytes consumed from the input so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Take the accumulated tokens out as a sentence, if there are any
    fn flush(&mut self) -> Option<Sentence> {
        if self.tokens.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.tokens).into_boxed_slice())
    }
}
//
impl<R: BufRead> Iterator for Sentences<R> {
    type Item = Result<Sentence>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            self.line.clear();
            let num_bytes = match self.reader.read_line(&mut self.line) {
                Ok(num_bytes) => num_bytes,
                Err(e) => {
                    self.exhausted = true;
                    self.tokens.clear();
                    return Some(Err(e).with_context(|| {
                        format!("reading line {} of {}", self.line_number + 1, self.source)
                    }));
                }
            };
            if num_bytes == 0 {
                // Someone may have forgotten the final blank line
                self.exhausted = true;
                break;
            }
            self.line_number += 1;
            self.bytes_read += num_bytes as u64;

            let content = self.line.trim_end();
            if !content.is_empty() {
                self.tokens.push(parse_token(content));
            } else if let Some(sentence) = self.flush() {
                return Some(Ok(sentence));
            } else {
                log::debug!(
                    "Skipping extra blank line {} of {}",
                    self.line_number,
                    self.source
                );
            }
        }
        self.flush().map(Ok)
    }
}
