//! Progress reporting infrastructure

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::borrow::Cow;

/// CLI progress report of ongoing operations
///
/// To avoid corrupted terminal output, you should not write anything to stdout
/// or stderr yourself as long as a progress bar is being displayed. Please use
/// logs for debug messages, and hide the report when logs are verbose.
#[derive(Clone, Debug)]
pub struct ProgressReport(MultiProgress);
//
impl ProgressReport {
    /// Prepare to report progress on the cli
    pub fn new() -> Self {
        Self(MultiProgress::new())
    }

    /// Set up a report that never displays anything
    pub fn hidden() -> Self {
        Self(MultiProgress::with_draw_target(ProgressDrawTarget::hidden()))
    }

    /// Prepare to report on a new operation
    pub fn add(
        &self,
        what: impl Into<Cow<'static, str>>,
        config: ProgressConfig,
    ) -> ProgressTracker {
        let ProgressConfig {
            work,
            show_rate_eta,
        } = config;
        let style_header = "{prefix} {wide_bar} ";
        let style_trailer = match (work, show_rate_eta) {
            (Work::Steps(_), false) => "{pos}/{len}",
            (Work::Steps(_), true) => "{pos}/{len} ({per_sec})",
            (Work::Bytes(_), false) => "{decimal_bytes}/{decimal_total_bytes}",
            (Work::Bytes(_), true) => {
                "{decimal_bytes}/{decimal_total_bytes} ({decimal_bytes_per_sec})"
            }
        };
        let bar = ProgressBar::new(work.into())
            .with_prefix(what)
            .with_style(
                ProgressStyle::with_template(&format!("{style_header}{style_trailer}"))
                    .expect("all styles above should be valid indicatif styles"),
            );
        ProgressTracker {
            bar: self.0.add(bar),
            report: self.0.clone(),
        }
    }
}
//
impl Default for ProgressReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress bar configuration
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProgressConfig {
    /// Length of the progress bar
    work: Work,

    /// Show the completion rate
    show_rate_eta: bool,
}
//
impl ProgressConfig {
    /// Default configuration, for some amount of work
    pub fn new(work: Work) -> Self {
        Self {
            work,
            show_rate_eta: true,
        }
    }

    /// Disable display of the completion rate
    pub fn dont_show_rate_eta(self) -> Self {
        Self {
            show_rate_eta: false,
            ..self
        }
    }
}

/// Work whose progression can be tracked
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Work {
    /// Steps to be taken, e.g. sentences to be written
    Steps(usize),

    /// Bytes to be processed
    Bytes(u64),
}
//
impl From<Work> for u64 {
    fn from(value: Work) -> Self {
        match value {
            Work::Steps(s) => s as u64,
            Work::Bytes(b) => b,
        }
    }
}

/// Mechanism to track progress
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    /// Progress bar for this specific operation
    bar: ProgressBar,

    /// Underlying process report
    report: MultiProgress,
}
//
impl ProgressTracker {
    /// Show that a certain amount of progress has been made
    pub fn make_progress(&self, progress: u64) {
        self.bar.inc(progress);
        debug_assert!(
            self.bar.position() <= self.bar.length().unwrap_or(0),
            "recorded more progress than expected"
        );
    }

    /// Show that the operation has reached a certain point
    pub fn set_progress(&self, position: u64) {
        self.bar.set_position(position);
    }

    /// Hide the progress bar once the operation is done
    pub fn finish(self) {
        self.bar.finish_and_clear();
        self.report.remove(&self.bar);
    }
}
