//! Progress reporting while the dataset is loaded

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::borrow::Cow;

/// CLI progress report of ongoing loading operations
///
/// To avoid corrupted terminal output, you should not write anything to stderr
/// yourself as long as a report is being displayed. Please use logs for debug
/// messages.
#[derive(Clone, Debug)]
pub struct ProgressReport(MultiProgress);
//
impl ProgressReport {
    /// Prepare to report progress on the cli
    pub fn new() -> Self {
        Self(MultiProgress::new())
    }

    /// Track progress without displaying anything
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
        let style_trailer = match (work, show_rate_eta) {
            (Work::Steps(_), false) => "{pos}/{len}",
            (Work::Steps(_), true) => "{pos}/{len} ({per_sec})",
            (Work::PercentSteps(_), false) => "{percent:>2}%",
            (Work::PercentSteps(_), true) => "{percent:>2}% (~{eta} left)",
            (Work::Bytes(_), false) => "{decimal_bytes}/{decimal_total_bytes}",
            (Work::Bytes(_), true) => {
                "{decimal_bytes}/{decimal_total_bytes} ({decimal_bytes_per_sec})"
            }
        };
        let bar = ProgressBar::new(work.into())
            .with_prefix(what.into())
            .with_style(
                ProgressStyle::with_template(&format!("{{prefix}} {{wide_bar}} {style_trailer}"))
                    .expect("all styles above should be valid indicatif styles"),
            );
        if u64::from(work) > 0 {
            self.0.add(bar.clone());
        }
        ProgressTracker {
            bar,
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

    /// Show the completion rate or estimated remaining time, depending on work
    show_rate_eta: bool,
}
//
impl ProgressConfig {
    /// Default configuration, with some amount of work
    pub fn new(work: Work) -> Self {
        Self {
            work,
            show_rate_eta: true,
        }
    }

    /// Disable tracking of step completions
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
    /// Steps to be taken, with a precise count display
    Steps(usize),

    /// Steps to be taken, with a percentage-based display
    PercentSteps(usize),

    /// Bytes to be processed
    Bytes(u64),
}
//
impl From<Work> for u64 {
    fn from(value: Work) -> Self {
        match value {
            Work::Steps(s) | Work::PercentSteps(s) => s as u64,
            Work::Bytes(b) => b,
        }
    }
}

/// Mechanism to track progress
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    /// Progress bar for this specific operation
    bar: ProgressBar,

    /// Underlying report
    report: MultiProgress,
}
//
impl ProgressTracker {
    /// Show that a certain amount of progress has been made
    ///
    /// Returns truth that the progress bar has reached its maximum value, in
    /// which case it is removed from the report.
    pub fn make_progress(&self, progress: u64) -> bool {
        self.bar.inc(progress);
        let current = self.bar.position();
        let max = self.bar.length().unwrap_or(0);
        assert!(current <= max, "recorded more progress than expected");

        let finished = current == max;
        if finished {
            self.bar.finish_and_clear();
            self.report.remove(&self.bar);
        }
        finished
    }
}
