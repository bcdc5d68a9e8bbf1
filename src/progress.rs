//! # Progress Tracking and Statistics Module
//!
//! Progress feedback for the read-heavy phases and counters for the
//! mutating batches.
//!
//! ## Components:
//! - `ProgressManager`: `indicatif` bar while every sidecar is decoded, and
//!   a spinner while the originals tree is scanned
//! - `BatchStats`: per-batch counters printed in the final summary
//!
//! Bars are never shown while a batch is prompting; the executors log plain
//! lines instead. In JSON mode the bars are hidden.
//!
//! ## Example:
//! ```rust,ignore
//! let progress = ProgressManager::new(paths.len() as u64, false);
//! for path in &paths {
//!     progress.update(&path.display().to_string());
//! }
//! progress.finish("Sidecars classified");
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for scans
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total: u64, hidden: bool) -> Self {
        if hidden {
            return Self { bar: ProgressBar::hidden() };
        }

        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(message: &str, hidden: bool) -> ProgressBar {
        if hidden {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        spinner
    }
}

/// Counters for one move or rename batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    /// Items handed to the batch
    pub total: usize,
    /// Items already where they should be
    pub already_in_place: usize,
    /// Items moved or renamed (or that would be, in dry run)
    pub applied: usize,
    /// Items the user chose to skip
    pub skipped: usize,
    /// Items whose destination already exists
    pub conflicts: usize,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items the gate was asked about
    pub fn pending(&self) -> usize {
        self.total - self.already_in_place
    }

    pub fn merge(&mut self, other: &BatchStats) {
        self.total += other.total;
        self.already_in_place += other.already_in_place;
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.conflicts += other.conflicts;
    }

    pub fn format_summary(&self, verb: &str) -> String {
        format!(
            "{}: {} | Skipped: {} | Conflicts: {} | Already in place: {} | Total: {}",
            verb, self.applied, self.skipped, self.conflicts, self.already_in_place, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_stats_merge_and_summary() {
        let mut stats = BatchStats { total: 3, already_in_place: 1, applied: 1, skipped: 1, conflicts: 0 };
        stats.merge(&BatchStats { total: 2, already_in_place: 0, applied: 1, skipped: 0, conflicts: 1 });

        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending(), 4);
        assert_eq!(
            stats.format_summary("Moved"),
            "Moved: 2 | Skipped: 1 | Conflicts: 1 | Already in place: 1 | Total: 5"
        );
    }

    #[test]
    fn test_hidden_progress() {
        let progress = ProgressManager::new(2, true);
        progress.update("one");
        progress.update("two");
        progress.finish("done");
        assert!(ProgressManager::spinner("scan", true).is_hidden());
    }
}
