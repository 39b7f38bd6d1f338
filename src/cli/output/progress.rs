//! Progress bar utilities using indicatif for terminal output
//!
//! One bar per optimization run, advanced by the run's iteration observer.
//! Bars draw to stderr so they never mix with command output.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::services::IterationReport;

/// Style templates for different progress bar types
const PROGRESS_TEMPLATE: &str =
    "[{elapsed_precise}] {prefix:.bold} {bar:40.cyan/blue} {pos}/{len} {msg}";
const SIMPLE_PROGRESS_TEMPLATE: &str = "{prefix:.bold} {bar:40.cyan/blue} {pos}/{len} {msg}";

const PROGRESS_CHARS: &str = "█▓▒░ ";

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(PROGRESS_CHARS)
}

/// Create a standard progress bar with a steady tick
///
/// # Example
/// ```
/// use treeclimb::cli::output::progress::create_progress_bar;
///
/// let pb = create_progress_bar(100);
/// for i in 0..100 {
///     pb.set_message(format!("metric {i}"));
///     pb.inc(1);
/// }
/// pb.finish_with_message("done");
/// ```
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style(PROGRESS_TEMPLATE));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a simple progress bar without the elapsed clock or tick
pub fn create_simple_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style(SIMPLE_PROGRESS_TEMPLATE));
    pb
}

/// Extension trait for ProgressBar to add common utility methods
pub trait ProgressBarExt {
    /// Finish with a success message (green checkmark)
    fn finish_success(&self, message: impl Into<String>);

    /// Finish with an error message (red X)
    fn finish_error(&self, message: impl Into<String>);

    /// Advance to the iteration in `report` and show its metric
    fn record_iteration(&self, report: &IterationReport);
}

impl ProgressBarExt for ProgressBar {
    fn finish_success(&self, message: impl Into<String>) {
        self.finish_with_message(format!("{} {}", console::style("✓").green(), message.into()));
    }

    fn finish_error(&self, message: impl Into<String>) {
        self.finish_with_message(format!("{} {}", console::style("✗").red(), message.into()));
    }

    fn record_iteration(&self, report: &IterationReport) {
        self.set_position(u64::from(report.iteration));
        let mark = if report.applied.is_some() { "+" } else { "=" };
        self.set_message(format!("{mark} metric {:.4}", report.metric));
    }
}

/// Multi-progress manager for concurrent runs
pub struct MultiProgressManager {
    multi: MultiProgress,
}

impl MultiProgressManager {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::stderr()),
        }
    }

    /// Create a multi-progress manager with hidden output (for testing)
    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        }
    }

    /// Add a labelled progress bar to the manager
    pub fn add_progress_bar(&self, total: u64, label: impl Into<String>) -> ProgressBar {
        let pb = self.multi.add(create_simple_progress_bar(total));
        pb.set_prefix(label.into());
        pb
    }
}

impl Default for MultiProgressManager {
    fn default() -> Self {
        Self::new()
    }
}
