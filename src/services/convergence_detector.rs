//! Convergence detection over the per-iteration metric.
//!
//! The detector is a small state machine fed one scalar per iteration:
//!
//! | State                        | Condition                                   |
//! |------------------------------|---------------------------------------------|
//! | Improving                    | counter == 0                                |
//! | Stagnating                   | 1 <= counter < patience                     |
//! | Converged (no improvement)   | counter >= patience                         |
//! | Converged (diminishing)      | last improvement < `min_improvement` relative |
//!
//! Once converged the detector stays converged for the rest of the run.

use serde::{Deserialize, Serialize};

use crate::domain::models::ConvergenceReason;

/// Default consecutive non-improving iterations before stopping.
pub const DEFAULT_PATIENCE: u32 = 3;

/// Default relative improvement threshold (0.1 %).
pub const DEFAULT_MIN_IMPROVEMENT: f64 = 0.001;

/// Observable phase of the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergencePhase {
    Improving,
    Stagnating,
    Converged(ConvergenceReason),
}

/// Tracks the best metric of one run and decides when to stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceDetector {
    patience: u32,
    min_improvement: f64,
    best_metric: Option<f64>,
    stale_iterations: u32,
    reason: Option<ConvergenceReason>,
}

impl Default for ConvergenceDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PATIENCE, DEFAULT_MIN_IMPROVEMENT)
    }
}

impl ConvergenceDetector {
    /// Create a detector with explicit thresholds.
    pub const fn new(patience: u32, min_improvement: f64) -> Self {
        Self {
            patience,
            min_improvement,
            best_metric: None,
            stale_iterations: 0,
            reason: None,
        }
    }

    /// Feed the metric observed after an iteration.
    ///
    /// `None` and non-finite values carry no signal: nothing changes.
    pub fn update(&mut self, metric: impl Into<Option<f64>>) {
        let Some(metric) = metric.into().filter(|m| m.is_finite()) else {
            return;
        };

        let Some(best) = self.best_metric else {
            self.best_metric = Some(metric);
            self.stale_iterations = 0;
            return;
        };

        let delta = metric - best;
        if delta > 0.0 {
            if best != 0.0 {
                let relative_delta = delta / best.abs();
                if relative_delta < self.min_improvement {
                    self.mark_converged(ConvergenceReason::DiminishingReturns);
                }
            }
            self.best_metric = Some(metric);
            self.stale_iterations = 0;
        } else {
            self.record_stall();
        }
    }

    /// Count one iteration that made no progress, whatever the metric.
    ///
    /// Used when the current metric is non-finite, which `update` ignores.
    pub fn record_stall(&mut self) {
        self.stale_iterations += 1;
        if self.stale_iterations >= self.patience {
            self.mark_converged(ConvergenceReason::NoImprovement);
        }
    }

    fn mark_converged(&mut self, reason: ConvergenceReason) {
        if self.reason.is_none() {
            self.reason = Some(reason);
        }
    }

    /// Whether a convergence reason has been recorded.
    pub const fn has_converged(&self) -> bool {
        self.reason.is_some()
    }

    /// The first convergence reason recorded, if any.
    pub const fn reason(&self) -> Option<ConvergenceReason> {
        self.reason
    }

    /// Best finite metric observed so far.
    pub const fn best_metric(&self) -> Option<f64> {
        self.best_metric
    }

    /// Consecutive iterations without improvement.
    pub const fn stale_iterations(&self) -> u32 {
        self.stale_iterations
    }

    /// Current state of the detector.
    pub const fn phase(&self) -> ConvergencePhase {
        match self.reason {
            Some(reason) => ConvergencePhase::Converged(reason),
            None if self.stale_iterations == 0 => ConvergencePhase::Improving,
            None => ConvergencePhase::Stagnating,
        }
    }

    /// Human-readable sentence describing why the detector converged.
    pub fn convergence_reason(&self) -> Option<String> {
        self.reason.map(|reason| self.describe(reason))
    }

    pub(crate) fn describe(&self, reason: ConvergenceReason) -> String {
        match reason {
            ConvergenceReason::NoImprovement => format!(
                "Converged: no improvement for {} iterations",
                self.patience
            ),
            ConvergenceReason::DiminishingReturns => format!(
                "Converged: diminishing returns (<{}% improvement)",
                format_percent(self.min_improvement)
            ),
        }
    }

    /// Forget everything observed so far, keeping the thresholds.
    pub fn reset(&mut self) {
        *self = Self::new(self.patience, self.min_improvement);
    }
}

/// `0.001` -> `"0.1"`, `0.0005` -> `"0.05"`.
fn format_percent(fraction: f64) -> String {
    let formatted = format!("{:.4}", fraction * 100.0);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
