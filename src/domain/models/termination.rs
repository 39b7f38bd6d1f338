use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the convergence detector considers a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceReason {
    /// The metric failed to improve for `patience` consecutive iterations.
    NoImprovement,
    /// An improvement was observed but fell below the relative threshold.
    DiminishingReturns,
}

impl From<ConvergenceReason> for TerminationReason {
    fn from(reason: ConvergenceReason) -> Self {
        match reason {
            ConvergenceReason::NoImprovement => Self::NoImprovement,
            ConvergenceReason::DiminishingReturns => Self::DiminishingReturns,
        }
    }
}

/// Why an optimization run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    NoImprovement,
    DiminishingReturns,
    NoValidNeighbors,
    MaxIterations,
    Timeout,
}

impl TerminationReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoImprovement => "no_improvement",
            Self::DiminishingReturns => "diminishing_returns",
            Self::NoValidNeighbors => "no_valid_neighbors",
            Self::MaxIterations => "max_iterations",
            Self::Timeout => "timeout",
        }
    }

    /// Whether the run stopped because the search itself ran out of progress,
    /// as opposed to hitting an external limit.
    pub const fn is_convergence(self) -> bool {
        matches!(
            self,
            Self::NoImprovement | Self::DiminishingReturns | Self::NoValidNeighbors
        )
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
