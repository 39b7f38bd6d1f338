//! Dual-budget tracker.
//!
//! Tracks consumption of the two independent budgets an optimization run
//! spends: free *unallocated* points (spent by Add moves) and costly *respec*
//! points (spent by Swap moves, possibly unlimited).
//!
//! The tracker is a plain value owned by one run. The neighbor generator only
//! reads it through the query methods; the hill climber is the only caller of
//! [`commit`](BudgetTracker::commit) and the two consume operations.
//!
//! Over-consumption is a programming error and panics: candidates are
//! filtered against the same queries before they can be committed.

use crate::domain::models::{BudgetConfig, BudgetState, BudgetSummary, Move, RespecLimit};

/// Budget queries and consumption for a single optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetTracker {
    state: BudgetState,
}

impl BudgetTracker {
    /// Create a tracker with nothing consumed yet.
    pub const fn new(config: BudgetConfig) -> Self {
        Self {
            state: BudgetState::from_config(config),
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Point-in-time copy of the four counters.
    pub const fn state(&self) -> BudgetState {
        self.state
    }

    /// Free points still available.
    pub const fn unallocated_remaining(&self) -> u32 {
        self.state.unallocated_available - self.state.unallocated_used
    }

    /// Respec points still available, or `None` when unlimited.
    pub const fn respec_remaining(&self) -> Option<u32> {
        match self.state.respec_available {
            RespecLimit::Limited(available) => Some(available - self.state.respec_used),
            RespecLimit::Unlimited => None,
        }
    }

    /// Whether an Add move can still be paid for.
    pub const fn can_allocate(&self) -> bool {
        self.unallocated_remaining() > 0
    }

    /// Whether a Swap move can still be paid for.
    pub const fn can_swap(&self) -> bool {
        match self.respec_remaining() {
            Some(remaining) => remaining > 0,
            None => true,
        }
    }

    /// Whether both components of `mv`'s cost fit in the remaining budget.
    pub fn can_afford(&self, mv: &Move) -> bool {
        let unallocated_ok = mv.unallocated_cost() <= self.unallocated_remaining();
        let respec_ok = self
            .respec_remaining()
            .is_none_or(|remaining| mv.respec_cost() <= remaining);
        unallocated_ok && respec_ok
    }

    /// Free/costly usage breakdown for reporting.
    pub const fn summary(&self) -> BudgetSummary {
        BudgetSummary {
            unallocated_used: self.state.unallocated_used,
            unallocated_available: self.state.unallocated_available,
            respec_used: self.state.respec_used,
            respec_available: match self.state.respec_available {
                RespecLimit::Limited(available) => Some(available),
                RespecLimit::Unlimited => None,
            },
        }
    }

    // -------------------------------------------------------------------------
    // Consumption
    // -------------------------------------------------------------------------

    /// Spend `n` free points.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` free points remain.
    pub fn consume_unallocated(&mut self, n: u32) {
        assert!(
            n <= self.unallocated_remaining(),
            "unallocated budget over-consumed: {} used + {n} > {} available",
            self.state.unallocated_used,
            self.state.unallocated_available,
        );
        self.state.unallocated_used += n;
    }

    /// Spend `n` respec points.
    ///
    /// # Panics
    ///
    /// Panics if the respec budget is limited and fewer than `n` points remain.
    pub fn consume_respec(&mut self, n: u32) {
        if let Some(remaining) = self.respec_remaining() {
            assert!(
                n <= remaining,
                "respec budget over-consumed: {} used + {n} > {} available",
                self.state.respec_used,
                self.state.respec_available,
            );
        }
        self.state.respec_used += n;
    }

    /// Spend the full cost of a committed move.
    pub fn commit(&mut self, mv: &Move) {
        self.consume_unallocated(mv.unallocated_cost());
        self.consume_respec(mv.respec_cost());
    }
}
