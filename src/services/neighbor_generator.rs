//! Candidate move generation.
//!
//! Given the current configuration, the tree and a read-only view of the
//! budget, [`NeighborGenerator::generate`] returns the bounded, prioritized
//! list of moves the hill climber should score this iteration.
//!
//! Two kinds of moves exist:
//!
//! - **Add**: allocate one unallocated node adjacent to the allocation.
//! - **Swap**: deallocate one *removable* node (its removal keeps every other
//!   allocated node reachable from the start) and allocate one node adjacent
//!   to what remains.
//!
//! Every candidate's resulting node set is checked with
//! [`TreeGraph::is_connected`] before it is emitted, so applying any
//! returned move yields a configuration connected to the start node.
//!
//! With free-first prioritization (the default), Swap moves are generated
//! only once the free budget is exhausted. An empty Add set while free points
//! remain does *not* fall through to swaps.

use std::collections::BTreeSet;

use tracing::{trace, warn};

use crate::domain::models::{Configuration, Move, NeighborConfig, NodeId};
use crate::domain::ports::TreeGraph;
use crate::services::budget_tracker::BudgetTracker;
use crate::services::priority_calculator::PriorityCalculator;

/// Generates prioritized candidate moves for one iteration.
#[derive(Debug, Clone)]
pub struct NeighborGenerator {
    limits: NeighborConfig,
    prioritize_adds: bool,
    priority: PriorityCalculator,
}

impl Default for NeighborGenerator {
    fn default() -> Self {
        Self::new(NeighborConfig::default())
    }
}

impl NeighborGenerator {
    /// Create a generator with free-first prioritization enabled.
    pub const fn new(limits: NeighborConfig) -> Self {
        Self {
            limits,
            prioritize_adds: true,
            priority: PriorityCalculator::new(),
        }
    }

    /// Enable or disable free-first prioritization.
    #[must_use]
    pub const fn with_prioritize_adds(mut self, prioritize_adds: bool) -> Self {
        self.prioritize_adds = prioritize_adds;
        self
    }

    /// Candidate caps in use.
    pub const fn limits(&self) -> NeighborConfig {
        self.limits
    }

    /// Whether swaps wait for free points to run out.
    pub const fn prioritize_adds(&self) -> bool {
        self.prioritize_adds
    }

    /// Generate the candidate moves for `config`, best first.
    ///
    /// Returns an empty list when both budgets are exhausted or when no
    /// structurally valid candidate exists. The list never exceeds
    /// `max_total_moves`.
    pub fn generate(
        &self,
        config: &Configuration,
        graph: &dyn TreeGraph,
        budget: &BudgetTracker,
    ) -> Vec<Move> {
        let (want_adds, want_swaps) = if self.prioritize_adds {
            if budget.can_allocate() {
                (true, false)
            } else {
                (false, budget.can_swap())
            }
        } else {
            (budget.can_allocate(), budget.can_swap())
        };

        let adds = if want_adds {
            self.priority
                .prioritize(graph, self.add_moves(config, graph), self.limits.max_add_moves)
        } else {
            Vec::new()
        };

        let swaps = if want_swaps {
            self.priority
                .prioritize(graph, self.swap_moves(config, graph), self.limits.max_swap_moves)
        } else {
            Vec::new()
        };

        trace!(
            adds = adds.len(),
            swaps = swaps.len(),
            can_allocate = budget.can_allocate(),
            can_swap = budget.can_swap(),
            "generated candidate moves"
        );

        let mut moves = if swaps.is_empty() {
            adds
        } else if adds.is_empty() {
            swaps
        } else {
            let mut merged = adds;
            merged.extend(swaps);
            self.priority.sort(graph, &mut merged);
            merged
        };
        moves.truncate(self.limits.max_total_moves);
        moves
    }

    /// All valid Add moves, unordered.
    fn add_moves(&self, config: &Configuration, graph: &dyn TreeGraph) -> Vec<Move> {
        let start = config.start();
        let mut scratch = config.allocated().clone();
        let mut moves = Vec::new();

        for node in frontier(graph, &scratch, None) {
            scratch.insert(node);
            if graph.is_connected(&scratch, start) {
                moves.push(Move::Add { node });
            } else {
                // Unreachable unless the current configuration is itself disconnected.
                warn!(node, start, "rejected add candidate that disconnects the allocation");
            }
            scratch.remove(&node);
        }

        moves
    }

    /// All valid Swap moves, unordered.
    fn swap_moves(&self, config: &Configuration, graph: &dyn TreeGraph) -> Vec<Move> {
        let start = config.start();
        let mut scratch = config.allocated().clone();
        let mut moves = Vec::new();

        for removed in config.iter().filter(|&node| node != start) {
            scratch.remove(&removed);

            if graph.is_connected(&scratch, start) {
                for added in frontier(graph, &scratch, Some(removed)) {
                    scratch.insert(added);
                    if graph.is_connected(&scratch, start) {
                        moves.push(Move::Swap { removed, added });
                    }
                    scratch.remove(&added);
                }
            }

            scratch.insert(removed);
        }

        moves
    }
}

/// Unallocated nodes adjacent to at least one node of `allocated`, in id order.
fn frontier(
    graph: &dyn TreeGraph,
    allocated: &BTreeSet<NodeId>,
    exclude: Option<NodeId>,
) -> BTreeSet<NodeId> {
    allocated
        .iter()
        .flat_map(|&node| graph.adjacent(node).iter().copied())
        .filter(|node| !allocated.contains(node) && Some(*node) != exclude)
        .collect()
}
