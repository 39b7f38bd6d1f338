use std::cmp::{Ordering, Reverse};

use crate::domain::models::{Move, MoveKind};
use crate::domain::ports::TreeGraph;

/// Service for ordering candidate moves by the value of what they allocate
///
/// Ordering, most promising first:
/// 1. value score of the added node (descending)
/// 2. Add before Swap
/// 3. value score of the removed node (ascending, swaps only)
/// 4. added node id (ascending)
/// 5. removed node id (ascending)
///
/// The result is a total order on distinct moves, so sorting is
/// reproducible run to run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityCalculator;

/// Sort key for a move. Smaller keys sort first.
type MoveKey = (Reverse<u8>, u8, u8, u32, u32);

impl PriorityCalculator {
    pub const fn new() -> Self {
        Self
    }

    /// Value score of the node a move allocates
    pub fn value(&self, graph: &dyn TreeGraph, mv: &Move) -> u8 {
        graph.classify(mv.added_node()).value_score()
    }

    fn key(&self, graph: &dyn TreeGraph, mv: &Move) -> MoveKey {
        let kind_rank = match mv.kind() {
            MoveKind::Add => 0,
            MoveKind::Swap => 1,
        };
        let removed_value = mv
            .removed_node()
            .map_or(0, |node| graph.classify(node).value_score());
        (
            Reverse(self.value(graph, mv)),
            kind_rank,
            removed_value,
            mv.added_node(),
            mv.removed_node().unwrap_or(0),
        )
    }

    /// Compare two moves by priority (`Less` means `a` goes first)
    pub fn compare(&self, graph: &dyn TreeGraph, a: &Move, b: &Move) -> Ordering {
        self.key(graph, a).cmp(&self.key(graph, b))
    }

    /// Sort moves in place, most promising first
    pub fn sort(&self, graph: &dyn TreeGraph, moves: &mut [Move]) {
        moves.sort_by_cached_key(|mv| self.key(graph, mv));
    }

    /// Sort moves and keep at most `limit` of them
    pub fn prioritize(&self, graph: &dyn TreeGraph, mut moves: Vec<Move>, limit: usize) -> Vec<Move> {
        self.sort(graph, &mut moves);
        moves.truncate(limit);
        moves
    }
}
