//! Candidate moves over a passive tree allocation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::NodeId;

/// Discriminant of a [`Move`], used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Add,
    Swap,
}

impl MoveKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Swap => "swap",
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single local change to an allocation.
///
/// Each variant fixes its own cost: an `Add` spends one free point, a `Swap`
/// spends one respec point. Moves are immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Move {
    /// Allocate one unallocated node adjacent to the current allocation.
    Add { node: NodeId },
    /// Deallocate `removed` and allocate `added` in the same step.
    Swap { removed: NodeId, added: NodeId },
}

impl Move {
    pub const fn kind(&self) -> MoveKind {
        match self {
            Self::Add { .. } => MoveKind::Add,
            Self::Swap { .. } => MoveKind::Swap,
        }
    }

    /// The node this move allocates.
    pub const fn added_node(&self) -> NodeId {
        match *self {
            Self::Add { node } => node,
            Self::Swap { added, .. } => added,
        }
    }

    /// The node this move deallocates, if any.
    pub const fn removed_node(&self) -> Option<NodeId> {
        match *self {
            Self::Add { .. } => None,
            Self::Swap { removed, .. } => Some(removed),
        }
    }

    pub fn nodes_added(&self) -> Vec<NodeId> {
        vec![self.added_node()]
    }

    pub fn nodes_removed(&self) -> Vec<NodeId> {
        self.removed_node().into_iter().collect()
    }

    /// Free (unallocated) points this move consumes.
    pub const fn unallocated_cost(&self) -> u32 {
        match self {
            Self::Add { .. } => 1,
            Self::Swap { .. } => 0,
        }
    }

    /// Respec points this move consumes.
    pub const fn respec_cost(&self) -> u32 {
        match self {
            Self::Add { .. } => 0,
            Self::Swap { .. } => 1,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { node } => write!(f, "add({node})"),
            Self::Swap { removed, added } => write!(f, "swap({removed} -> {added})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_costs() {
        let mv = Move::Add { node: 7 };
        assert_eq!(mv.unallocated_cost(), 1);
        assert_eq!(mv.respec_cost(), 0);
        assert_eq!(mv.nodes_added(), vec![7]);
        assert!(mv.nodes_removed().is_empty());
        assert_eq!(mv.kind(), MoveKind::Add);
    }

    #[test]
    fn test_swap_costs() {
        let mv = Move::Swap { removed: 3, added: 9 };
        assert_eq!(mv.unallocated_cost(), 0);
        assert_eq!(mv.respec_cost(), 1);
        assert_eq!(mv.nodes_added(), vec![9]);
        assert_eq!(mv.nodes_removed(), vec![3]);
        assert_eq!(mv.kind(), MoveKind::Swap);
    }

    #[test]
    fn test_display() {
        assert_eq!(Move::Add { node: 2 }.to_string(), "add(2)");
        assert_eq!(Move::Swap { removed: 4, added: 5 }.to_string(), "swap(4 -> 5)");
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_value(Move::Swap { removed: 1, added: 2 }).unwrap();
        assert_eq!(json["kind"], "swap");
        assert_eq!(json["removed"], 1);
        assert_eq!(json["added"], 2);
    }
}
