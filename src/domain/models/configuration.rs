use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::moves::Move;
use super::node::NodeId;

/// An immutable snapshot of allocated nodes rooted at a fixed start node.
///
/// Applying a move never mutates a configuration; it produces a new one.
/// Node ids are kept ordered so iteration (and therefore candidate
/// generation) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    start: NodeId,
    allocated: BTreeSet<NodeId>,
}

impl Configuration {
    /// Create a configuration. The start node is always part of the allocation.
    pub fn new(start: NodeId, allocated: impl IntoIterator<Item = NodeId>) -> Self {
        let mut allocated: BTreeSet<NodeId> = allocated.into_iter().collect();
        allocated.insert(start);
        Self { start, allocated }
    }

    /// The fixed start node.
    pub const fn start(&self) -> NodeId {
        self.start
    }

    /// Every allocated node, start included.
    pub const fn allocated(&self) -> &BTreeSet<NodeId> {
        &self.allocated
    }

    /// Whether `node` is allocated.
    pub fn contains(&self, node: NodeId) -> bool {
        self.allocated.contains(&node)
    }

    /// Number of allocated nodes, start included.
    pub fn len(&self) -> usize {
        self.allocated.len()
    }

    /// Always `false`: the start node is allocated.
    pub fn is_empty(&self) -> bool {
        self.allocated.is_empty()
    }

    /// Allocated node ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.allocated.iter().copied()
    }

    /// Derive the configuration produced by `mv`.
    pub fn apply(&self, mv: &Move) -> Self {
        let mut allocated = self.allocated.clone();
        if let Some(removed) = mv.removed_node() {
            allocated.remove(&removed);
        }
        allocated.insert(mv.added_node());
        Self {
            start: self.start,
            allocated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_always_allocated() {
        let config = Configuration::new(1, [2, 3]);
        assert!(config.contains(1));
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_apply_add_leaves_original_untouched() {
        let config = Configuration::new(1, [2]);
        let next = config.apply(&Move::Add { node: 3 });
        assert_eq!(config.len(), 2);
        assert_eq!(next.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_apply_swap() {
        let config = Configuration::new(1, [2, 3]);
        let next = config.apply(&Move::Swap { removed: 3, added: 4 });
        assert_eq!(next.iter().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(next.start(), 1);
    }
}
