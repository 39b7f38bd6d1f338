use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

use crate::domain::models::{NodeId, NodeKind};

/// Port for the read-only passive tree graph.
///
/// Implementations are loaded once and shared between any number of
/// optimization runs, so they must be safe for concurrent reads.
///
/// # Examples
///
/// ```no_run
/// use std::collections::BTreeSet;
/// use treeclimb::domain::ports::TreeGraph;
///
/// fn frontier(graph: &dyn TreeGraph, allocated: &BTreeSet<u32>) -> BTreeSet<u32> {
///     allocated
///         .iter()
///         .flat_map(|&node| graph.adjacent(node).iter().copied())
///         .filter(|node| !allocated.contains(node))
///         .collect()
/// }
/// ```
pub trait TreeGraph: Send + Sync {
    /// Whether `node` exists in the graph.
    fn contains(&self, node: NodeId) -> bool;

    /// Nodes linked to `node`. Unknown nodes have no neighbours.
    fn adjacent(&self, node: NodeId) -> &[NodeId];

    /// Classification of `node`. Unknown nodes classify as [`NodeKind::Travel`].
    fn classify(&self, node: NodeId) -> NodeKind;

    /// Whether every node in `nodes` is reachable from `start` using only
    /// links between members of `nodes`.
    ///
    /// Returns `false` when `start` itself is not a member.
    fn is_connected(&self, nodes: &BTreeSet<NodeId>, start: NodeId) -> bool {
        if !nodes.contains(&start) {
            return false;
        }

        let mut visited: HashSet<NodeId> = HashSet::with_capacity(nodes.len());
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(node) = queue.pop_front() {
            for &neighbor in self.adjacent(node) {
                if nodes.contains(&neighbor) && visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited.len() == nodes.len()
    }
}

impl<T: TreeGraph + ?Sized> TreeGraph for Arc<T> {
    fn contains(&self, node: NodeId) -> bool {
        (**self).contains(node)
    }

    fn adjacent(&self, node: NodeId) -> &[NodeId] {
        (**self).adjacent(node)
    }

    fn classify(&self, node: NodeId) -> NodeKind {
        (**self).classify(node)
    }

    fn is_connected(&self, nodes: &BTreeSet<NodeId>, start: NodeId) -> bool {
        (**self).is_connected(nodes, start)
    }
}
