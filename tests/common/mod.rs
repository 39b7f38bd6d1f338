//! Common test utilities for integration tests
//!
//! Provides an in-memory tree graph and a few fixture trees shared across
//! the integration test files.

#![allow(dead_code)]

use std::collections::HashMap;

use treeclimb::domain::models::{NodeId, NodeKind};
use treeclimb::domain::ports::TreeGraph;

/// Undirected in-memory graph for tests
#[derive(Debug, Clone, Default)]
pub struct TestGraph {
    links: HashMap<NodeId, Vec<NodeId>>,
    kinds: HashMap<NodeId, NodeKind>,
}

impl TestGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with no links
    pub fn node(mut self, id: NodeId, kind: NodeKind) -> Self {
        self.links.entry(id).or_default();
        self.kinds.insert(id, kind);
        self
    }

    /// Link two nodes, creating them as Travel nodes if missing
    pub fn edge(mut self, a: NodeId, b: NodeId) -> Self {
        self.links.entry(a).or_default().push(b);
        self.links.entry(b).or_default().push(a);
        self
    }

    pub fn edges(self, edges: &[(NodeId, NodeId)]) -> Self {
        edges.iter().fold(self, |graph, &(a, b)| graph.edge(a, b))
    }

    pub fn node_count(&self) -> usize {
        self.links.len()
    }
}

impl TreeGraph for TestGraph {
    fn contains(&self, node: NodeId) -> bool {
        self.links.contains_key(&node)
    }

    fn adjacent(&self, node: NodeId) -> &[NodeId] {
        self.links.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    fn classify(&self, node: NodeId) -> NodeKind {
        self.kinds.get(&node).copied().unwrap_or(NodeKind::Travel)
    }
}

/// Kind assigned by node id, used by generated trees
pub fn kind_for(id: NodeId) -> NodeKind {
    match id % 7 {
        0 => NodeKind::Notable,
        3 => NodeKind::Keystone,
        1 | 4 | 5 => NodeKind::Small,
        _ => NodeKind::Travel,
    }
}

/// Tree from a parent list: node `i + 1` hangs off `parents[i]` (taken
/// modulo the nodes created so far), node 0 is the root. `extra` adds
/// cross links, producing cycles.
pub fn tree_from_parents(parents: &[u32], extra: &[(u32, u32)]) -> TestGraph {
    let mut graph = TestGraph::new().node(0, kind_for(0));
    for (index, &parent) in parents.iter().enumerate() {
        let id = NodeId::try_from(index + 1).unwrap_or(NodeId::MAX);
        graph = graph.node(id, kind_for(id)).edge(parent % id, id);
    }
    let count = NodeId::try_from(parents.len() + 1).unwrap_or(NodeId::MAX);
    for &(a, b) in extra {
        let (a, b) = (a % count, b % count);
        if a != b {
            graph = graph.edge(a, b);
        }
    }
    graph
}

/// Connected allocation: the first `size` nodes in BFS order from 0
pub fn connected_prefix(graph: &TestGraph, size: usize) -> Vec<NodeId> {
    let mut order = vec![0];
    let mut seen = std::collections::HashSet::from([0]);
    let mut cursor = 0;
    while cursor < order.len() && order.len() < size {
        let mut next: Vec<NodeId> = graph.adjacent(order[cursor]).to_vec();
        next.sort_unstable();
        for neighbor in next {
            if order.len() < size && seen.insert(neighbor) {
                order.push(neighbor);
            }
        }
        cursor += 1;
    }
    order
}

/// Setup test logging
///
/// Call at the beginning of tests that want tracing output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
