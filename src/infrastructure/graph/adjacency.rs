use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::definition::TreeDefinition;
use crate::domain::models::{NodeId, NodeKind};
use crate::domain::ports::TreeGraph;
use crate::infrastructure::document::DocumentError;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Tree has no nodes")]
    Empty,

    #[error("Node {0} is defined more than once")]
    DuplicateNode(NodeId),

    #[error("Node {from} links to undefined node {to}")]
    UnknownLink { from: NodeId, to: NodeId },

    #[error("Node {0} links to itself")]
    SelfLink(NodeId),
}

#[derive(Debug, Clone)]
struct NodeEntry {
    kind: NodeKind,
    links: Vec<NodeId>,
}

/// Undirected in-memory passive tree.
///
/// Links are symmetrised on construction and each adjacency list is sorted,
/// so traversal order does not depend on how the input listed them.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    nodes: HashMap<NodeId, NodeEntry>,
}

impl AdjacencyGraph {
    pub fn from_definition(definition: &TreeDefinition) -> Result<Self, GraphError> {
        if definition.nodes.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut entries: BTreeMap<NodeId, NodeEntry> = BTreeMap::new();
        for node in &definition.nodes {
            match entries.entry(node.id) {
                Entry::Occupied(_) => return Err(GraphError::DuplicateNode(node.id)),
                Entry::Vacant(slot) => {
                    slot.insert(NodeEntry {
                        kind: node.kind,
                        links: Vec::new(),
                    });
                }
            }
        }

        for node in &definition.nodes {
            for &to in &node.links {
                if to == node.id {
                    return Err(GraphError::SelfLink(to));
                }
                if !entries.contains_key(&to) {
                    return Err(GraphError::UnknownLink { from: node.id, to });
                }
                if let Some(entry) = entries.get_mut(&node.id) {
                    entry.links.push(to);
                }
                if let Some(entry) = entries.get_mut(&to) {
                    entry.links.push(node.id);
                }
            }
        }

        for entry in entries.values_mut() {
            entry.links.sort_unstable();
            entry.links.dedup();
        }

        let graph = Self {
            nodes: entries.into_iter().collect(),
        };
        debug!(nodes = graph.len(), edges = graph.edge_count(), "loaded tree graph");
        Ok(graph)
    }

    /// Load a tree from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let definition = TreeDefinition::load(path)?;
        Self::from_definition(&definition)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|entry| entry.links.len()).sum::<usize>() / 2
    }
}

impl TreeGraph for AdjacencyGraph {
    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn adjacent(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|entry| entry.links.as_slice())
            .unwrap_or(&[])
    }

    fn classify(&self, node: NodeId) -> NodeKind {
        self.nodes
            .get(&node)
            .map_or(NodeKind::Travel, |entry| entry.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::graph::definition::NodeDefinition;
    use std::collections::BTreeSet;
    use std::io::Write;

    fn node(id: NodeId, kind: NodeKind, links: &[NodeId]) -> NodeDefinition {
        NodeDefinition {
            id,
            kind,
            links: links.to_vec(),
        }
    }

    fn definition(nodes: Vec<NodeDefinition>) -> TreeDefinition {
        TreeDefinition { nodes }
    }

    #[test]
    fn test_links_are_symmetrised() {
        let graph = AdjacencyGraph::from_definition(&definition(vec![
            node(1, NodeKind::Travel, &[3, 2]),
            node(2, NodeKind::Notable, &[1]),
            node(3, NodeKind::Small, &[]),
        ]))
        .unwrap();

        assert_eq!(graph.adjacent(1), &[2, 3]);
        assert_eq!(graph.adjacent(2), &[1]);
        assert_eq!(graph.adjacent(3), &[1]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.classify(2), NodeKind::Notable);
    }

    #[test]
    fn test_unknown_node_queries() {
        let graph =
            AdjacencyGraph::from_definition(&definition(vec![node(1, NodeKind::Small, &[])]))
                .unwrap();
        assert!(!graph.contains(9));
        assert!(graph.adjacent(9).is_empty());
        assert_eq!(graph.classify(9), NodeKind::Travel);
    }

    #[test]
    fn test_rejects_invalid_definitions() {
        assert!(matches!(
            AdjacencyGraph::from_definition(&definition(vec![])),
            Err(GraphError::Empty)
        ));
        assert!(matches!(
            AdjacencyGraph::from_definition(&definition(vec![
                node(1, NodeKind::Small, &[]),
                node(1, NodeKind::Notable, &[]),
            ])),
            Err(GraphError::DuplicateNode(1))
        ));
        assert!(matches!(
            AdjacencyGraph::from_definition(&definition(vec![node(1, NodeKind::Small, &[5])])),
            Err(GraphError::UnknownLink { from: 1, to: 5 })
        ));
        assert!(matches!(
            AdjacencyGraph::from_definition(&definition(vec![node(1, NodeKind::Small, &[1])])),
            Err(GraphError::SelfLink(1))
        ));
    }

    #[test]
    fn test_connectivity_is_restricted_to_member_nodes() {
        // 1 - 2 - 3
        let graph = AdjacencyGraph::from_definition(&definition(vec![
            node(1, NodeKind::Travel, &[2]),
            node(2, NodeKind::Travel, &[3]),
            node(3, NodeKind::Travel, &[]),
        ]))
        .unwrap();

        assert!(graph.is_connected(&BTreeSet::from([1, 2, 3]), 1));
        assert!(!graph.is_connected(&BTreeSet::from([1, 3]), 1));
        assert!(!graph.is_connected(&BTreeSet::from([2, 3]), 1));
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "nodes:\n  - {{ id: 1, links: [2] }}\n  - {{ id: 2, kind: keystone }}"
        )
        .unwrap();
        file.flush().unwrap();

        let graph = AdjacencyGraph::load(file.path()).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.classify(2), NodeKind::Keystone);
    }
}
