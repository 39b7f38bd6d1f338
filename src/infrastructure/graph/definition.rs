use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::models::{Configuration, NodeId, NodeKind};
use crate::infrastructure::document::{read_document, DocumentError};

/// One node of a tree file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: NodeId,
    #[serde(default = "default_kind")]
    pub kind: NodeKind,
    /// Linked node ids. Links only need to be listed on one side.
    #[serde(default)]
    pub links: Vec<NodeId>,
}

const fn default_kind() -> NodeKind {
    NodeKind::Travel
}

/// On-disk description of a passive tree.
///
/// ```yaml
/// nodes:
///   - { id: 1, kind: travel, links: [2, 3] }
///   - { id: 2, kind: notable }
///   - { id: 3, kind: small }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDefinition {
    pub nodes: Vec<NodeDefinition>,
}

impl TreeDefinition {
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        read_document(path)
    }
}

/// On-disk description of a starting build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDefinition {
    pub start_node: NodeId,
    #[serde(default)]
    pub allocated: Vec<NodeId>,
}

impl BuildDefinition {
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        read_document(path)
    }

    /// The initial configuration; the start node is always included.
    pub fn to_configuration(&self) -> Configuration {
        Configuration::new(self.start_node, self.allocated.iter().copied())
    }
}
