//! In-memory passive tree graph loaded from JSON or YAML.

pub mod adjacency;
pub mod definition;

pub use adjacency::{AdjacencyGraph, GraphError};
pub use definition::{BuildDefinition, NodeDefinition, TreeDefinition};
