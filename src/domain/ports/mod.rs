//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces external collaborators must implement:
//! - TreeGraph: adjacency, classification and connectivity of the passive tree
//! - MetricOracle: scoring of a candidate configuration
//!
//! These traits keep the optimization core independent of how the tree is
//! loaded and how stats are calculated.

pub mod metric_oracle;
pub mod tree_graph;

pub use metric_oracle::MetricOracle;
pub use tree_graph::TreeGraph;
