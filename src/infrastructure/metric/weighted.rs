use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::{Configuration, NodeId, NodeKind};
use crate::domain::ports::{MetricOracle, TreeGraph};
use crate::infrastructure::document::{read_document, DocumentError};

#[derive(Error, Debug)]
pub enum MetricError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Weight for {key} is not finite: {value}")]
    InvalidWeight { key: String, value: f64 },

    #[error("Node {0} has no weight and strict weighting is enabled")]
    Unweighted(NodeId),
}

/// Weight table for [`WeightedSumMetric`].
///
/// A node's weight is looked up by id first, then by classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatWeights {
    #[serde(default)]
    pub nodes: BTreeMap<NodeId, f64>,

    #[serde(default)]
    pub kinds: BTreeMap<NodeKind, f64>,

    /// Fail evaluation when an allocated node has neither weight
    #[serde(default)]
    pub strict: bool,
}

impl StatWeights {
    pub fn load(path: &Path) -> Result<Self, MetricError> {
        let weights: Self = read_document(path)?;
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), MetricError> {
        let by_node = self.nodes.iter().map(|(id, w)| (format!("node {id}"), *w));
        let by_kind = self.kinds.iter().map(|(kind, w)| (format!("kind {kind}"), *w));
        match by_node.chain(by_kind).find(|(_, w)| !w.is_finite()) {
            Some((key, value)) => Err(MetricError::InvalidWeight { key, value }),
            None => Ok(()),
        }
    }

    fn weight(&self, node: NodeId, kind: NodeKind) -> Option<f64> {
        self.nodes
            .get(&node)
            .or_else(|| self.kinds.get(&kind))
            .copied()
    }
}

/// Metric oracle scoring a configuration as the sum of its node weights.
///
/// Holds its own handle to the tree for classification, so it can be
/// shared across runs alongside the graph.
pub struct WeightedSumMetric<G> {
    graph: G,
    weights: StatWeights,
}

impl<G: TreeGraph> WeightedSumMetric<G> {
    pub const fn new(graph: G, weights: StatWeights) -> Self {
        Self { graph, weights }
    }

    pub const fn weights(&self) -> &StatWeights {
        &self.weights
    }
}

impl<G: TreeGraph> MetricOracle for WeightedSumMetric<G> {
    fn evaluate(&self, config: &Configuration) -> anyhow::Result<f64> {
        let mut total = 0.0;
        for node in config.iter() {
            match self.weights.weight(node, self.graph.classify(node)) {
                Some(weight) => total += weight,
                None if self.weights.strict => return Err(MetricError::Unweighted(node).into()),
                None => {}
            }
        }
        Ok(total)
    }
}
