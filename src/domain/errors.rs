//! Domain errors for the treeclimb optimizer.

use thiserror::Error;

use super::models::NodeId;

/// Format a node list as a human-readable string: `4, 9, 12`.
fn format_nodes(nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Stage of a run in which the metric oracle was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OraclePhase {
    /// Scoring the caller's initial configuration.
    Baseline,
    /// Scoring candidate moves during the given iteration.
    Iteration(u32),
}

impl std::fmt::Display for OraclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Baseline => f.write_str("the initial configuration"),
            Self::Iteration(n) => write!(f, "candidates of iteration {n}"),
        }
    }
}

/// Errors that make an optimization run fail.
///
/// Running out of budget or candidates is not an error; those end a run
/// with a termination reason instead.
#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("Start node {0} is not in the tree")]
    UnknownStartNode(NodeId),

    #[error("Initial configuration references nodes missing from the tree: {}", format_nodes(.0))]
    UnknownNodes(Vec<NodeId>),

    #[error("Initial configuration is not connected to start node {start}; unreachable: {}", format_nodes(.unreachable))]
    DisconnectedConfiguration {
        start: NodeId,
        unreachable: Vec<NodeId>,
    },

    #[error("Metric oracle failed while scoring {phase}")]
    OracleFailed {
        phase: OraclePhase,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl OptimizerError {
    pub(crate) fn oracle(phase: OraclePhase, err: anyhow::Error) -> Self {
        Self::OracleFailed {
            phase,
            source: err.into(),
        }
    }
}

pub type OptimizerResult<T> = Result<T, OptimizerError>;
