//! treeclimb - budget-aware hill climbing over passive skill trees
//!
//! Starting from a connected allocation of tree nodes, the optimizer
//! repeatedly applies the single move (allocate one node, or swap one node
//! for another) that most improves a caller-supplied metric. Moves spend two
//! independent budgets: free unallocated points and costly respec points.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): value types, errors and the collaborator ports
//! - **Service Layer** (`services`): neighbor generation, budget tracking,
//!   convergence detection and the hill-climbing loop
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging and
//!   file-backed implementations of the ports
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use treeclimb::domain::models::{BudgetConfig, Configuration, RespecLimit};
//! use treeclimb::infrastructure::graph::AdjacencyGraph;
//! use treeclimb::services::HillClimber;
//!
//! fn main() -> anyhow::Result<()> {
//!     let graph = AdjacencyGraph::load("tree.yaml".as_ref())?;
//!     let metric = |config: &Configuration| -> anyhow::Result<f64> { Ok(config.len() as f64) };
//!     let result = HillClimber::default().optimize(
//!         Configuration::new(1, []),
//!         &graph,
//!         BudgetConfig::new(15, RespecLimit::Limited(4)),
//!         &metric,
//!     )?;
//!     println!("{} ({})", result.convergence_reason, result.budget_summary);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    BudgetConfig, BudgetSummary, Config, Configuration, Move, MoveKind, NodeId, NodeKind,
    RespecLimit, TerminationReason,
};
pub use domain::ports::{MetricOracle, TreeGraph};
pub use domain::{OptimizerError, OptimizerResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{HillClimber, NeighborGenerator, OptimizationResult, OptimizationService};
