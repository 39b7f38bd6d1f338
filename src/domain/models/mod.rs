pub mod budget;
pub mod config;
pub mod configuration;
pub mod moves;
pub mod node;
pub mod termination;

pub use budget::{BudgetConfig, BudgetState, BudgetSummary, RespecLimit};
pub use config::{Config, LoggingConfig, NeighborConfig, OptimizerConfig};
pub use configuration::Configuration;
pub use moves::{Move, MoveKind};
pub use node::{NodeId, NodeKind};
pub use termination::{ConvergenceReason, TerminationReason};
