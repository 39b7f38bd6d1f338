pub mod budget_tracker;
pub mod convergence_detector;
pub mod hill_climber;
pub mod neighbor_generator;
pub mod optimization_service;
pub mod priority_calculator;

pub use budget_tracker::BudgetTracker;
pub use convergence_detector::{ConvergenceDetector, ConvergencePhase};
pub use hill_climber::{
    validate_configuration, ClimbSettings, HillClimber, IterationReport, OptimizationResult,
};
pub use neighbor_generator::NeighborGenerator;
pub use optimization_service::{JobOutcome, OptimizationJob, OptimizationService};
pub use priority_calculator::PriorityCalculator;
