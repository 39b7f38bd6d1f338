//! HillClimber - budget-aware local search over a passive tree allocation
//!
//! Each iteration:
//! 1. asks the [`NeighborGenerator`] for candidate moves (empty list ends the
//!    run with `no_valid_neighbors`, bypassing convergence detection)
//! 2. scores every candidate's resulting configuration with the metric oracle
//! 3. applies the candidate with the strictly greatest improvement, if any,
//!    committing its cost to the budget
//! 4. feeds the resulting metric to the [`ConvergenceDetector`]; a stalled
//!    iteration on a non-finite metric is recorded as a stall instead
//! 5. stops on convergence, the iteration limit or the wall-clock limit
//!
//! The loop is synchronous. Limits are polled between iterations, never
//! inside an oracle call. Oracle errors abort the run unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::domain::errors::{OptimizerError, OptimizerResult, OraclePhase};
use crate::domain::models::{
    BudgetConfig, BudgetSummary, Config, Configuration, Move, NeighborConfig, NodeId,
    TerminationReason,
};
use crate::domain::ports::{MetricOracle, TreeGraph};
use crate::services::budget_tracker::BudgetTracker;
use crate::services::convergence_detector::ConvergenceDetector;
use crate::services::neighbor_generator::NeighborGenerator;

/// Settings for one optimization run
#[derive(Debug, Clone, PartialEq)]
pub struct ClimbSettings {
    /// Maximum iterations (at least one iteration always runs)
    pub max_iterations: u32,

    /// Wall-clock limit, checked between iterations
    pub timeout: Duration,

    /// Consecutive non-improving iterations before converging
    pub patience: u32,

    /// Relative improvement below which the run converges
    pub min_improvement: f64,

    /// Spend free points before considering swaps
    pub prioritize_adds: bool,

    /// Candidate move caps
    pub neighbors: NeighborConfig,
}

impl Default for ClimbSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ClimbSettings {
    /// Build settings from the loaded application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_iterations: config.optimizer.max_iterations,
            timeout: Duration::from_secs(config.optimizer.timeout_secs),
            patience: config.optimizer.patience,
            min_improvement: config.optimizer.min_improvement,
            prioritize_adds: config.optimizer.prioritize_adds,
            neighbors: config.neighbors,
        }
    }
}

/// Outcome of a single iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationReport {
    /// 1-based iteration number
    pub iteration: u32,

    /// Candidate moves scored this iteration
    pub candidates_evaluated: usize,

    /// Metric of the configuration after this iteration
    pub metric: f64,

    /// The move applied, if any candidate improved the metric
    pub applied: Option<Move>,
}

/// Final result of an optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Identifier of the run, also recorded on its tracing span
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Best configuration found
    pub final_configuration: Configuration,
    /// Iterations that scored at least one candidate
    pub iterations: u32,
    /// Why the run stopped
    pub termination: TerminationReason,
    /// Human-readable explanation of `termination`
    pub convergence_reason: String,
    /// Budget consumed by the applied moves
    pub budget_summary: BudgetSummary,
    /// Metric of the initial configuration
    pub initial_metric: f64,
    /// Metric of `final_configuration`
    pub final_metric: f64,
    /// Moves applied, in order
    pub applied_moves: Vec<Move>,
    /// One report per iteration
    pub history: Vec<IterationReport>,
    /// Wall-clock duration of the run
    pub elapsed_ms: u64,
}

impl OptimizationResult {
    /// Final metric minus initial metric
    pub fn improvement(&self) -> f64 {
        self.final_metric - self.initial_metric
    }
}

/// Hill-climbing optimizer
///
/// Holds only immutable settings; every call to [`optimize`](Self::optimize)
/// owns its own configuration, budget and convergence state, so one climber
/// can serve any number of runs.
///
/// # Examples
///
/// ```no_run
/// use treeclimb::domain::models::{BudgetConfig, Configuration, RespecLimit};
/// use treeclimb::domain::ports::TreeGraph;
/// use treeclimb::services::HillClimber;
///
/// fn run(graph: &dyn TreeGraph) -> anyhow::Result<()> {
///     let climber = HillClimber::default();
///     let oracle = |config: &Configuration| -> anyhow::Result<f64> { Ok(config.len() as f64) };
///     let result = climber.optimize(
///         Configuration::new(1, []),
///         graph,
///         BudgetConfig::new(10, RespecLimit::Limited(2)),
///         &oracle,
///     )?;
///     println!("{} after {} iterations", result.convergence_reason, result.iterations);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HillClimber {
    settings: ClimbSettings,
    generator: NeighborGenerator,
}

impl Default for HillClimber {
    fn default() -> Self {
        Self::new(ClimbSettings::default())
    }
}

impl HillClimber {
    /// Create a climber whose generator follows `settings`
    pub fn new(settings: ClimbSettings) -> Self {
        let generator =
            NeighborGenerator::new(settings.neighbors).with_prioritize_adds(settings.prioritize_adds);
        Self {
            settings,
            generator,
        }
    }

    /// Settings every run uses
    pub const fn settings(&self) -> &ClimbSettings {
        &self.settings
    }

    /// Candidate generator built from the settings
    pub const fn generator(&self) -> &NeighborGenerator {
        &self.generator
    }

    /// Optimize `initial` within `budget`
    pub fn optimize(
        &self,
        initial: Configuration,
        graph: &dyn TreeGraph,
        budget: BudgetConfig,
        oracle: &dyn MetricOracle,
    ) -> OptimizerResult<OptimizationResult> {
        self.optimize_with_observer(initial, graph, budget, oracle, &mut |_| {})
    }

    /// Optimize `initial`, calling `observer` after every iteration
    pub fn optimize_with_observer(
        &self,
        initial: Configuration,
        graph: &dyn TreeGraph,
        budget: BudgetConfig,
        oracle: &dyn MetricOracle,
        observer: &mut dyn FnMut(&IterationReport),
    ) -> OptimizerResult<OptimizationResult> {
        let run_id = Uuid::new_v4();
        let span = info_span!("optimize", run_id = %run_id);
        let _entered = span.enter();

        let started = Instant::now();
        let started_at = Utc::now();

        validate_configuration(&initial, graph)?;

        let mut budget = BudgetTracker::new(budget);
        let mut detector =
            ConvergenceDetector::new(self.settings.patience, self.settings.min_improvement);

        let initial_metric = oracle
            .evaluate(&initial)
            .map_err(|err| OptimizerError::oracle(OraclePhase::Baseline, err))?;
        if !initial_metric.is_finite() {
            warn!(metric = initial_metric, "initial configuration scored a non-finite metric");
        }
        detector.update(initial_metric);

        info!(
            nodes = initial.len(),
            metric = initial_metric,
            budget = %budget.summary(),
            max_iterations = self.settings.max_iterations,
            "starting optimization"
        );

        let mut current = initial;
        let mut current_metric = initial_metric;
        let mut iterations: u32 = 0;
        let mut applied_moves = Vec::new();
        let mut history = Vec::new();

        let termination = loop {
            let candidates = self.generator.generate(&current, graph, &budget);
            if candidates.is_empty() {
                break TerminationReason::NoValidNeighbors;
            }

            iterations += 1;
            // Any finite candidate improves on a NaN metric.
            let baseline = if current_metric.is_nan() {
                f64::NEG_INFINITY
            } else {
                current_metric
            };
            let best = select_best(&current, baseline, &candidates, oracle, iterations)?;

            let applied = match best {
                Some((mv, next, metric)) => {
                    assert!(
                        graph.is_connected(next.allocated(), next.start()),
                        "move {mv} produced a configuration disconnected from start node {}",
                        next.start()
                    );
                    budget.commit(&mv);
                    debug!(
                        iteration = iterations,
                        %mv,
                        metric,
                        gain = metric - current_metric,
                        "applied move"
                    );
                    current = next;
                    current_metric = metric;
                    applied_moves.push(mv);
                    Some(mv)
                }
                None => None,
            };
            if applied.is_none() && !current_metric.is_finite() {
                detector.record_stall();
            } else {
                detector.update(current_metric);
            }

            let report = IterationReport {
                iteration: iterations,
                candidates_evaluated: candidates.len(),
                metric: current_metric,
                applied,
            };
            debug!(
                iteration = iterations,
                candidates = candidates.len(),
                metric = current_metric,
                improved = applied.is_some(),
                stale = detector.stale_iterations(),
                "iteration complete"
            );
            observer(&report);
            history.push(report);

            if let Some(reason) = detector.reason() {
                break reason.into();
            }
            if iterations >= self.settings.max_iterations {
                break TerminationReason::MaxIterations;
            }
            if started.elapsed() >= self.settings.timeout {
                break TerminationReason::Timeout;
            }
        };

        let elapsed = started.elapsed();
        let convergence_reason = self.describe(termination, &detector, elapsed);
        let budget_summary = budget.summary();

        info!(
            iterations,
            reason = %termination,
            final_metric = current_metric,
            moves = applied_moves.len(),
            budget = %budget_summary,
            elapsed_ms = elapsed.as_millis(),
            "optimization finished"
        );

        Ok(OptimizationResult {
            run_id,
            started_at,
            final_configuration: current,
            iterations,
            termination,
            convergence_reason,
            budget_summary,
            initial_metric,
            final_metric: current_metric,
            applied_moves,
            history,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        })
    }

    fn describe(
        &self,
        termination: TerminationReason,
        detector: &ConvergenceDetector,
        elapsed: Duration,
    ) -> String {
        match termination {
            TerminationReason::NoImprovement | TerminationReason::DiminishingReturns => detector
                .convergence_reason()
                .unwrap_or_else(|| termination.to_string()),
            TerminationReason::NoValidNeighbors => {
                "Converged: no valid neighbors (budget exhausted or no connected moves)".to_string()
            }
            TerminationReason::MaxIterations => format!(
                "Stopped: reached maximum of {} iterations",
                self.settings.max_iterations
            ),
            TerminationReason::Timeout => {
                format!("Stopped: timeout after {:.1}s", elapsed.as_secs_f64())
            }
        }
    }
}

/// Score every candidate and return the first one with the strictly greatest
/// metric above `baseline`. Candidates arrive in priority order, so equal
/// metrics resolve to the higher-priority move.
fn select_best(
    current: &Configuration,
    baseline: f64,
    candidates: &[Move],
    oracle: &dyn MetricOracle,
    iteration: u32,
) -> OptimizerResult<Option<(Move, Configuration, f64)>> {
    let mut best: Option<(Move, Configuration, f64)> = None;
    let mut best_metric = baseline;

    for mv in candidates {
        let candidate = current.apply(mv);
        let metric = oracle
            .evaluate(&candidate)
            .map_err(|err| OptimizerError::oracle(OraclePhase::Iteration(iteration), err))?;

        if metric > best_metric {
            best_metric = metric;
            best = Some((*mv, candidate, metric));
        }
    }

    Ok(best)
}

/// Reject configurations the search cannot start from: unknown start or
/// member nodes, or members not connected to the start node.
pub fn validate_configuration(initial: &Configuration, graph: &dyn TreeGraph) -> OptimizerResult<()> {
    let start = initial.start();
    if !graph.contains(start) {
        return Err(OptimizerError::UnknownStartNode(start));
    }

    let unknown: Vec<NodeId> = initial.iter().filter(|&node| !graph.contains(node)).collect();
    if !unknown.is_empty() {
        return Err(OptimizerError::UnknownNodes(unknown));
    }

    if !graph.is_connected(initial.allocated(), start) {
        let reachable = reachable_from(graph, initial.allocated(), start);
        let unreachable = initial
            .iter()
            .filter(|node| !reachable.contains(node))
            .collect();
        return Err(OptimizerError::DisconnectedConfiguration { start, unreachable });
    }

    Ok(())
}

fn reachable_from(graph: &dyn TreeGraph, nodes: &BTreeSet<NodeId>, start: NodeId) -> HashSet<NodeId> {
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for &neighbor in graph.adjacent(node) {
            if nodes.contains(&neighbor) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    visited
}
