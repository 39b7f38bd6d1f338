//! Concurrent execution of independent optimization runs.
//!
//! The tree graph and metric oracle are read-only and shared through `Arc`.
//! Everything mutable (configuration, budget, convergence state) belongs to
//! a single run, so runs never observe each other.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::OptimizerError;
use crate::domain::models::{BudgetConfig, Configuration};
use crate::domain::ports::{MetricOracle, TreeGraph};
use crate::services::hill_climber::{HillClimber, IterationReport, OptimizationResult};

/// One run to execute: a starting configuration and its budget.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationJob {
    pub label: String,
    pub initial: Configuration,
    pub budget: BudgetConfig,
}

impl OptimizationJob {
    pub fn new(label: impl Into<String>, initial: Configuration, budget: BudgetConfig) -> Self {
        Self {
            label: label.into(),
            initial,
            budget,
        }
    }
}

/// Result of one job in a batch.
#[derive(Debug)]
pub struct JobOutcome {
    pub label: String,
    pub result: Result<OptimizationResult, OptimizerError>,
}

/// Runs optimization jobs on tokio's blocking pool.
#[derive(Clone)]
pub struct OptimizationService {
    climber: Arc<HillClimber>,
    graph: Arc<dyn TreeGraph>,
    oracle: Arc<dyn MetricOracle>,
}

impl OptimizationService {
    pub fn new(
        climber: HillClimber,
        graph: Arc<dyn TreeGraph>,
        oracle: Arc<dyn MetricOracle>,
    ) -> Self {
        Self {
            climber: Arc::new(climber),
            graph,
            oracle,
        }
    }

    pub fn climber(&self) -> &HillClimber {
        &self.climber
    }

    /// Run a single job, calling `observer` after each iteration.
    ///
    /// The observer runs on the blocking thread that executes the job.
    pub async fn run_with_observer<F>(
        &self,
        job: OptimizationJob,
        mut observer: F,
    ) -> Result<JobOutcome>
    where
        F: FnMut(&IterationReport) + Send + 'static,
    {
        let climber = Arc::clone(&self.climber);
        let graph = Arc::clone(&self.graph);
        let oracle = Arc::clone(&self.oracle);

        tokio::task::spawn_blocking(move || {
            let result = climber.optimize_with_observer(
                job.initial,
                graph.as_ref(),
                job.budget,
                oracle.as_ref(),
                &mut observer,
            );
            JobOutcome {
                label: job.label,
                result,
            }
        })
        .await
        .context("Tokio task join error")
    }

    /// Run a single job.
    pub async fn run(&self, job: OptimizationJob) -> Result<JobOutcome> {
        self.run_with_observer(job, |_| {}).await
    }

    /// Run every job concurrently. Outcomes are returned in job order.
    ///
    /// A job that fails with an [`OptimizerError`] is reported in its
    /// outcome and does not affect the others. A job that panics (an
    /// invariant violation) fails the whole batch.
    pub async fn run_batch(&self, jobs: Vec<OptimizationJob>) -> Result<Vec<JobOutcome>> {
        let total = jobs.len();
        info!(jobs = total, "starting optimization batch");

        let outcomes = futures::future::join_all(jobs.into_iter().map(|job| self.run(job)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        let failed = outcomes.iter().filter(|outcome| outcome.result.is_err()).count();
        if failed > 0 {
            warn!(failed, jobs = total, "some optimization jobs failed");
        }
        info!(jobs = total, failed, "optimization batch finished");

        Ok(outcomes)
    }
}
