//! Implementation of the `treeclimb optimize` command.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::{build_label, load_build, load_tree, BudgetArgs};
use crate::cli::output::progress::{MultiProgressManager, ProgressBarExt};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::Config;
use crate::domain::ports::{MetricOracle, TreeGraph};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::metric::{StatWeights, WeightedSumMetric};
use crate::services::{
    ClimbSettings, HillClimber, JobOutcome, OptimizationJob, OptimizationResult,
    OptimizationService,
};

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Passive tree file (.json, .yaml or .yml)
    #[arg(long, value_name = "PATH")]
    pub tree: PathBuf,

    /// Stat weights file for the weighted-sum metric
    #[arg(long, value_name = "PATH")]
    pub weights: PathBuf,

    /// Starting build file; repeat to optimize several builds concurrently
    #[arg(long = "build", value_name = "PATH", required = true)]
    pub builds: Vec<PathBuf>,

    #[command(flatten)]
    pub budget: BudgetArgs,

    /// Maximum iterations per run
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<u32>,

    /// Wall-clock limit per run, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Non-improving iterations before stopping
    #[arg(long, value_name = "N")]
    pub patience: Option<u32>,

    /// Relative improvement below which a run converges (0.001 = 0.1%)
    #[arg(long, value_name = "FRACTION")]
    pub min_improvement: Option<f64>,

    /// Consider respec swaps while free points remain
    #[arg(long)]
    pub no_prioritize_adds: bool,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

impl OptimizeArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(max_iterations) = self.max_iterations {
            config.optimizer.max_iterations = max_iterations;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.optimizer.timeout_secs = timeout_secs;
        }
        if let Some(patience) = self.patience {
            config.optimizer.patience = patience;
        }
        if let Some(min_improvement) = self.min_improvement {
            config.optimizer.min_improvement = min_improvement;
        }
        if self.no_prioritize_adds {
            config.optimizer.prioritize_adds = false;
        }
        config.budget = self.budget.resolve(config.budget);
    }
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub label: String,
    pub build: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<OptimizationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunOutput {
    fn from_outcome(build: PathBuf, outcome: JobOutcome) -> Self {
        match outcome.result {
            Ok(result) => Self {
                label: outcome.label,
                build,
                result: Some(result),
                error: None,
            },
            Err(err) => Self {
                label: outcome.label,
                build,
                result: None,
                error: Some(format!("{:#}", anyhow::Error::new(err))),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OptimizeOutput {
    pub runs: Vec<RunOutput>,
}

impl OptimizeOutput {
    pub fn failed(&self) -> usize {
        self.runs.iter().filter(|run| run.error.is_some()).count()
    }
}

impl CommandOutput for OptimizeOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut sections = Vec::with_capacity(self.runs.len());

        for run in &self.runs {
            let mut lines = vec![format!(
                "{} ({})",
                style(&run.label).bold(),
                run.build.display()
            )];

            match (&run.result, &run.error) {
                (Some(result), _) => {
                    lines.push(format!("  {}", result.convergence_reason));
                    lines.push(format!("  Iterations: {}", result.iterations));
                    lines.push(format!(
                        "  Metric:     {:.4} -> {:.4} ({:+.4})",
                        result.initial_metric,
                        result.final_metric,
                        result.improvement()
                    ));
                    lines.push(format!("  Budget:     {}", result.budget_summary));
                    lines.push(format!(
                        "  Allocated:  {} nodes",
                        result.final_configuration.len()
                    ));
                    if result.applied_moves.is_empty() {
                        lines.push("  No moves applied".to_string());
                    } else {
                        lines.push(formatter.format_applied_moves(&result.history));
                    }
                }
                (None, Some(error)) => {
                    lines.push(format!("  {} {error}", style("Failed:").red().bold()));
                }
                (None, None) => {}
            }

            sections.push(lines.join("\n"));
        }

        sections.join("\n\n")
    }
}

pub async fn execute(args: OptimizeArgs, mut config: Config, json_mode: bool) -> Result<()> {
    args.apply_overrides(&mut config);
    ConfigLoader::validate(&config).context("Invalid optimizer settings")?;

    let graph = Arc::new(load_tree(&args.tree)?);
    let weights = StatWeights::load(&args.weights)
        .with_context(|| format!("Failed to load weights {}", args.weights.display()))?;
    let oracle: Arc<dyn MetricOracle> =
        Arc::new(WeightedSumMetric::new(Arc::clone(&graph), weights));

    let jobs = args
        .builds
        .iter()
        .map(|path| {
            let initial = load_build(path)?;
            Ok(OptimizationJob::new(build_label(path), initial, config.budget))
        })
        .collect::<Result<Vec<_>>>()?;

    let graph: Arc<dyn TreeGraph> = graph;
    let service = OptimizationService::new(
        HillClimber::new(ClimbSettings::from_config(&config)),
        graph,
        oracle,
    );

    let show_progress = !json_mode && !args.no_progress;
    let outcomes = if show_progress {
        run_with_progress(&service, jobs, config.optimizer.max_iterations).await?
    } else {
        service.run_batch(jobs).await?
    };

    let result = OptimizeOutput {
        runs: args
            .builds
            .iter()
            .cloned()
            .zip(outcomes)
            .map(|(build, outcome)| RunOutput::from_outcome(build, outcome))
            .collect(),
    };
    output(&result, json_mode);

    let failed = result.failed();
    if failed > 0 {
        anyhow::bail!("{failed} of {} optimization runs failed", result.runs.len());
    }
    Ok(())
}

async fn run_with_progress(
    service: &OptimizationService,
    jobs: Vec<OptimizationJob>,
    max_iterations: u32,
) -> Result<Vec<JobOutcome>> {
    let progress = MultiProgressManager::new();

    let runs = jobs.into_iter().map(|job| {
        let bar = progress.add_progress_bar(u64::from(max_iterations), job.label.clone());
        let observer_bar = bar.clone();
        async move {
            let outcome = service
                .run_with_observer(job, move |report| observer_bar.record_iteration(report))
                .await?;
            match &outcome.result {
                Ok(result) => bar.finish_success(result.termination.to_string()),
                Err(_) => bar.finish_error("failed"),
            }
            Ok::<_, anyhow::Error>(outcome)
        }
    });

    futures::future::join_all(runs).await.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BudgetSummary, Configuration, RespecLimit, TerminationReason};
    use chrono::Utc;
    use clap::Parser;
    use uuid::Uuid;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: OptimizeArgs,
    }

    fn parse(argv: &[&str]) -> OptimizeArgs {
        let mut full = vec!["optimize"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let args = parse(&[
            "--tree",
            "t.json",
            "--weights",
            "w.json",
            "--build",
            "b.json",
            "--respec",
            "unlimited",
            "--patience",
            "6",
            "--no-prioritize-adds",
        ]);
        let mut config = Config::default();
        config.budget.unallocated = 9;
        args.apply_overrides(&mut config);

        assert_eq!(config.optimizer.patience, 6);
        assert_eq!(config.optimizer.max_iterations, 100);
        assert!(!config.optimizer.prioritize_adds);
        assert_eq!(config.budget.unallocated, 9);
        assert_eq!(config.budget.respec, RespecLimit::Unlimited);
    }

    #[test]
    fn test_human_output_reports_failures() {
        let output = OptimizeOutput {
            runs: vec![
                RunOutput {
                    label: "ok".to_string(),
                    build: PathBuf::from("ok.yaml"),
                    result: Some(OptimizationResult {
                        run_id: Uuid::new_v4(),
                        started_at: Utc::now(),
                        final_configuration: Configuration::new(1, [2]),
                        iterations: 1,
                        termination: TerminationReason::NoValidNeighbors,
                        convergence_reason: "Converged: no valid neighbors".to_string(),
                        budget_summary: BudgetSummary {
                            unallocated_used: 1,
                            unallocated_available: 1,
                            respec_used: 0,
                            respec_available: Some(0),
                        },
                        initial_metric: 1.0,
                        final_metric: 2.0,
                        applied_moves: vec![],
                        history: vec![],
                        elapsed_ms: 3,
                    }),
                    error: None,
                },
                RunOutput {
                    label: "bad".to_string(),
                    build: PathBuf::from("bad.yaml"),
                    result: None,
                    error: Some("Start node 9 is not in the tree".to_string()),
                },
            ],
        };

        assert_eq!(output.failed(), 1);
        let human = output.to_human();
        assert!(human.contains("Converged: no valid neighbors"));
        assert!(human.contains("1/1 unallocated (FREE), 0/0 respec"));
        assert!(human.contains("Start node 9 is not in the tree"));

        let json = output.to_json();
        assert_eq!(json["runs"][0]["result"]["termination"], "no_valid_neighbors");
        assert!(json["runs"][1].get("result").is_none());
    }
}
