//! Implementation of the `treeclimb neighbors` command.
//!
//! Shows the prioritized candidate moves the optimizer would score for a
//! build in its first iteration.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::{load_build, load_tree, BudgetArgs};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{BudgetSummary, Config, Configuration, Move, NodeId, NodeKind};
use crate::domain::ports::TreeGraph;
use crate::services::{validate_configuration, BudgetTracker, NeighborGenerator, PriorityCalculator};

#[derive(Args, Debug)]
pub struct NeighborsArgs {
    /// Passive tree file (.json, .yaml or .yml)
    #[arg(long, value_name = "PATH")]
    pub tree: PathBuf,

    /// Build file to generate candidates for
    #[arg(long, value_name = "PATH")]
    pub build: PathBuf,

    #[command(flatten)]
    pub budget: BudgetArgs,

    /// Show at most this many candidates
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Consider respec swaps while free points remain
    #[arg(long)]
    pub no_prioritize_adds: bool,
}

/// One candidate move with the classifications behind its priority
#[derive(Debug, Clone, Serialize)]
pub struct CandidateRow {
    pub rank: usize,
    #[serde(rename = "move")]
    pub candidate: Move,
    pub added_kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_kind: Option<NodeKind>,
    pub value: u8,
}

#[derive(Debug, Serialize)]
pub struct NeighborsOutput {
    pub start_node: NodeId,
    pub allocated: usize,
    pub budget: BudgetSummary,
    /// Candidates generated before `--limit` was applied
    pub total: usize,
    pub candidates: Vec<CandidateRow>,
}

impl CommandOutput for NeighborsOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!(
                "Build rooted at node {} with {} allocated nodes",
                self.start_node, self.allocated
            ),
            format!("Budget: {}", self.budget),
        ];

        if self.candidates.is_empty() {
            lines.push("No valid candidate moves".to_string());
        } else {
            lines.push(format!(
                "Showing {} of {} candidate moves",
                self.candidates.len(),
                self.total
            ));
            lines.push(TableFormatter::new().format_candidates(&self.candidates));
        }

        lines.join("\n")
    }
}

/// Generate and describe the candidates for `config`
pub fn describe_candidates(
    config: &Configuration,
    graph: &dyn TreeGraph,
    generator: &NeighborGenerator,
    budget: &BudgetTracker,
    limit: Option<usize>,
) -> NeighborsOutput {
    let priority = PriorityCalculator::new();
    let moves = generator.generate(config, graph, budget);
    let total = moves.len();

    let candidates = moves
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(index, candidate)| CandidateRow {
            rank: index + 1,
            candidate,
            added_kind: graph.classify(candidate.added_node()),
            removed_kind: candidate.removed_node().map(|node| graph.classify(node)),
            value: priority.value(graph, &candidate),
        })
        .collect();

    NeighborsOutput {
        start_node: config.start(),
        allocated: config.len(),
        budget: budget.summary(),
        total,
        candidates,
    }
}

pub async fn execute(args: NeighborsArgs, config: Config, json_mode: bool) -> Result<()> {
    let graph = load_tree(&args.tree)?;
    let build = load_build(&args.build)?;
    validate_configuration(&build, &graph)
        .with_context(|| format!("Invalid build {}", args.build.display()))?;

    let prioritize_adds = config.optimizer.prioritize_adds && !args.no_prioritize_adds;
    let generator = NeighborGenerator::new(config.neighbors).with_prioritize_adds(prioritize_adds);
    let budget = BudgetTracker::new(args.budget.resolve(config.budget));

    let result = describe_candidates(&build, &graph, &generator, &budget, args.limit);
    output(&result, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BudgetConfig, RespecLimit};
    use crate::infrastructure::graph::{AdjacencyGraph, NodeDefinition, TreeDefinition};

    fn graph() -> AdjacencyGraph {
        let nodes = vec![
            NodeDefinition { id: 1, kind: NodeKind::Travel, links: vec![2, 3] },
            NodeDefinition { id: 2, kind: NodeKind::Notable, links: vec![] },
            NodeDefinition { id: 3, kind: NodeKind::Travel, links: vec![] },
        ];
        AdjacencyGraph::from_definition(&TreeDefinition { nodes }).unwrap()
    }

    #[test]
    fn test_describe_candidates_ranks_by_value() {
        let budget = BudgetTracker::new(BudgetConfig::new(1, RespecLimit::Limited(0)));
        let output = describe_candidates(
            &Configuration::new(1, []),
            &graph(),
            &NeighborGenerator::default(),
            &budget,
            None,
        );

        assert_eq!(output.total, 2);
        assert_eq!(output.candidates[0].candidate, Move::Add { node: 2 });
        assert_eq!(output.candidates[0].added_kind, NodeKind::Notable);
        assert_eq!(output.candidates[0].value, 3);
        assert_eq!(output.candidates[1].rank, 2);
        assert_eq!(output.candidates[1].candidate, Move::Add { node: 3 });
    }

    #[test]
    fn test_limit_keeps_total() {
        let budget = BudgetTracker::new(BudgetConfig::new(1, RespecLimit::Limited(0)));
        let output = describe_candidates(
            &Configuration::new(1, []),
            &graph(),
            &NeighborGenerator::default(),
            &budget,
            Some(1),
        );
        assert_eq!(output.total, 2);
        assert_eq!(output.candidates.len(), 1);

        let json = output.to_json();
        assert_eq!(json["candidates"][0]["move"]["kind"], "add");
        assert_eq!(json["candidates"][0]["move"]["node"], 2);
    }

    #[test]
    fn test_exhausted_budget_has_no_candidates() {
        let budget = BudgetTracker::new(BudgetConfig::new(0, RespecLimit::Limited(0)));
        let output = describe_candidates(
            &Configuration::new(1, [2]),
            &graph(),
            &NeighborGenerator::default(),
            &budget,
            None,
        );
        assert!(output.candidates.is_empty());
        assert!(output.to_human().contains("No valid candidate moves"));
    }
}
