//! CLI command implementations.

pub mod config;
pub mod neighbors;
pub mod optimize;

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use crate::domain::models::{BudgetConfig, Configuration, RespecLimit};
use crate::infrastructure::graph::{AdjacencyGraph, BuildDefinition};

/// Budget flags shared by commands that work on a build
#[derive(Args, Debug, Clone, Default)]
pub struct BudgetArgs {
    /// Free allocation points (overrides budget.unallocated)
    #[arg(long, value_name = "N")]
    pub unallocated: Option<u32>,

    /// Respec points, or "unlimited" (overrides budget.respec)
    #[arg(long, value_name = "N|unlimited")]
    pub respec: Option<RespecLimit>,
}

impl BudgetArgs {
    /// Apply the flags on top of the configured budget
    pub fn resolve(&self, configured: BudgetConfig) -> BudgetConfig {
        BudgetConfig::new(
            self.unallocated.unwrap_or(configured.unallocated),
            self.respec.unwrap_or(configured.respec),
        )
    }
}

pub(crate) fn load_tree(path: &Path) -> Result<AdjacencyGraph> {
    AdjacencyGraph::load(path).with_context(|| format!("Failed to load tree {}", path.display()))
}

pub(crate) fn load_build(path: &Path) -> Result<Configuration> {
    let build = BuildDefinition::load(path)
        .with_context(|| format!("Failed to load build {}", path.display()))?;
    Ok(build.to_configuration())
}

/// Label for a build file in output: its file stem, or the full path
pub(crate) fn build_label(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map_or_else(|| path.display().to_string(), str::to_string)
}
