use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::budget::BudgetConfig;

/// Main configuration structure for treeclimb
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Hill-climbing loop settings
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Candidate move generation limits
    #[serde(default)]
    pub neighbors: NeighborConfig,

    /// Default budget when not given on the command line
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hill-climbing loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OptimizerConfig {
    /// Maximum number of iterations per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Wall-clock limit per run, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Consecutive non-improving iterations before stopping
    #[serde(default = "default_patience")]
    pub patience: u32,

    /// Relative improvement below which the run is considered converged
    #[serde(default = "default_min_improvement")]
    pub min_improvement: f64,

    /// Spend free points before considering respec swaps
    #[serde(default = "default_true")]
    pub prioritize_adds: bool,
}

const fn default_max_iterations() -> u32 {
    100
}

const fn default_timeout_secs() -> u64 {
    300
}

const fn default_patience() -> u32 {
    3
}

const fn default_min_improvement() -> f64 {
    0.001
}

const fn default_true() -> bool {
    true
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            timeout_secs: default_timeout_secs(),
            patience: default_patience(),
            min_improvement: default_min_improvement(),
            prioritize_adds: default_true(),
        }
    }
}

/// Candidate move caps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NeighborConfig {
    /// Maximum Add moves kept after prioritization
    #[serde(default = "default_max_add_moves")]
    pub max_add_moves: usize,

    /// Maximum Swap moves kept after prioritization
    #[serde(default = "default_max_swap_moves")]
    pub max_swap_moves: usize,

    /// Maximum moves returned per generation (bounds oracle calls per iteration)
    #[serde(default = "default_max_total_moves")]
    pub max_total_moves: usize,
}

const fn default_max_add_moves() -> usize {
    150
}

const fn default_max_swap_moves() -> usize {
    100
}

const fn default_max_total_moves() -> usize {
    200
}

impl Default for NeighborConfig {
    fn default() -> Self {
        Self {
            max_add_moves: default_max_add_moves(),
            max_swap_moves: default_max_swap_moves(),
            max_total_moves: default_max_total_moves(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
