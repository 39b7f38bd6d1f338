//! Command-line interface
//!
//! `treeclimb [--json] [--config PATH] <command>`

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

pub use output::{output, CommandOutput};

#[derive(Parser, Debug)]
#[command(name = "treeclimb")]
#[command(about = "Budget-aware hill-climbing optimizer for passive skill trees", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (replaces .treeclimb/config.yaml and local.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Optimize one or more builds against a tree and stat weights
    Optimize(commands::optimize::OptimizeArgs),

    /// List the prioritized candidate moves for a build
    Neighbors(commands::neighbors::NeighborsArgs),

    /// Print the effective configuration
    Config,
}

/// Load configuration from `--config` or the project hierarchy
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_with_override(path),
        None => ConfigLoader::load(),
    }
}

/// Dispatch a parsed command
pub async fn run(command: Commands, config: Config, json_mode: bool) -> Result<()> {
    match command {
        Commands::Optimize(args) => commands::optimize::execute(args, config, json_mode).await,
        Commands::Neighbors(args) => commands::neighbors::execute(args, config, json_mode).await,
        Commands::Config => commands::config::execute(config, json_mode).await,
    }
}

/// Print `err` once and exit with status 1
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "error": format!("{err:#}"),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1)
}
