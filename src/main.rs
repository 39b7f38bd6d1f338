//! treeclimb CLI entry point.

use clap::Parser;

use treeclimb::cli::{self, Cli};
use treeclimb::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => cli::handle_error(err, json_mode),
    };

    let _logger = match LogConfig::try_from(&config.logging).and_then(|log| LoggerImpl::init(&log)) {
        Ok(logger) => logger,
        Err(err) => cli::handle_error(err, json_mode),
    };

    if let Err(err) = cli::run(cli.command, config, json_mode).await {
        cli::handle_error(err, json_mode);
    }
}
