//! Implementation of the `treeclimb config` command.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

/// The effective configuration after every layer has been merged
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigOutput {
    pub config: Config,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config)
            .unwrap_or_else(|err| format!("Failed to render configuration: {err}"))
    }
}

pub async fn execute(config: Config, json_mode: bool) -> Result<()> {
    output(&ConfigOutput { config }, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_yaml_and_json() {
        let output = ConfigOutput {
            config: Config::default(),
        };

        let yaml = output.to_human();
        assert!(yaml.contains("max_iterations: 100"));
        assert!(yaml.contains("respec: 0"));

        let json = output.to_json();
        assert_eq!(json["neighbors"]["max_total_moves"], 200);
        assert_eq!(json["logging"]["level"], "info");
    }
}
