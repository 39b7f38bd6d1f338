use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid patience: {0}. Must be at least 1")]
    InvalidPatience(u32),

    #[error("Invalid min_improvement: {0}. Must be a finite value in [0, 1)")]
    InvalidMinImprovement(f64),

    #[error("Invalid neighbor limit {name}: {value}. Must be at least 1")]
    InvalidNeighborLimit { name: &'static str, value: usize },

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    pub const PROJECT_CONFIG: &'static str = ".treeclimb/config.yaml";
    pub const LOCAL_CONFIG: &'static str = ".treeclimb/local.yaml";
    pub const ENV_PREFIX: &'static str = "TREECLIMB_";

    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .treeclimb/config.yaml
    /// 3. .treeclimb/local.yaml (optional overrides)
    /// 4. Environment variables (TREECLIMB_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load defaults, then `path`, then environment overrides
    ///
    /// Used for `--config PATH`; the project files are skipped.
    pub fn load_with_override(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(Self::PROJECT_CONFIG))
            .merge(Yaml::file(Self::LOCAL_CONFIG))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let optimizer = &config.optimizer;
        if optimizer.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(optimizer.max_iterations));
        }
        if optimizer.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(optimizer.timeout_secs));
        }
        if optimizer.patience == 0 {
            return Err(ConfigError::InvalidPatience(optimizer.patience));
        }
        if !optimizer.min_improvement.is_finite()
            || !(0.0..1.0).contains(&optimizer.min_improvement)
        {
            return Err(ConfigError::InvalidMinImprovement(optimizer.min_improvement));
        }

        let limits = [
            ("max_add_moves", config.neighbors.max_add_moves),
            ("max_swap_moves", config.neighbors.max_swap_moves),
            ("max_total_moves", config.neighbors.max_total_moves),
        ];
        if let Some(&(name, value)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::InvalidNeighborLimit { name, value });
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RespecLimit;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.optimizer.max_iterations, 100);
        assert_eq!(config.optimizer.timeout_secs, 300);
        assert_eq!(config.optimizer.patience, 3);
        assert!((config.optimizer.min_improvement - 0.001).abs() < f64::EPSILON);
        assert!(config.optimizer.prioritize_adds);
        assert_eq!(config.neighbors.max_total_moves, 200);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
optimizer:
  max_iterations: 40
  patience: 5
  prioritize_adds: false
neighbors:
  max_swap_moves: 30
budget:
  unallocated: 15
  respec: unlimited
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.optimizer.max_iterations, 40);
        assert_eq!(config.optimizer.patience, 5);
        assert_eq!(config.optimizer.timeout_secs, 300);
        assert!(!config.optimizer.prioritize_adds);
        assert_eq!(config.neighbors.max_swap_moves, 30);
        assert_eq!(config.neighbors.max_add_moves, 150);
        assert_eq!(config.budget.unallocated, 15);
        assert_eq!(config.budget.respec, RespecLimit::Unlimited);
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_zero_iterations() {
        let mut config = Config::default();
        config.optimizer.max_iterations = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxIterations(0)
        ));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.optimizer.timeout_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTimeout(0)
        ));
    }

    #[test]
    fn test_validate_zero_patience() {
        let mut config = Config::default();
        config.optimizer.patience = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidPatience(0)
        ));
    }

    #[test]
    fn test_validate_min_improvement_range() {
        for bad in [-0.1, 1.0, f64::NAN, f64::INFINITY] {
            let mut config = Config::default();
            config.optimizer.min_improvement = bad;
            assert!(matches!(
                ConfigLoader::validate(&config).unwrap_err(),
                ConfigError::InvalidMinImprovement(_)
            ));
        }

        let mut config = Config::default();
        config.optimizer.min_improvement = 0.0;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_neighbor_limit() {
        let mut config = Config::default();
        config.neighbors.max_swap_moves = 0;
        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidNeighborLimit { name, value } => {
                assert_eq!(name, "max_swap_moves");
                assert_eq!(value, 0);
            }
            other => panic!("Expected InvalidNeighborLimit, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "verbose"),
            _ => panic!("Expected InvalidLogLevel error"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            _ => panic!("Expected InvalidLogFormat error"),
        }
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogRotation(_)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "optimizer:\n  max_iterations: 12\nbudget:\n  respec: 4").unwrap();
        file.flush().unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.optimizer.max_iterations, 12);
        assert_eq!(config.budget.respec, RespecLimit::Limited(4));
        assert_eq!(config.optimizer.patience, 3);
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "optimizer:\n  patience: 0").unwrap();
        file.flush().unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "optimizer:\n  patience: 4\n  max_iterations: 20").unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [
                ("TREECLIMB_OPTIMIZER__PATIENCE", Some("7")),
                ("TREECLIMB_BUDGET__RESPEC", Some("unlimited")),
            ],
            || {
                let config = ConfigLoader::load_with_override(file.path()).unwrap();
                assert_eq!(config.optimizer.patience, 7, "Env should win over file");
                assert_eq!(config.optimizer.max_iterations, 20);
                assert_eq!(config.budget.respec, RespecLimit::Unlimited);
            },
        );
    }

    #[test]
    fn test_hierarchical_merging() {
        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "optimizer:\n  patience: 5\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "optimizer:\n  patience: 8\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.optimizer.patience, 8, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }
}
