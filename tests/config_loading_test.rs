//! Configuration file and environment layering through `--config`.

use std::io::Write;

use tempfile::NamedTempFile;
use treeclimb::domain::models::RespecLimit;
use treeclimb::{ConfigError, ConfigLoader};

fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_file_values_override_defaults() {
    let file = yaml_file(
        "optimizer:\n  timeout_secs: 30\nneighbors:\n  max_add_moves: 50\nbudget:\n  unallocated: 12\n  respec: 2\n",
    );
    temp_env::with_vars_unset(["TREECLIMB_OPTIMIZER__TIMEOUT_SECS"], || {
        let config = ConfigLoader::load_with_override(file.path()).unwrap();
        assert_eq!(config.optimizer.timeout_secs, 30);
        assert_eq!(config.optimizer.max_iterations, 100);
        assert_eq!(config.neighbors.max_add_moves, 50);
        assert_eq!(config.neighbors.max_total_moves, 200);
        assert_eq!(config.budget.unallocated, 12);
        assert_eq!(config.budget.respec, RespecLimit::Limited(2));
    });
}

#[test]
fn test_environment_wins_over_file() {
    let file = yaml_file("optimizer:\n  min_improvement: 0.01\nlogging:\n  level: warn\n");
    temp_env::with_vars(
        [
            ("TREECLIMB_OPTIMIZER__MIN_IMPROVEMENT", Some("0.05")),
            ("TREECLIMB_OPTIMIZER__PRIORITIZE_ADDS", Some("false")),
        ],
        || {
            let config = ConfigLoader::load_with_override(file.path()).unwrap();
            assert!((config.optimizer.min_improvement - 0.05).abs() < f64::EPSILON);
            assert!(!config.optimizer.prioritize_adds);
            assert_eq!(config.logging.level, "warn");
        },
    );
}

#[test]
fn test_invalid_environment_value_is_rejected() {
    let file = yaml_file("optimizer:\n  patience: 2\n");
    temp_env::with_var("TREECLIMB_OPTIMIZER__MAX_ITERATIONS", Some("0"), || {
        let err = ConfigLoader::load_with_override(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidMaxIterations(0))
        ));
    });
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = ConfigLoader::load_from_file("/nonexistent/treeclimb.yaml").unwrap();
    assert_eq!(config.optimizer.patience, 3);
}
