//! Integration tests for configuration management

use ir_metrics::config::{Config, ConfigOverrides};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.paths.out_dir.is_empty(),
        "Default out_dir should not be empty"
    );
    assert!(
        !config.paths.extracts_dir.is_empty(),
        "Default extracts_dir should not be empty"
    );
    assert!(!config.output.results_file.is_empty());
    assert_eq!(config.columns.id, "ID");
    assert_eq!(config.report.grad_years, vec![4, 6]);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
out_dir = "./results"
extracts_dir = "./extracts"

[output]
results_file = "pell.xlsx"
append_date = false

[columns]
id = "Banner ID"

[report]
grad_years = [4, 5, 6]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.out_dir, "./results");
    assert_eq!(config.paths.extracts_dir, "./extracts");
    assert_eq!(config.output.results_file, "pell.xlsx");
    assert!(!config.output.append_date);
    assert!(config.output.append_version);
    assert_eq!(config.columns.id, "Banner ID");
    assert_eq!(config.columns.aid_year, "AID_YEAR");
    assert_eq!(config.report.grad_years, vec![4, 5, 6]);
}

#[test]
fn test_config_from_toml_partial() {
    // Missing fields and sections take their defaults
    let toml_str = r#"
[logging]
level = "error"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.out_dir, "");
    assert_eq!(config.columns.cohort_name, "Cohort Name");
    assert_eq!(config.report.grad_years, vec![4, 6]);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$IR_METRICS/test.log"

[paths]
out_dir = "$IR_METRICS/results"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("irmetrics"));
    assert!(!config.logging.file.contains("$IR_METRICS"));
    assert!(config.paths.out_dir.ends_with("results"));
    assert!(!config.paths.out_dir.contains("$IR_METRICS"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert!(config.logging.verbose);

    config
        .set("aid_year_column", "AIDY")
        .expect("Failed to set column");
    assert_eq!(config.columns.aid_year, "AIDY");

    config
        .set("grad_years", "4,6,8")
        .expect("Failed to set grad_years");
    assert_eq!(config.report.grad_years, vec![4, 6, 8]);
    assert_eq!(config.get("grad_years").unwrap(), "4,6,8");

    assert!(config.set("append_date", "maybe").is_err());
    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "debug").expect("Failed to set level");
    config.set("id_column", "Banner ID").expect("Failed to set id");

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config
        .unset("id_column", &defaults)
        .expect("Failed to unset id");
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.columns.id, "ID");
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config
        .set("two_digit_aid_year", "true")
        .expect("Failed to set flag");

    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config.logging.level, "info");
    assert!(loaded_config.columns.two_digit_aid_year);
    assert_eq!(loaded_config.columns, config.columns);
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        out_dir: Some("./custom_results".to_string()),
        extracts_dir: Some("./custom_extracts".to_string()),
        id_column: Some("Banner ID".to_string()),
        aid_year_column: Some("AIDY".to_string()),
        cohort_name_column: Some("Cohort Label".to_string()),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.out_dir, "./custom_results");
    assert_eq!(config.paths.extracts_dir, "./custom_extracts");
    assert_eq!(config.columns.id, "Banner ID");
    assert_eq!(config.columns.aid_year, "AIDY");
    assert_eq!(config.columns.cohort_name, "Cohort Label");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.columns.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.columns, before);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[output]"));
    assert!(display_str.contains("[columns]"));
    assert!(display_str.contains("[report]"));

    assert!(display_str.contains("id_column = \"ID\""));
    assert!(display_str.contains("grad_years = \"4,6\""));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[paths]
out_dir = ""
extracts_dir = ""

[columns]
id = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.paths.out_dir, defaults.paths.out_dir);
    assert_eq!(config.columns.id, "ID");
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[columns]
degree = "Program"
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.columns.degree, "Program");
}

#[test]
fn test_get_irmetrics_dir() {
    let dir = Config::get_irmetrics_dir();

    assert!(dir.to_string_lossy().contains("irmetrics"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
