//! Integration tests for configuration management

use gradeplan::config::{Config, ConfigOverrides};
use gradeplan::core::organizer::SummerPlacement;
use gradeplan::core::parser::ParseMode;
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
        !config.paths.data_file.is_empty(),
        "Default data_file should not be empty"
    );
    assert!(
        !config.paths.reports_dir.is_empty(),
        "Default reports_dir should not be empty"
    );
    assert_eq!(config.grading.summer_placement, SummerPlacement::Interleaved);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
data_file = "./semesters.json"
reports_dir = "./reports"

[grading]
default_credits = 4.0
default_grade_point = 0.0
parse_mode = "template"
summer_placement = "after_academic_years"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.data_file, "./semesters.json");
    assert_eq!(config.paths.reports_dir, "./reports");
    assert!((config.grading.default_credits - 4.0).abs() < f64::EPSILON);
    assert!(config.grading.default_grade_point.abs() < f64::EPSILON);
    assert_eq!(config.grading.parse_mode, ParseMode::Template);
    assert_eq!(
        config.grading.summer_placement,
        SummerPlacement::AfterAcademicYears
    );
}

#[test]
fn test_config_from_toml_partial() {
    let toml_str = r#"
[logging]
level = "error"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.data_file, "");
    assert_eq!(config.grading.parse_mode, ParseMode::Heuristic);
}

#[test]
fn test_legacy_database_section_is_ignored() {
    let toml_str = r#"
[logging]
level = "warn"

[database]
token = "old"
endpoint = "https://example.com"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse legacy TOML");
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$GRADEPLAN/test.log"

[paths]
data_file = "$GRADEPLAN/semesters.json"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("gradeplan"));
    assert!(!config.logging.file.contains("$GRADEPLAN"));
    assert!(config.paths.data_file.ends_with("semesters.json"));
    assert!(!config.paths.data_file.contains("$GRADEPLAN"));
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
        .set("default_credits", "4")
        .expect("Failed to set default_credits");
    assert_eq!(config.get("default-credits").unwrap(), "4");

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
    assert!(config.set("verbose", "maybe").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "debug").expect("Failed to set level");
    config
        .set("parse_mode", "template")
        .expect("Failed to set parse_mode");

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config
        .unset("parse_mode", &defaults)
        .expect("Failed to unset parse_mode");
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.grading.parse_mode, defaults.grading.parse_mode);
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config
        .set("summer_placement", "after")
        .expect("Failed to set summer_placement");

    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    assert!(content.contains("summer_placement = \"after_academic_years\""));
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config.logging.level, "info");
    assert_eq!(
        loaded_config.grading.summer_placement,
        SummerPlacement::AfterAcademicYears
    );
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        data_file: Some("./custom.json".to_string()),
        reports_dir: Some("./custom_reports".to_string()),
        parse_mode: Some(ParseMode::Template),
        summer_placement: Some(SummerPlacement::AfterAcademicYears),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.data_file, "./custom.json");
    assert_eq!(config.paths.reports_dir, "./custom_reports");
    assert_eq!(config.course_parser().mode(), ParseMode::Template);
    assert_eq!(
        config.grading.summer_placement,
        SummerPlacement::AfterAcademicYears
    );
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let data_file = config.paths.data_file.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..Default::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.paths.data_file, data_file);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[grading]"));
    assert!(!display_str.contains("[database]"));

    assert!(display_str.contains("data_file"));
    assert!(display_str.contains("parse_mode = \"heuristic\""));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[paths]
data_file = ""
reports_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.paths.data_file, defaults.paths.data_file);
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[paths]
data_file = "/my/grades.json"
reports_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.paths.data_file, "/my/grades.json");
}

#[test]
fn test_get_gradeplan_dir() {
    let dir = Config::get_gradeplan_dir();

    assert!(dir.to_string_lossy().contains("gradeplan"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
