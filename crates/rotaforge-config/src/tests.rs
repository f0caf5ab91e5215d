//! Tests for planner configuration.

use super::*;
use rotaforge_core::{BuffWindow, ResourceModel, UltimateRequirement};
use std::io::Write;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        data_dir = "catalogs"

        [timeline]
        tick_length = 0.5

        [termination]
        seconds_spent_limit = 30
        node_count_limit = 100000

        [resource.basic]
        cap_threshold = 91
        gain = 8

        [resource.ultimate]
        requirement = "at_least"
        level = 91
        reset_to = 0

        [resource.ultimate.buff]
        window = 10
        multiplier = 3

        [search]
        stop_at_first_solution = true
    "#;

    let config = RotaforgeConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.data_dir(), PathBuf::from("catalogs"));
    assert_eq!(config.timeline.tick_length, 0.5);
    assert_eq!(config.time_limit(), Duration::from_secs(30));
    assert_eq!(config.node_limit(), Some(100_000));
    assert!(config.search.stop_at_first_solution);

    let model = config.resource.to_model().unwrap();
    assert_eq!(model.basic().gain, 8);
    assert_eq!(model.ultimate().requirement, UltimateRequirement::AtLeast(91));
    assert_eq!(model.ultimate().reset_to, 0);
    assert_eq!(
        model.ultimate().buff,
        Some(BuffWindow {
            ticks: 10,
            multiplier: 3
        })
    );
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        termination:
          minutes_spent_limit: 2
        resource:
          threshold:
            min_level: 60
            cost: 20
    "#;

    let config = RotaforgeConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.time_limit(), Duration::from_secs(120));

    let model = config.resource.to_model().unwrap();
    assert_eq!(model.threshold().min_level, 60);
    assert_eq!(model.threshold().cost, 20);
}

#[test]
fn test_defaults_match_resource_model_defaults() {
    let config = RotaforgeConfig::new();
    assert_eq!(config.resource.to_model().unwrap(), ResourceModel::default());
    assert_eq!(config.timeline.tick_length, 0.6);
    assert_eq!(config.time_limit(), Duration::from_secs(DEFAULT_TIME_LIMIT_SECS));
    assert_eq!(config.node_limit(), None);
    assert!(!config.search.stop_at_first_solution);
    assert!(!config.resource.buff_required());
}

#[test]
fn test_disabled_buff() {
    let toml = r#"
        [resource.ultimate.buff]
        enabled = false
        required = true
    "#;

    let config = RotaforgeConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.resource.to_model().unwrap().ultimate().buff, None);
    assert!(!config.resource.buff_required());
}

#[test]
fn test_invalid_resource_rule() {
    let toml = r#"
        [resource.threshold]
        min_level = 150
    "#;

    let config = RotaforgeConfig::from_toml_str(toml).unwrap();
    assert!(matches!(
        config.resource.to_model(),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_buff_multiplier_out_of_range() {
    let toml = r#"
        [resource.ultimate.buff]
        multiplier = 9000000000000000000
    "#;

    let config = RotaforgeConfig::from_toml_str(toml).unwrap();
    match config.resource.to_model() {
        Err(ConfigError::Invalid(reason)) => assert!(reason.contains("buff multiplier")),
        other => panic!("expected invalid config, got {other:?}"),
    }

    let config = RotaforgeConfig::from_toml_str("[resource.ultimate.buff]\nmultiplier = 3").unwrap();
    assert_eq!(config.resource.to_model().unwrap().max_multiplier(), 3);
}

#[test]
fn test_builder() {
    let config = RotaforgeConfig::new()
        .with_termination_seconds(60)
        .with_tick_length(1.2)
        .with_data_dir("/tmp/rotations");

    assert_eq!(config.time_limit(), Duration::from_secs(60));
    assert_eq!(config.timeline.tick_length, 1.2);
    assert_eq!(config.data_dir(), PathBuf::from("/tmp/rotations"));
}

#[test]
fn test_load_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("rotaforge.toml");
    std::fs::File::create(&toml_path)
        .unwrap()
        .write_all(b"[termination]\nseconds_spent_limit = 7\n")
        .unwrap();
    assert_eq!(
        RotaforgeConfig::load(&toml_path).unwrap().time_limit(),
        Duration::from_secs(7)
    );

    let yaml_path = dir.path().join("rotaforge.yaml");
    std::fs::File::create(&yaml_path)
        .unwrap()
        .write_all(b"termination:\n  seconds_spent_limit: 9\n")
        .unwrap();
    assert_eq!(
        RotaforgeConfig::load(&yaml_path).unwrap().time_limit(),
        Duration::from_secs(9)
    );
}

#[test]
fn test_missing_file_falls_back_to_default() {
    let config = RotaforgeConfig::load("/nonexistent/rotaforge.toml").unwrap_or_default();
    assert_eq!(config.time_limit(), Duration::from_secs(DEFAULT_TIME_LIMIT_SECS));
}

#[test]
fn test_config_error_converts() {
    let err: RotaforgeError = ConfigError::Invalid("bad".to_string()).into();
    assert!(matches!(err, RotaforgeError::Config(_)));
}
