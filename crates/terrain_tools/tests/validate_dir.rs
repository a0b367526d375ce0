//! Directory validation against real files.

use std::fs;

use terrain_core::config::GenerationParams;
use terrain_test_utils::fixtures::tiny_params;
use terrain_tools::validate::{check_config_directory, validate_config_directory, ValidationError};

#[test]
fn test_written_configs_validate() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("tiny.ron"),
        tiny_params(3).to_ron_string().unwrap(),
    )
    .unwrap();
    fs::write(
        dir.path().join("default.ron"),
        GenerationParams::default().to_ron_string().unwrap(),
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not a config").unwrap();

    let report = validate_config_directory(dir.path()).unwrap();
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.warning_count(), 0);
}

#[test]
fn test_invalid_file_fails_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a_good.ron"), "(seed: 1)").unwrap();
    fs::write(
        dir.path().join("b_bad.ron"),
        "(region_width: (min: 10, max: 2))",
    )
    .unwrap();

    let report = check_config_directory(dir.path()).unwrap();
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].path.ends_with("b_bad.ron"));

    assert!(matches!(
        validate_config_directory(dir.path()),
        Err(ValidationError::Invalid { failed: 1, total: 2 })
    ));
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        validate_config_directory(dir.path()),
        Err(ValidationError::Empty(_))
    ));
}

#[test]
fn test_shipped_configs_are_valid() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/config");
    let report = validate_config_directory(&dir).unwrap();
    assert!(report.files.len() >= 2);
    assert_eq!(report.warning_count(), 0);
}
