//! Configuration persistence.

use caloriecoach_core::{AppConfig, ConfigError, Locale};
use tempfile::TempDir;

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = AppConfig::default();
    config.set("coach.language", "fr").unwrap();
    config.set("training.sample_interval_secs", "15").unwrap();
    config.set("speech.enabled", "true").unwrap();
    config.save_to(&path).unwrap();

    let loaded = AppConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.coach.language, Locale::Fr);
    assert_eq!(loaded.get("training.sample_interval_secs").as_deref(), Some("15"));
}

#[test]
fn test_inverted_range_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[inputs.age]\nmin = 90.0\nmax = 20.0\n").unwrap();

    let err = AppConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }), "{err}");
}

#[test]
fn test_malformed_file_fails_to_parse() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[training\nsample_interval_secs = ").unwrap();

    assert!(matches!(
        AppConfig::load_from(&path),
        Err(ConfigError::ParseFailed(_))
    ));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    match AppConfig::load_from(&path) {
        Err(ConfigError::LoadFailed { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected LoadFailed, got {other:?}"),
    }
}
