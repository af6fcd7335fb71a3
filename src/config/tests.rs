use super::validation::validate_config;
use super::*;
use crate::constants::test_constants::*;
use crate::constants::{DEFAULT_LOCATION, DEFAULT_LOCATIONS};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn entry(name: &str, latitude: f64, longitude: f64) -> LocationEntry {
    LocationEntry {
        name: name.to_string(),
        latitude,
        longitude,
    }
}

fn create_test_config(location: Option<&str>, entries: Vec<LocationEntry>) -> Config {
    Config {
        location: location.map(|s| s.to_string()),
        timezone: None,
        locations: Some(entries),
    }
}

fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("vaktul.toml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

#[test]
#[serial]
fn test_config_load_default_creation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("vaktul").join("vaktul.toml");

    // Save and restore XDG_CONFIG_HOME
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let result = Config::load();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    let config = result.unwrap();
    assert!(config_path.exists());
    assert_eq!(config.location.as_deref(), Some(DEFAULT_LOCATION));
    assert_eq!(
        config.locations.map(|l| l.len()),
        Some(DEFAULT_LOCATIONS.len())
    );
}

#[test]
fn test_default_config_round_trips_through_loader() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("vaktul.toml");

    create_default_config(&path).unwrap();
    let config = load_from_path(&path).unwrap();

    let entries = config.locations.as_ref().unwrap();
    assert_eq!(entries[0], entry("Grimstad", TEST_GRIMSTAD_LAT, TEST_GRIMSTAD_LON));
    assert!(entries.iter().any(|e| e.name == "Tromsø"));
    assert_eq!(config.display_zone().unwrap(), DisplayZone::Local);
}

#[test]
fn test_load_custom_registry() {
    let (_dir, path) = write_config(
        r#"
location = "oslo"
timezone = "Europe/Oslo"

[[locations]]
name = "Bergen"
latitude = 60.39
longitude = 5.32

[[locations]]
name = "Oslo"
latitude = 59.911491
longitude = 10.757933
"#,
    );

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.locations.as_ref().map(Vec::len), Some(2));
    assert_eq!(
        config.display_zone().unwrap(),
        DisplayZone::Named(chrono_tz::Europe::Oslo)
    );
}

#[test]
fn test_empty_file_uses_builtin_registry() {
    let (_dir, path) = write_config("");
    let config = load_from_path(&path).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_missing_file_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("absent.toml");
    assert!(load_from_path(&path).is_err());
}

#[test]
fn test_malformed_toml_is_an_error() {
    let (_dir, path) = write_config("location = ");
    assert!(load_from_path(&path).is_err());
}

#[test]
fn test_validation_rejects_out_of_range_coordinates() {
    let config = create_test_config(None, vec![entry("Nowhere", 91.0, 0.0)]);
    assert!(validate_config(&config).is_err());

    let config = create_test_config(None, vec![entry("Nowhere", 0.0, -180.5)]);
    assert!(validate_config(&config).is_err());

    let config = create_test_config(None, vec![entry("Pole", 90.0, 180.0)]);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_validation_rejects_empty_registry() {
    let config = create_test_config(None, Vec::new());
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_rejects_duplicate_names() {
    let config = create_test_config(
        None,
        vec![entry("Oslo", 59.9, 10.7), entry("OSLO", 59.9, 10.7)],
    );
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("Duplicate"));
}

#[test]
fn test_validation_rejects_blank_names() {
    let config = create_test_config(None, vec![entry("  ", 59.9, 10.7)]);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_requires_selected_location() {
    let config = create_test_config(Some("Bergen"), vec![entry("Oslo", 59.9, 10.7)]);
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("Bergen"));

    let config = create_test_config(Some(" oslo "), vec![entry("Oslo", 59.9, 10.7)]);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_validation_checks_selected_location_against_builtin_registry() {
    let config = Config {
        location: Some("Tromsø".to_string()),
        ..Config::default()
    };
    assert!(validate_config(&config).is_ok());

    let config = Config {
        location: Some("Atlantis".to_string()),
        ..Config::default()
    };
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_rejects_unknown_timezone() {
    let config = Config {
        timezone: Some("Mars/Olympus_Mons".to_string()),
        ..Config::default()
    };
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_display_zone_parsing() {
    assert_eq!(DisplayZone::parse("LOCAL").unwrap(), DisplayZone::Local);
    assert_eq!(
        DisplayZone::parse(" Europe/Oslo ").unwrap(),
        DisplayZone::Named(chrono_tz::Europe::Oslo)
    );
    assert_eq!(DisplayZone::parse("UTC").unwrap().name(), "UTC");
    assert!(DisplayZone::parse("").is_err());
}
