//! Configuration resolution tests
//!
//! Tests that touch process environment variables are marked #[serial]
//! so they never run concurrently with each other.

use leadq_common::config::{
    load_toml_config, EnrichmentConfig, EnrichmentToml, API_KEY_ENV, BASE_URL_ENV,
    DEFAULT_BASE_URL, DEFAULT_MODEL, MODEL_ENV,
};
use leadq_common::Error;
use serial_test::serial;
use std::env;
use std::time::Duration;
use tempfile::TempDir;

fn clear_enrichment_env() {
    env::remove_var(API_KEY_ENV);
    env::remove_var(BASE_URL_ENV);
    env::remove_var(MODEL_ENV);
}

#[test]
#[serial]
fn test_no_credential_disables_enrichment() {
    clear_enrichment_env();

    let config = EnrichmentConfig::resolve(&EnrichmentToml::default());

    assert!(!config.is_enabled());
    assert_eq!(config.model, DEFAULT_MODEL);
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.timeout, Duration::from_secs(10));
}

#[test]
#[serial]
fn test_blank_credential_counts_as_absent() {
    clear_enrichment_env();
    env::set_var(API_KEY_ENV, "   ");

    let config = EnrichmentConfig::resolve(&EnrichmentToml::default());
    assert!(!config.is_enabled());

    clear_enrichment_env();
}

#[test]
#[serial]
fn test_env_beats_toml() {
    clear_enrichment_env();
    env::set_var(API_KEY_ENV, "sk-env");
    env::set_var(BASE_URL_ENV, "http://localhost:9999/v1/");

    let toml = EnrichmentToml {
        api_key: Some("sk-toml".to_string()),
        model: Some("gpt-4o-mini".to_string()),
        base_url: Some("http://toml.invalid".to_string()),
        timeout_secs: Some(2),
    };
    let config = EnrichmentConfig::resolve(&toml);

    assert_eq!(config.api_key.as_deref(), Some("sk-env"));
    assert_eq!(config.base_url, "http://localhost:9999/v1");
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.timeout, Duration::from_secs(2));

    clear_enrichment_env();
}

#[test]
#[serial]
fn test_toml_credential_enables_enrichment() {
    clear_enrichment_env();

    let toml = EnrichmentToml {
        api_key: Some("sk-toml".to_string()),
        ..Default::default()
    };
    assert!(EnrichmentConfig::resolve(&toml).is_enabled());
}

#[test]
fn test_explicit_config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        root_folder = "/srv/leadq"
        bind = "0.0.0.0:8080"
        log_level = "debug"
        "#,
    )
    .unwrap();

    let config = load_toml_config(Some(&path)).unwrap();
    assert_eq!(config.root_folder.unwrap().to_str(), Some("/srv/leadq"));
    assert_eq!(config.bind.as_deref(), Some("0.0.0.0:8080"));
    assert_eq!(config.log_level.as_deref(), Some("debug"));
}

#[test]
fn test_explicit_missing_config_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = load_toml_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_explicit_invalid_config_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "bind = [not toml").unwrap();

    let err = load_toml_config(Some(&path)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
