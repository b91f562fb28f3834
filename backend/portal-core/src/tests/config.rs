// Unit tests for portal config load/save/validate.

use crate::config::PortalConfig;

#[test]
fn given_missing_config_file_when_loaded_then_defaults_returned() {
    let dir = tempfile::tempdir().unwrap();

    let config = PortalConfig::load(dir.path()).unwrap();

    assert_eq!(config.version, 1);
    assert_eq!(config.api.base_url, crate::DEFAULT_API_BASE_URL);
    assert_eq!(config.api.timeout_secs, 30);
}

#[test]
fn given_saved_config_when_reloaded_then_round_trips() {
    let dir = tempfile::tempdir().unwrap();

    let mut config = PortalConfig::default();
    config.api.base_url = "https://portal.example.gov.ng/api/".to_string();
    config.api.timeout_secs = 10;
    config.save(dir.path()).unwrap();

    let loaded = PortalConfig::load(dir.path()).unwrap();
    assert_eq!(loaded.api.base_url, "https://portal.example.gov.ng/api/");
    assert_eq!(loaded.api.timeout_secs, 10);
}

#[test]
fn given_corrupt_config_file_when_loaded_then_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{oops").unwrap();

    assert!(PortalConfig::load(dir.path()).is_err());
}

#[test]
fn given_non_http_base_url_when_validated_then_rejected() {
    let mut config = PortalConfig::default();
    config.api.base_url = "ftp://portal.example.com/api/".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn given_zero_timeout_when_validated_then_rejected() {
    let mut config = PortalConfig::default();
    config.api.timeout_secs = 0;

    assert!(config.validate().is_err());
}

#[test]
fn given_unknown_future_version_when_validated_then_rejected() {
    let mut config = PortalConfig::default();
    config.version = 99;

    assert!(config.validate().is_err());
}
