//! Tests for config module.

use super::*;
use rust_decimal::Decimal;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

// ==================== Duration parsing tests ====================

#[test]
fn test_parse_duration_seconds() {
    let d = duration::parse_duration("30s").unwrap();
    assert_eq!(d, Duration::from_secs(30));
}

#[test]
fn test_parse_duration_minutes() {
    let d = duration::parse_duration("10m").unwrap();
    assert_eq!(d, Duration::from_secs(600));
}

#[test]
fn test_parse_duration_milliseconds() {
    let d = duration::parse_duration("300ms").unwrap();
    assert_eq!(d, Duration::from_millis(300));
}

#[test]
fn test_parse_duration_empty() {
    let d = duration::parse_duration("").unwrap();
    assert_eq!(d, Duration::ZERO);
}

#[test]
fn test_parse_duration_invalid_unit() {
    let result = duration::parse_duration("10x");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("unknown duration unit"));
}

#[test]
fn test_parse_duration_fractional() {
    let d = duration::parse_duration("1.5s").unwrap();
    assert_eq!(d, Duration::from_millis(1500));
}

// ==================== YAML field loading tests ====================

/// Parse config from YAML string (for testing).
fn from_yaml(yaml: &str) -> Result<Config, ConfigError> {
    let mut config: Config = serde_yaml::from_str(yaml)?;
    config.load_cookies_from_env();
    config.validate()?;
    Ok(config)
}

fn minimal_valid_yaml() -> String {
    r#"
app:
  name: slabscan

market: {}

catalog:
  stickers_path: stickers.json
  slabs_path: slabs.json
"#
    .to_string()
}

#[test]
fn test_load_minimal_config_defaults() {
    let cfg = from_yaml(&minimal_valid_yaml()).unwrap();

    assert_eq!(cfg.market.base_url, "https://steamcommunity.com");
    assert_eq!(cfg.market.app_id, 730);
    assert_eq!(cfg.market.country, "US");
    assert_eq!(cfg.market.language, "english");
    assert_eq!(cfg.market.currency_id, 1);
    assert_eq!(cfg.market.request_delay, Duration::ZERO);
    assert!(cfg.market.proxies.is_empty());
    assert_eq!(cfg.scan.slab_premium_threshold, Decimal::from(30));
    assert_eq!(cfg.scan.sticker_premium_threshold, Decimal::from(40));
    assert_eq!(cfg.cache.path, "market_cache.json");
}

#[test]
fn test_load_market_fields() {
    let yaml = r#"
app:
  name: slabscan
  log_level: debug

market:
  country: UA
  language: english
  currency_id: 18
  request_delay: 300ms
  request_timeout: 30s
  cooldown: 10m
  cookies: "sessionid=abc; steamLoginSecure=xyz"
  proxies:
    - 10.0.0.1:8080
    - 10.0.0.2:8080:user:pass

catalog:
  stickers_path: stickers.json
  slabs_path: slabs.json
"#;
    let cfg = from_yaml(yaml).unwrap();

    assert_eq!(cfg.app.log_level, Some("debug".to_string()));
    assert_eq!(cfg.market.country, "UA");
    assert_eq!(cfg.market.currency_id, 18);
    assert_eq!(cfg.market.request_delay, Duration::from_millis(300));
    assert_eq!(cfg.market.request_timeout, Duration::from_secs(30));
    assert_eq!(cfg.market.cooldown, Duration::from_secs(600));
    assert_eq!(cfg.market.proxies.len(), 2);
    assert!(cfg.market.cookies.contains("sessionid=abc"));
}

#[test]
fn test_load_scan_fields() {
    let yaml = r#"
app:
  name: slabscan

market: {}

scan:
  slab_premium_threshold: 25.5
  sticker_premium_threshold: 12
  rarities:
    - Covert

catalog:
  stickers_path: stickers.json
  slabs_path: slabs.json
"#;
    let cfg = from_yaml(yaml).unwrap();

    assert_eq!(cfg.scan.slab_premium_threshold, Decimal::new(255, 1));
    assert_eq!(cfg.scan.sticker_premium_threshold, Decimal::from(12));
    assert_eq!(cfg.scan.rarities, vec!["Covert".to_string()]);
}

// ==================== Validation tests ====================

#[test]
fn test_validation_rejects_empty_app_name() {
    let yaml = minimal_valid_yaml().replace("name: slabscan", "name: \"\"");
    let err = from_yaml(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_validation_rejects_zero_currency() {
    let yaml = r#"
app:
  name: slabscan

market:
  currency_id: 0

catalog:
  stickers_path: stickers.json
  slabs_path: slabs.json
"#;
    let err = from_yaml(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_validation_rejects_missing_catalog_paths() {
    let yaml = minimal_valid_yaml().replace("stickers_path: stickers.json", "stickers_path: \"\"");
    let err = from_yaml(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_validation_rejects_negative_threshold() {
    let yaml = format!(
        "{}\nscan:\n  slab_premium_threshold: -1\n",
        minimal_valid_yaml()
    );
    let err = from_yaml(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

// ==================== File loading tests ====================

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(minimal_valid_yaml().as_bytes()).unwrap();

    let cfg = Config::load(file.path().to_str().unwrap()).unwrap();
    assert_eq!(cfg.app.name, "slabscan");
}

#[test]
fn test_load_missing_file_is_read_error() {
    let err = Config::load("/nonexistent/slabscan.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}
