//! Marketplace client configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

fn default_base_url() -> String {
    "https://steamcommunity.com".to_string()
}

fn default_app_id() -> u32 {
    730
}

fn default_country() -> String {
    "US".to_string()
}

fn default_language() -> String {
    "english".to_string()
}

fn default_currency_id() -> u32 {
    1
}

/// Settings for the marketplace request engine and endpoints.
///
/// Duration fields left at zero fall back to the engine's built-in defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Marketplace origin, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Application id the listings belong to.
    #[serde(default = "default_app_id")]
    pub app_id: u32,
    /// Two-letter country code sent with every query.
    #[serde(default = "default_country")]
    pub country: String,
    /// Language tag sent with every query.
    #[serde(default = "default_language")]
    pub language: String,
    /// Remote currency id; prices come back in its minor units.
    #[serde(default = "default_currency_id")]
    pub currency_id: u32,
    /// Minimum interval between requests (floored at 50ms by the engine).
    #[serde(default, deserialize_with = "duration::deserialize")]
    pub request_delay: Duration,
    /// Per-request timeout.
    #[serde(default, deserialize_with = "duration::deserialize")]
    pub request_timeout: Duration,
    /// Pause applied once every proxy has been rate limited.
    #[serde(default, deserialize_with = "duration::deserialize")]
    pub cooldown: Duration,
    /// Session cookies applied to every request, "name=value; name=value" form.
    #[serde(default)]
    pub cookies: String,
    /// Outbound proxies, one "host:port" or "host:port:user:pass" per entry.
    #[serde(default)]
    pub proxies: Vec<String>,
}
