//! Configuration loading and validation for the scanner.
//!
//! Uses serde_yaml to load YAML configuration files with support for an
//! environment variable override for the session cookies.

mod app;
mod duration;
mod error;
mod market;
mod scan;
mod storage;

pub use app::AppConfig;
pub use error::ConfigError;
pub use market::MarketConfig;
pub use scan::ScanConfig;
pub use storage::{CacheConfig, CatalogConfig};

use serde::Deserialize;
use std::{env, fs};

/// Environment variable that overrides `market.cookies`.
const COOKIES_ENV: &str = "SLABSCAN_COOKIES";

/// Root configuration structure for the scanner.
///
/// Required sections: app, catalog. Optional sections: market, scan, cache.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and environment.
    pub app: AppConfig,
    /// Request engine and marketplace endpoint settings.
    pub market: MarketConfig,
    /// Difference thresholds and pair filters (optional).
    #[serde(default)]
    pub scan: ScanConfig,
    /// Id/price cache location (optional).
    #[serde(default)]
    pub cache: CacheConfig,
    /// Static catalog locations.
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// First loads environment variables from a `.env` file (if one exists),
    /// then loads the YAML config. The `SLABSCAN_COOKIES` variable, when set,
    /// replaces `market.cookies` so session cookies can stay out of the file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore error if not found)
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.into(),
            source,
        })?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        config.load_cookies_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Replaces cookies with the environment override, when present.
    fn load_cookies_from_env(&mut self) {
        if let Ok(cookies) = env::var(COOKIES_ENV) {
            if !cookies.is_empty() {
                self.market.cookies = cookies;
            }
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        if self.market.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "market.base_url must not be empty".into(),
            ));
        }

        if self.market.currency_id == 0 {
            return Err(ConfigError::Validation(
                "market.currency_id must be positive".into(),
            ));
        }

        if self.catalog.stickers_path.is_empty() || self.catalog.slabs_path.is_empty() {
            return Err(ConfigError::Validation(
                "catalog.stickers_path and catalog.slabs_path are required".into(),
            ));
        }

        if self.scan.slab_premium_threshold.is_sign_negative()
            || self.scan.sticker_premium_threshold.is_sign_negative()
        {
            return Err(ConfigError::Validation(
                "scan thresholds must not be negative".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
