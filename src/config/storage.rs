//! Cache and catalog file locations.

use serde::Deserialize;

fn default_cache_path() -> String {
    "market_cache.json".to_string()
}

/// Location of the on-disk id/price cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Path to the JSON cache document.
    #[serde(default = "default_cache_path")]
    pub path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

/// Locations of the static item catalogs.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// JSON array of sticker entries.
    pub stickers_path: String,
    /// JSON array of slab entries, index-aligned with the stickers.
    pub slabs_path: String,
}
