//! Scan thresholds and filters.

use rust_decimal::Decimal;
use serde::Deserialize;

fn default_slab_premium() -> Decimal {
    Decimal::from(30)
}

fn default_sticker_premium() -> Decimal {
    Decimal::from(40)
}

/// Thresholds applied to the slab-minus-sticker buy-order difference.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Flag a pair when the difference is at least this much.
    #[serde(default = "default_slab_premium")]
    pub slab_premium_threshold: Decimal,
    /// Flag a pair when the difference is at most the negative of this.
    #[serde(default = "default_sticker_premium")]
    pub sticker_premium_threshold: Decimal,
    /// Only scan pairs whose rarity tag is in this set (empty = all).
    #[serde(default)]
    pub rarities: Vec<String>,
    /// Only scan pairs sharing at least one crate tag with this set (empty = all).
    #[serde(default)]
    pub crates: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            slab_premium_threshold: default_slab_premium(),
            sticker_premium_threshold: default_sticker_premium(),
            rarities: Vec::new(),
            crates: Vec::new(),
        }
    }
}
