//! Item pair domain model and per-pair scan outcome.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PriceInfo;

/// Which side of a pair an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Sticker,
    Slab,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Sticker => write!(f, "sticker"),
            Side::Slab => write!(f, "slab"),
        }
    }
}

/// A sticker/slab pair taken from the static catalog.
///
/// Immutable once built; `index` is the position in the catalog and is the
/// join key for every downstream event and result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPair {
    /// Stable ordinal position in the catalog.
    pub index: usize,
    /// Market name of the sticker.
    pub sticker_name: String,
    /// Market name of the matching slab.
    pub slab_name: String,
    /// Rarity tag, used only for filtering.
    pub rarity: String,
    /// Crate tags, used only for filtering.
    pub crates: Vec<String>,
}

impl ItemPair {
    /// Returns the market name for the given side.
    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::Sticker => &self.sticker_name,
            Side::Slab => &self.slab_name,
        }
    }
}

/// FlagKind marks a pair whose price difference crossed a configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    /// Slab buy order exceeds the sticker's by at least the configured margin.
    SlabPremium,
    /// Sticker buy order exceeds the slab's by at least the configured margin.
    StickerPremium,
}

impl std::fmt::Display for FlagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagKind::SlabPremium => write!(f, "slab_premium"),
            FlagKind::StickerPremium => write!(f, "sticker_premium"),
        }
    }
}

impl std::str::FromStr for FlagKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slab_premium" => Ok(FlagKind::SlabPremium),
            "sticker_premium" => Ok(FlagKind::StickerPremium),
            _ => Err(format!("Unknown flag kind: {}", s)),
        }
    }
}

/// PairResult is the outcome of scanning both sides of one pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairResult {
    pub pair: ItemPair,
    /// Price snapshot for the sticker side, if the fetch succeeded.
    pub sticker: Option<PriceInfo>,
    /// Price snapshot for the slab side, if the fetch succeeded.
    pub slab: Option<PriceInfo>,
    /// `slab.buy - sticker.buy`, defined only when both buy orders exist.
    pub difference: Option<Decimal>,
    /// Threshold flag, if the difference crossed one.
    pub flag: Option<FlagKind>,
}

impl PairResult {
    /// Builds a result from both side outcomes, computing the buy-order
    /// difference and applying the two flag thresholds.
    pub fn new(
        pair: ItemPair,
        sticker: Option<PriceInfo>,
        slab: Option<PriceInfo>,
        slab_premium_threshold: Decimal,
        sticker_premium_threshold: Decimal,
    ) -> Self {
        let difference = match (
            slab.as_ref().and_then(|p| p.buy),
            sticker.as_ref().and_then(|p| p.buy),
        ) {
            (Some(slab_buy), Some(sticker_buy)) => Some(slab_buy - sticker_buy),
            _ => None,
        };

        let flag = difference.and_then(|diff| {
            if diff >= slab_premium_threshold {
                Some(FlagKind::SlabPremium)
            } else if diff <= -sticker_premium_threshold {
                Some(FlagKind::StickerPremium)
            } else {
                None
            }
        });

        Self {
            pair,
            sticker,
            slab,
            difference,
            flag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn pair() -> ItemPair {
        ItemPair {
            index: 0,
            sticker_name: "Sticker | Howl".to_string(),
            slab_name: "Sticker Slab | Howl".to_string(),
            rarity: "Covert".to_string(),
            crates: vec![],
        }
    }

    fn priced(buy: i64) -> Option<PriceInfo> {
        Some(PriceInfo::from_minor_units(Some(buy), None))
    }

    #[test]
    fn test_difference_requires_both_buy_prices() {
        let result = PairResult::new(
            pair(),
            priced(2500),
            priced(6000),
            Decimal::from(30),
            Decimal::from(40),
        );
        assert_eq!(result.difference, Some(Decimal::new(3500, 2)));

        let result = PairResult::new(
            pair(),
            Some(PriceInfo::default()),
            priced(6000),
            Decimal::from(30),
            Decimal::from(40),
        );
        assert_eq!(result.difference, None);
        assert_eq!(result.flag, None);
    }

    #[test]
    fn test_slab_premium_flag() {
        let result = PairResult::new(
            pair(),
            priced(2500),
            priced(6000),
            Decimal::from(30),
            Decimal::from(40),
        );
        assert_eq!(result.flag, Some(FlagKind::SlabPremium));
    }

    #[test]
    fn test_sticker_premium_flag() {
        let result = PairResult::new(
            pair(),
            priced(9000),
            priced(1000),
            Decimal::from(30),
            Decimal::from(40),
        );
        assert_eq!(result.flag, Some(FlagKind::StickerPremium));
    }

    #[test]
    fn test_difference_inside_thresholds_has_no_flag() {
        let result = PairResult::new(
            pair(),
            priced(2500),
            priced(3500),
            Decimal::from(30),
            Decimal::from(40),
        );
        assert_eq!(result.difference, Some(Decimal::new(1000, 2)));
        assert_eq!(result.flag, None);
    }

    #[test]
    fn test_flag_kind_round_trip() {
        for kind in [FlagKind::SlabPremium, FlagKind::StickerPremium] {
            let parsed: FlagKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("unknown".parse::<FlagKind>().is_err());
    }
}
