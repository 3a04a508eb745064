//! One-time load of the static sticker/slab catalogs.
//!
//! Two index-aligned JSON arrays are zipped into `ItemPair`s. Entries missing
//! a usable market name on either side are skipped; the pair index counts
//! accepted pairs only and stays stable for the life of the process.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::config::{CatalogConfig, ScanConfig};
use crate::domain::ItemPair;

/// Catalog loading error.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("catalog produced no item pairs")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RarityTag {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrateTag {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    market_hash_name: Option<String>,
    name: Option<String>,
    rarity: Option<RarityTag>,
    #[serde(default)]
    crates: Vec<CrateTag>,
}

impl CatalogEntry {
    fn market_name(&self) -> Option<&str> {
        self.market_hash_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.name.as_deref().filter(|n| !n.is_empty()))
    }
}

/// The loaded catalog: ordered pairs plus the tag vocabularies seen in them.
#[derive(Debug)]
pub struct Catalog {
    pub pairs: Vec<ItemPair>,
    pub rarities: Vec<String>,
    pub crates: Vec<String>,
}

impl Catalog {
    /// Loads and zips the two catalog files named by the config.
    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let stickers = read_entries(&config.stickers_path)?;
        let slabs = read_entries(&config.slabs_path)?;

        let mut pairs = Vec::new();
        let mut rarities = BTreeSet::new();
        let mut crates = BTreeSet::new();

        for (sticker, slab) in stickers.iter().zip(slabs.iter()) {
            let (Some(sticker_name), Some(slab_name)) = (sticker.market_name(), slab.market_name())
            else {
                continue;
            };

            let rarity = sticker
                .rarity
                .as_ref()
                .and_then(|r| r.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unknown".to_string());
            let crate_names: Vec<String> = sticker
                .crates
                .iter()
                .filter_map(|c| c.name.clone())
                .filter(|n| !n.is_empty())
                .collect();

            rarities.insert(rarity.clone());
            crates.extend(crate_names.iter().cloned());

            pairs.push(ItemPair {
                index: pairs.len(),
                sticker_name: sticker_name.to_string(),
                slab_name: slab_name.to_string(),
                rarity,
                crates: crate_names,
            });
        }

        if pairs.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self {
            pairs,
            rarities: rarities.into_iter().collect(),
            crates: crates.into_iter().collect(),
        })
    }

    /// Returns the pairs selected by the scan filters, preserving order and
    /// the original indices. Empty filter sets select everything.
    pub fn filter_pairs(&self, scan: &ScanConfig) -> Vec<ItemPair> {
        self.pairs
            .iter()
            .filter(|pair| {
                if !scan.rarities.is_empty() && !scan.rarities.contains(&pair.rarity) {
                    return false;
                }
                if !scan.crates.is_empty()
                    && !pair.crates.iter().any(|c| scan.crates.contains(c))
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect()
    }
}

fn read_entries(path: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let content = fs::read_to_string(Path::new(path)).map_err(|source| CatalogError::ReadFile {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_string(),
        source,
    })
}
