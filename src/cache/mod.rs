//! Disk-backed memoization of resolved item ids and last observed prices.
//!
//! One JSON document keyed by market name. The whole document is loaded at
//! startup, mutated in memory behind a single lock, and written back wholesale
//! by `flush` when dirty. Flush failures are reported, never fatal; the
//! in-memory state stays authoritative until the next successful flush.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::PriceInfo;

/// Cache persistence error.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One cached record per market name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Resolved order-book id; permanent once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_nameid: Option<String>,
    /// Last observed best buy order, major units.
    #[serde(default)]
    pub last_price: Option<Decimal>,
    /// Last observed best sell order, major units.
    #[serde(default)]
    pub last_sell_price: Option<Decimal>,
    /// Unix seconds of the last price update.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

struct CacheState {
    entries: BTreeMap<String, CacheEntry>,
    dirty: bool,
}

/// In-memory id/price store with whole-document JSON persistence.
///
/// All mutation and flush operations take the same lock, so a flush from a
/// controlling task never observes a torn write from a scan worker.
pub struct MarketCache {
    path: PathBuf,
    state: Mutex<CacheState>,
}

impl MarketCache {
    /// Opens the cache at `path`, starting empty if the file is absent or
    /// unreadable. A corrupt document is discarded with a warning rather
    /// than failing startup.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "discarding corrupt cache file");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            state: Mutex::new(CacheState {
                entries,
                dirty: false,
            }),
        }
    }

    /// Point lookup of a resolved id. No side effects.
    pub fn get_item_nameid(&self, market_name: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .entries
            .get(market_name)
            .and_then(|entry| entry.item_nameid.clone())
    }

    /// Upserts a resolved id and marks the store dirty. Does not flush.
    pub fn set_item_nameid(&self, market_name: &str, item_nameid: &str) {
        let mut state = self.state.lock().unwrap();
        let entry = state.entries.entry(market_name.to_string()).or_default();
        entry.item_nameid = Some(item_nameid.to_string());
        state.dirty = true;
    }

    /// Upserts the last observed prices with a fresh timestamp and marks the
    /// store dirty. Does not flush.
    pub fn set_price(&self, market_name: &str, price: &PriceInfo) {
        let mut state = self.state.lock().unwrap();
        let entry = state.entries.entry(market_name.to_string()).or_default();
        entry.last_price = price.buy;
        entry.last_sell_price = price.sell;
        entry.updated_at = Some(chrono::Utc::now().timestamp());
        state.dirty = true;
    }

    /// Returns a copy of the entry for a name, if one exists.
    pub fn entry(&self, market_name: &str) -> Option<CacheEntry> {
        let state = self.state.lock().unwrap();
        state.entries.get(market_name).cloned()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    /// Returns true when no records are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes the whole store to disk if anything changed since the last
    /// flush; a no-op otherwise.
    pub fn flush(&self) -> Result<(), CacheError> {
        let mut state = self.state.lock().unwrap();
        if !state.dirty {
            return Ok(());
        }
        let serialized = serde_json::to_string_pretty(&state.entries)?;
        fs::write(&self.path, serialized)?;
        state.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
