//! Paginated discovery of slab listings through the market search endpoint.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{MarketError, RequestEngine};
use crate::config::MarketConfig;

/// Market-name prefix identifying a slab listing.
pub const SLAB_PREFIX: &str = "Sticker Slab |";

/// Page size used for search pagination.
const PAGE_SIZE: u64 = 100;

/// One slab found through search.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabListing {
    pub name: String,
    /// Advertised sell price, major units.
    pub sell_price: Decimal,
}

/// Derives the paired sticker name from a slab name.
pub fn slab_to_sticker_name(slab_name: &str) -> String {
    slab_name.replacen(SLAB_PREFIX, "Sticker |", 1)
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    hash_name: String,
    #[serde(default)]
    sell_price: i64,
}

/// Walks the search pages collecting slab listings.
///
/// Stops when the reported total is reached or on the first empty page,
/// whichever comes sooner; an empty page mid-pagination is treated as end of
/// data.
pub async fn discover_slabs(
    engine: &RequestEngine,
    config: &MarketConfig,
) -> Result<Vec<SlabListing>, MarketError> {
    let base_url = config.base_url.trim_end_matches('/');
    let mut slabs = Vec::new();
    let mut start: u64 = 0;
    let mut total_count: Option<u64> = None;

    loop {
        if let Some(total) = total_count {
            if start >= total {
                break;
            }
        }

        let url = format!(
            "{}/market/search/render?query=slab&appid={}&start={}&count={}&search_descriptions=0&sort_column=price&sort_dir=asc",
            base_url, config.app_id, start, PAGE_SIZE
        );
        let response = engine.get(&url).await?;
        let page: SearchPage =
            serde_json::from_str(&response.body).map_err(|e| MarketError::Malformed {
                item: "slab search".to_string(),
                reason: format!("search body is not JSON: {}", e),
            })?;

        total_count = Some(page.total_count);
        if page.results.is_empty() {
            break;
        }

        for item in &page.results {
            if !item.hash_name.starts_with(SLAB_PREFIX) {
                continue;
            }
            slabs.push(SlabListing {
                name: item.hash_name.clone(),
                sell_price: Decimal::new(item.sell_price, 2),
            });
        }

        debug!(
            start = start,
            page_results = page.results.len(),
            slabs = slabs.len(),
            "search page processed"
        );
        start += PAGE_SIZE;
    }

    Ok(slabs)
}
