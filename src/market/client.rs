//! Market client: name resolution and order-book price queries.

use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::{MarketError, RequestEngine};
use crate::cache::MarketCache;
use crate::config::MarketConfig;
use crate::domain::PriceInfo;

/// Resolves market names to order-book ids and fetches best buy/sell prices,
/// memoizing both through the cache.
pub struct MarketClient {
    engine: RequestEngine,
    cache: Arc<MarketCache>,
    base_url: String,
    app_id: u32,
    country: String,
    language: String,
    currency_id: u32,
    spread_re: Regex,
}

impl MarketClient {
    pub fn new(engine: RequestEngine, cache: Arc<MarketCache>, config: &MarketConfig) -> Self {
        Self {
            engine,
            cache,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id,
            country: config.country.clone(),
            language: config.language.clone(),
            currency_id: config.currency_id,
            spread_re: Regex::new(r"Market_LoadOrderSpread\(\s*(\d+)\s*\)")
                .expect("order spread pattern is valid"),
        }
    }

    /// The engine backing this client.
    pub fn engine(&self) -> &RequestEngine {
        &self.engine
    }

    /// Returns the resolved order-book id for a market name.
    ///
    /// Cache hits return without a network call; ids are treated as permanent
    /// once resolved. Otherwise tries the structured render lookup, falling
    /// back to scraping the listing HTML when the render response lacks the
    /// field, and persists the result before returning.
    pub async fn ensure_item_nameid(&self, market_name: &str) -> Result<String, MarketError> {
        if let Some(cached) = self.cache.get_item_nameid(market_name) {
            debug!(item = %market_name, item_nameid = %cached, "id from cache");
            return Ok(cached);
        }

        let encoded = urlencoding::encode(market_name).into_owned();
        let item_nameid = match self.fetch_id_from_render(&encoded, market_name).await {
            Ok(id) => id,
            Err(MarketError::Malformed { reason, .. }) => {
                debug!(item = %market_name, reason = %reason, "render lookup failed, trying html");
                self.fetch_id_from_html(&encoded, market_name).await?
            }
            Err(e) => return Err(e),
        };

        self.cache.set_item_nameid(market_name, &item_nameid);
        debug!(item = %market_name, item_nameid = %item_nameid, "id resolved");
        Ok(item_nameid)
    }

    async fn fetch_id_from_render(
        &self,
        encoded_name: &str,
        market_name: &str,
    ) -> Result<String, MarketError> {
        let url = format!(
            "{}/market/listings/{}/{}/render?start=0&count=1&country={}&language={}&currency={}",
            self.base_url, self.app_id, encoded_name, self.country, self.language, self.currency_id
        );
        let response = self.engine.get(&url).await?;
        let data: Value =
            serde_json::from_str(&response.body).map_err(|e| MarketError::Malformed {
                item: market_name.to_string(),
                reason: format!("render body is not JSON: {}", e),
            })?;

        match data.get("item_nameid") {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(MarketError::Malformed {
                item: market_name.to_string(),
                reason: "item_nameid missing from render response".to_string(),
            }),
        }
    }

    async fn fetch_id_from_html(
        &self,
        encoded_name: &str,
        market_name: &str,
    ) -> Result<String, MarketError> {
        let url = format!(
            "{}/market/listings/{}/{}?l={}",
            self.base_url, self.app_id, encoded_name, self.language
        );
        let response = self.engine.get(&url).await?;
        match self.spread_re.captures(&response.body) {
            Some(captures) => Ok(captures[1].to_string()),
            None => Err(MarketError::NotFound {
                item: market_name.to_string(),
            }),
        }
    }

    /// Queries the order-book histogram for a resolved id and extracts the
    /// best buy/sell prices. Absent or falsy fields mean "no resting order"
    /// and map to `None`, never zero. Any successful parse is written through
    /// to the cache, even when one or both sides are absent.
    pub async fn fetch_price(
        &self,
        market_name: &str,
        item_nameid: &str,
    ) -> Result<PriceInfo, MarketError> {
        let url = format!(
            "{}/market/itemordershistogram?country={}&language={}&currency={}&item_nameid={}",
            self.base_url, self.country, self.language, self.currency_id, item_nameid
        );
        let response = self.engine.get(&url).await?;
        let data: Value =
            serde_json::from_str(&response.body).map_err(|e| MarketError::Malformed {
                item: market_name.to_string(),
                reason: format!("histogram body is not JSON: {}", e),
            })?;

        let buy = parse_order_field(&data, "highest_buy_order", market_name)?;
        let sell = parse_order_field(&data, "lowest_sell_order", market_name)?;
        let price = PriceInfo::from_minor_units(buy, sell);

        self.cache.set_price(market_name, &price);
        debug!(
            item = %market_name,
            buy = ?price.buy,
            sell = ?price.sell,
            "price updated"
        );
        Ok(price)
    }
}

/// Extracts an optional minor-unit order price. Absent, null, zero, and the
/// empty string all mean "no order"; a present but non-numeric value is a
/// malformed response.
fn parse_order_field(
    data: &Value,
    field: &str,
    market_name: &str,
) -> Result<Option<i64>, MarketError> {
    let malformed = |reason: String| MarketError::Malformed {
        item: market_name.to_string(),
        reason,
    };

    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(0) => Ok(None),
            Some(v) => Ok(Some(v)),
            None => Err(malformed(format!("{} is not an integer: {}", field, n))),
        },
        Some(Value::String(s)) => {
            if s.is_empty() {
                return Ok(None);
            }
            match s.parse::<i64>() {
                Ok(0) => Ok(None),
                Ok(v) => Ok(Some(v)),
                Err(_) => Err(malformed(format!("{} is not numeric: {:?}", field, s))),
            }
        }
        Some(other) => Err(malformed(format!(
            "{} has unexpected shape: {}",
            field, other
        ))),
    }
}
