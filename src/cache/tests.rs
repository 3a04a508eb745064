//! Tests for the id/price cache.

use super::*;
use crate::domain::PriceInfo;
use std::fs;
use tempfile::tempdir;

fn cache_in(dir: &tempfile::TempDir) -> MarketCache {
    MarketCache::open(dir.path().join("market_cache.json"))
}

#[test]
fn test_open_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir);
    assert!(cache.is_empty());
}

#[test]
fn test_open_corrupt_file_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("market_cache.json");
    fs::write(&path, "{not json").unwrap();

    let cache = MarketCache::open(&path);
    assert!(cache.is_empty());
}

#[test]
fn test_set_and_get_item_nameid() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir);

    assert_eq!(cache.get_item_nameid("Sticker | Howl"), None);
    cache.set_item_nameid("Sticker | Howl", "12345");
    assert_eq!(
        cache.get_item_nameid("Sticker | Howl"),
        Some("12345".to_string())
    );
}

#[test]
fn test_set_price_records_timestamp() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir);

    let price = PriceInfo::from_minor_units(Some(250), Some(300));
    cache.set_price("Sticker | Howl", &price);

    let entry = cache.entry("Sticker | Howl").unwrap();
    assert_eq!(entry.last_price, price.buy);
    assert_eq!(entry.last_sell_price, price.sell);
    assert!(entry.updated_at.is_some());
}

#[test]
fn test_flush_writes_only_when_dirty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("market_cache.json");
    let cache = MarketCache::open(&path);

    // Nothing dirty yet, flush must not create the file
    cache.flush().unwrap();
    assert!(!path.exists());

    cache.set_item_nameid("Sticker | Howl", "12345");
    cache.flush().unwrap();
    assert!(path.exists());

    // Second flush with no changes leaves the file alone
    fs::remove_file(&path).unwrap();
    cache.flush().unwrap();
    assert!(!path.exists());
}

#[test]
fn test_flush_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("market_cache.json");

    let cache = MarketCache::open(&path);
    cache.set_item_nameid("Sticker | Howl", "12345");
    cache.set_price(
        "Sticker | Howl",
        &PriceInfo::from_minor_units(Some(250), None),
    );
    cache.flush().unwrap();

    let reopened = MarketCache::open(&path);
    assert_eq!(
        reopened.get_item_nameid("Sticker | Howl"),
        Some("12345".to_string())
    );
    let entry = reopened.entry("Sticker | Howl").unwrap();
    assert_eq!(entry.last_price, Some(rust_decimal::Decimal::new(250, 2)));
    assert_eq!(entry.last_sell_price, None);
}

#[test]
fn test_document_layout_uses_expected_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("market_cache.json");

    let cache = MarketCache::open(&path);
    cache.set_item_nameid("Sticker | Howl", "12345");
    cache.set_price(
        "Sticker | Howl",
        &PriceInfo::from_minor_units(Some(250), Some(310)),
    );
    cache.flush().unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let entry = &doc["Sticker | Howl"];
    assert_eq!(entry["item_nameid"], "12345");
    assert_eq!(entry["last_price"], 2.5);
    assert_eq!(entry["last_sell_price"], 3.1);
    assert!(entry["updated_at"].is_i64());
}
