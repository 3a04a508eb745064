//! Slab/sticker market scanner.
//!
//! Compares buy-order prices between paired "slab" and "sticker" listings on
//! a community marketplace, scraping a hostile rate-limited API through a
//! throttled, proxy-rotating request engine with disk-backed memoization.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod market;
pub mod scanner;
