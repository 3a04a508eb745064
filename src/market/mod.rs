//! Rate-adaptive scraping client for the community market.
//!
//! The request engine owns the global throttle, proxy rotation, and the
//! rate-limit cooldown; the market client layers name resolution and
//! order-book queries on top of it, memoizing through the cache.

mod cancel;
mod client;
mod engine;
mod error;
mod proxy;
mod search;
pub(crate) mod transport;

pub use cancel::CancelFlag;
pub use client::MarketClient;
pub use engine::{EngineConfig, RequestEngine, MIN_REQUEST_DELAY};
pub use error::MarketError;
pub use proxy::{ProxyEndpoint, ProxyPool};
pub use search::{discover_slabs, slab_to_sticker_name, SlabListing, SLAB_PREFIX};
pub use transport::{HttpResponse, HttpTransport, Transport};

#[cfg(test)]
mod tests;
