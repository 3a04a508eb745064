//! Market client error types.

use thiserror::Error;

/// Errors produced by the request engine and market client.
///
/// A 429 response is never represented here: the engine converts it into a
/// proxy rotation or a cooldown and retries, so callers only ever see
/// increased latency or `Cancelled`.
#[derive(Debug, Error)]
pub enum MarketError {
    /// A cooperative stop took effect during a wait or before a request.
    #[error("cancelled")]
    Cancelled,

    /// Non-2xx, non-429 response status.
    #[error("http error {status}")]
    Http { status: u16 },

    /// Id resolution exhausted both the render and the HTML strategy.
    #[error("item not found: {item}")]
    NotFound { item: String },

    /// Response body did not parse or lacked an expected field.
    #[error("malformed response for {item}: {reason}")]
    Malformed { item: String, reason: String },

    /// Transport-level failure (connect, timeout, invalid configuration).
    #[error("request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        MarketError::Request(err.to_string())
    }
}
