//! Request engine: global throttle, 429 handling, proxy rotation, cooldown.
//!
//! Every request runs the same state machine: check cancellation, wait out
//! the inter-request interval, send through the current proxy, and on a 429
//! rotate or cool down and retry the same request. The retry loop is
//! unbounded; callers perceive latency, not failure, unless cancellation
//! intervenes. All waits poll the cancel flag in small slices.

use std::cmp;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use super::{CancelFlag, HttpResponse, MarketError, ProxyPool, Transport};
use crate::config::MarketConfig;

/// Floor for the configured inter-request interval.
pub const MIN_REQUEST_DELAY: Duration = Duration::from_millis(50);

/// Pause once every proxy has been rate limited since the last success.
const DEFAULT_COOLDOWN: Duration = Duration::from_secs(600);

/// Slice size for cancellable waits; a stop takes effect within about one.
const DEFAULT_CANCEL_POLL: Duration = Duration::from_millis(200);

/// Timing knobs for a request engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum interval between requests issued by this engine.
    pub delay: Duration,
    /// Cooldown applied when the whole pool has been rate limited.
    pub cooldown: Duration,
    /// Polling granularity of cancellable waits.
    pub poll: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delay: MIN_REQUEST_DELAY,
            cooldown: DEFAULT_COOLDOWN,
            poll: DEFAULT_CANCEL_POLL,
        }
    }
}

impl EngineConfig {
    /// Derives engine timings from the market config, substituting defaults
    /// for fields left at zero.
    pub fn from_market(config: &MarketConfig) -> Self {
        let defaults = Self::default();
        Self {
            delay: cmp::max(config.request_delay, MIN_REQUEST_DELAY),
            cooldown: if config.cooldown.is_zero() {
                defaults.cooldown
            } else {
                config.cooldown
            },
            poll: defaults.poll,
        }
    }
}

/// Issues single GETs with a global minimum interval, rotating proxies on
/// rate limits and cooling down when the pool is exhausted.
///
/// One engine is driven by one worker at a time; the counters are atomics so
/// the layout stays sound should engines ever be shared.
pub struct RequestEngine {
    transport: Arc<dyn Transport>,
    pool: ProxyPool,
    config: EngineConfig,
    cancel: CancelFlag,
    /// Consecutive 429s without an intervening success.
    consecutive_hits: AtomicUsize,
    /// Cooldowns taken since construction.
    cooldowns: AtomicUsize,
    last_request: Mutex<Option<Instant>>,
}

impl RequestEngine {
    pub fn new(
        transport: Arc<dyn Transport>,
        pool: ProxyPool,
        config: EngineConfig,
        cancel: CancelFlag,
    ) -> Self {
        Self {
            transport,
            pool,
            config,
            cancel,
            consecutive_hits: AtomicUsize::new(0),
            cooldowns: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Issues a GET, retrying 429s indefinitely. Returns the response for any
    /// other status; non-2xx becomes `Http`, a set cancel flag `Cancelled`.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, MarketError> {
        loop {
            self.check_cancelled()?;
            self.throttle().await?;

            debug!(
                url = %url,
                proxy = %self.proxy_state(),
                "sending request"
            );
            let response = self.transport.get(url, self.pool.current()).await?;
            debug!(status = response.status, bytes = response.body.len(), "response");

            if response.status == 429 {
                self.handle_rate_limit(url).await?;
                continue;
            }

            self.consecutive_hits.store(0, Ordering::SeqCst);

            if !response.is_success() {
                return Err(MarketError::Http {
                    status: response.status,
                });
            }
            return Ok(response);
        }
    }

    /// Returns a clone of this engine's cancel flag.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// The proxy pool driven by this engine.
    pub fn pool(&self) -> &ProxyPool {
        &self.pool
    }

    /// Consecutive 429s seen since the last successful response.
    pub fn consecutive_hits(&self) -> usize {
        self.consecutive_hits.load(Ordering::SeqCst)
    }

    /// Number of cooldown pauses taken so far.
    pub fn cooldown_count(&self) -> usize {
        self.cooldowns.load(Ordering::SeqCst)
    }

    fn check_cancelled(&self) -> Result<(), MarketError> {
        if self.cancel.is_cancelled() {
            return Err(MarketError::Cancelled);
        }
        Ok(())
    }

    fn proxy_state(&self) -> String {
        if self.pool.is_empty() {
            "off".to_string()
        } else {
            format!("{}/{}", self.pool.position() + 1, self.pool.len())
        }
    }

    /// Blocks until the configured interval has elapsed since the last
    /// request issued by this engine. Interruptible by cancellation.
    async fn throttle(&self) -> Result<(), MarketError> {
        let delay = cmp::max(self.config.delay, MIN_REQUEST_DELAY);
        let wait = {
            let last = self.last_request.lock().unwrap();
            match *last {
                Some(at) => delay.saturating_sub(at.elapsed()),
                None => Duration::ZERO,
            }
        };
        if !wait.is_zero() {
            self.cancellable_sleep(wait).await?;
        }
        *self.last_request.lock().unwrap() = Some(Instant::now());
        Ok(())
    }

    /// Rate-limit policy: advance the cursor and count the hit; once every
    /// proxy has failed without an intervening success, cool down and reset.
    /// With no proxies at all, every hit cools down.
    async fn handle_rate_limit(&self, url: &str) -> Result<(), MarketError> {
        warn!(url = %url, proxy = %self.proxy_state(), "rate limited");

        if !self.pool.is_empty() {
            self.pool.advance();
            let hits = self.consecutive_hits.fetch_add(1, Ordering::SeqCst) + 1;
            if hits >= self.pool.len() {
                warn!(
                    cooldown = ?self.config.cooldown,
                    "every proxy rate limited, cooling down"
                );
                self.cooldown().await?;
                self.consecutive_hits.store(0, Ordering::SeqCst);
            }
        } else {
            warn!(
                cooldown = ?self.config.cooldown,
                "rate limited without proxies, cooling down"
            );
            self.cooldown().await?;
        }
        Ok(())
    }

    async fn cooldown(&self) -> Result<(), MarketError> {
        self.cooldowns.fetch_add(1, Ordering::SeqCst);
        self.cancellable_sleep(self.config.cooldown).await
    }

    /// Sleeps in poll-sized slices so a stop request takes effect within
    /// roughly one slice rather than the full duration.
    async fn cancellable_sleep(&self, total: Duration) -> Result<(), MarketError> {
        let deadline = Instant::now() + total;
        loop {
            self.check_cancelled()?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            let slice = cmp::min(self.config.poll, deadline - now);
            tokio::time::sleep(slice).await;
        }
    }
}
