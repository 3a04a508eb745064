//! Scan orchestration.
//!
//! A scan runs as one background task working through the pair list in
//! order, sticker side then slab side, against the shared request engine.
//! Results flow back over a bounded event channel; the worker never touches
//! shared state beyond the client's cache. A per-side failure is reported
//! and skipped, never fatal; cancellation is observed at pair boundaries and
//! inside the engine's waits.

mod event;

pub use event::ScanEvent;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::domain::{ItemPair, PairResult, PriceInfo, Side};
use crate::market::{CancelFlag, MarketClient, MarketError};

/// Capacity of the event channel between worker and controller.
const EVENT_BUFFER: usize = 64;

/// Scanner control error.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("a scan is already running")]
    AlreadyRunning,
}

/// Handle to a running scan: the event stream plus stop control.
pub struct ScanHandle {
    /// Event stream; closes after the terminal `Finished` event.
    pub events: mpsc::Receiver<ScanEvent>,
    cancel: CancelFlag,
    task: JoinHandle<()>,
}

impl ScanHandle {
    /// Requests a cooperative stop. The worker still emits `Finished`.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Waits for the worker task to exit.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Starts scan workers and enforces one run at a time.
pub struct Scanner {
    client: Arc<MarketClient>,
    slab_premium_threshold: Decimal,
    sticker_premium_threshold: Decimal,
    running: Arc<AtomicBool>,
}

impl Scanner {
    pub fn new(client: Arc<MarketClient>, config: &ScanConfig) -> Self {
        Self {
            client,
            slab_premium_threshold: config.slab_premium_threshold,
            sticker_premium_threshold: config.sticker_premium_threshold,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True while a worker is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawns a background worker over the given pairs.
    ///
    /// Fails when a scan is already in flight; the scanner returns to idle
    /// once the previous run's `Finished` event has been emitted.
    pub fn start(
        &self,
        pairs: Vec<ItemPair>,
        cancel: CancelFlag,
    ) -> Result<ScanHandle, ScanError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ScanError::AlreadyRunning);
        }

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let worker = ScanWorker {
            client: self.client.clone(),
            pairs,
            cancel: cancel.clone(),
            tx,
            slab_premium_threshold: self.slab_premium_threshold,
            sticker_premium_threshold: self.sticker_premium_threshold,
            running: self.running.clone(),
        };
        let task = tokio::spawn(worker.run());

        Ok(ScanHandle {
            events: rx,
            cancel,
            task,
        })
    }
}

/// Outcome of scanning one side of a pair.
enum SideOutcome {
    Price(PriceInfo),
    Failed,
    Cancelled,
}

struct ScanWorker {
    client: Arc<MarketClient>,
    pairs: Vec<ItemPair>,
    cancel: CancelFlag,
    tx: mpsc::Sender<ScanEvent>,
    slab_premium_threshold: Decimal,
    sticker_premium_threshold: Decimal,
    running: Arc<AtomicBool>,
}

impl ScanWorker {
    async fn run(self) {
        let total = self.pairs.len();

        'pairs: for (position, pair) in self.pairs.iter().enumerate() {
            if self.cancel.is_cancelled() {
                debug!(index = pair.index, "stop requested, ending scan");
                break;
            }

            self.emit(ScanEvent::Progress {
                message: format!(
                    "scanning pair {}/{}: {} / {}",
                    position + 1,
                    total,
                    pair.slab_name,
                    pair.sticker_name
                ),
            })
            .await;

            let mut sticker = None;
            let mut slab = None;
            for side in [Side::Sticker, Side::Slab] {
                match self.scan_side(pair, side).await {
                    SideOutcome::Price(price) => match side {
                        Side::Sticker => sticker = Some(price),
                        Side::Slab => slab = Some(price),
                    },
                    SideOutcome::Failed => {}
                    SideOutcome::Cancelled => break 'pairs,
                }
            }

            self.emit(ScanEvent::PairCompleted {
                result: PairResult::new(
                    pair.clone(),
                    sticker,
                    slab,
                    self.slab_premium_threshold,
                    self.sticker_premium_threshold,
                ),
            })
            .await;
        }

        // Terminal event is unconditional so the controller can always clean
        // up; the idle transition happens first so a listener reacting to
        // Finished can immediately start the next run.
        self.running.store(false, Ordering::SeqCst);
        self.emit(ScanEvent::Finished).await;
    }

    /// Resolves and prices one side. Failures other than cancellation are
    /// reported as events and absorbed here.
    async fn scan_side(&self, pair: &ItemPair, side: Side) -> SideOutcome {
        let name = pair.name(side);

        let item_nameid = match self.client.ensure_item_nameid(name).await {
            Ok(id) => id,
            Err(MarketError::Cancelled) => return SideOutcome::Cancelled,
            Err(e) => {
                warn!(index = pair.index, side = %side, error = %e, "id resolution failed");
                self.emit(ScanEvent::PriceFailed {
                    index: pair.index,
                    side,
                    message: e.to_string(),
                })
                .await;
                return SideOutcome::Failed;
            }
        };

        self.emit(ScanEvent::IdResolved {
            index: pair.index,
            side,
            item_nameid: item_nameid.clone(),
        })
        .await;

        match self.client.fetch_price(name, &item_nameid).await {
            Ok(price) => {
                self.emit(ScanEvent::PriceUpdated {
                    index: pair.index,
                    side,
                    price: price.clone(),
                })
                .await;
                SideOutcome::Price(price)
            }
            Err(MarketError::Cancelled) => SideOutcome::Cancelled,
            Err(e) => {
                warn!(index = pair.index, side = %side, error = %e, "price fetch failed");
                self.emit(ScanEvent::PriceFailed {
                    index: pair.index,
                    side,
                    message: e.to_string(),
                })
                .await;
                SideOutcome::Failed
            }
        }
    }

    async fn emit(&self, event: ScanEvent) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.tx.send(event).await;
    }
}
