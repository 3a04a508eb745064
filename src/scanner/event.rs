//! Events emitted by a scan worker.

use crate::domain::{PairResult, PriceInfo, Side};

/// One message on the scan's event channel.
///
/// Per side of a pair, at most one of `PriceUpdated` or `PriceFailed` is
/// emitted per run. Exactly one `Finished` closes every run, whether it
/// completed naturally or was stopped.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// Human-readable progress line, suitable for a status display.
    Progress { message: String },
    /// An order-book id was resolved for one side of a pair.
    IdResolved {
        index: usize,
        side: Side,
        item_nameid: String,
    },
    /// A price snapshot was fetched for one side of a pair.
    PriceUpdated {
        index: usize,
        side: Side,
        price: PriceInfo,
    },
    /// Resolution or fetching failed for one side; the scan continues.
    PriceFailed {
        index: usize,
        side: Side,
        message: String,
    },
    /// Both sides of a pair were attempted.
    PairCompleted { result: PairResult },
    /// Terminal event; the scanner is back to idle.
    Finished,
}
