//! Order-book price snapshot for a single market item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Best resting buy and sell orders for an item, in major currency units.
///
/// `None` means no resting order was observed on that side, which is distinct
/// from a price of zero and must never be collapsed into one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceInfo {
    /// Highest resting buy order, if any.
    pub buy: Option<Decimal>,
    /// Lowest resting sell order, if any.
    pub sell: Option<Decimal>,
}

impl PriceInfo {
    /// Builds a snapshot from the remote system's minor currency units
    /// (cents), dividing by 100.
    pub fn from_minor_units(buy: Option<i64>, sell: Option<i64>) -> Self {
        Self {
            buy: buy.map(|v| Decimal::new(v, 2)),
            sell: sell.map(|v| Decimal::new(v, 2)),
        }
    }

    /// Returns true if neither side has a resting order.
    pub fn is_empty(&self) -> bool {
        self.buy.is_none() && self.sell.is_none()
    }
}
