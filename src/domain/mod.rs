//! Domain models for the slab/sticker price scan.

mod pair;
mod price;

pub use pair::{FlagKind, ItemPair, PairResult, Side};
pub use price::PriceInfo;
