//! Market data snapshots: BBO and L2 depth
//!
//! Both shapes are coherent reads taken under the book lock and stamped
//! with an engine timestamp.

use crate::numeric::{Price, Quantity};
use crate::time;
use serde::{Deserialize, Serialize};

/// Best Bid and Offer
///
/// Either side may be absent when its ladder is empty; the corresponding
/// aggregate quantity is then zero. Prices serialize as nullable decimal
/// strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bbo {
    #[serde(with = "time::iso_micros")]
    pub timestamp: i64,
    pub symbol: String,
    pub best_bid: Option<Price>,
    pub best_bid_quantity: Quantity,
    pub best_ask: Option<Price>,
    pub best_ask_quantity: Quantity,
}

impl Bbo {
    pub fn new(
        symbol: String,
        best_bid: Option<(Price, Quantity)>,
        best_ask: Option<(Price, Quantity)>,
        timestamp: i64,
    ) -> Self {
        let (best_bid, best_bid_quantity) = match best_bid {
            Some((price, qty)) => (Some(price), qty),
            None => (None, Quantity::zero()),
        };
        let (best_ask, best_ask_quantity) = match best_ask {
            Some((price, qty)) => (Some(price), qty),
            None => (None, Quantity::zero()),
        };
        Self {
            timestamp,
            symbol,
            best_bid,
            best_bid_quantity,
            best_ask,
            best_ask_quantity,
        }
    }
}

/// L2 order book snapshot
///
/// Levels are `(price, aggregate_quantity)` pairs; bids high to low, asks
/// low to high, capped by the requested depth. Each level serializes as a
/// two-element array of decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    #[serde(with = "time::iso_micros")]
    pub timestamp: i64,
    pub symbol: String,
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}
