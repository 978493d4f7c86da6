//! Bid (buy-side) price ladder
//!
//! Maintains buy levels sorted by price descending (best bid first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};

use super::price_level::PriceLevel;

/// Bid (buy) side of an order book
///
/// Levels are keyed ascending in the BTreeMap, so the highest bid is read
/// with `next_back()`. At each price level, orders rest in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    /// Create a new empty bid ladder
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert a resting order, creating its level lazily
    pub fn insert(&mut self, order_id: OrderId, price: Price, quantity: Quantity) {
        self.levels
            .entry(price)
            .or_insert_with(PriceLevel::new)
            .push_back(order_id, quantity);
    }

    /// Remove an order from the ladder
    ///
    /// Destroys the level if it empties. Returns true if the order was
    /// found and removed.
    pub fn remove(&mut self, order_id: &OrderId, price: Price) -> bool {
        if let Some(level) = self.levels.get_mut(&price) {
            if level.remove(order_id).is_some() {
                if level.is_empty() {
                    self.levels.remove(&price);
                }
                return true;
            }
        }
        false
    }

    /// Drop a level outright once matching has drained it
    pub(crate) fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        self.levels.remove(&price)
    }

    /// Get the best bid (highest price) with its aggregate quantity
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.levels
            .iter()
            .next_back()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Get the best bid price
    pub fn best_bid_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Get mutable access to the best bid level
    pub(crate) fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next_back()
            .map(|(price, level)| (*price, level))
    }

    /// Depth snapshot: top N levels, highest price first
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .rev()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Resting quantity marketable to an incoming sell with limit `limit`
    ///
    /// Sums level totals from the best bid downward while the level price
    /// remains at or above the limit; `None` means no bound (market).
    pub fn marketable_quantity(&self, limit: Option<Price>) -> Quantity {
        let mut sum = Quantity::zero();
        for (price, level) in self.levels.iter().rev() {
            if let Some(limit) = limit {
                if *price < limit {
                    break;
                }
            }
            sum = sum + level.total_quantity();
        }
        sum
    }

    /// Check if the bid ladder is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
