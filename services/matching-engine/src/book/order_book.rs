//! Per-symbol order book
//!
//! Authoritative state for one market: two price ladders plus an order
//! index for O(1) location of resting orders on cancel. All methods are
//! called under the symbol's exclusive region owned by the engine; the
//! crossed-ladder invariant may be broken mid-match but is restored before
//! the enclosing engine operation returns.

use std::collections::HashMap;

use types::errors::EngineError;
use types::ids::OrderId;
use types::market::{Bbo, BookSnapshot};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus, OrderType, Side};

use super::ask_book::AskBook;
use super::bid_book::BidBook;
use crate::matching::crossing;

/// One consummated match step against the head of the best opposite level
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    pub maker_order_id: OrderId,
    /// Execution price: always the maker's resting price
    pub price: Price,
    pub quantity: Quantity,
}

/// Order book for a single trading pair
pub struct OrderBook {
    symbol: String,
    bids: BidBook,
    asks: AskBook,
    /// Resting order records keyed by id; each entry's side and price
    /// locate its level without scanning the ladder.
    orders: HashMap<OrderId, Order>,
}

impl OrderBook {
    /// Create an empty book for a symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: BidBook::new(),
            asks: AskBook::new(),
            orders: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Rest a limit order on its side of the book
    ///
    /// # Panics
    /// Panics if the order is not a Limit, has no price, or has nothing
    /// left to rest; only the engine's residual-handling path may call this.
    pub fn add_resting(&mut self, order: Order) {
        assert_eq!(
            order.order_type,
            OrderType::Limit,
            "only limit orders rest on the book"
        );
        assert!(
            !order.remaining_quantity.is_zero(),
            "resting order must have remaining quantity"
        );
        let price = order.price.expect("limit orders always carry a price");

        match order.side {
            Side::Buy => self
                .bids
                .insert(order.order_id, price, order.remaining_quantity),
            Side::Sell => self
                .asks
                .insert(order.order_id, price, order.remaining_quantity),
        }
        self.orders.insert(order.order_id, order);
    }

    /// Cancel a resting order
    ///
    /// Removes it from its level (destroying the level if it empties),
    /// drops the index entry and returns the order marked Cancelled.
    pub fn cancel(&mut self, order_id: &OrderId) -> Result<Order, EngineError> {
        let mut order = self
            .orders
            .remove(order_id)
            .ok_or(EngineError::OrderNotFound {
                order_id: *order_id,
            })?;

        let price = order.price.expect("resting orders always carry a price");
        let removed = match order.side {
            Side::Buy => self.bids.remove(order_id, price),
            Side::Sell => self.asks.remove(order_id, price),
        };
        assert!(removed, "order index out of sync with price ladder");

        order.cancel();
        Ok(order)
    }

    /// Execute one match step for an incoming taker
    ///
    /// Consumes `min(taker_remaining, head_remaining)` from the head of the
    /// best opposite level, provided that level's price satisfies the
    /// taker's limit. Fully-consumed makers leave the queue, the index and,
    /// when drained, their level. Returns None when nothing is marketable.
    pub fn execute_match_step(
        &mut self,
        taker_side: Side,
        taker_limit: Option<Price>,
        taker_remaining: Quantity,
    ) -> Option<Fill> {
        let (price, fill_quantity, maker_order_id, fully_consumed, level_drained) = {
            let (price, level) = match taker_side {
                Side::Buy => self.asks.best_level_mut()?,
                Side::Sell => self.bids.best_level_mut()?,
            };
            if !crossing::incoming_can_match(taker_side, taker_limit, price) {
                return None;
            }

            let (maker_order_id, maker_remaining) =
                level.front().expect("ladder never holds an empty level");
            let fill_quantity = std::cmp::min(taker_remaining, maker_remaining);
            let popped = level.consume_front(fill_quantity);

            (
                price,
                fill_quantity,
                maker_order_id,
                popped.is_some(),
                level.is_empty(),
            )
        };

        if level_drained {
            match taker_side {
                Side::Buy => self.asks.remove_level(price),
                Side::Sell => self.bids.remove_level(price),
            };
        }

        let maker = self
            .orders
            .get_mut(&maker_order_id)
            .expect("queued maker missing from order index");
        maker.fill(fill_quantity);
        if fully_consumed {
            debug_assert_eq!(maker.status, OrderStatus::Filled);
            self.orders.remove(&maker_order_id);
        }

        Some(Fill {
            maker_order_id,
            price,
            quantity: fill_quantity,
        })
    }

    /// Resting quantity on the side opposite `taker_side` that is
    /// price-compatible with `limit` (the Fill-Or-Kill dry run)
    pub fn marketable_quantity(&self, taker_side: Side, limit: Option<Price>) -> Quantity {
        match taker_side {
            Side::Buy => self.asks.marketable_quantity(limit),
            Side::Sell => self.bids.marketable_quantity(limit),
        }
    }

    pub fn best_bid_price(&self) -> Option<Price> {
        self.bids.best_bid_price()
    }

    pub fn best_ask_price(&self) -> Option<Price> {
        self.asks.best_ask_price()
    }

    /// Top of book on both sides: (best bid, best ask) with aggregates
    pub fn top_of_book(&self) -> (Option<(Price, Quantity)>, Option<(Price, Quantity)>) {
        (self.bids.best_bid(), self.asks.best_ask())
    }

    /// Current BBO stamped with the supplied engine timestamp
    pub fn bbo(&self, timestamp: i64) -> Bbo {
        let (bid, ask) = self.top_of_book();
        Bbo::new(self.symbol.clone(), bid, ask, timestamp)
    }

    /// L2 snapshot: up to `depth` levels per side in priority order
    pub fn snapshot(&self, depth: usize, timestamp: i64) -> BookSnapshot {
        BookSnapshot {
            timestamp,
            symbol: self.symbol.clone(),
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
        }
    }

    /// Look up a resting order by id
    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Number of resting orders across both sides
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Number of price levels on (bid, ask) ladders
    pub fn level_counts(&self) -> (usize, usize) {
        (self.bids.level_count(), self.asks.level_count())
    }
}
