//! Trade construction
//!
//! Owns the engine clock and stamps every accepted order and every trade
//! with a strictly-increasing timestamp, so the per-symbol trade stream is
//! totally ordered without a separate sequence column.

use types::ids::{OrderId, TradeId};
use types::order::Side;
use types::trade::Trade;

use crate::book::Fill;
use crate::clock::MonotonicClock;

/// Builds trade records for consummated match steps
#[derive(Debug, Default)]
pub struct MatchExecutor {
    clock: MonotonicClock,
}

impl MatchExecutor {
    pub fn new() -> Self {
        Self {
            clock: MonotonicClock::new(),
        }
    }

    /// Timestamp for an order acceptance or read snapshot
    pub fn next_timestamp(&self) -> i64 {
        self.clock.next_micros()
    }

    /// Build the trade for one fill against a resting maker
    ///
    /// The execution price is the maker's resting price; `aggressor_side`
    /// is the taker's side. The assigned timestamp is strictly greater
    /// than the taker's acceptance timestamp and than any earlier trade's.
    pub fn execute_trade(
        &self,
        symbol: &str,
        fill: &Fill,
        taker_order_id: OrderId,
        aggressor_side: Side,
    ) -> Trade {
        Trade::new(
            TradeId::new(),
            symbol.to_string(),
            fill.price,
            fill.quantity,
            aggressor_side,
            fill.maker_order_id,
            taker_order_id,
            self.clock.next_micros(),
        )
    }
}
