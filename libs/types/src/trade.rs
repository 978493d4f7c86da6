//! Trade execution records
//!
//! A Trade is immutable once created. `price` is always the maker's resting
//! price (order protection: the taker never trades through its own book).

use crate::ids::{OrderId, TradeId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use crate::time;
use serde::{Deserialize, Serialize};

/// An executed trade between a resting maker and an incoming taker
///
/// `timestamp` is Unix microseconds, engine-assigned, strictly increasing
/// across all trades and never earlier than the taker's acceptance
/// timestamp. On the wire it renders as ISO-8601 UTC with microsecond
/// precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(with = "time::iso_micros")]
    pub timestamp: i64,
    pub symbol: String,
    pub trade_id: TradeId,
    pub price: Price,
    pub quantity: Quantity,
    /// Side of the incoming order that initiated the trade
    pub aggressor_side: Side,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trade_id: TradeId,
        symbol: String,
        price: Price,
        quantity: Quantity,
        aggressor_side: Side,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        timestamp: i64,
    ) -> Self {
        Self {
            timestamp,
            symbol,
            trade_id,
            price,
            quantity,
            aggressor_side,
            maker_order_id,
            taker_order_id,
        }
    }
}
