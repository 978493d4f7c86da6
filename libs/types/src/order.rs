//! Order lifecycle types
//!
//! Orders are immutable after acceptance apart from `remaining_quantity`,
//! `filled_quantity` and `status`, all of which are mutated only by the
//! engine while holding the symbol's book lock.

use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Supported order types
///
/// Market orders cross available levels until exhausted; the other three
/// carry a strict price limit. Only Limit orders ever rest on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
    /// Immediate-Or-Cancel: match marketable portion, cancel remainder
    Ioc,
    /// Fill-Or-Kill: full match immediately or cancel entirely
    Fok,
}

impl OrderType {
    /// Whether this type carries a limit price
    pub fn requires_price(&self) -> bool {
        !matches!(self, OrderType::Market)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "market"),
            OrderType::Limit => write!(f, "limit"),
            OrderType::Ioc => write!(f, "ioc"),
            OrderType::Fok => write!(f, "fok"),
        }
    }
}

/// Order status throughout its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted, resting, no fills yet
    Pending,
    /// Some quantity filled, remainder resting or cancelled
    Partial,
    /// Completely matched (terminal)
    Filled,
    /// Cancelled by user or by type semantics (terminal)
    Cancelled,
    /// Failed validation (terminal)
    Rejected,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Partial => write!(f, "partial"),
            OrderStatus::Filled => write!(f, "filled"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
            OrderStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A trading order as held by the engine
///
/// `price` is `Some` for Limit/Ioc/Fok and `None` for Market; construction
/// through the engine guarantees this pairing. `timestamp` is Unix
/// microseconds, engine-assigned on acceptance, strictly increasing across
/// all accepted orders and therefore the time-priority tiebreaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub symbol: String,
    pub order_type: OrderType,
    pub side: Side,
    pub price: Option<Price>,
    pub quantity: Quantity,
    pub filled_quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub status: OrderStatus,
    pub timestamp: i64,
}

impl Order {
    /// Create a new pending order with engine-assigned id and timestamp
    pub fn new(
        order_id: OrderId,
        symbol: String,
        order_type: OrderType,
        side: Side,
        price: Option<Price>,
        quantity: Quantity,
        timestamp: i64,
    ) -> Self {
        Self {
            order_id,
            symbol,
            order_type,
            side,
            price,
            quantity,
            filled_quantity: Quantity::zero(),
            remaining_quantity: quantity,
            status: OrderStatus::Pending,
            timestamp,
        }
    }

    /// Check quantity invariant: filled + remaining = total
    pub fn check_invariant(&self) -> bool {
        self.filled_quantity.as_decimal() + self.remaining_quantity.as_decimal()
            == self.quantity.as_decimal()
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Check if order has any fills
    pub fn has_fills(&self) -> bool {
        !self.filled_quantity.is_zero()
    }

    /// Apply a fill and advance status
    ///
    /// # Panics
    /// Panics if the fill is zero or exceeds the remaining quantity; both
    /// indicate a broken matching invariant.
    pub fn fill(&mut self, quantity: Quantity) {
        assert!(!quantity.is_zero(), "Fill quantity must be positive");
        assert!(
            quantity <= self.remaining_quantity,
            "Fill quantity exceeds remaining quantity"
        );

        self.filled_quantity = self.filled_quantity + quantity;
        self.remaining_quantity = self.remaining_quantity - quantity;

        if self.remaining_quantity.is_zero() {
            self.status = OrderStatus::Filled;
        } else {
            self.status = OrderStatus::Partial;
        }
    }

    /// Mark the order cancelled
    ///
    /// # Panics
    /// Panics if the order is already in a terminal state.
    pub fn cancel(&mut self) {
        assert!(!self.status.is_terminal(), "Cannot cancel terminal order");
        self.status = OrderStatus::Cancelled;
    }
}
