//! Error taxonomy for the matching engine
//!
//! Two recoverable families: validation failures surface as a rejected
//! submission, lookup failures surface as not-found. Invariant violations
//! are not modeled here; they abort rather than corrupt the book.

use crate::ids::OrderId;
use crate::order::OrderType;
use thiserror::Error;

/// Why a submission failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("order quantity must be positive")]
    InvalidQuantity,

    #[error("order price must be positive")]
    InvalidPrice,

    #[error("{order_type} orders require a price")]
    MissingPrice { order_type: OrderType },

    #[error("market orders must not carry a price")]
    UnexpectedPrice,
}

/// Lookup failures on the engine API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("no order book for {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("Order not found")]
    OrderNotFound { order_id: OrderId },
}
