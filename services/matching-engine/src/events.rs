//! Engine event buffer types
//!
//! Events produced inside a critical section are buffered locally and
//! dispatched to registered sinks only after the book lock is released.
//! Per-submission trade order is preserved; BBO updates are coalesced to
//! at most one per submission or cancellation.

use types::market::Bbo;
use types::trade::Trade;

/// A buffered engine event awaiting dispatch
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A trade was executed between a resting maker and an incoming taker
    TradeExecuted(Trade),
    /// The top of book changed as a result of the enclosing operation
    BboUpdated { symbol: String, bbo: Bbo },
}

impl EngineEvent {
    /// Event type label for logging
    pub fn label(&self) -> &'static str {
        match self {
            EngineEvent::TradeExecuted(_) => "TradeExecuted",
            EngineEvent::BboUpdated { .. } => "BboUpdated",
        }
    }
}
