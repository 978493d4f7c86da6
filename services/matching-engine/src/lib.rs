//! Continuous-auction limit order book matching engine
//!
//! Maintains one order book per symbol and, for every incoming order,
//! produces a trade sequence and residual book state consistent with
//! strict price-time priority and internal order protection (no
//! trade-throughs against the engine's own best quote).
//!
//! **Key invariants:**
//! - Best bid strictly below best ask whenever both sides rest
//! - Level aggregates equal the sum of queued remaining quantities
//! - FIFO within a price level; earliest timestamp always fills first
//! - Trade price is always the maker's resting price
//! - Per-symbol submissions are linearized by the book's exclusive region

pub mod book;
pub mod clock;
pub mod engine;
pub mod events;
pub mod matching;

pub use engine::{
    CancelResult, MatchingEngine, SubmitRequest, SubmitResult, DEFAULT_DEPTH,
};
