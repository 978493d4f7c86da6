//! Matching logic module
//!
//! Crossing detection and trade construction for the price-time priority
//! match loop.

pub mod crossing;
pub mod executor;

pub use executor::MatchExecutor;
