//! Crossing detection logic
//!
//! Determines when an incoming order may consume a resting level based on
//! price compatibility. A missing limit (market order) crosses anything.

use types::numeric::Price;
use types::order::Side;

/// Check whether an incoming order can execute against a resting level
///
/// A buy consumes maker levels priced at or below its limit; a sell
/// consumes maker levels priced at or above its limit. `None` means no
/// bound: market orders cross every available level.
pub fn incoming_can_match(
    incoming_side: Side,
    incoming_limit: Option<Price>,
    resting_price: Price,
) -> bool {
    match (incoming_side, incoming_limit) {
        (_, None) => true,
        (Side::Buy, Some(limit)) => resting_price <= limit,
        (Side::Sell, Some(limit)) => resting_price >= limit,
    }
}
