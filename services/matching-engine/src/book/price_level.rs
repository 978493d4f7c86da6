//! Price level implementation with FIFO queue
//!
//! A price level contains all resting orders at a specific price point.
//! Orders are maintained in strict FIFO order to enforce time priority.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::Quantity;

/// A price level containing orders at a specific price
///
/// Maintains strict FIFO ordering for time-priority matching. Entries hold
/// the order id and its live remaining quantity; the authoritative order
/// record lives in the book's index and is kept in lockstep by the caller.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Queue of orders at this price level (FIFO order)
    orders: VecDeque<LevelEntry>,
    /// Total quantity resting at this level
    total_quantity: Quantity,
}

/// Entry in the price level queue
#[derive(Debug, Clone)]
struct LevelEntry {
    order_id: OrderId,
    remaining_quantity: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Enqueue an order at the tail (time priority)
    pub fn push_back(&mut self, order_id: OrderId, quantity: Quantity) {
        self.orders.push_back(LevelEntry {
            order_id,
            remaining_quantity: quantity,
        });
        self.total_quantity = self.total_quantity + quantity;
    }

    /// Peek at the head order without removing it
    ///
    /// Returns (order_id, remaining_quantity)
    pub fn front(&self) -> Option<(OrderId, Quantity)> {
        self.orders
            .front()
            .map(|entry| (entry.order_id, entry.remaining_quantity))
    }

    /// Consume `quantity` from the head order
    ///
    /// Subtracts from the head's remaining quantity and the level total.
    /// Returns `Some(order_id)` when the head reaches zero and is popped
    /// as the fully-consumed maker, `None` on a partial consume.
    ///
    /// # Panics
    /// Panics if the level is empty or `quantity` exceeds the head's
    /// remaining quantity.
    pub fn consume_front(&mut self, quantity: Quantity) -> Option<OrderId> {
        let entry = self
            .orders
            .front_mut()
            .expect("consume_front on empty price level");
        assert!(
            quantity <= entry.remaining_quantity,
            "consume exceeds head remaining quantity"
        );

        entry.remaining_quantity = entry.remaining_quantity - quantity;
        self.total_quantity = self.total_quantity - quantity;

        if entry.remaining_quantity.is_zero() {
            self.orders.pop_front().map(|entry| entry.order_id)
        } else {
            None
        }
    }

    /// Remove an interior order by id
    ///
    /// Scans within the level (acceptable for small per-level fan-out; the
    /// book's index already resolved side and price). Returns the removed
    /// remaining quantity, or None if the order is not queued here.
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Quantity> {
        let position = self
            .orders
            .iter()
            .position(|entry| &entry.order_id == order_id)?;
        let entry = self.orders.remove(position)?;
        self.total_quantity = self.total_quantity - entry.remaining_quantity;
        Some(entry.remaining_quantity)
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the total quantity at this price level
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qty(s: &str) -> Quantity {
        Quantity::from_str(s).unwrap()
    }

    #[test]
    fn test_push_back() {
        let mut level = PriceLevel::new();
        let order_id = OrderId::new();

        level.push_back(order_id, qty("1.5"));

        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), qty("1.5"));
        assert!(!level.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let mut level = PriceLevel::new();
        let order1 = OrderId::new();
        let order2 = OrderId::new();

        level.push_back(order1, qty("1.0"));
        level.push_back(order2, qty("2.0"));

        let (front_id, front_qty) = level.front().unwrap();
        assert_eq!(front_id, order1);
        assert_eq!(front_qty, qty("1.0"));
    }

    #[test]
    fn test_consume_front_partial() {
        let mut level = PriceLevel::new();
        let order_id = OrderId::new();
        level.push_back(order_id, qty("5.0"));

        let consumed = level.consume_front(qty("2.0"));

        assert_eq!(consumed, None);
        assert_eq!(level.total_quantity(), qty("3.0"));
        assert_eq!(level.front().unwrap().1, qty("3.0"));
    }

    #[test]
    fn test_consume_front_exhausts_head() {
        let mut level = PriceLevel::new();
        let order1 = OrderId::new();
        let order2 = OrderId::new();
        level.push_back(order1, qty("1.0"));
        level.push_back(order2, qty("2.0"));

        let consumed = level.consume_front(qty("1.0"));

        assert_eq!(consumed, Some(order1));
        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), qty("2.0"));
        assert_eq!(level.front().unwrap().0, order2);
    }

    #[test]
    #[should_panic(expected = "consume exceeds head remaining quantity")]
    fn test_consume_front_overdraw_panics() {
        let mut level = PriceLevel::new();
        level.push_back(OrderId::new(), qty("1.0"));
        level.consume_front(qty("1.5"));
    }

    #[test]
    fn test_remove_interior() {
        let mut level = PriceLevel::new();
        let order1 = OrderId::new();
        let order2 = OrderId::new();
        let order3 = OrderId::new();

        level.push_back(order1, qty("1.0"));
        level.push_back(order2, qty("2.0"));
        level.push_back(order3, qty("3.0"));

        let removed = level.remove(&order2);

        assert_eq!(removed, Some(qty("2.0")));
        assert_eq!(level.order_count(), 2);
        assert_eq!(level.total_quantity(), qty("4.0"));
        // FIFO order of the survivors is preserved
        assert_eq!(level.front().unwrap().0, order1);
    }

    #[test]
    fn test_remove_unknown() {
        let mut level = PriceLevel::new();
        level.push_back(OrderId::new(), qty("1.0"));
        assert_eq!(level.remove(&OrderId::new()), None);
        assert_eq!(level.total_quantity(), qty("1.0"));
    }

    #[test]
    fn test_total_quantity_invariant() {
        let mut level = PriceLevel::new();
        level.push_back(OrderId::new(), qty("1.5"));
        level.push_back(OrderId::new(), qty("2.5"));
        level.push_back(OrderId::new(), qty("3.0"));

        assert_eq!(level.total_quantity(), qty("7.0"));
    }
}
