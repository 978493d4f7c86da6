//! Matching engine core
//!
//! Entry point for submissions, cancellations and market-data reads across
//! all symbols. Each symbol's book sits behind its own mutex, so matching
//! is single-threaded per symbol and parallel across symbols. The registry
//! map is touched only for lookup or insert, never held across a match.
//!
//! Events are buffered inside the critical section and dispatched to
//! registered sinks strictly after the book lock is released; a slow sink
//! can therefore never stall matching.

use std::sync::{Arc, Mutex, RwLock};

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use types::errors::{EngineError, RejectReason};
use types::ids::OrderId;
use types::market::{Bbo, BookSnapshot};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus, OrderType, Side};
use types::time;
use types::trade::Trade;

use crate::book::OrderBook;
use crate::events::EngineEvent;
use crate::matching::MatchExecutor;

/// Default number of levels per side in L2 snapshots
pub const DEFAULT_DEPTH: usize = 10;

/// Subscriber to the trade stream
pub type TradeSink = Arc<dyn Fn(&Trade) + Send + Sync>;
/// Subscriber to top-of-book updates
pub type BboSink = Arc<dyn Fn(&str, &Bbo) + Send + Sync>;

/// An order submission as received from the transport layer
///
/// Quantities and prices arrive as raw decimals (decimal strings on the
/// wire); the engine owns their validation so that a bad value surfaces as
/// a rejected result rather than a transport error.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    pub symbol: String,
    pub order_type: OrderType,
    pub side: Side,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
}

/// Outcome of a submission
///
/// `trades` lists this submission's executions in production order.
/// A rejected submission carries zero fills, no trades and the reason for
/// the transport layer; the reason never serializes.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResult {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub filled_quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub trades: Vec<Trade>,
    #[serde(with = "time::iso_micros")]
    pub timestamp: i64,
    #[serde(skip)]
    pub reject_reason: Option<RejectReason>,
}

/// Outcome of a cancellation
#[derive(Debug, Clone, Serialize)]
pub struct CancelResult {
    pub order_id: OrderId,
    pub status: OrderStatus,
    #[serde(with = "time::iso_micros")]
    pub timestamp: i64,
}

/// The matching engine: a registry of per-symbol order books
pub struct MatchingEngine {
    books: DashMap<String, Arc<Mutex<OrderBook>>>,
    executor: MatchExecutor,
    trade_sinks: RwLock<Vec<TradeSink>>,
    bbo_sinks: RwLock<Vec<BboSink>>,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngine {
    /// Create an engine with no books and no sinks
    pub fn new() -> Self {
        info!("matching engine initialized");
        Self {
            books: DashMap::new(),
            executor: MatchExecutor::new(),
            trade_sinks: RwLock::new(Vec::new()),
            bbo_sinks: RwLock::new(Vec::new()),
        }
    }

    /// Register a subscriber for executed trades
    pub fn register_trade_sink(&self, sink: TradeSink) {
        self.trade_sinks
            .write()
            .expect("trade sink registry poisoned")
            .push(sink);
    }

    /// Register a subscriber for top-of-book updates
    pub fn register_bbo_sink(&self, sink: BboSink) {
        self.bbo_sinks
            .write()
            .expect("bbo sink registry poisoned")
            .push(sink);
    }

    /// Submit an order
    ///
    /// Validates, assigns id and acceptance timestamp, runs the match
    /// algorithm under the symbol's exclusive region, handles the residual
    /// per order type, then dispatches buffered events. Validation failure
    /// returns a Rejected result; this method never panics on bad input.
    pub fn submit(&self, request: SubmitRequest) -> SubmitResult {
        let order_id = OrderId::new();
        let (quantity, price) = match Self::validate(&request) {
            Ok(validated) => validated,
            Err(reason) => {
                warn!(%order_id, symbol = %request.symbol, %reason, "order rejected");
                return SubmitResult {
                    order_id,
                    status: OrderStatus::Rejected,
                    filled_quantity: Quantity::zero(),
                    remaining_quantity: Quantity::zero(),
                    trades: Vec::new(),
                    timestamp: self.executor.next_timestamp(),
                    reject_reason: Some(reason),
                };
            }
        };

        info!(
            %order_id,
            symbol = %request.symbol,
            side = %request.side,
            order_type = %request.order_type,
            quantity = %quantity,
            "order accepted"
        );

        let handle = self.book_handle(&request.symbol);
        let mut events: Vec<EngineEvent> = Vec::new();
        // The acceptance timestamp is assigned inside the region so that
        // timestamps reflect the order of region acquisition, not the order
        // in which racing submitters happened to reach the clock.
        let (order, trades, timestamp) = {
            let mut book = handle.lock().expect("order book mutex poisoned");
            let timestamp = self.executor.next_timestamp();
            let mut order = Order::new(
                order_id,
                request.symbol,
                request.order_type,
                request.side,
                price,
                quantity,
                timestamp,
            );
            let pre_top = book.top_of_book();

            let trades = match order.order_type {
                OrderType::Market => self.process_market(&mut book, &mut order),
                OrderType::Limit => self.process_limit(&mut book, &mut order),
                OrderType::Ioc => self.process_ioc(&mut book, &mut order),
                OrderType::Fok => self.process_fok(&mut book, &mut order),
            };

            for trade in &trades {
                events.push(EngineEvent::TradeExecuted(trade.clone()));
            }
            if book.top_of_book() != pre_top {
                let bbo = book.bbo(self.executor.next_timestamp());
                events.push(EngineEvent::BboUpdated {
                    symbol: order.symbol.clone(),
                    bbo,
                });
            }
            (order, trades, timestamp)
        };
        self.dispatch(events);

        SubmitResult {
            order_id: order.order_id,
            status: order.status,
            filled_quantity: order.filled_quantity,
            remaining_quantity: order.remaining_quantity,
            trades,
            timestamp,
            reject_reason: None,
        }
    }

    /// Cancel a resting order
    ///
    /// Unknown symbols, unknown ids and already-terminal orders all come
    /// back as not-found with no state change.
    pub fn cancel(&self, symbol: &str, order_id: &OrderId) -> Result<CancelResult, EngineError> {
        let handle = self
            .books
            .get(symbol)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EngineError::UnknownSymbol {
                symbol: symbol.to_string(),
            })?;

        let mut events: Vec<EngineEvent> = Vec::new();
        let result = {
            let mut book = handle.lock().expect("order book mutex poisoned");
            let pre_top = book.top_of_book();
            let order = book.cancel(order_id)?;
            let timestamp = self.executor.next_timestamp();

            if book.top_of_book() != pre_top {
                let bbo = book.bbo(self.executor.next_timestamp());
                events.push(EngineEvent::BboUpdated {
                    symbol: symbol.to_string(),
                    bbo,
                });
            }
            info!(%order_id, symbol, "order cancelled");
            CancelResult {
                order_id: order.order_id,
                status: order.status,
                timestamp,
            }
        };
        self.dispatch(events);

        Ok(result)
    }

    /// Current BBO for a symbol; coherent with some linearization point
    pub fn bbo(&self, symbol: &str) -> Result<Bbo, EngineError> {
        let handle = self
            .books
            .get(symbol)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EngineError::UnknownSymbol {
                symbol: symbol.to_string(),
            })?;
        let book = handle.lock().expect("order book mutex poisoned");
        let timestamp = self.executor.next_timestamp();
        Ok(book.bbo(timestamp))
    }

    /// L2 snapshot for a symbol, up to `depth` levels per side
    pub fn l2(&self, symbol: &str, depth: usize) -> Result<BookSnapshot, EngineError> {
        let handle = self
            .books
            .get(symbol)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EngineError::UnknownSymbol {
                symbol: symbol.to_string(),
            })?;
        let book = handle.lock().expect("order book mutex poisoned");
        let timestamp = self.executor.next_timestamp();
        Ok(book.snapshot(depth, timestamp))
    }

    /// Validate a submission without touching any book
    fn validate(request: &SubmitRequest) -> Result<(Quantity, Option<Price>), RejectReason> {
        if request.symbol.is_empty() {
            return Err(RejectReason::EmptySymbol);
        }
        let quantity =
            Quantity::try_new(request.quantity).ok_or(RejectReason::InvalidQuantity)?;
        let price = match (request.order_type.requires_price(), request.price) {
            (true, None) => {
                return Err(RejectReason::MissingPrice {
                    order_type: request.order_type,
                })
            }
            (false, Some(_)) => return Err(RejectReason::UnexpectedPrice),
            (false, None) => None,
            (true, Some(raw)) => Some(Price::try_new(raw).ok_or(RejectReason::InvalidPrice)?),
        };
        Ok((quantity, price))
    }

    /// Get or lazily create the book for a symbol
    fn book_handle(&self, symbol: &str) -> Arc<Mutex<OrderBook>> {
        if let Some(handle) = self.books.get(symbol) {
            return Arc::clone(handle.value());
        }
        Arc::clone(
            self.books
                .entry(symbol.to_string())
                .or_insert_with(|| {
                    info!(symbol, "created order book");
                    Arc::new(Mutex::new(OrderBook::new(symbol)))
                })
                .value(),
        )
    }

    /// Run the match loop: consume best opposite levels while the taker has
    /// remaining quantity and the price limit allows
    fn match_order(&self, book: &mut OrderBook, taker: &mut Order, trades: &mut Vec<Trade>) {
        while !taker.remaining_quantity.is_zero() {
            let Some(fill) =
                book.execute_match_step(taker.side, taker.price, taker.remaining_quantity)
            else {
                break;
            };
            taker.fill(fill.quantity);
            let trade =
                self.executor
                    .execute_trade(&taker.symbol, &fill, taker.order_id, taker.side);
            debug!(
                trade_id = %trade.trade_id,
                price = %trade.price,
                quantity = %trade.quantity,
                "trade executed"
            );
            trades.push(trade);
        }
    }

    /// Market order: cross available levels until exhausted, cancel residual
    fn process_market(&self, book: &mut OrderBook, order: &mut Order) -> Vec<Trade> {
        let mut trades = Vec::new();
        self.match_order(book, order, &mut trades);
        if !order.remaining_quantity.is_zero() {
            warn!(
                order_id = %order.order_id,
                filled = %order.filled_quantity,
                remaining = %order.remaining_quantity,
                "market order ran out of liquidity, cancelling remainder"
            );
            order.cancel();
        }
        trades
    }

    /// Limit order: match the marketable portion, rest the residual
    fn process_limit(&self, book: &mut OrderBook, order: &mut Order) -> Vec<Trade> {
        let mut trades = Vec::new();
        self.match_order(book, order, &mut trades);
        if !order.remaining_quantity.is_zero() {
            debug!(
                order_id = %order.order_id,
                remaining = %order.remaining_quantity,
                "limit order resting on book"
            );
            book.add_resting(order.clone());
        }
        trades
    }

    /// Immediate-or-cancel: match the marketable portion, cancel the rest
    fn process_ioc(&self, book: &mut OrderBook, order: &mut Order) -> Vec<Trade> {
        let mut trades = Vec::new();
        self.match_order(book, order, &mut trades);
        if !order.remaining_quantity.is_zero() {
            order.cancel();
        }
        trades
    }

    /// Fill-or-kill: dry-run the opposite side first; either the whole
    /// quantity is marketable and the match fully fills, or nothing happens
    fn process_fok(&self, book: &mut OrderBook, order: &mut Order) -> Vec<Trade> {
        let available = book.marketable_quantity(order.side, order.price);
        if available < order.quantity {
            info!(
                order_id = %order.order_id,
                requested = %order.quantity,
                available = %available,
                "fill-or-kill killed: insufficient liquidity"
            );
            order.cancel();
            return Vec::new();
        }

        let mut trades = Vec::new();
        self.match_order(book, order, &mut trades);
        debug_assert!(order.is_filled(), "dry run guarantees a full fill");
        trades
    }

    /// Invoke sinks for buffered events, in order, with no lock held
    fn dispatch(&self, events: Vec<EngineEvent>) {
        if events.is_empty() {
            return;
        }
        let trade_sinks = self
            .trade_sinks
            .read()
            .expect("trade sink registry poisoned")
            .clone();
        let bbo_sinks = self
            .bbo_sinks
            .read()
            .expect("bbo sink registry poisoned")
            .clone();

        for event in events {
            match event {
                EngineEvent::TradeExecuted(trade) => {
                    for sink in &trade_sinks {
                        sink(&trade);
                    }
                }
                EngineEvent::BboUpdated { symbol, bbo } => {
                    for sink in &bbo_sinks {
                        sink(&symbol, &bbo);
                    }
                }
            }
        }
    }
}
