//! End-to-end matching scenarios
//!
//! Seeds books through the public engine API and checks trade sequences,
//! residual state, BBO evolution and the order-type semantics of
//! Market / Limit / IOC / FOK.

use std::sync::{Arc, Mutex};

use matching_engine::{MatchingEngine, SubmitRequest, SubmitResult};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use types::market::Bbo;
use types::numeric::{Price, Quantity};
use types::order::{OrderStatus, OrderType, Side};
use types::trade::Trade;

const SYMBOL: &str = "BTC-USDT";

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn qty(s: &str) -> Quantity {
    Quantity::from_str(s).unwrap()
}

fn price(s: &str) -> Price {
    Price::from_str(s).unwrap()
}

fn submit(
    engine: &MatchingEngine,
    order_type: OrderType,
    side: Side,
    quantity: &str,
    limit: Option<&str>,
) -> SubmitResult {
    engine.submit(SubmitRequest {
        symbol: SYMBOL.to_string(),
        order_type,
        side,
        quantity: decimal(quantity),
        price: limit.map(decimal),
    })
}

fn seed_limit(engine: &MatchingEngine, side: Side, limit: &str, quantity: &str) -> SubmitResult {
    submit(engine, OrderType::Limit, side, quantity, Some(limit))
}

/// Collects everything the engine pushes through its sinks.
struct Feed {
    trades: Arc<Mutex<Vec<Trade>>>,
    bbos: Arc<Mutex<Vec<Bbo>>>,
}

impl Feed {
    fn attach(engine: &MatchingEngine) -> Self {
        let trades: Arc<Mutex<Vec<Trade>>> = Arc::new(Mutex::new(Vec::new()));
        let bbos: Arc<Mutex<Vec<Bbo>>> = Arc::new(Mutex::new(Vec::new()));

        let trades_clone = Arc::clone(&trades);
        engine.register_trade_sink(Arc::new(move |trade| {
            trades_clone.lock().unwrap().push(trade.clone());
        }));
        let bbos_clone = Arc::clone(&bbos);
        engine.register_bbo_sink(Arc::new(move |_symbol, bbo| {
            bbos_clone.lock().unwrap().push(bbo.clone());
        }));

        Self { trades, bbos }
    }

    fn trade_count(&self) -> usize {
        self.trades.lock().unwrap().len()
    }

    fn bbo_count(&self) -> usize {
        self.bbos.lock().unwrap().len()
    }
}

#[test]
fn simple_cross_stops_at_limit_and_rests_remainder() {
    // S1: asks 50100 x 1.0 and 50200 x 2.0; buy limit 50150 for 1.5
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50100", "1.0");
    seed_limit(&engine, Side::Sell, "50200", "2.0");

    let result = seed_limit(&engine, Side::Buy, "50150", "1.5");

    // One trade at the maker's price, then the 50200 level is protected
    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].price, price("50100"));
    assert_eq!(result.trades[0].quantity, qty("1.0"));
    assert_eq!(result.trades[0].aggressor_side, Side::Buy);

    assert_eq!(result.status, OrderStatus::Partial);
    assert_eq!(result.filled_quantity, qty("1.0"));
    assert_eq!(result.remaining_quantity, qty("0.5"));

    let bbo = engine.bbo(SYMBOL).unwrap();
    assert_eq!(bbo.best_bid, Some(price("50150")));
    assert_eq!(bbo.best_bid_quantity, qty("0.5"));
    assert_eq!(bbo.best_ask, Some(price("50200")));
    assert_eq!(bbo.best_ask_quantity, qty("2.0"));
}

#[test]
fn fifo_within_price_level() {
    // S2: bids A then B at 50000; a 4.0 sell consumes A fully before B
    let engine = MatchingEngine::new();
    let order_a = seed_limit(&engine, Side::Buy, "50000", "2.0");
    let order_b = seed_limit(&engine, Side::Buy, "50000", "3.0");

    let result = seed_limit(&engine, Side::Sell, "50000", "4.0");

    assert_eq!(result.status, OrderStatus::Filled);
    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].maker_order_id, order_a.order_id);
    assert_eq!(result.trades[0].quantity, qty("2.0"));
    assert_eq!(result.trades[1].maker_order_id, order_b.order_id);
    assert_eq!(result.trades[1].quantity, qty("2.0"));

    // B keeps priority at the level with its remainder
    let bbo = engine.bbo(SYMBOL).unwrap();
    assert_eq!(bbo.best_bid, Some(price("50000")));
    assert_eq!(bbo.best_bid_quantity, qty("1.0"));
}

#[test]
fn fok_insufficient_liquidity_is_killed_without_touching_the_book() {
    // S3: 2.0 marketable at or below 50100; FOK for 2.5 must not execute
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50050", "1.2");
    seed_limit(&engine, Side::Sell, "50100", "0.8");
    seed_limit(&engine, Side::Sell, "50200", "5.0");
    let before = engine.l2(SYMBOL, 10).unwrap();

    let feed = Feed::attach(&engine);
    let result = submit(&engine, OrderType::Fok, Side::Buy, "2.5", Some("50100"));

    assert_eq!(result.status, OrderStatus::Cancelled);
    assert!(result.trades.is_empty());
    assert!(result.filled_quantity.is_zero());

    let after = engine.l2(SYMBOL, 10).unwrap();
    assert_eq!(after.bids, before.bids);
    assert_eq!(after.asks, before.asks);
    assert_eq!(feed.trade_count(), 0);
    assert_eq!(feed.bbo_count(), 0);
}

#[test]
fn fok_exact_liquidity_fills_fully() {
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50050", "1.2");
    seed_limit(&engine, Side::Sell, "50100", "0.8");

    let result = submit(&engine, OrderType::Fok, Side::Buy, "2.0", Some("50100"));

    assert_eq!(result.status, OrderStatus::Filled);
    assert_eq!(result.trades.len(), 2);
    assert!(result.remaining_quantity.is_zero());
    // Both ask levels fully drained
    let bbo = engine.bbo(SYMBOL).unwrap();
    assert_eq!(bbo.best_ask, None);
}

#[test]
fn fok_one_smallest_unit_short_is_killed() {
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50100", "2.0");

    let result = submit(
        &engine,
        OrderType::Fok,
        Side::Buy,
        "2.000000000000000001",
        Some("50100"),
    );

    assert_eq!(result.status, OrderStatus::Cancelled);
    assert!(result.trades.is_empty());
    let bbo = engine.bbo(SYMBOL).unwrap();
    assert_eq!(bbo.best_ask_quantity, qty("2.0"));
}

#[test]
fn ioc_partial_fill_cancels_remainder_without_resting() {
    // S4: one thin ask; IOC takes 0.4 of 1.0 and the rest evaporates
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50100", "0.4");

    let result = submit(&engine, OrderType::Ioc, Side::Buy, "1.0", Some("50100"));

    assert_eq!(result.status, OrderStatus::Cancelled);
    assert_eq!(result.filled_quantity, qty("0.4"));
    assert_eq!(result.remaining_quantity, qty("0.6"));
    assert_eq!(result.trades.len(), 1);

    // Nothing rests on the bid side
    let bbo = engine.bbo(SYMBOL).unwrap();
    assert_eq!(bbo.best_bid, None);
    assert_eq!(bbo.best_ask, None);
}

#[test]
fn ioc_with_no_match_cancels_with_zero_fills() {
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50200", "1.0");

    let result = submit(&engine, OrderType::Ioc, Side::Buy, "1.0", Some("50100"));

    assert_eq!(result.status, OrderStatus::Cancelled);
    assert!(result.filled_quantity.is_zero());
    assert!(result.trades.is_empty());
    let bbo = engine.bbo(SYMBOL).unwrap();
    assert_eq!(bbo.best_bid, None);
}

#[test]
fn market_order_through_empty_side_is_cancelled() {
    // S5: no asks at all
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Buy, "49000", "1.0");

    let result = submit(&engine, OrderType::Market, Side::Buy, "1.0", None);

    assert_eq!(result.status, OrderStatus::Cancelled);
    assert!(result.trades.is_empty());
    assert!(result.filled_quantity.is_zero());
}

#[test]
fn market_order_crosses_multiple_levels() {
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50100", "0.5");
    seed_limit(&engine, Side::Sell, "50200", "0.5");
    seed_limit(&engine, Side::Sell, "50300", "5.0");

    let result = submit(&engine, OrderType::Market, Side::Buy, "1.5", None);

    assert_eq!(result.status, OrderStatus::Filled);
    assert_eq!(result.trades.len(), 3);
    assert_eq!(result.trades[0].price, price("50100"));
    assert_eq!(result.trades[1].price, price("50200"));
    assert_eq!(result.trades[2].price, price("50300"));
    assert_eq!(result.trades[2].quantity, qty("0.5"));
}

#[test]
fn market_residual_reports_cancelled_with_partial_fills() {
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50100", "0.7");

    let result = submit(&engine, OrderType::Market, Side::Buy, "2.0", None);

    assert_eq!(result.status, OrderStatus::Cancelled);
    assert_eq!(result.filled_quantity, qty("0.7"));
    assert_eq!(result.remaining_quantity, qty("1.3"));
    assert_eq!(result.trades.len(), 1);
}

#[test]
fn cancel_top_of_book_emits_bbo_update() {
    // S6: cancelling the sole top bid exposes the next level
    let engine = MatchingEngine::new();
    let top = seed_limit(&engine, Side::Buy, "50000", "1.0");
    seed_limit(&engine, Side::Buy, "49900", "2.0");

    let feed = Feed::attach(&engine);
    let cancelled = engine.cancel(SYMBOL, &top.order_id).unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(feed.bbo_count(), 1);
    let bbo = engine.bbo(SYMBOL).unwrap();
    assert_eq!(bbo.best_bid, Some(price("49900")));
    assert_eq!(bbo.best_bid_quantity, qty("2.0"));
}

#[test]
fn cancel_of_deep_order_emits_no_bbo_update() {
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Buy, "50000", "1.0");
    let deep = seed_limit(&engine, Side::Buy, "49000", "1.0");

    let feed = Feed::attach(&engine);
    engine.cancel(SYMBOL, &deep.order_id).unwrap();

    assert_eq!(feed.bbo_count(), 0);
}

#[test]
fn submit_then_cancel_restores_prior_book_state() {
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Buy, "49900", "2.0");
    seed_limit(&engine, Side::Sell, "50100", "1.0");
    let before_bbo = engine.bbo(SYMBOL).unwrap();
    let before_l2 = engine.l2(SYMBOL, 10).unwrap();

    let transient = seed_limit(&engine, Side::Buy, "50000", "1.0");
    engine.cancel(SYMBOL, &transient.order_id).unwrap();

    let after_bbo = engine.bbo(SYMBOL).unwrap();
    let after_l2 = engine.l2(SYMBOL, 10).unwrap();
    assert_eq!(after_bbo.best_bid, before_bbo.best_bid);
    assert_eq!(after_bbo.best_bid_quantity, before_bbo.best_bid_quantity);
    assert_eq!(after_bbo.best_ask, before_bbo.best_ask);
    assert_eq!(after_l2.bids, before_l2.bids);
    assert_eq!(after_l2.asks, before_l2.asks);
}

#[test]
fn no_trade_through_better_maker_price() {
    // Better-priced makers always fill before worse ones
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50100", "1.0");
    seed_limit(&engine, Side::Sell, "50000", "1.0");

    let result = seed_limit(&engine, Side::Buy, "50100", "2.0");

    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].price, price("50000"));
    assert_eq!(result.trades[1].price, price("50100"));
}

#[test]
fn conservation_of_quantity_across_a_submission() {
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50000", "0.3");
    seed_limit(&engine, Side::Sell, "50050", "0.45");
    seed_limit(&engine, Side::Sell, "50100", "5.0");

    let result = seed_limit(&engine, Side::Buy, "50100", "2.0");

    let traded: Decimal = result
        .trades
        .iter()
        .map(|t| t.quantity.as_decimal())
        .sum();
    assert_eq!(traded, result.filled_quantity.as_decimal());
    assert_eq!(
        result.filled_quantity.as_decimal() + result.remaining_quantity.as_decimal(),
        decimal("2.0")
    );
}

#[test]
fn book_never_rests_crossed() {
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50100", "1.0");
    seed_limit(&engine, Side::Buy, "50000", "1.0");
    // A marketable limit partially crosses then rests at its limit
    seed_limit(&engine, Side::Buy, "50100", "2.0");

    let bbo = engine.bbo(SYMBOL).unwrap();
    let (bid, ask) = (bbo.best_bid, bbo.best_ask);
    if let (Some(bid), Some(ask)) = (bid, ask) {
        assert!(bid < ask, "book must not rest crossed: bid {bid} ask {ask}");
    }
}

#[test]
fn trade_stream_matches_per_submission_trade_lists() {
    let engine = MatchingEngine::new();
    let feed = Feed::attach(&engine);
    seed_limit(&engine, Side::Sell, "50000", "1.0");
    seed_limit(&engine, Side::Sell, "50100", "1.0");

    let result = seed_limit(&engine, Side::Buy, "50100", "2.0");

    let streamed = feed.trades.lock().unwrap();
    assert_eq!(streamed.len(), result.trades.len());
    for (streamed, returned) in streamed.iter().zip(result.trades.iter()) {
        assert_eq!(streamed.trade_id, returned.trade_id);
    }

    // Trade timestamps strictly increase and never precede acceptance
    let mut previous = result.timestamp;
    for trade in result.trades.iter() {
        assert!(trade.timestamp > previous);
        previous = trade.timestamp;
    }
}

#[test]
fn independent_symbols_do_not_interact() {
    let engine = MatchingEngine::new();
    seed_limit(&engine, Side::Sell, "50000", "1.0");

    let other = engine.submit(SubmitRequest {
        symbol: "ETH-USDC".to_string(),
        order_type: OrderType::Limit,
        side: Side::Buy,
        quantity: decimal("1.0"),
        price: Some(decimal("60000")),
    });

    // A crossing price on another symbol must not match
    assert_eq!(other.status, OrderStatus::Pending);
    assert!(other.trades.is_empty());
    assert_eq!(
        engine.bbo(SYMBOL).unwrap().best_ask,
        Some(price("50000"))
    );
}
