use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{market, order, ws};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(market::service_info))
        .route("/api/v1/orders", post(order::submit_order))
        .route("/api/v1/orders/cancel", post(order::cancel_order))
        .route("/api/v1/bbo/:symbol", get(market::get_bbo))
        .route("/api/v1/orderbook/:symbol", get(market::get_orderbook))
        .route("/ws/market-data/:symbol", get(ws::market_data_stream))
        .route("/ws/trades/:symbol", get(ws::trade_stream))
        .route("/ws/orders", get(ws::order_entry))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
