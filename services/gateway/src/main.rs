mod error;
mod fanout;
mod handlers;
mod models;
mod router;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use matching_engine::{MatchingEngine, DEFAULT_DEPTH};
use tokio::net::TcpListener;

use crate::fanout::FeedHub;
use crate::models::FeedMessage;
use crate::router::create_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    tracing::info!("starting matching engine gateway");

    let engine = Arc::new(MatchingEngine::new());
    let feed = Arc::new(FeedHub::new());
    register_feed_sinks(&engine, &feed);

    let state = AppState::new(Arc::clone(&engine), Arc::clone(&feed));
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("GATEWAY_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire the engine's event sinks into the broadcast hub
///
/// The BBO sink also publishes a refreshed depth snapshot; it holds a weak
/// engine handle to avoid a reference cycle through the sink registry.
/// Sinks run after the engine releases its book lock, so the snapshot read
/// here briefly re-acquires it.
fn register_feed_sinks(engine: &Arc<MatchingEngine>, feed: &Arc<FeedHub>) {
    let trade_feed = Arc::clone(feed);
    engine.register_trade_sink(Arc::new(move |trade| {
        if let Ok(json) = serde_json::to_string(&FeedMessage::Trade(trade)) {
            trade_feed.publish_trade(&trade.symbol, json);
        }
    }));

    let bbo_feed = Arc::clone(feed);
    let engine_weak = Arc::downgrade(engine);
    engine.register_bbo_sink(Arc::new(move |symbol, bbo| {
        if let Ok(json) = serde_json::to_string(&FeedMessage::Bbo(bbo)) {
            bbo_feed.publish_market_data(symbol, json);
        }
        if let Some(engine) = engine_weak.upgrade() {
            if let Ok(snapshot) = engine.l2(symbol, DEFAULT_DEPTH) {
                if let Ok(json) = serde_json::to_string(&FeedMessage::Orderbook(&snapshot)) {
                    bbo_feed.publish_market_data(symbol, json);
                }
            }
        }
    }));
}
