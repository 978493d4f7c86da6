//! WebSocket handlers for real-time streaming and order entry
//!
//! Market data and trade feeds forward pre-serialized messages from the
//! broadcast hub; order entry runs submissions synchronously and answers
//! in-stream. All sockets answer a JSON `{"type":"ping"}` with a pong.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use matching_engine::{SubmitRequest, DEFAULT_DEPTH};
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use types::order::OrderStatus;

use crate::models::FeedMessage;
use crate::state::AppState;

pub async fn market_data_stream(
    ws: WebSocketUpgrade,
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_market_data(socket, symbol, state))
}

pub async fn trade_stream(
    ws: WebSocketUpgrade,
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_trades(socket, symbol, state))
}

pub async fn order_entry(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_order_entry(socket, state))
}

/// Streams BBO and depth updates for one symbol
///
/// Sends an initial snapshot of both when the book already exists, then
/// forwards every update published by the engine's BBO sink.
async fn handle_market_data(socket: WebSocket, symbol: String, state: AppState) {
    info!(symbol, "client connected to market data stream");
    let (mut sender, mut receiver) = socket.split();
    let mut feed_rx = state.feed.subscribe_market_data(&symbol);

    if let Ok(bbo) = state.engine.bbo(&symbol) {
        if let Ok(json) = serde_json::to_string(&FeedMessage::Bbo(&bbo)) {
            let _ = sender.send(Message::Text(json)).await;
        }
    }
    if let Ok(snapshot) = state.engine.l2(&symbol, DEFAULT_DEPTH) {
        if let Ok(json) = serde_json::to_string(&FeedMessage::Orderbook(&snapshot)) {
            let _ = sender.send(Message::Text(json)).await;
        }
    }

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if is_ping(&text) {
                            let _ = sender.send(Message::Text(pong())).await;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        error!(symbol, error = %e, "market data stream error");
                        break;
                    }
                    _ => {}
                }
            }
            update = feed_rx.recv() => {
                match update {
                    Ok(json) => {
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(symbol, skipped, "market data subscriber lagged, dropping updates");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    info!(symbol, "market data stream closed");
}

/// Streams trade executions for one symbol
async fn handle_trades(socket: WebSocket, symbol: String, state: AppState) {
    info!(symbol, "client connected to trade stream");
    let (mut sender, mut receiver) = socket.split();
    let mut feed_rx = state.feed.subscribe_trades(&symbol);

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if is_ping(&text) {
                            let _ = sender.send(Message::Text(pong())).await;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        error!(symbol, error = %e, "trade stream error");
                        break;
                    }
                    _ => {}
                }
            }
            update = feed_rx.recv() => {
                match update {
                    Ok(json) => {
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(symbol, skipped, "trade subscriber lagged, dropping trades");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    info!(symbol, "trade stream closed");
}

/// Order submission over a socket: one result message per request
async fn handle_order_entry(mut socket: WebSocket, state: AppState) {
    info!("client connected to order entry stream");

    while let Some(msg) = socket.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if is_ping(&text) {
                    if socket.send(Message::Text(pong())).await.is_err() {
                        break;
                    }
                    continue;
                }

                let reply = match serde_json::from_str::<SubmitRequest>(&text) {
                    Ok(request) => {
                        let result = state.engine.submit(request);
                        if result.status == OrderStatus::Rejected {
                            let detail = result
                                .reject_reason
                                .as_ref()
                                .map(|reason| reason.to_string())
                                .unwrap_or_else(|| "invalid order".to_string());
                            error_envelope(&detail)
                        } else {
                            serde_json::to_string(&result)
                                .unwrap_or_else(|e| error_envelope(&e.to_string()))
                        }
                    }
                    Err(e) => error_envelope(&e.to_string()),
                };

                if socket.send(Message::Text(reply)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = socket.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {}
        }
    }

    info!("order entry stream closed");
}

fn is_ping(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text)
        .map(|value| value["type"] == "ping")
        .unwrap_or(false)
}

fn pong() -> String {
    json!({ "type": "pong" }).to_string()
}

fn error_envelope(detail: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_micros() as i64);
    json!({
        "status": "error",
        "error": detail,
        "timestamp": types::time::format_micros(now),
    })
    .to_string()
}
