//! Broadcast fanout between engine sinks and WebSocket subscribers
//!
//! One broadcast channel per symbol per stream. `send` never blocks: a
//! receiver that falls behind the channel capacity drops messages, so a
//! slow client can never stall the engine's sink dispatch.

use dashmap::DashMap;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// Per-symbol broadcast channels for market data and trade feeds
#[derive(Default)]
pub struct FeedHub {
    market_data: DashMap<String, broadcast::Sender<String>>,
    trades: DashMap<String, broadcast::Sender<String>>,
}

impl FeedHub {
    pub fn new() -> Self {
        Self {
            market_data: DashMap::new(),
            trades: DashMap::new(),
        }
    }

    fn channel(
        map: &DashMap<String, broadcast::Sender<String>>,
        symbol: &str,
    ) -> broadcast::Sender<String> {
        if let Some(tx) = map.get(symbol) {
            return tx.clone();
        }
        map.entry(symbol.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Subscribe to BBO and depth updates for a symbol
    pub fn subscribe_market_data(&self, symbol: &str) -> broadcast::Receiver<String> {
        Self::channel(&self.market_data, symbol).subscribe()
    }

    /// Subscribe to the trade stream for a symbol
    pub fn subscribe_trades(&self, symbol: &str) -> broadcast::Receiver<String> {
        Self::channel(&self.trades, symbol).subscribe()
    }

    /// Publish a pre-serialized market data message
    pub fn publish_market_data(&self, symbol: &str, message: String) {
        // A send error just means nobody is listening
        let _ = Self::channel(&self.market_data, symbol).send(message);
    }

    /// Publish a pre-serialized trade message
    pub fn publish_trade(&self, symbol: &str, message: String) {
        let _ = Self::channel(&self.trades, symbol).send(message);
    }
}
