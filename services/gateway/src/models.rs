use serde::{Deserialize, Serialize};
use types::ids::OrderId;
use types::market::{Bbo, BookSnapshot};
use types::trade::Trade;

/// Request to cancel a resting order
#[derive(Debug, Clone, Deserialize)]
pub struct CancelRequest {
    pub symbol: String,
    pub order_id: OrderId,
}

/// Service identity returned at the root route
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            name: "matching-engine-gateway",
            version: env!("CARGO_PKG_VERSION"),
            status: "running",
        }
    }
}

/// Depth query parameter for L2 snapshots
#[derive(Debug, Clone, Deserialize)]
pub struct DepthQuery {
    #[serde(default = "default_depth")]
    pub depth: usize,
}

fn default_depth() -> usize {
    matching_engine::DEFAULT_DEPTH
}

/// Envelope for WebSocket feed messages
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum FeedMessage<'a> {
    Bbo(&'a Bbo),
    Orderbook(&'a BookSnapshot),
    Trade(&'a Trade),
}
