use axum::{
    extract::{Path, Query, State},
    Json,
};
use types::market::{Bbo, BookSnapshot};

use crate::error::AppError;
use crate::models::{DepthQuery, ServiceInfo};
use crate::state::AppState;

/// Root endpoint: service identity
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo::current())
}

/// Current Best Bid and Offer for a symbol
pub async fn get_bbo(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Bbo>, AppError> {
    let bbo = state.engine.bbo(&symbol)?;
    Ok(Json(bbo))
}

/// L2 order book snapshot, up to `depth` levels per side
pub async fn get_orderbook(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<DepthQuery>,
) -> Result<Json<BookSnapshot>, AppError> {
    let snapshot = state.engine.l2(&symbol, query.depth)?;
    Ok(Json(snapshot))
}
