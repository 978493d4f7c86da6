use axum::{extract::State, Json};
use matching_engine::{CancelResult, SubmitRequest, SubmitResult};
use types::order::OrderStatus;

use crate::error::AppError;
use crate::models::CancelRequest;
use crate::state::AppState;

/// Submit a new order
///
/// The engine never raises on bad input; a Rejected result carries the
/// reason, which surfaces here as a 400.
pub async fn submit_order(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResult>, AppError> {
    let result = state.engine.submit(request);

    if result.status == OrderStatus::Rejected {
        let detail = result
            .reject_reason
            .as_ref()
            .map(|reason| reason.to_string())
            .unwrap_or_else(|| "invalid order".to_string());
        return Err(AppError::BadRequest(detail));
    }

    Ok(Json(result))
}

/// Cancel a resting order
///
/// Unknown symbols, unknown ids and already-terminal orders all map to 404.
pub async fn cancel_order(
    State(state): State<AppState>,
    Json(request): Json<CancelRequest>,
) -> Result<Json<CancelResult>, AppError> {
    let result = state.engine.cancel(&request.symbol, &request.order_id)?;
    Ok(Json(result))
}
