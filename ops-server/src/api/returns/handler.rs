//! Return Order Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::return_order;
use crate::utils::AppResult;
use shared::models::ReturnOrder;

/// GET /api/returns/pending - return orders awaiting warehouse review
pub async fn list_pending(State(state): State<ServerState>) -> AppResult<Json<Vec<ReturnOrder>>> {
    let rows = return_order::find_pending(&state.pool).await?;
    Ok(Json(rows))
}
