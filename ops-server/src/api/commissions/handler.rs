//! Commission API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::repository::commission;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NOTE_LEN, validate_money, validate_optional_text};
use shared::models::{CommissionReview, CommissionWithNames};

/// GET /api/commissions/pending - commissions awaiting manager review
pub async fn list_pending(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<CommissionWithNames>>> {
    let rows = commission::find_pending(&state.pool).await?;
    Ok(Json(rows))
}

/// POST /api/commissions/:id/review - one-shot approve/reject
pub async fn review(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CommissionReview>,
) -> AppResult<Json<Value>> {
    if let Some(amount) = payload.commission_amount {
        validate_money(amount, "commission_amount")?;
    }
    validate_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;

    let action = payload.action;
    commission::review(&state.pool, id, payload).await?;

    tracing::info!(commission_id = id, action = ?action, "Commission reviewed");

    Ok(Json(json!({})))
}
