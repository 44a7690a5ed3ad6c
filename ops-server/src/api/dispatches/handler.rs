//! Dispatch API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::repository::{dispatch, return_order, settlement};
use crate::utils::validation::{
    MAX_NOTE_LEN, validate_bag_count, validate_money, validate_optional_text,
};
use crate::utils::{AppError, AppResult, time};
use shared::models::{
    DispatchCreate, DispatchDetail, DispatchStatus, DispatchWithNames, ReturnRequest,
    SettleRequest, Settlement,
};

/// Query params for listing dispatches
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<DispatchStatus>,
    pub driver_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/dispatches - list with optional status/driver/date filters
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DispatchWithNames>>> {
    let created_from = query
        .start_date
        .as_deref()
        .map(time::parse_date)
        .transpose()?
        .map(time::day_start_iso);
    let created_until = query
        .end_date
        .as_deref()
        .map(time::parse_date)
        .transpose()?
        .map(time::day_end_iso);

    let orders = dispatch::find_all(
        &state.pool,
        query.status,
        query.driver_id,
        created_from,
        created_until,
    )
    .await?;
    Ok(Json(orders))
}

/// GET /api/dispatches/:id - dispatch merged with its settlement
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DispatchDetail>> {
    let detail = dispatch::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Dispatch order {id} not found")))?;
    Ok(Json(detail))
}

/// POST /api/dispatches - create a dispatch order with its settlement
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DispatchCreate>,
) -> AppResult<Json<DispatchWithNames>> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let order = dispatch::create(&state.pool, payload).await?;

    tracing::info!(
        order_no = %order.order_no,
        driver_id = order.driver_id,
        total_amount = order.total_amount,
        "Dispatch created"
    );

    Ok(Json(order))
}

/// POST /api/dispatches/:id/settle - reconcile reported sales
pub async fn settle(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SettleRequest>,
) -> AppResult<Json<Settlement>> {
    validate_bag_count(payload.bags_sold, "bags_sold")?;
    validate_bag_count(payload.bags_returned, "bags_returned")?;
    validate_bag_count(payload.bags_at_lower_tier, "bags_at_lower_tier")?;
    validate_money(payload.amount_paid, "amount_paid")?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let s = settlement::settle(&state.pool, id, payload).await?;

    tracing::info!(
        dispatch_order_id = id,
        status = ?s.status,
        balance_due = s.balance_due,
        "Dispatch settled"
    );

    Ok(Json(s))
}

/// POST /api/dispatches/:id/returns - record driver-reported unsold bags
pub async fn process_return(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReturnRequest>,
) -> AppResult<Json<Value>> {
    validate_bag_count(payload.bags_returned, "bags_returned")?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let return_order_id =
        return_order::create(&state.pool, id, payload.bags_returned, payload.notes).await?;

    Ok(Json(json!({ "return_order_id": return_order_id })))
}
