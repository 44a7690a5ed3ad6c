//! Customer API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::customer;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_PHONE_LEN, validate_optional_text, validate_required_text,
};
use shared::models::{Customer, CustomerUpsert};

/// Query params for customer search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /api/customers?q= - newest-first, optional substring filter
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer::search(&state.pool, query.q.as_deref()).await?;
    Ok(Json(customers))
}

/// POST /api/customers - find by phone and merge, or create
pub async fn find_or_create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerUpsert>,
) -> AppResult<Json<Customer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_PHONE_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;

    let c = customer::find_or_create(&state.pool, payload).await?;
    Ok(Json(c))
}
