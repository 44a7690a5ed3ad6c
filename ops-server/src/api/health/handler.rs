//! Health Check Handler

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/health - liveness plus a database round-trip
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<Value>> {
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
    })))
}
