//! Commission API: pending list and manager review

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/commissions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/pending", get(handler::list_pending))
        .route("/{id}/review", post(handler::review))
}
