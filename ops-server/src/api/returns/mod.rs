//! Return Orders API (warehouse review queue)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/returns/pending", get(handler::list_pending))
}
