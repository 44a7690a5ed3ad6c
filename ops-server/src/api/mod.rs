//! API routing
//!
//! One module per resource, each exposing a `router()` merged into the
//! application here.

pub mod commissions;
pub mod customers;
pub mod dispatches;
pub mod health;
pub mod returns;

use std::time::Duration;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Assemble the full application router with middleware.
pub fn build_app(state: ServerState) -> Router {
    let request_timeout = Duration::from_millis(state.config.request_timeout_ms);

    Router::<ServerState>::new()
        .merge(health::router())
        .merge(customers::router())
        .merge(dispatches::router())
        .merge(returns::router())
        .merge(commissions::router())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
