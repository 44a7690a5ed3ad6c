//! Shared domain types for the AquaOps water-delivery operations platform.
//!
//! This crate holds the models exchanged between the server and its clients:
//! entities, create/settle/review payloads, and status enums. Database derives
//! (`sqlx::FromRow` / `sqlx::Type`) are gated behind the `db` feature so UI
//! consumers can depend on the models without pulling in sqlx.

pub mod models;
pub mod util;
