//! Return Order Model
//!
//! Driver-reported unsold bags awaiting warehouse confirmation. A return
//! order is advisory input to stock reconciliation, not an authoritative
//! inventory removal, and never touches the financial side of a settlement.

use serde::{Deserialize, Serialize};

/// Warehouse review status of a return order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ReturnStatus {
    PendingReview,
    Reviewed,
}

/// Return order entity (separate table from dispatch orders)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReturnOrder {
    pub id: i64,
    /// Dispatch the bags came back from
    pub dispatch_order_id: i64,
    pub driver_id: i64,
    pub bags_returned: i64,
    pub status: ReturnStatus,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Process return payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub bags_returned: i64,
    pub notes: Option<String>,
}
