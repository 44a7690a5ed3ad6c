//! Settlement Model
//!
//! Financial reconciliation record for a dispatch. Created atomically with
//! its dispatch order; `balance_due = expected_amount - amount_collected`
//! holds at every write.

use serde::{Deserialize, Serialize};

/// Settlement status
///
/// `pending_settlement → partial → completed`; `partial` may be re-settled
/// any number of times, `completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum SettlementStatus {
    PendingSettlement,
    Partial,
    Completed,
}

/// Settlement entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Settlement {
    pub id: i64,
    pub dispatch_order_id: i64,
    pub driver_id: i64,
    pub assistant_id: Option<i64>,
    pub bags_dispatched: i64,
    pub bags_sold: i64,
    pub bags_returned: i64,
    /// Bags sold at the bulk (lower) price tier
    pub bags_at_lower_tier: i64,
    /// Bags sold at the standard (upper) price tier
    pub bags_at_upper_tier: i64,
    pub expected_amount: f64,
    pub amount_collected: f64,
    pub balance_due: f64,
    pub status: SettlementStatus,
    /// Receptionist who created the dispatch
    pub receptionist_id: i64,
    pub settled_at: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Settle dispatch payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleRequest {
    pub bags_sold: i64,
    pub bags_returned: i64,
    /// Caller-supplied tier split; the upper-tier count is derived as
    /// `bags_sold - bags_at_lower_tier`
    #[serde(alias = "bags_at_250")]
    pub bags_at_lower_tier: i64,
    pub amount_paid: f64,
    pub notes: Option<String>,
}
