//! Commission Model
//!
//! A commission is a payout candidate for a driver/assistant pair, emitted
//! only when a settlement reaches `completed`. The amount is deliberately
//! left at zero until a manager approves it; the settlement engine never
//! self-awards commission.

use serde::{Deserialize, Serialize};

/// Commission approval status (`pending` → `approved` | `rejected`, one-shot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum CommissionStatus {
    Pending,
    Approved,
    Rejected,
}

/// Commission entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Commission {
    pub id: i64,
    pub dispatch_order_id: i64,
    pub driver_id: i64,
    pub assistant_id: Option<i64>,
    pub bags_sold: i64,
    pub bags_returned: i64,
    /// Amount actually collected for the dispatch
    pub total_revenue: f64,
    /// Zero until approved
    pub commission_amount: f64,
    /// Date of the settled delivery (`YYYY-MM-DD`)
    pub delivery_date: String,
    pub status: CommissionStatus,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<String>,
    pub manager_comment: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Commission joined with staff display names (manager review screen)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CommissionWithNames {
    pub id: i64,
    pub dispatch_order_id: i64,
    pub order_no: String,
    pub driver_id: i64,
    pub driver_name: Option<String>,
    pub assistant_id: Option<i64>,
    pub assistant_name: Option<String>,
    pub bags_sold: i64,
    pub bags_returned: i64,
    pub total_revenue: f64,
    pub commission_amount: f64,
    pub delivery_date: String,
    pub status: CommissionStatus,
    pub created_at: String,
}

/// Manager decision on a pending commission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// Review commission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionReview {
    pub action: ReviewAction,
    /// Awarded amount; only honored on approve, defaults to 0
    pub commission_amount: Option<f64>,
    pub comment: Option<String>,
    /// Manager performing the review (identity comes from the caller)
    pub manager_id: i64,
}
