//! Dispatch Order Model
//!
//! A dispatch order is one driver loadout covering one or more customer
//! orders. It is created together with its settlement in a single
//! transaction and referenced 1:1 by it.

use serde::{Deserialize, Serialize};

use super::settlement::SettlementStatus;

/// Dispatch order lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum DispatchStatus {
    /// Created, waiting for the driver to pick up the load
    PendingPickup,
    /// Partially settled, balance still outstanding
    SettlementPending,
    /// Fully settled (terminal)
    Settled,
}

/// Dispatch order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DispatchOrder {
    pub id: i64,
    /// Generated time-derived order number, unique
    pub order_no: String,
    /// Aggregated one-line description of the customer orders
    pub item_summary: String,
    /// Expected revenue for the full loadout
    pub total_amount: f64,
    pub driver_id: i64,
    pub assistant_id: Option<i64>,
    pub status: DispatchStatus,
    /// Receptionist who created the dispatch
    pub created_by: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Dispatch order joined with staff display names (list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DispatchWithNames {
    pub id: i64,
    pub order_no: String,
    pub item_summary: String,
    pub total_amount: f64,
    pub driver_id: i64,
    pub driver_name: Option<String>,
    pub assistant_id: Option<i64>,
    pub assistant_name: Option<String>,
    pub status: DispatchStatus,
    pub created_by: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Dispatch order merged with its settlement (single-order detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DispatchDetail {
    pub id: i64,
    pub order_no: String,
    pub item_summary: String,
    pub total_amount: f64,
    pub driver_id: i64,
    pub driver_name: Option<String>,
    pub assistant_id: Option<i64>,
    pub assistant_name: Option<String>,
    pub status: DispatchStatus,
    pub created_by: i64,
    pub notes: Option<String>,
    pub created_at: String,
    // Paired settlement
    pub settlement_id: i64,
    pub bags_dispatched: i64,
    pub bags_sold: i64,
    pub bags_returned: i64,
    pub bags_at_lower_tier: i64,
    pub bags_at_upper_tier: i64,
    pub expected_amount: f64,
    pub amount_collected: f64,
    pub balance_due: f64,
    pub settlement_status: SettlementStatus,
    pub settled_at: Option<String>,
}

/// One customer line inside a dispatch-creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerOrderInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub address: Option<String>,
    /// Bag count. Accepted as a number or numeric string; anything else
    /// counts as zero (lenient parsing carried over from the source system).
    #[serde(default)]
    pub bags: serde_json::Value,
}

impl CustomerOrderInput {
    /// Lenient bag-count parse: number or numeric string, otherwise 0.
    pub fn bags_count(&self) -> i64 {
        match &self.bags {
            serde_json::Value::Number(n) => n.as_i64().unwrap_or(0),
            serde_json::Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
            _ => 0,
        }
    }
}

/// Create dispatch payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchCreate {
    pub driver_id: Option<i64>,
    pub assistant_id: Option<i64>,
    /// Receptionist creating the dispatch (identity comes from the caller)
    pub receptionist_id: i64,
    #[serde(default)]
    pub customer_orders: Vec<CustomerOrderInput>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(bags: serde_json::Value) -> CustomerOrderInput {
        CustomerOrderInput {
            name: "Asha".into(),
            phone: "0712000111".into(),
            address: None,
            bags,
        }
    }

    #[test]
    fn bags_count_parses_numbers_and_strings() {
        assert_eq!(input(json!(60)).bags_count(), 60);
        assert_eq!(input(json!("25")).bags_count(), 25);
        assert_eq!(input(json!(" 7 ")).bags_count(), 7);
    }

    #[test]
    fn bags_count_treats_garbage_as_zero() {
        assert_eq!(input(json!(null)).bags_count(), 0);
        assert_eq!(input(json!("lots")).bags_count(), 0);
        assert_eq!(input(json!({"n": 3})).bags_count(), 0);
        assert_eq!(input(json!(2.5)).bags_count(), 0);
    }
}
