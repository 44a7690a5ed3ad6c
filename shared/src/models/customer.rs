//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity. Phone number is the dedup key; records are soft-deleted
/// via `is_active` and never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    /// Driver who last delivered to this customer
    pub last_driver_id: Option<i64>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Find-or-create payload. Merge semantics on an existing phone: name is
/// last-writer-wins, address only overwritten when a non-empty value comes in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerUpsert {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    /// Driver to associate with the customer (set during dispatch creation)
    pub driver_id: Option<i64>,
}
