//! Dispatch Repository
//!
//! Creating a dispatch is one serializable unit: the outstanding-balance
//! gate, the customer upserts, and the order + settlement inserts all run
//! inside a single transaction so a concurrent settlement on the same
//! driver cannot slip a dispatch past the gate.

use super::{RepoError, RepoResult, customer};
use crate::pricing;
use shared::models::{DispatchCreate, DispatchDetail, DispatchStatus, DispatchWithNames};
use sqlx::{SqliteConnection, SqlitePool};

const DISPATCH_WITH_NAMES_SELECT: &str = "SELECT o.id, o.order_no, o.item_summary, o.total_amount, o.driver_id, d.full_name AS driver_name, o.assistant_id, a.full_name AS assistant_name, o.status, o.created_by, o.notes, o.created_at, o.updated_at FROM dispatch_order o LEFT JOIN staff d ON o.driver_id = d.id LEFT JOIN staff a ON o.assistant_id = a.id";

/// Sum of `balance_due` across the driver's not-yet-completed settlements.
pub async fn outstanding_balance(conn: &mut SqliteConnection, driver_id: i64) -> RepoResult<f64> {
    let sum: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(balance_due), 0.0) FROM settlement WHERE driver_id = ? AND status != 'completed'",
    )
    .bind(driver_id)
    .fetch_one(conn)
    .await?;
    Ok(sum)
}

/// Create a dispatch order and its paired settlement.
///
/// Preconditions, checked in order with no partial effects:
/// 1. driver_id present
/// 2. at least one customer order
/// 3. driver's outstanding balance within the dispatch limit
pub async fn create(pool: &SqlitePool, data: DispatchCreate) -> RepoResult<DispatchWithNames> {
    let driver_id = data
        .driver_id
        .ok_or_else(|| RepoError::Validation("driver_id is required".into()))?;
    if data.customer_orders.is_empty() {
        return Err(RepoError::Validation(
            "At least one customer order is required".into(),
        ));
    }

    let mut tx = pool.begin().await?;

    let outstanding = outstanding_balance(&mut tx, driver_id).await?;
    if outstanding > pricing::OUTSTANDING_BALANCE_LIMIT {
        return Err(RepoError::BalanceExceeded(outstanding));
    }

    let mut total_bags: i64 = 0;
    let mut expected_revenue: f64 = 0.0;
    let mut summary_lines: Vec<String> = Vec::with_capacity(data.customer_orders.len());

    for order in &data.customer_orders {
        let bags = order.bags_count();
        let price = pricing::price_per_bag(bags);
        total_bags += bags;
        expected_revenue += pricing::order_revenue(bags);

        let name = order.name.trim();
        let phone = order.phone.trim();
        // Walk-in lines without full customer details are priced but not
        // registered; the registry requires both name and phone.
        if !name.is_empty() && !phone.is_empty() {
            customer::upsert_in_tx(&mut tx, name, phone, order.address.as_deref(), Some(driver_id))
                .await?;
            summary_lines.push(format!("{bags} bags @ {price} for {name} ({phone})"));
        } else {
            summary_lines.push(format!("{bags} bags @ {price}"));
        }
    }

    let now = shared::util::now_iso();
    let order_id = shared::util::snowflake_id();
    let order_no = shared::util::order_number();
    let item_summary = summary_lines.join("; ");

    sqlx::query(
        "INSERT INTO dispatch_order (id, order_no, item_summary, total_amount, driver_id, assistant_id, status, created_by, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending_pickup', ?7, ?8, ?9, ?9)",
    )
    .bind(order_id)
    .bind(&order_no)
    .bind(&item_summary)
    .bind(expected_revenue)
    .bind(driver_id)
    .bind(data.assistant_id)
    .bind(data.receptionist_id)
    .bind(&data.notes)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    let settlement_id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO settlement (id, dispatch_order_id, driver_id, assistant_id, bags_dispatched, expected_amount, amount_collected, balance_due, status, receptionist_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?6, 'pending_settlement', ?7, ?8, ?8)",
    )
    .bind(settlement_id)
    .bind(order_id)
    .bind(driver_id)
    .bind(data.assistant_id)
    .bind(total_bags)
    .bind(expected_revenue)
    .bind(data.receptionist_id)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_with_names(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dispatch".into()))
}

pub async fn find_with_names(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<DispatchWithNames>> {
    let sql = format!("{DISPATCH_WITH_NAMES_SELECT} WHERE o.id = ?");
    let row = sqlx::query_as::<_, DispatchWithNames>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Newest-first dispatch list with optional status / driver / creation-day
/// filters. Date bounds arrive pre-formatted from the handler layer.
pub async fn find_all(
    pool: &SqlitePool,
    status: Option<DispatchStatus>,
    driver_id: Option<i64>,
    created_from: Option<String>,
    created_until: Option<String>,
) -> RepoResult<Vec<DispatchWithNames>> {
    let mut sql = format!("{DISPATCH_WITH_NAMES_SELECT} WHERE 1=1");
    if status.is_some() {
        sql.push_str(" AND o.status = ?");
    }
    if driver_id.is_some() {
        sql.push_str(" AND o.driver_id = ?");
    }
    if created_from.is_some() {
        sql.push_str(" AND o.created_at >= ?");
    }
    if created_until.is_some() {
        sql.push_str(" AND o.created_at < ?");
    }
    sql.push_str(" ORDER BY o.created_at DESC");

    let mut query = sqlx::query_as::<_, DispatchWithNames>(&sql);
    if let Some(s) = status {
        query = query.bind(s);
    }
    if let Some(d) = driver_id {
        query = query.bind(d);
    }
    if let Some(from) = created_from {
        query = query.bind(from);
    }
    if let Some(until) = created_until {
        query = query.bind(until);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

/// Single dispatch merged with its settlement fields.
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<DispatchDetail>> {
    let row = sqlx::query_as::<_, DispatchDetail>(
        "SELECT o.id, o.order_no, o.item_summary, o.total_amount, o.driver_id, d.full_name AS driver_name, o.assistant_id, a.full_name AS assistant_name, o.status, o.created_by, o.notes, o.created_at, s.id AS settlement_id, s.bags_dispatched, s.bags_sold, s.bags_returned, s.bags_at_lower_tier, s.bags_at_upper_tier, s.expected_amount, s.amount_collected, s.balance_due, s.status AS settlement_status, s.settled_at FROM dispatch_order o JOIN settlement s ON s.dispatch_order_id = o.id LEFT JOIN staff d ON o.driver_id = d.id LEFT JOIN staff a ON o.assistant_id = a.id WHERE o.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
