//! Commission Repository
//!
//! Commissions are emitted by the settlement engine when a settlement
//! completes and reviewed once by a manager. The review is a one-shot
//! compare-and-set: a conditional `UPDATE … WHERE status = 'pending'`
//! whose affected-row count decides the winner under concurrency.

use super::{RepoError, RepoResult};
use shared::models::{Commission, CommissionReview, CommissionWithNames, ReviewAction};
use sqlx::{Sqlite, SqlitePool, Transaction};

const COMMISSION_SELECT: &str = "SELECT id, dispatch_order_id, driver_id, assistant_id, bags_sold, bags_returned, total_revenue, commission_amount, delivery_date, status, reviewed_by, reviewed_at, manager_comment, created_at, updated_at FROM commission";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Commission>> {
    let sql = format!("{COMMISSION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Commission>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Pending commissions for the manager review screen, newest first.
pub async fn find_pending(pool: &SqlitePool) -> RepoResult<Vec<CommissionWithNames>> {
    let rows = sqlx::query_as::<_, CommissionWithNames>(
        "SELECT c.id, c.dispatch_order_id, o.order_no, c.driver_id, d.full_name AS driver_name, c.assistant_id, a.full_name AS assistant_name, c.bags_sold, c.bags_returned, c.total_revenue, c.commission_amount, c.delivery_date, c.status, c.created_at FROM commission c JOIN dispatch_order o ON c.dispatch_order_id = o.id LEFT JOIN staff d ON c.driver_id = d.id LEFT JOIN staff a ON c.assistant_id = a.id WHERE c.status = 'pending' ORDER BY c.created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert the pending commission for a just-completed settlement.
/// Called from the settlement transaction; the UNIQUE index on
/// `dispatch_order_id` backs the at-most-one-per-settlement rule.
pub async fn insert_pending_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    dispatch_order_id: i64,
    driver_id: i64,
    assistant_id: Option<i64>,
    bags_sold: i64,
    bags_returned: i64,
    total_revenue: f64,
) -> RepoResult<()> {
    let now = shared::util::now_iso();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO commission (id, dispatch_order_id, driver_id, assistant_id, bags_sold, bags_returned, total_revenue, commission_amount, delivery_date, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, 'pending', ?9, ?9)",
    )
    .bind(id)
    .bind(dispatch_order_id)
    .bind(driver_id)
    .bind(assistant_id)
    .bind(bags_sold)
    .bind(bags_returned)
    .bind(total_revenue)
    .bind(shared::util::today_iso())
    .bind(&now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Approve or reject a pending commission. Terminal, never revocable.
pub async fn review(pool: &SqlitePool, id: i64, data: CommissionReview) -> RepoResult<()> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Commission {id} not found")))?;

    let (status, amount) = match data.action {
        ReviewAction::Approve => ("approved", data.commission_amount.unwrap_or(0.0)),
        // Rejection forces the amount back to zero
        ReviewAction::Reject => ("rejected", 0.0),
    };

    let now = shared::util::now_iso();
    let rows = sqlx::query(
        "UPDATE commission SET status = ?1, commission_amount = ?2, reviewed_by = ?3, reviewed_at = ?4, manager_comment = ?5, updated_at = ?4 WHERE id = ?6 AND status = 'pending'",
    )
    .bind(status)
    .bind(amount)
    .bind(data.manager_id)
    .bind(&now)
    .bind(&data.comment)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        // Row exists (checked above) but was no longer pending: a concurrent
        // or earlier review already won.
        return Err(RepoError::Conflict(format!(
            "Commission {id} already reviewed (status: {:?})",
            existing.status
        )));
    }
    Ok(())
}
