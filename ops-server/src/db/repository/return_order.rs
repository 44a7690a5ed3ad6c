//! Return Order Repository
//!
//! A driver reporting unsold bags creates a `return_order` row for the
//! warehouse and bumps the settlement's `bags_returned` counter, in one
//! transaction. Returns never touch `balance_due` or `bags_sold`; money
//! is reconciled exclusively through the settlement engine.

use super::{RepoError, RepoResult};
use shared::models::ReturnOrder;
use sqlx::SqlitePool;

const RETURN_SELECT: &str = "SELECT id, dispatch_order_id, driver_id, bags_returned, status, notes, created_at FROM return_order";

/// Record returned bags against a dispatch. Returns the new return-order id.
pub async fn create(
    pool: &SqlitePool,
    dispatch_order_id: i64,
    bags_returned: i64,
    notes: Option<String>,
) -> RepoResult<i64> {
    let mut tx = pool.begin().await?;

    let driver_id: Option<i64> =
        sqlx::query_scalar("SELECT driver_id FROM dispatch_order WHERE id = ?")
            .bind(dispatch_order_id)
            .fetch_optional(&mut *tx)
            .await?;
    let driver_id = driver_id.ok_or_else(|| {
        RepoError::NotFound(format!("Dispatch order {dispatch_order_id} not found"))
    })?;

    let now = shared::util::now_iso();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO return_order (id, dispatch_order_id, driver_id, bags_returned, status, notes, created_at) VALUES (?1, ?2, ?3, ?4, 'pending_review', ?5, ?6)",
    )
    .bind(id)
    .bind(dispatch_order_id)
    .bind(driver_id)
    .bind(bags_returned)
    .bind(&notes)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE settlement SET bags_returned = bags_returned + ?1, updated_at = ?2 WHERE dispatch_order_id = ?3",
    )
    .bind(bags_returned)
    .bind(&now)
    .bind(dispatch_order_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ReturnOrder>> {
    let sql = format!("{RETURN_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, ReturnOrder>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Return orders awaiting warehouse review, oldest first.
pub async fn find_pending(pool: &SqlitePool) -> RepoResult<Vec<ReturnOrder>> {
    let sql = format!("{RETURN_SELECT} WHERE status = 'pending_review' ORDER BY created_at ASC");
    let rows = sqlx::query_as::<_, ReturnOrder>(&sql).fetch_all(pool).await?;
    Ok(rows)
}
