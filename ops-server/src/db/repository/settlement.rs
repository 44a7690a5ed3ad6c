//! Settlement Repository
//!
//! State machine: `pending_settlement → {partial, completed}`. A partial
//! settlement may be re-settled; `completed` is terminal. The settlement
//! update, the parent order's status flip, and the conditional commission
//! insert are one transaction: the triple is never allowed to diverge.

use super::{RepoError, RepoResult, commission};
use crate::pricing;
use shared::models::{DispatchOrder, DispatchStatus, SettleRequest, Settlement, SettlementStatus};
use sqlx::SqlitePool;

const SETTLEMENT_SELECT: &str = "SELECT id, dispatch_order_id, driver_id, assistant_id, bags_dispatched, bags_sold, bags_returned, bags_at_lower_tier, bags_at_upper_tier, expected_amount, amount_collected, balance_due, status, receptionist_id, settled_at, notes, created_at, updated_at FROM settlement";

pub async fn find_by_dispatch(
    pool: &SqlitePool,
    dispatch_order_id: i64,
) -> RepoResult<Option<Settlement>> {
    let sql = format!("{SETTLEMENT_SELECT} WHERE dispatch_order_id = ?");
    let row = sqlx::query_as::<_, Settlement>(&sql)
        .bind(dispatch_order_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Reconcile a dispatch against the driver's reported sales.
///
/// The tier split is caller-supplied: `bags_at_upper = bags_sold -
/// bags_at_lower_tier`, taken as-is. `balance_due = expected - paid` holds
/// on every write; the settlement completes iff the balance reaches zero,
/// and exactly then a pending commission is emitted with a zero amount
/// (valuation is the manager's, not the engine's).
pub async fn settle(
    pool: &SqlitePool,
    dispatch_order_id: i64,
    data: SettleRequest,
) -> RepoResult<Settlement> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, DispatchOrder>(
        "SELECT id, order_no, item_summary, total_amount, driver_id, assistant_id, status, created_by, notes, created_at, updated_at FROM dispatch_order WHERE id = ?",
    )
    .bind(dispatch_order_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Dispatch order {dispatch_order_id} not found")))?;
    if order.status == DispatchStatus::Settled {
        return Err(RepoError::Conflict(format!(
            "Dispatch order {} is already settled",
            order.order_no
        )));
    }

    let prior = sqlx::query_as::<_, Settlement>(&format!(
        "{SETTLEMENT_SELECT} WHERE dispatch_order_id = ?"
    ))
    .bind(dispatch_order_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        RepoError::Database(format!(
            "Dispatch order {dispatch_order_id} has no settlement row"
        ))
    })?;

    let bags_at_upper_tier = data.bags_sold - data.bags_at_lower_tier;
    let expected_amount = pricing::tiered_revenue(data.bags_at_lower_tier, bags_at_upper_tier);
    let balance_due = pricing::balance_due(expected_amount, data.amount_paid);
    let completed = balance_due <= 0.0;
    let status = if completed {
        SettlementStatus::Completed
    } else {
        SettlementStatus::Partial
    };

    let now = shared::util::now_iso();
    sqlx::query(
        "UPDATE settlement SET bags_sold = ?1, bags_returned = ?2, bags_at_lower_tier = ?3, bags_at_upper_tier = ?4, expected_amount = ?5, amount_collected = ?6, balance_due = ?7, status = ?8, settled_at = ?9, notes = COALESCE(?10, notes), updated_at = ?9 WHERE id = ?11",
    )
    .bind(data.bags_sold)
    .bind(data.bags_returned)
    .bind(data.bags_at_lower_tier)
    .bind(bags_at_upper_tier)
    .bind(expected_amount)
    .bind(data.amount_paid)
    .bind(balance_due)
    .bind(status)
    .bind(&now)
    .bind(&data.notes)
    .bind(prior.id)
    .execute(&mut *tx)
    .await?;

    let order_status = if completed {
        DispatchStatus::Settled
    } else {
        DispatchStatus::SettlementPending
    };
    sqlx::query("UPDATE dispatch_order SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(order_status)
        .bind(&now)
        .bind(dispatch_order_id)
        .execute(&mut *tx)
        .await?;

    if completed {
        commission::insert_pending_in_tx(
            &mut tx,
            dispatch_order_id,
            prior.driver_id,
            prior.assistant_id,
            data.bags_sold,
            data.bags_returned,
            data.amount_paid,
        )
        .await?;
    }

    tx.commit().await?;

    find_by_dispatch(pool, dispatch_order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to update settlement".into()))
}
