//! Customer Repository
//!
//! Phone number is the dedup key. `find_or_create` merges: name is
//! last-writer-wins, address only overwritten by a non-empty value.
//! Customers are never hard-deleted.

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerUpsert};
use sqlx::{SqliteConnection, SqlitePool};

const CUSTOMER_SELECT: &str = "SELECT id, name, phone, address, last_driver_id, is_active, created_at, updated_at FROM customer";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE phone = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(phone)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Newest-first list, optionally filtered by a case-insensitive substring
/// match across name, phone and address.
pub async fn search(pool: &SqlitePool, query: Option<&str>) -> RepoResult<Vec<Customer>> {
    let rows = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => {
            let pattern = format!("%{q}%");
            let sql = format!(
                "{CUSTOMER_SELECT} WHERE is_active = 1 AND (name LIKE ?1 OR phone LIKE ?1 OR address LIKE ?1) ORDER BY created_at DESC"
            );
            sqlx::query_as::<_, Customer>(&sql)
                .bind(&pattern)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{CUSTOMER_SELECT} WHERE is_active = 1 ORDER BY created_at DESC");
            sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

/// Look up by phone; merge into the existing record or create a new one.
pub async fn find_or_create(pool: &SqlitePool, data: CustomerUpsert) -> RepoResult<Customer> {
    if data.name.trim().is_empty() || data.phone.trim().is_empty() {
        return Err(RepoError::Validation(
            "Customer name and phone are required".into(),
        ));
    }

    let mut tx = pool.begin().await?;
    let id = upsert_in_tx(
        &mut *tx,
        &data.name,
        &data.phone,
        data.address.as_deref(),
        data.driver_id,
    )
    .await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to upsert customer".into()))
}

/// Merge-or-insert on an open transaction. Used stand-alone by the registry
/// endpoint and inside the dispatch-creation transaction.
///
/// Returns the customer's id.
pub async fn upsert_in_tx(
    conn: &mut SqliteConnection,
    name: &str,
    phone: &str,
    address: Option<&str>,
    driver_id: Option<i64>,
) -> RepoResult<i64> {
    let now = shared::util::now_iso();
    let phone = phone.trim();
    let address = address.map(str::trim).filter(|a| !a.is_empty());

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM customer WHERE phone = ?")
        .bind(phone)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some(id) = existing {
        sqlx::query(
            "UPDATE customer SET name = ?1, address = COALESCE(?2, address), last_driver_id = COALESCE(?3, last_driver_id), updated_at = ?4 WHERE id = ?5",
        )
        .bind(name.trim())
        .bind(address)
        .bind(driver_id)
        .bind(&now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
        return Ok(id);
    }

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO customer (id, name, phone, address, last_driver_id, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(name.trim())
    .bind(phone)
    .bind(address)
    .bind(driver_id)
    .bind(&now)
    .execute(&mut *conn)
    .await?;
    Ok(id)
}
