//! Dispatch & settlement workflow, exercised end to end against a
//! throwaway SQLite database.

use ops_server::db::DbService;
use ops_server::db::repository::{RepoError, commission, customer, dispatch, return_order, settlement};
use serde_json::json;
use shared::models::{
    CustomerUpsert, DispatchCreate, DispatchStatus, SettleRequest, SettlementStatus,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn setup() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("aquaops-test.db");
    let db = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("db init");
    seed_staff(&db.pool).await;
    (dir, db.pool)
}

async fn seed_staff(pool: &SqlitePool) {
    for (id, name, role) in [
        (1_i64, "Daniel Mwangi", "driver"),
        (2, "Abel Otieno", "assistant"),
        (7, "Grace Receptionist", "receptionist"),
    ] {
        sqlx::query(
            "INSERT INTO staff (id, full_name, role, is_active, created_at) VALUES (?1, ?2, ?3, 1, ?4)",
        )
        .bind(id)
        .bind(name)
        .bind(role)
        .bind(shared::util::now_iso())
        .execute(pool)
        .await
        .unwrap();
    }
}

fn one_order(bags: serde_json::Value) -> DispatchCreate {
    DispatchCreate {
        driver_id: Some(1),
        assistant_id: Some(2),
        receptionist_id: 7,
        customer_orders: vec![shared::models::CustomerOrderInput {
            name: "Asha Wanjiru".into(),
            phone: "0712000111".into(),
            address: Some("14 Moi Ave".into()),
            bags,
        }],
        notes: None,
    }
}

fn settle_all(bags: i64, paid: f64) -> SettleRequest {
    SettleRequest {
        bags_sold: bags,
        bags_returned: 0,
        bags_at_lower_tier: bags,
        amount_paid: paid,
        notes: None,
    }
}

// Scenario A: 60 bags at the bulk tier -> 15000 expected, settlement mirrors it.
#[tokio::test]
async fn create_dispatch_writes_order_and_settlement_pair() {
    let (_dir, pool) = setup().await;

    let order = dispatch::create(&pool, one_order(json!(60))).await.unwrap();
    assert_eq!(order.total_amount, 15_000.0);
    assert_eq!(order.status, DispatchStatus::PendingPickup);
    assert_eq!(order.driver_name.as_deref(), Some("Daniel Mwangi"));
    assert_eq!(order.assistant_name.as_deref(), Some("Abel Otieno"));
    assert!(order.order_no.starts_with("DSP"));

    let s = settlement::find_by_dispatch(&pool, order.id)
        .await
        .unwrap()
        .expect("settlement created with order");
    assert_eq!(s.bags_dispatched, 60);
    assert_eq!(s.expected_amount, 15_000.0);
    assert_eq!(s.balance_due, 15_000.0);
    assert_eq!(s.amount_collected, 0.0);
    assert_eq!(s.status, SettlementStatus::PendingSettlement);
    assert_eq!(s.receptionist_id, 7);

    // the customer order registered the customer with the driver attached
    let c = customer::find_by_phone(&pool, "0712000111")
        .await
        .unwrap()
        .expect("customer registered");
    assert_eq!(c.last_driver_id, Some(1));
}

#[tokio::test]
async fn create_dispatch_requires_driver_and_orders() {
    let (_dir, pool) = setup().await;

    let mut no_driver = one_order(json!(10));
    no_driver.driver_id = None;
    assert!(matches!(
        dispatch::create(&pool, no_driver).await,
        Err(RepoError::Validation(_))
    ));

    let empty = DispatchCreate {
        driver_id: Some(1),
        assistant_id: None,
        receptionist_id: 7,
        customer_orders: vec![],
        notes: None,
    };
    assert!(matches!(
        dispatch::create(&pool, empty).await,
        Err(RepoError::Validation(_))
    ));

    // neither rejection persisted anything
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dispatch_order")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn non_numeric_bags_count_as_zero() {
    let (_dir, pool) = setup().await;

    let order = dispatch::create(&pool, one_order(json!("plenty")))
        .await
        .unwrap();
    assert_eq!(order.total_amount, 0.0);

    let s = settlement::find_by_dispatch(&pool, order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(s.bags_dispatched, 0);
}

#[tokio::test]
async fn small_orders_price_at_upper_tier() {
    let (_dir, pool) = setup().await;

    // 10 bags below the 50-bag threshold -> 270 each
    let order = dispatch::create(&pool, one_order(json!(10))).await.unwrap();
    assert_eq!(order.total_amount, 2_700.0);
}

// Scenario B: full settlement completes and emits one pending commission.
#[tokio::test]
async fn full_settlement_completes_and_emits_commission() {
    let (_dir, pool) = setup().await;
    let order = dispatch::create(&pool, one_order(json!(60))).await.unwrap();

    let s = settlement::settle(&pool, order.id, settle_all(60, 15_000.0))
        .await
        .unwrap();
    assert_eq!(s.bags_at_upper_tier, 0);
    assert_eq!(s.expected_amount, 15_000.0);
    assert_eq!(s.amount_collected, 15_000.0);
    assert_eq!(s.balance_due, 0.0);
    assert_eq!(s.status, SettlementStatus::Completed);
    assert!(s.settled_at.is_some());

    let detail = dispatch::find_detail(&pool, order.id).await.unwrap().unwrap();
    assert_eq!(detail.status, DispatchStatus::Settled);

    let pending = commission::find_pending(&pool).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].dispatch_order_id, order.id);
    assert_eq!(pending[0].commission_amount, 0.0);
    assert_eq!(pending[0].total_revenue, 15_000.0);
    assert_eq!(pending[0].driver_name.as_deref(), Some("Daniel Mwangi"));
}

#[tokio::test]
async fn partial_settlement_keeps_balance_and_no_commission() {
    let (_dir, pool) = setup().await;
    let order = dispatch::create(&pool, one_order(json!(60))).await.unwrap();

    let s = settlement::settle(&pool, order.id, settle_all(60, 10_000.0))
        .await
        .unwrap();
    assert_eq!(s.status, SettlementStatus::Partial);
    assert_eq!(s.balance_due, 5_000.0);
    assert_eq!(s.expected_amount - s.amount_collected, s.balance_due);

    let detail = dispatch::find_detail(&pool, order.id).await.unwrap().unwrap();
    assert_eq!(detail.status, DispatchStatus::SettlementPending);
    assert!(commission::find_pending(&pool).await.unwrap().is_empty());

    // partial settlements may be re-settled until completed
    let s = settlement::settle(&pool, order.id, settle_all(60, 15_000.0))
        .await
        .unwrap();
    assert_eq!(s.status, SettlementStatus::Completed);
    assert_eq!(commission::find_pending(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn mixed_tier_settlement_prices_both_tiers() {
    let (_dir, pool) = setup().await;
    let order = dispatch::create(&pool, one_order(json!(60))).await.unwrap();

    // 40 at 250 + 20 at 270 = 15400
    let req = SettleRequest {
        bags_sold: 60,
        bags_returned: 0,
        bags_at_lower_tier: 40,
        amount_paid: 15_400.0,
        notes: None,
    };
    let s = settlement::settle(&pool, order.id, req).await.unwrap();
    assert_eq!(s.bags_at_lower_tier, 40);
    assert_eq!(s.bags_at_upper_tier, 20);
    assert_eq!(s.expected_amount, 15_400.0);
    assert_eq!(s.status, SettlementStatus::Completed);
}

#[tokio::test]
async fn settle_is_terminal_once_completed() {
    let (_dir, pool) = setup().await;
    let order = dispatch::create(&pool, one_order(json!(60))).await.unwrap();
    settlement::settle(&pool, order.id, settle_all(60, 15_000.0))
        .await
        .unwrap();

    let before = settlement::find_by_dispatch(&pool, order.id).await.unwrap().unwrap();

    let err = settlement::settle(&pool, order.id, settle_all(60, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // nothing changed
    let after = settlement::find_by_dispatch(&pool, order.id).await.unwrap().unwrap();
    assert_eq!(before.amount_collected, after.amount_collected);
    assert_eq!(before.updated_at, after.updated_at);
    assert_eq!(commission::find_pending(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn settle_unknown_dispatch_is_not_found() {
    let (_dir, pool) = setup().await;
    let err = settlement::settle(&pool, 424242, settle_all(10, 100.0))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

// Scenario C: the outstanding-balance gate rejects with the computed sum
// and leaves no partial rows behind.
#[tokio::test]
async fn outstanding_balance_gate_blocks_new_dispatches() {
    let (_dir, pool) = setup().await;

    // 150 bags at 250 = 37500 owed, all unsettled
    let first = dispatch::create(&pool, one_order(json!(150))).await.unwrap();
    assert_eq!(first.total_amount, 37_500.0);

    let err = dispatch::create(&pool, one_order(json!(10))).await.unwrap_err();
    match err {
        RepoError::BalanceExceeded(balance) => assert_eq!(balance, 37_500.0),
        other => panic!("expected BalanceExceeded, got {other:?}"),
    }

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dispatch_order")
        .fetch_one(&pool)
        .await
        .unwrap();
    let settlements: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settlement")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orders, 1);
    assert_eq!(settlements, 1);

    // settling the debt reopens dispatching
    settlement::settle(&pool, first.id, settle_all(150, 37_500.0))
        .await
        .unwrap();
    assert!(dispatch::create(&pool, one_order(json!(10))).await.is_ok());
}

// Scenario D: returns bump the owed-quantity counter, never the money.
#[tokio::test]
async fn process_return_records_order_and_counter_only() {
    let (_dir, pool) = setup().await;
    let order = dispatch::create(&pool, one_order(json!(60))).await.unwrap();

    let return_id = return_order::create(&pool, order.id, 5, Some("2 leaking".into()))
        .await
        .unwrap();

    let ro = return_order::find_by_id(&pool, return_id)
        .await
        .unwrap()
        .expect("return order persisted");
    assert_eq!(ro.dispatch_order_id, order.id);
    assert_eq!(ro.driver_id, 1);
    assert_eq!(ro.bags_returned, 5);
    assert_eq!(ro.status, shared::models::ReturnStatus::PendingReview);

    let s = settlement::find_by_dispatch(&pool, order.id).await.unwrap().unwrap();
    assert_eq!(s.bags_returned, 5);
    assert_eq!(s.balance_due, 15_000.0);
    assert_eq!(s.bags_sold, 0);

    // repeated reports accumulate
    return_order::create(&pool, order.id, 3, None).await.unwrap();
    let s = settlement::find_by_dispatch(&pool, order.id).await.unwrap().unwrap();
    assert_eq!(s.bags_returned, 8);

    assert_eq!(return_order::find_pending(&pool).await.unwrap().len(), 2);
}

#[tokio::test]
async fn process_return_unknown_dispatch_is_not_found() {
    let (_dir, pool) = setup().await;
    let err = return_order::create(&pool, 999, 5, None).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn customer_registry_merges_on_phone() {
    let (_dir, pool) = setup().await;

    let first = customer::find_or_create(
        &pool,
        CustomerUpsert {
            name: "Asha".into(),
            phone: "0712000111".into(),
            address: Some("14 Moi Ave".into()),
            driver_id: None,
        },
    )
    .await
    .unwrap();

    // same phone: name is last-writer-wins, empty address keeps the old one
    let merged = customer::find_or_create(
        &pool,
        CustomerUpsert {
            name: "Asha Wanjiru".into(),
            phone: "0712000111".into(),
            address: None,
            driver_id: Some(1),
        },
    )
    .await
    .unwrap();
    assert_eq!(merged.id, first.id);
    assert_eq!(merged.name, "Asha Wanjiru");
    assert_eq!(merged.address.as_deref(), Some("14 Moi Ave"));
    assert_eq!(merged.last_driver_id, Some(1));

    let err = customer::find_or_create(
        &pool,
        CustomerUpsert {
            name: "".into(),
            phone: "0712".into(),
            address: None,
            driver_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn customer_search_filters_across_fields() {
    let (_dir, pool) = setup().await;
    for (name, phone, addr) in [
        ("Asha Wanjiru", "0712000111", "14 Moi Ave"),
        ("Brian Kip", "0722999888", "Riverside Drive"),
    ] {
        customer::find_or_create(
            &pool,
            CustomerUpsert {
                name: name.into(),
                phone: phone.into(),
                address: Some(addr.into()),
                driver_id: None,
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(customer::search(&pool, None).await.unwrap().len(), 2);
    assert_eq!(customer::search(&pool, Some("0722")).await.unwrap().len(), 1);
    assert_eq!(
        customer::search(&pool, Some("riverside")).await.unwrap().len(),
        1
    );
    assert_eq!(customer::search(&pool, Some("wanjiru")).await.unwrap().len(), 1);
    assert!(customer::search(&pool, Some("zzz")).await.unwrap().is_empty());
}
