//! End-to-end order lifecycle tests
//!
//! Builds the lifecycle service directly over an in-memory store, the
//! same wiring the HTTP handlers use.

use std::sync::Arc;

use order_server::auth::CurrentActor;
use order_server::catalog::CatalogService;
use order_server::orders::{OrderService, OrderStore, TransitionNotifier, TransitionRequest};
use order_server::payments::{PaymentGateway, StaticPaymentGateway};
use order_server::tenant::{TenantContext, resolve_tenant};
use shared::ErrorCode;
use shared::models::{MenuItem, Modifier};
use shared::order::{Channel, LineItemInput, OrderStatus, OrderSubmission};

struct Harness {
    orders: Arc<OrderService>,
    notifier: Arc<TransitionNotifier>,
    payments: Arc<StaticPaymentGateway>,
}

fn harness() -> Harness {
    let store = Arc::new(OrderStore::open_in_memory().unwrap());
    let catalog = Arc::new(CatalogService::new());
    let notifier = Arc::new(TransitionNotifier::new());
    let payments = Arc::new(StaticPaymentGateway::new());

    seed_menu(&catalog, "rest-1");
    seed_menu(&catalog, "rest-2");

    let orders = Arc::new(OrderService::new(
        store,
        catalog,
        notifier.clone(),
        payments.clone() as Arc<dyn PaymentGateway>,
    ));
    Harness {
        orders,
        notifier,
        payments,
    }
}

fn seed_menu(catalog: &CatalogService, restaurant_id: &str) {
    catalog.replace_menu(
        restaurant_id,
        vec![MenuItem {
            id: "burger".to_string(),
            restaurant_id: restaurant_id.to_string(),
            name: "Burger".to_string(),
            unit_price: 500,
            available: true,
            modifiers: vec![Modifier {
                id: "cheese".to_string(),
                name: "Extra cheese".to_string(),
                price_delta: 100,
            }],
        }],
    );
}

fn ctx_with_scopes(restaurant_id: &str, scopes: &[&str]) -> TenantContext {
    let actor = CurrentActor {
        id: format!("actor-{restaurant_id}"),
        name: "Test Actor".to_string(),
        role: "staff".to_string(),
        scopes: scopes.iter().map(|s| s.to_string()).collect(),
        restaurants: vec![restaurant_id.to_string()],
    };
    resolve_tenant(actor, Some(restaurant_id)).unwrap()
}

fn ctx(restaurant_id: &str) -> TenantContext {
    ctx_with_scopes(restaurant_id, &["orders:*"])
}

fn pos_submission() -> OrderSubmission {
    OrderSubmission {
        channel: Channel::Pos,
        table: Some("T7".to_string()),
        customer_name: None,
        items: vec![LineItemInput {
            menu_item_id: "burger".to_string(),
            quantity: 2,
            modifier_ids: vec!["cheese".to_string()],
            special_instructions: None,
        }],
        subtotal: 1100,
        tax: 88,
        tip: 0,
        total: 1188,
    }
}

fn kiosk_submission() -> OrderSubmission {
    OrderSubmission {
        customer_name: Some("Dana".to_string()),
        table: None,
        channel: Channel::Kiosk,
        ..pos_submission()
    }
}

fn transition(to: OrderStatus) -> TransitionRequest {
    TransitionRequest {
        to,
        reason: None,
        payment_reference: None,
    }
}

#[tokio::test]
async fn test_full_pos_lifecycle() {
    let h = harness();
    let ctx = ctx("rest-1");
    let mut rx = h.notifier.subscribe("rest-1");

    let record = h.orders.submit_order(&ctx, pos_submission()).await.unwrap();
    assert_eq!(record.status, OrderStatus::Pending);
    assert_eq!(record.version, 1);
    assert!(record.order_number.starts_with("ORD"));

    let walk = [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ];
    let mut version = record.version;
    for to in walk {
        let updated = h
            .orders
            .apply_transition(&ctx, &record.id, version, transition(to))
            .await
            .unwrap();
        assert_eq!(updated.status, to);
        assert_eq!(updated.version, version + 1);
        version = updated.version;
    }

    // Events arrive in commit order: creation + four transitions
    let created = rx.recv().await.unwrap();
    assert_eq!(created.from_status, None);
    assert_eq!(created.to_status, OrderStatus::Pending);
    for to in walk {
        let event = rx.recv().await.unwrap();
        assert_eq!(event.order_id, record.id);
        assert_eq!(event.to_status, to);
    }

    // Completed orders leave the active boards
    assert!(h.orders.list_active(&ctx, None).unwrap().is_empty());
}

#[tokio::test]
async fn test_money_round_trip() {
    // {item qty 2 @ 500, modifier +100} -> subtotal 1100; +tax 88 +tip 0 = 1188
    let h = harness();
    let ctx = ctx("rest-1");

    let record = h.orders.submit_order(&ctx, pos_submission()).await.unwrap();
    let stored = h.orders.get_order(&ctx, &record.id).unwrap();
    assert_eq!(stored.subtotal, 1100);
    assert_eq!(stored.tax, 88);
    assert_eq!(stored.tip, 0);
    assert_eq!(stored.total, 1188);
    assert_eq!(stored.items[0].unit_price, 500);
    assert_eq!(stored.items[0].line_total, 1100);
    assert_eq!(stored.total, stored.subtotal + stored.tax + stored.tip);
}

#[tokio::test]
async fn test_mismatched_total_not_persisted() {
    let h = harness();
    let ctx = ctx("rest-1");

    let mut submission = pos_submission();
    submission.items[0].modifier_ids.clear();
    submission.subtotal = 1000;
    submission.tax = 80;
    submission.total = 1200;

    let err = h.orders.submit_order(&ctx, submission).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    let fields = err.details.as_ref().unwrap().get("fields").unwrap();
    assert!(
        fields
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f["field"] == "total")
    );

    assert!(h.orders.list_active(&ctx, None).unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_transition_has_one_winner() {
    let h = harness();
    let ctx = ctx("rest-1");

    let record = h.orders.submit_order(&ctx, pos_submission()).await.unwrap();
    let confirmed = h
        .orders
        .apply_transition(&ctx, &record.id, 1, transition(OrderStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(confirmed.version, 2);

    // Two stations race confirmed -> preparing at the same version
    let (a, b) = tokio::join!(
        h.orders
            .apply_transition(&ctx, &record.id, 2, transition(OrderStatus::Preparing)),
        h.orders
            .apply_transition(&ctx, &record.id, 2, transition(OrderStatus::Preparing)),
    );

    let (winner, loser) = match (a, b) {
        (Ok(w), Err(l)) => (w, l),
        (Err(l), Ok(w)) => (w, l),
        other => panic!("expected exactly one winner, got {other:?}"),
    };
    assert_eq!(winner.status, OrderStatus::Preparing);
    assert_eq!(winner.version, 3);
    assert_eq!(loser.code, ErrorCode::ConcurrentModification);
}

#[tokio::test]
async fn test_replay_same_version_fails_second_time() {
    let h = harness();
    let ctx = ctx("rest-1");

    let record = h.orders.submit_order(&ctx, pos_submission()).await.unwrap();
    h.orders
        .apply_transition(&ctx, &record.id, 1, transition(OrderStatus::Confirmed))
        .await
        .unwrap();

    let err = h
        .orders
        .apply_transition(&ctx, &record.id, 1, transition(OrderStatus::Confirmed))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ConcurrentModification);
}

#[tokio::test]
async fn test_backwards_transition_rejected() {
    let h = harness();
    let ctx = ctx("rest-1");

    let record = h.orders.submit_order(&ctx, pos_submission()).await.unwrap();
    let mut version = 1;
    for to in [OrderStatus::Confirmed, OrderStatus::Preparing, OrderStatus::Ready] {
        version = h
            .orders
            .apply_transition(&ctx, &record.id, version, transition(to))
            .await
            .unwrap()
            .version;
    }

    let err = h
        .orders
        .apply_transition(&ctx, &record.id, version, transition(OrderStatus::Preparing))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    let stored = h.orders.get_order(&ctx, &record.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Ready);
    assert_eq!(stored.version, version);
}

#[tokio::test]
async fn test_cancellation_requires_reason() {
    let h = harness();
    let ctx = ctx("rest-1");

    let record = h.orders.submit_order(&ctx, pos_submission()).await.unwrap();
    let mut version = 1;
    for to in [OrderStatus::Confirmed, OrderStatus::Preparing] {
        version = h
            .orders
            .apply_transition(&ctx, &record.id, version, transition(to))
            .await
            .unwrap()
            .version;
    }

    let err = h
        .orders
        .apply_transition(&ctx, &record.id, version, transition(OrderStatus::Cancelled))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    let fields = err.details.as_ref().unwrap().get("fields").unwrap();
    assert_eq!(fields[0]["field"], "reason");

    let stored = h.orders.get_order(&ctx, &record.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Preparing);

    // With a reason the cancellation goes through
    let cancelled = h
        .orders
        .apply_transition(
            &ctx,
            &record.id,
            version,
            TransitionRequest {
                to: OrderStatus::Cancelled,
                reason: Some("kitchen out of stock".to_string()),
                payment_reference: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.reason.as_deref(), Some("kitchen out of stock"));
}

#[tokio::test]
async fn test_terminal_order_is_immutable() {
    let h = harness();
    let ctx = ctx("rest-1");

    let record = h.orders.submit_order(&ctx, pos_submission()).await.unwrap();
    let cancelled = h
        .orders
        .apply_transition(
            &ctx,
            &record.id,
            1,
            TransitionRequest {
                to: OrderStatus::Cancelled,
                reason: Some("customer left".to_string()),
                payment_reference: None,
            },
        )
        .await
        .unwrap();

    let err = h
        .orders
        .apply_transition(
            &ctx,
            &record.id,
            cancelled.version,
            transition(OrderStatus::Confirmed),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_kiosk_requires_payment_authorization() {
    let h = harness();
    let ctx = ctx("rest-1");

    let record = h.orders.submit_order(&ctx, kiosk_submission()).await.unwrap();

    // No reference at all
    let err = h
        .orders
        .apply_transition(&ctx, &record.id, 1, transition(OrderStatus::Confirmed))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PaymentNotAuthorized);

    // Approved reference confirms
    h.payments.approve("auth-ok");
    let confirmed = h
        .orders
        .apply_transition(
            &ctx,
            &record.id,
            1,
            TransitionRequest {
                to: OrderStatus::Confirmed,
                reason: None,
                payment_reference: Some("auth-ok".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_declined_payment_fails_order() {
    let h = harness();
    let ctx = ctx("rest-1");

    let record = h.orders.submit_order(&ctx, kiosk_submission()).await.unwrap();
    let err = h
        .orders
        .apply_transition(
            &ctx,
            &record.id,
            1,
            TransitionRequest {
                to: OrderStatus::Confirmed,
                reason: None,
                payment_reference: Some("auth-declined".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PaymentNotAuthorized);

    let stored = h.orders.get_order(&ctx, &record.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Failed);
    assert!(stored.reason.is_some());
}

#[tokio::test]
async fn test_pos_confirms_without_payment() {
    let h = harness();
    let ctx = ctx("rest-1");

    let record = h.orders.submit_order(&ctx, pos_submission()).await.unwrap();
    let confirmed = h
        .orders
        .apply_transition(&ctx, &record.id, 1, transition(OrderStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_tenant_isolation_reads_and_writes() {
    let h = harness();
    let ctx_a = ctx("rest-1");
    let ctx_b = ctx("rest-2");

    let record = h.orders.submit_order(&ctx_a, pos_submission()).await.unwrap();

    // Foreign tenant cannot read, and cannot learn the order exists
    let err = h.orders.get_order(&ctx_b, &record.id).unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);

    // Foreign tenant cannot transition
    let err = h
        .orders
        .apply_transition(&ctx_b, &record.id, 1, transition(OrderStatus::Confirmed))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);

    // And the stored order is untouched
    let stored = h.orders.get_order(&ctx_a, &record.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn test_tenant_isolation_of_events() {
    let h = harness();
    let ctx_a = ctx("rest-1");
    let ctx_b = ctx("rest-2");

    let mut rx_b = h.notifier.subscribe("rest-2");

    // Activity in rest-1 only
    let record = h.orders.submit_order(&ctx_a, pos_submission()).await.unwrap();
    h.orders
        .apply_transition(&ctx_a, &record.id, 1, transition(OrderStatus::Confirmed))
        .await
        .unwrap();

    assert!(rx_b.try_recv().is_err());

    // rest-2 still receives its own events
    let record_b = h.orders.submit_order(&ctx_b, pos_submission()).await.unwrap();
    let event = rx_b.recv().await.unwrap();
    assert_eq!(event.restaurant_id, "rest-2");
    assert_eq!(event.order_id, record_b.id);
}

#[tokio::test]
async fn test_scope_guards_per_station() {
    let h = harness();
    let submit_ctx = ctx_with_scopes("rest-1", &["orders:submit"]);
    let kitchen_ctx = ctx_with_scopes("rest-1", &["orders:kitchen"]);
    let expo_ctx = ctx_with_scopes("rest-1", &["orders:expo"]);

    let record = h
        .orders
        .submit_order(&submit_ctx, pos_submission())
        .await
        .unwrap();
    h.orders
        .apply_transition(&submit_ctx, &record.id, 1, transition(OrderStatus::Confirmed))
        .await
        .unwrap();

    // The expo station cannot acknowledge for the kitchen
    let err = h
        .orders
        .apply_transition(&expo_ctx, &record.id, 2, transition(OrderStatus::Preparing))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ScopeRequired);

    h.orders
        .apply_transition(&kitchen_ctx, &record.id, 2, transition(OrderStatus::Preparing))
        .await
        .unwrap();
    h.orders
        .apply_transition(&kitchen_ctx, &record.id, 3, transition(OrderStatus::Ready))
        .await
        .unwrap();

    // And the kitchen cannot complete for the expo
    let err = h
        .orders
        .apply_transition(&kitchen_ctx, &record.id, 4, transition(OrderStatus::Completed))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ScopeRequired);

    h.orders
        .apply_transition(&expo_ctx, &record.id, 4, transition(OrderStatus::Completed))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_stale_pending_orders_expire_to_failed() {
    let h = harness();
    let ctx = ctx("rest-1");

    let record = h.orders.submit_order(&ctx, kiosk_submission()).await.unwrap();

    // Let the clock advance past created_at, then sweep with timeout 0:
    // everything pending is stale
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let failed = h.orders.fail_stale_pending(0).unwrap();
    assert_eq!(failed, 1);

    let stored = h.orders.get_order(&ctx, &record.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Failed);
    assert_eq!(stored.reason.as_deref(), Some("Confirmation timeout"));

    // Sweep is idempotent: failed orders are off the active index
    assert_eq!(h.orders.fail_stale_pending(0).unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_menu_item_rejected() {
    let h = harness();
    let ctx = ctx("rest-1");

    let mut submission = pos_submission();
    submission.items[0].menu_item_id = "ghost".to_string();
    submission.items[0].modifier_ids.clear();

    let err = h.orders.submit_order(&ctx, submission).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}
