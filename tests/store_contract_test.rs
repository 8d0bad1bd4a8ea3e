//! End-to-end tests for the store layer contract:
//! - cross-store deal approval
//! - settings persistence and theme side effect
//! - toast expiry timeline
//! - concurrent fetch behavior

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use test_case::test_case;
use tokio::time::sleep;

use flipdesk::prelude::*;

fn app() -> AppState {
    AppState::new(StoreConfig::default())
}

// ==================== Cross-store approval ====================

#[tokio::test]
async fn approving_a_deal_records_exactly_one_purchase() {
    let app = app();
    let before = app.purchases.purchases().await.len();

    let approval = approve_deal(&app, "3").await.expect("deal 3 is seeded");

    assert_eq!(approval.deal.id, "3");
    assert_eq!(approval.deal.status, DealStatus::Approved);
    assert_eq!(approval.purchase.deal_id, "3");
    assert_eq!(approval.purchase.price, dec!(12.00));
    assert_eq!(approval.purchase.seller, "vintage_collector");
    assert_eq!(approval.purchase.status, PurchaseStatus::PendingPurchase);

    let purchases = app.purchases.purchases().await;
    assert_eq!(purchases.len(), before + 1);
    assert_eq!(
        app.deals.get("3").await.unwrap().status,
        DealStatus::Approved
    );
}

#[tokio::test]
async fn approving_an_unknown_deal_mutates_nothing() {
    let app = app();
    let deals_before = app.deals.deals().await;
    let purchases_before = app.purchases.purchases().await;

    let result = approve_deal(&app, "no-such-deal").await;
    assert_matches!(result, Err(StoreError::NotFound(_)));

    assert_eq!(app.deals.deals().await, deals_before);
    assert_eq!(app.purchases.purchases().await, purchases_before);
}

#[tokio::test]
async fn rejected_deals_leave_the_pending_queue() {
    let app = app();
    let rejected = reject_deal(&app, "1").await.unwrap();
    assert_eq!(rejected.status, DealStatus::Rejected);
    assert_eq!(app.deals.pending_deals().await.len(), 1);
}

#[tokio::test]
async fn approval_surfaces_a_toast_through_the_event_channel() {
    let app = app();
    approve_deal(&app, "2").await.unwrap();

    // The event processor runs on its own task; give it a beat.
    sleep(Duration::from_millis(50)).await;

    let active = app.toasts.active().await;
    assert!(
        active
            .iter()
            .any(|t| t.kind == ToastKind::Success && t.title == "Deal approved"),
        "expected an approval toast, got {:?}",
        active
    );
}

// ==================== Settings persistence ====================

#[tokio::test]
async fn dark_mode_round_trips_through_the_preference_backend() {
    let prefs = Arc::new(InMemoryPreferences::new());
    let app = AppState::with_preferences(StoreConfig::default(), prefs.clone());

    app.settings.set_dark_mode(true).await;
    assert_eq!(
        prefs.get("darkMode").await.unwrap().as_deref(),
        Some("true")
    );
    assert!(app.settings.theme().is_dark());

    app.settings.set_dark_mode(false).await;
    assert_eq!(
        prefs.get("darkMode").await.unwrap().as_deref(),
        Some("false")
    );
    assert!(!app.settings.theme().is_dark());
}

#[tokio::test]
async fn a_fresh_process_hydrates_the_persisted_preferences() {
    let prefs = Arc::new(InMemoryPreferences::new());
    {
        let app = AppState::with_preferences(StoreConfig::default(), prefs.clone());
        app.settings.set_dark_mode(true).await;
        app.settings.set_sidebar_collapsed(true).await;
    }

    // Same backend, new state tree: the startup hydration applies both
    // preferences.
    let app = AppState::with_preferences(StoreConfig::default(), prefs);
    app.initialize().await;
    let settings = app.settings.settings().await;
    assert!(settings.dark_mode);
    assert!(settings.sidebar_collapsed);
    assert!(app.settings.theme().is_dark());
}

// ==================== Toast timeline ====================

#[tokio::test(start_paused = true)]
async fn toast_default_duration_and_expiry() {
    let app = app();
    let toast = app.toasts.success("Saved", None).await;
    assert_eq!(toast.duration_ms, 5_000);

    sleep(Duration::from_millis(4_900)).await;
    assert_eq!(app.toasts.active().await.len(), 1);

    sleep(Duration::from_millis(200)).await;
    assert!(app.toasts.active().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn removing_a_toast_early_defuses_its_expiry() {
    let app = app();
    let doomed = app.toasts.success("Saved", None).await;
    let survivor = app
        .toasts
        .show(NewToast::new(ToastKind::Info, "Sticky").duration_ms(-1))
        .await;

    sleep(Duration::from_millis(2_000)).await;
    app.toasts.remove(&doomed.id).await;

    // Past the original 5s mark: nothing fires, nothing double-removes.
    sleep(Duration::from_millis(4_000)).await;
    let active = app.toasts.active().await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, survivor.id);
}

#[test_case(ToastKind::Success; "success wrapper")]
#[test_case(ToastKind::Error; "error wrapper")]
#[test_case(ToastKind::Warning; "warning wrapper")]
#[test_case(ToastKind::Info; "info wrapper")]
#[tokio::test]
async fn convenience_wrappers_fix_the_kind(kind: ToastKind) {
    let app = app();
    let toast = match kind {
        ToastKind::Success => app.toasts.success("t", None).await,
        ToastKind::Error => app.toasts.error("t", None).await,
        ToastKind::Warning => app.toasts.warning("t", None).await,
        ToastKind::Info => app.toasts.info("t", None).await,
    };
    assert_eq!(toast.kind, kind);
    assert_eq!(toast.duration_ms, 5_000);
}

// ==================== Concurrent fetches ====================

#[tokio::test(start_paused = true)]
async fn navigation_style_parallel_fetches_all_land() {
    let app = app();
    let (items, deals, orders, shipments, listings) = futures::join!(
        app.items.fetch_all(),
        app.deals.fetch_all(),
        app.orders.fetch_all(),
        app.shipments.fetch_all(),
        app.listings.fetch_all(),
    );
    assert_eq!(items.unwrap().len(), 50);
    assert_eq!(deals.unwrap().len(), 25);
    assert_eq!(orders.unwrap().len(), 20);
    assert_eq!(shipments.unwrap().len(), 15);
    assert_eq!(listings.unwrap().len(), 15);

    assert!(!app.items.is_loading().await);
    assert!(!app.shipments.is_loading().await);
}

#[tokio::test(start_paused = true)]
async fn label_print_flow_toasts_on_completion() {
    let app = app();
    let shipment = app.shipments.print_label("order-7", None).await.unwrap();
    assert_eq!(shipment.status, ShipmentStatus::Printing);

    sleep(Duration::from_millis(2_100)).await;

    let printed = app.shipments.get(&shipment.id).await.unwrap();
    assert_eq!(printed.status, ShipmentStatus::Printed);

    let active = app.toasts.active().await;
    assert!(
        active.iter().any(|t| t.title == "Label printed"),
        "expected a print toast, got {:?}",
        active
    );
}
