//! Property-based tests for the store layer invariants.
//!
//! These use proptest to exercise the contract over a wide range of
//! inputs: id uniqueness under arbitrary create/remove interleavings,
//! filter conjunction, and patch merges preserving unpatched fields.

use std::collections::HashSet;

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;

use flipdesk::config::StoreConfig;
use flipdesk::events::EventSender;
use flipdesk::models::{Condition, ItemPatch, ItemStatus, NewItem, Source};
use flipdesk::stores::{ItemFilterPatch, ItemStore};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
}

fn item_store() -> ItemStore {
    let (tx, _rx) = mpsc::channel(64);
    ItemStore::new(&StoreConfig::default(), EventSender::new(tx))
}

fn new_item(sku: &str, condition: Condition, status: ItemStatus) -> NewItem {
    NewItem {
        sku: sku.to_string(),
        title: format!("Item {}", sku),
        brand: None,
        model: None,
        storage_gb: None,
        condition,
        source: Source::Vinted,
        buy_price: dec!(100),
        ask_price: None,
        est_resale: None,
        channels: vec![],
        location: None,
        status,
        serial: None,
        photos: vec![],
        listed_at: None,
        notes: None,
    }
}

fn condition_strategy() -> impl Strategy<Value = Condition> {
    prop_oneof![
        Just(Condition::New),
        Just(Condition::LikeNew),
        Just(Condition::Good),
        Just(Condition::Fair),
        Just(Condition::ForParts),
    ]
}

fn status_strategy() -> impl Strategy<Value = ItemStatus> {
    prop_oneof![
        Just(ItemStatus::InStock),
        Just(ItemStatus::Listed),
        Just(ItemStatus::Allocated),
        Just(ItemStatus::Sold),
        Just(ItemStatus::Archived),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Ids handed out by create are unique for the lifetime of the
    /// collection, however creates and removes interleave.
    #[test]
    fn created_ids_are_never_reused(
        ops in proptest::collection::vec((any::<bool>(), "[a-z0-9]{1,6}"), 1..40)
    ) {
        runtime().block_on(async {
            let store = item_store();
            let mut seen = HashSet::new();
            let mut live: Vec<String> = Vec::new();

            for (remove_one, sku) in ops {
                if remove_one && !live.is_empty() {
                    let id = live.remove(0);
                    store.remove(&id).await;
                } else {
                    let item = store
                        .create(new_item(&sku, Condition::Good, ItemStatus::InStock))
                        .await
                        .expect("valid payload");
                    prop_assert!(seen.insert(item.id.clone()), "id reused: {}", item.id);
                    live.push(item.id);
                }
            }
            Ok(())
        })?;
    }

    /// A conjunction of filters returns exactly the intersection of the
    /// sets each filter selects on its own, regardless of order.
    #[test]
    fn filter_conjunction_is_an_order_independent_intersection(
        specs in proptest::collection::vec((condition_strategy(), status_strategy()), 1..30),
        wanted_condition in condition_strategy(),
        wanted_status in status_strategy(),
    ) {
        runtime().block_on(async {
            let store = item_store();
            for (i, (condition, status)) in specs.iter().enumerate() {
                store
                    .create(new_item(&format!("sku{}", i), *condition, *status))
                    .await
                    .expect("valid payload");
            }

            store
                .set_filters(ItemFilterPatch {
                    condition: Some(Some(wanted_condition)),
                    ..ItemFilterPatch::default()
                })
                .await;
            store
                .set_filters(ItemFilterPatch {
                    status: Some(Some(wanted_status)),
                    ..ItemFilterPatch::default()
                })
                .await;
            let both: Vec<String> = store.filtered().await.into_iter().map(|i| i.id).collect();

            // Recompute the two single-filter sets.
            store
                .set_filters(ItemFilterPatch {
                    status: Some(None),
                    ..ItemFilterPatch::default()
                })
                .await;
            let by_condition: HashSet<String> =
                store.filtered().await.into_iter().map(|i| i.id).collect();
            store
                .set_filters(ItemFilterPatch {
                    condition: Some(None),
                    status: Some(Some(wanted_status)),
                    ..ItemFilterPatch::default()
                })
                .await;
            let by_status: HashSet<String> =
                store.filtered().await.into_iter().map(|i| i.id).collect();

            let expected: HashSet<String> =
                by_condition.intersection(&by_status).cloned().collect();
            let got: HashSet<String> = both.iter().cloned().collect();
            prop_assert_eq!(got, expected);

            // Applying the same two filters in the opposite order selects
            // the same records.
            store
                .set_filters(ItemFilterPatch {
                    condition: Some(Some(wanted_condition)),
                    status: Some(None),
                    ..ItemFilterPatch::default()
                })
                .await;
            store
                .set_filters(ItemFilterPatch {
                    status: Some(Some(wanted_status)),
                    ..ItemFilterPatch::default()
                })
                .await;
            let reordered: Vec<String> =
                store.filtered().await.into_iter().map(|i| i.id).collect();
            prop_assert_eq!(both, reordered);
            Ok(())
        })?;
    }

    /// A patch only moves the fields it names.
    #[test]
    fn patches_preserve_unpatched_fields(
        title in proptest::option::of("[A-Za-z0-9 ]{1,20}"),
        notes in proptest::option::of("[A-Za-z0-9 ]{1,20}"),
        status in proptest::option::of(status_strategy()),
    ) {
        runtime().block_on(async {
            let store = item_store();
            let original = store
                .create(new_item("sku1", Condition::Good, ItemStatus::InStock))
                .await
                .expect("valid payload");

            let patch = ItemPatch {
                title: title.clone(),
                notes: notes.clone().map(Some),
                status,
                ..ItemPatch::default()
            };
            let updated = store.update(&original.id, patch).await.expect("known id");

            prop_assert_eq!(&updated.title, title.as_ref().unwrap_or(&original.title));
            prop_assert_eq!(
                updated.notes.as_deref(),
                notes.as_deref().or(original.notes.as_deref())
            );
            prop_assert_eq!(updated.status, status.unwrap_or(original.status));
            // Everything the patch never names is untouched.
            prop_assert_eq!(updated.id, original.id);
            prop_assert_eq!(updated.sku, original.sku);
            prop_assert_eq!(updated.buy_price, original.buy_price);
            prop_assert_eq!(updated.created_at, original.created_at);
            Ok(())
        })?;
    }
}

// ==================== Derived margin cases ====================

#[rstest]
#[case(dec!(100), dec!(150), dec!(50))]
#[case(dec!(12), dec!(20), dec!(66.67))]
#[case(dec!(50), dec!(50), dec!(0))]
#[case(dec!(200), dec!(150), dec!(-25))]
fn margin_is_always_recomputed(
    #[case] price: Decimal,
    #[case] est_resale: Decimal,
    #[case] expected_pct: Decimal,
) {
    let mut deal = flipdesk::mock::seed_discovered_deals().remove(0);
    deal.price = price;
    deal.est_resale = est_resale;
    assert_eq!(deal.margin_pct().round_dp(2), expected_pct);
}
