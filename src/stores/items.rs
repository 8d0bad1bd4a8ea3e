use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::events::{Event, EventSender};
use crate::mock;
use crate::models::{Condition, Item, ItemPatch, ItemStatus, NewItem, Source};

/// Active filter set for the inventory table. Inactive slots (empty search,
/// `None` fields) match everything; active slots are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilters {
    pub search: String,
    pub condition: Option<Condition>,
    pub source: Option<Source>,
    pub status: Option<ItemStatus>,
    pub brand: Option<String>,
    pub location: Option<String>,
}

impl ItemFilters {
    fn matches(&self, item: &Item) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let hit = item.title.to_lowercase().contains(&needle)
                || item.sku.to_lowercase().contains(&needle)
                || item
                    .brand
                    .as_deref()
                    .is_some_and(|brand| brand.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(condition) = self.condition {
            if item.condition != condition {
                return false;
            }
        }
        if let Some(source) = self.source {
            if item.source != source {
                return false;
            }
        }
        if let Some(status) = self.status {
            if item.status != status {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            if item.brand.as_deref() != Some(brand.as_str()) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if item.location.as_deref() != Some(location.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Partial filter update; `None` leaves a slot untouched, `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct ItemFilterPatch {
    pub search: Option<String>,
    pub condition: Option<Option<Condition>>,
    pub source: Option<Option<Source>>,
    pub status: Option<Option<ItemStatus>>,
    pub brand: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

#[derive(Debug, Default)]
struct ItemsState {
    items: Vec<Item>,
    loading: bool,
    error: Option<String>,
    filters: ItemFilters,
    selected: Vec<String>,
}

/// Store for owned inventory items.
#[derive(Clone)]
pub struct ItemStore {
    state: Arc<RwLock<ItemsState>>,
    events: EventSender,
    fetch_latency: Duration,
}

impl ItemStore {
    pub fn new(config: &StoreConfig, events: EventSender) -> Self {
        Self {
            state: Arc::new(RwLock::new(ItemsState::default())),
            events,
            fetch_latency: Duration::from_millis(config.latency.items_fetch_ms),
        }
    }

    /// Replaces the collection with a fresh sample set after a simulated
    /// round-trip. Concurrent calls are not serialized: whichever commit
    /// lands last wins.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Item>, StoreError> {
        self.fetch_after(self.fetch_latency).await
    }

    async fn fetch_after(&self, latency: Duration) -> Result<Vec<Item>, StoreError> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }
        sleep(latency).await;
        let items = mock::mock_items(mock::ITEM_SAMPLE_SIZE);
        let mut state = self.state.write().await;
        state.items = items.clone();
        state.loading = false;
        info!(count = items.len(), "items refreshed");
        Ok(items)
    }

    /// Appends a new item under a generated id and creation timestamp.
    #[instrument(skip(self, new))]
    pub async fn create(&self, new: NewItem) -> Result<Item, StoreError> {
        if let Err(err) = new.validate() {
            let mut state = self.state.write().await;
            state.error = Some(err.to_string());
            return Err(err.into());
        }
        let item = Item {
            id: Uuid::new_v4().to_string(),
            sku: new.sku,
            title: new.title,
            brand: new.brand,
            model: new.model,
            storage_gb: new.storage_gb,
            condition: new.condition,
            source: new.source,
            buy_price: new.buy_price,
            ask_price: new.ask_price,
            est_resale: new.est_resale,
            channels: new.channels,
            location: new.location,
            status: new.status,
            serial: new.serial,
            photos: new.photos,
            created_at: Utc::now(),
            listed_at: new.listed_at,
            notes: new.notes,
        };
        {
            let mut state = self.state.write().await;
            state.items.push(item.clone());
        }
        let _ = self
            .events
            .send(Event::ItemCreated {
                item_id: item.id.clone(),
            })
            .await;
        Ok(item)
    }

    /// Shallow-merges the patch into the record. An unknown id is a no-op.
    pub async fn update(&self, id: &str, patch: ItemPatch) -> Option<Item> {
        let updated = {
            let mut state = self.state.write().await;
            let item = state.items.iter_mut().find(|item| item.id == id)?;
            patch.apply(item);
            item.clone()
        };
        let _ = self
            .events
            .send(Event::ItemUpdated {
                item_id: updated.id.clone(),
            })
            .await;
        Some(updated)
    }

    /// Removes by id. Removing an absent id is a no-op.
    pub async fn remove(&self, id: &str) {
        let removed = {
            let mut state = self.state.write().await;
            let before = state.items.len();
            state.items.retain(|item| item.id != id);
            state.items.len() < before
        };
        if removed {
            let _ = self
                .events
                .send(Event::ItemRemoved {
                    item_id: id.to_string(),
                })
                .await;
        } else {
            debug!(%id, "remove for unknown item ignored");
        }
    }

    /// Shallow-merges the patch into the filter state. Does not fetch.
    pub async fn set_filters(&self, patch: ItemFilterPatch) {
        let mut state = self.state.write().await;
        if let Some(search) = patch.search {
            state.filters.search = search;
        }
        if let Some(condition) = patch.condition {
            state.filters.condition = condition;
        }
        if let Some(source) = patch.source {
            state.filters.source = source;
        }
        if let Some(status) = patch.status {
            state.filters.status = status;
        }
        if let Some(brand) = patch.brand {
            state.filters.brand = brand;
        }
        if let Some(location) = patch.location {
            state.filters.location = location;
        }
    }

    /// The collection narrowed by the current search and filters.
    pub async fn filtered(&self) -> Vec<Item> {
        let state = self.state.read().await;
        state
            .items
            .iter()
            .filter(|item| state.filters.matches(item))
            .cloned()
            .collect()
    }

    pub async fn items(&self) -> Vec<Item> {
        self.state.read().await.items.clone()
    }

    pub async fn item_by_id(&self, id: &str) -> Option<Item> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn select(&self, ids: Vec<String>) {
        self.state.write().await.selected = ids;
    }

    pub async fn toggle_selection(&self, id: &str) {
        let mut state = self.state.write().await;
        if let Some(position) = state.selected.iter().position(|s| s == id) {
            state.selected.remove(position);
        } else {
            state.selected.push(id.to_string());
        }
    }

    /// Records for the currently selected ids, in collection order.
    pub async fn selected_items(&self) -> Vec<Item> {
        let state = self.state.read().await;
        state
            .items
            .iter()
            .filter(|item| state.selected.contains(&item.id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use tokio::sync::mpsc;

    fn store() -> ItemStore {
        let (tx, _rx) = mpsc::channel(16);
        ItemStore::new(&StoreConfig::default(), EventSender::new(tx))
    }

    fn new_item(sku: &str, title: &str) -> NewItem {
        NewItem {
            sku: sku.to_string(),
            title: title.to_string(),
            brand: Some("Apple".to_string()),
            model: None,
            storage_gb: None,
            condition: Condition::Good,
            source: Source::Vinted,
            buy_price: dec!(120),
            ask_price: Some(dec!(180)),
            est_resale: Some(dec!(200)),
            channels: vec![],
            location: Some("A1-B2".to_string()),
            status: ItemStatus::InStock,
            serial: None,
            photos: vec![],
            listed_at: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn created_ids_are_unique_even_after_deletion() {
        let store = store();
        let mut seen = HashSet::new();
        for i in 0..20 {
            let item = store
                .create(new_item(&format!("SKU{:04}", i), "iPhone 13"))
                .await
                .unwrap();
            assert!(seen.insert(item.id.clone()), "id reused: {}", item.id);
            if i % 2 == 0 {
                store.remove(&item.id).await;
            }
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_sku_and_records_error() {
        let store = store();
        let err = store.create(new_item("", "iPhone 13")).await.unwrap_err();
        assert!(matches!(err, StoreError::ValidationError(_)));
        assert!(store.error().await.is_some());
        assert_eq!(store.items().await.len(), 0);
    }

    #[tokio::test]
    async fn empty_patch_is_a_no_op() {
        let store = store();
        let created = store.create(new_item("SKU0001", "iPhone 13")).await.unwrap();
        let updated = store
            .update(&created.id, ItemPatch::default())
            .await
            .unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn updating_unknown_id_leaves_collection_unchanged() {
        let store = store();
        store.create(new_item("SKU0001", "iPhone 13")).await.unwrap();
        let before = store.items().await;
        let result = store
            .update(
                "no-such-id",
                ItemPatch {
                    title: Some("changed".to_string()),
                    ..ItemPatch::default()
                },
            )
            .await;
        assert!(result.is_none());
        assert_eq!(store.items().await, before);
    }

    #[tokio::test]
    async fn patch_can_set_and_clear_optional_fields() {
        let store = store();
        let created = store.create(new_item("SKU0001", "iPhone 13")).await.unwrap();
        let updated = store
            .update(
                &created.id,
                ItemPatch {
                    status: Some(ItemStatus::Listed),
                    notes: Some(Some("boxed".to_string())),
                    brand: Some(None),
                    ..ItemPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ItemStatus::Listed);
        assert_eq!(updated.notes.as_deref(), Some("boxed"));
        assert_eq!(updated.brand, None);
        assert_eq!(updated.sku, created.sku);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = store();
        let created = store.create(new_item("SKU0001", "iPhone 13")).await.unwrap();
        store.remove(&created.id).await;
        assert_eq!(store.items().await.len(), 0);
        store.remove(&created.id).await;
        assert_eq!(store.items().await.len(), 0);
    }

    #[tokio::test]
    async fn no_active_filters_returns_collection_in_order() {
        let store = store();
        let a = store.create(new_item("SKU0001", "iPhone 13")).await.unwrap();
        let b = store.create(new_item("SKU0002", "Pixel 6")).await.unwrap();
        assert_eq!(store.filtered().await, vec![a, b]);
    }

    #[tokio::test]
    async fn active_filters_are_anded_and_commutative() {
        let store = store();
        let listed_apple = store
            .create(NewItem {
                status: ItemStatus::Listed,
                ..new_item("SKU0001", "iPhone 13")
            })
            .await
            .unwrap();
        store
            .create(NewItem {
                status: ItemStatus::Listed,
                brand: Some("Samsung".to_string()),
                ..new_item("SKU0002", "Galaxy S21")
            })
            .await
            .unwrap();
        store.create(new_item("SKU0003", "Pixel 6")).await.unwrap();

        // Status alone selects the two listed items.
        store
            .set_filters(ItemFilterPatch {
                status: Some(Some(ItemStatus::Listed)),
                ..ItemFilterPatch::default()
            })
            .await;
        assert_eq!(store.filtered().await.len(), 2);

        // Adding the brand filter narrows to the intersection.
        store
            .set_filters(ItemFilterPatch {
                brand: Some(Some("Apple".to_string())),
                ..ItemFilterPatch::default()
            })
            .await;
        assert_eq!(store.filtered().await, vec![listed_apple.clone()]);

        // Same two filters applied in the opposite order give the same set.
        let store2 = self::store();
        store2
            .create(NewItem {
                status: ItemStatus::Listed,
                ..new_item("SKU0001", "iPhone 13")
            })
            .await
            .unwrap();
        store2
            .set_filters(ItemFilterPatch {
                brand: Some(Some("Apple".to_string())),
                ..ItemFilterPatch::default()
            })
            .await;
        store2
            .set_filters(ItemFilterPatch {
                status: Some(Some(ItemStatus::Listed)),
                ..ItemFilterPatch::default()
            })
            .await;
        let narrowed2 = store2.filtered().await;
        assert_eq!(narrowed2.len(), 1);
        assert_eq!(narrowed2[0].sku, listed_apple.sku);
    }

    #[tokio::test]
    async fn search_matches_title_sku_and_brand_case_insensitively() {
        let store = store();
        store.create(new_item("SKU0001", "iPhone 13")).await.unwrap();
        store
            .create(NewItem {
                brand: Some("Samsung".to_string()),
                ..new_item("SKU0002", "Galaxy S21")
            })
            .await
            .unwrap();

        store
            .set_filters(ItemFilterPatch {
                search: Some("IPHONE".to_string()),
                ..ItemFilterPatch::default()
            })
            .await;
        assert_eq!(store.filtered().await.len(), 1);

        store
            .set_filters(ItemFilterPatch {
                search: Some("samsung".to_string()),
                ..ItemFilterPatch::default()
            })
            .await;
        assert_eq!(store.filtered().await.len(), 1);

        store
            .set_filters(ItemFilterPatch {
                search: Some(String::new()),
                ..ItemFilterPatch::default()
            })
            .await;
        assert_eq!(store.filtered().await.len(), 2);
    }

    #[tokio::test]
    async fn toggle_selection_adds_then_removes() {
        let store = store();
        let item = store.create(new_item("SKU0001", "iPhone 13")).await.unwrap();
        store.toggle_selection(&item.id).await;
        assert_eq!(store.selected_items().await.len(), 1);
        store.toggle_selection(&item.id).await;
        assert!(store.selected_items().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_replaces_the_collection_wholesale() {
        let store = store();
        store.create(new_item("SKU9999", "Surface Pro")).await.unwrap();
        let fetched = store.fetch_all().await.unwrap();
        assert_eq!(fetched.len(), mock::ITEM_SAMPLE_SIZE);
        assert_eq!(store.items().await, fetched);
        assert!(!store.is_loading().await);
    }

    #[tokio::test(start_paused = true)]
    async fn racing_fetches_resolve_to_the_last_commit() {
        let store = store();
        // The slow fetch is issued first but commits second.
        let (slow, fast) = tokio::join!(
            store.fetch_after(Duration::from_millis(1_000)),
            store.fetch_after(Duration::from_millis(100)),
        );
        let slow = slow.unwrap();
        let fast = fast.unwrap();
        assert_eq!(store.items().await, slow);
        // Both resolved with full sample sets; only the later commit is kept.
        assert_eq!(fast.len(), mock::ITEM_SAMPLE_SIZE);
        assert!(!store.is_loading().await);
    }
}
