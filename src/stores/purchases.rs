use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::errors::StoreError;
use crate::events::{Event, EventSender};
use crate::mock;
use crate::models::{
    NewPurchase, NewSearchQuery, Purchase, PurchaseStatus, SearchQuery, SearchQueryPatch,
    SearchQueryStatus,
};

#[derive(Debug)]
struct PurchasesState {
    purchases: Vec<Purchase>,
    search_queries: Vec<SearchQuery>,
}

impl Default for PurchasesState {
    fn default() -> Self {
        Self {
            purchases: mock::seed_purchases(),
            search_queries: mock::seed_search_queries(),
        }
    }
}

/// Store for the buying side: recorded purchases and the saved sourcing
/// searches that feed the deal backlog.
#[derive(Clone)]
pub struct PurchaseStore {
    state: Arc<RwLock<PurchasesState>>,
    events: EventSender,
}

impl PurchaseStore {
    pub fn new(events: EventSender) -> Self {
        Self {
            state: Arc::new(RwLock::new(PurchasesState::default())),
            events,
        }
    }

    /// Records a purchase under a generated id and purchase timestamp.
    #[instrument(skip(self, new))]
    pub async fn add_purchase(&self, new: NewPurchase) -> Result<Purchase, StoreError> {
        new.validate()?;
        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            deal_id: new.deal_id,
            title: new.title,
            price: new.price,
            seller: new.seller,
            status: new.status,
            purchased_at: Utc::now(),
            expected_delivery: new.expected_delivery,
            tracking_number: None,
        };
        let mut state = self.state.write().await;
        state.purchases.push(purchase.clone());
        Ok(purchase)
    }

    /// Moves a purchase along, optionally attaching a tracking number.
    /// Unknown ids are a no-op.
    pub async fn update_purchase_status(
        &self,
        id: &str,
        status: PurchaseStatus,
        tracking_number: Option<String>,
    ) -> Option<Purchase> {
        let updated = {
            let mut state = self.state.write().await;
            let purchase = state.purchases.iter_mut().find(|p| p.id == id)?;
            purchase.status = status;
            if tracking_number.is_some() {
                purchase.tracking_number = tracking_number;
            }
            purchase.clone()
        };
        let _ = self
            .events
            .send(Event::PurchaseStatusChanged {
                purchase_id: updated.id.clone(),
                new_status: status,
            })
            .await;
        Some(updated)
    }

    pub async fn purchases(&self) -> Vec<Purchase> {
        self.state.read().await.purchases.clone()
    }

    /// Purchases still somewhere between approval and delivery.
    pub async fn active_purchases(&self) -> Vec<Purchase> {
        self.state
            .read()
            .await
            .purchases
            .iter()
            .filter(|p| {
                matches!(
                    p.status,
                    PurchaseStatus::PendingPurchase
                        | PurchaseStatus::Purchased
                        | PurchaseStatus::Shipped
                )
            })
            .cloned()
            .collect()
    }

    /// Saves a sourcing search. New queries start active with no results.
    #[instrument(skip(self, new))]
    pub async fn add_query(&self, new: NewSearchQuery) -> Result<SearchQuery, StoreError> {
        new.validate()?;
        let query = SearchQuery {
            id: Uuid::new_v4().to_string(),
            query: new.query,
            category: new.category,
            max_price: new.max_price,
            status: SearchQueryStatus::Active,
            last_checked: Utc::now(),
            results_found: 0,
        };
        let mut state = self.state.write().await;
        state.search_queries.push(query.clone());
        Ok(query)
    }

    /// Shallow-merges the patch into a search query. An unknown id is a
    /// no-op.
    pub async fn update_query(&self, id: &str, patch: SearchQueryPatch) -> Option<SearchQuery> {
        let mut state = self.state.write().await;
        let query = state.search_queries.iter_mut().find(|q| q.id == id)?;
        patch.apply(query);
        Some(query.clone())
    }

    /// Removes a search query by id. Removing an absent id is a no-op.
    pub async fn remove_query(&self, id: &str) {
        let mut state = self.state.write().await;
        state.search_queries.retain(|q| q.id != id);
    }

    pub async fn search_queries(&self) -> Vec<SearchQuery> {
        self.state.read().await.search_queries.clone()
    }

    pub async fn active_queries(&self) -> Vec<SearchQuery> {
        self.state
            .read()
            .await
            .search_queries
            .iter()
            .filter(|q| q.status == SearchQueryStatus::Active)
            .cloned()
            .collect()
    }
}
