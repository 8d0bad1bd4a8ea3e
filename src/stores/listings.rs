use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::events::{Event, EventSender};
use crate::mock;
use crate::models::{Listing, ListingPatch, ListingStatus, NewListing};

#[derive(Debug, Default)]
struct ListingsState {
    /// Listings live on the marketplaces, refreshed by fetch.
    listings: Vec<Listing>,
    /// Locally authored drafts, never touched by fetch.
    drafts: Vec<Listing>,
    loading: bool,
    error: Option<String>,
}

/// Store for marketplace listings and local drafts.
#[derive(Clone)]
pub struct ListingStore {
    state: Arc<RwLock<ListingsState>>,
    events: EventSender,
    fetch_latency: Duration,
}

impl ListingStore {
    pub fn new(config: &StoreConfig, events: EventSender) -> Self {
        Self {
            state: Arc::new(RwLock::new(ListingsState::default())),
            events,
            fetch_latency: Duration::from_millis(config.latency.listings_fetch_ms),
        }
    }

    /// Replaces the fetched listings with a fresh sample set after a
    /// simulated round-trip. Drafts are untouched. Last commit wins under
    /// concurrent calls.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Listing>, StoreError> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }
        sleep(self.fetch_latency).await;
        let listings = mock::mock_listings(mock::LISTING_SAMPLE_SIZE);
        let mut state = self.state.write().await;
        state.listings = listings.clone();
        state.loading = false;
        info!(count = listings.len(), "listings refreshed");
        Ok(listings)
    }

    /// Saves a new draft under a generated id and creation timestamp.
    #[instrument(skip(self, new))]
    pub async fn save_draft(&self, new: NewListing) -> Result<Listing, StoreError> {
        if let Err(err) = new.validate() {
            let mut state = self.state.write().await;
            state.error = Some(err.to_string());
            return Err(err.into());
        }
        let draft = Listing {
            id: Uuid::new_v4().to_string(),
            item_id: new.item_id,
            platform: new.platform,
            title: new.title,
            description: new.description,
            price: new.price,
            photos: new.photos,
            status: new.status,
            created_at: Utc::now(),
            published_at: new.published_at,
        };
        {
            let mut state = self.state.write().await;
            state.drafts.push(draft.clone());
        }
        let _ = self
            .events
            .send(Event::ListingDraftSaved {
                listing_id: draft.id.clone(),
            })
            .await;
        Ok(draft)
    }

    /// Shallow-merges the patch into a draft. An unknown id is a no-op.
    pub async fn update_draft(&self, id: &str, patch: ListingPatch) -> Option<Listing> {
        let mut state = self.state.write().await;
        let draft = state.drafts.iter_mut().find(|draft| draft.id == id)?;
        patch.apply(draft);
        Some(draft.clone())
    }

    /// Removes a draft by id. Removing an absent id is a no-op.
    pub async fn delete_draft(&self, id: &str) {
        let mut state = self.state.write().await;
        state.drafts.retain(|draft| draft.id != id);
    }

    pub async fn listings(&self) -> Vec<Listing> {
        self.state.read().await.listings.clone()
    }

    pub async fn drafts(&self) -> Vec<Listing> {
        self.state.read().await.drafts.clone()
    }

    /// Drafts still in draft state (not yet promoted or published).
    pub async fn active_drafts(&self) -> Vec<Listing> {
        self.state
            .read()
            .await
            .drafts
            .iter()
            .filter(|draft| draft.status == ListingStatus::Draft)
            .cloned()
            .collect()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}
