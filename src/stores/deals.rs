use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};
use tracing::{info, instrument};

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::mock;
use crate::models::{Deal, DealStatus, Source};

/// How the sourcing screen renders the deal feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

/// Active filter set for the deal feed. Numeric slots are inactive at zero,
/// matching the dashboard's "0 = no minimum" convention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealFilters {
    pub source: Option<Source>,
    pub min_margin: Decimal,
    pub max_price: Decimal,
    pub min_seller_rating: u8,
}

impl DealFilters {
    fn matches(&self, deal: &Deal) -> bool {
        if let Some(source) = self.source {
            if deal.source != source {
                return false;
            }
        }
        if self.min_margin > Decimal::ZERO && deal.margin_pct() < self.min_margin {
            return false;
        }
        if self.max_price > Decimal::ZERO && deal.price > self.max_price {
            return false;
        }
        if self.min_seller_rating > 0 && deal.seller_rating < self.min_seller_rating {
            return false;
        }
        true
    }
}

/// Partial filter update; `None` leaves a slot untouched.
#[derive(Debug, Clone, Default)]
pub struct DealFilterPatch {
    pub source: Option<Option<Source>>,
    pub min_margin: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_seller_rating: Option<u8>,
}

#[derive(Debug)]
struct DealsState {
    deals: Vec<Deal>,
    loading: bool,
    error: Option<String>,
    filters: DealFilters,
    selected: Vec<String>,
    view_mode: ViewMode,
}

impl Default for DealsState {
    fn default() -> Self {
        Self {
            // The sourcing backlog starts from the fixed seed so approval
            // flows work before any fetch.
            deals: mock::seed_discovered_deals(),
            loading: false,
            error: None,
            filters: DealFilters::default(),
            selected: Vec::new(),
            view_mode: ViewMode::default(),
        }
    }
}

/// Store for externally discovered purchase opportunities.
#[derive(Clone)]
pub struct DealStore {
    state: Arc<RwLock<DealsState>>,
    fetch_latency: Duration,
}

impl DealStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(DealsState::default())),
            fetch_latency: Duration::from_millis(config.latency.deals_fetch_ms),
        }
    }

    /// Replaces the feed with a fresh sample set after a simulated
    /// round-trip. Last commit wins under concurrent calls.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Deal>, StoreError> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }
        sleep(self.fetch_latency).await;
        let deals = mock::mock_deals(mock::DEAL_SAMPLE_SIZE);
        let mut state = self.state.write().await;
        state.deals = deals.clone();
        state.loading = false;
        info!(count = deals.len(), "deals refreshed");
        Ok(deals)
    }

    /// Sets the review status of a deal. Unknown ids are a no-op.
    pub async fn set_status(&self, id: &str, status: DealStatus) -> Option<Deal> {
        let mut state = self.state.write().await;
        let deal = state.deals.iter_mut().find(|deal| deal.id == id)?;
        deal.status = status;
        Some(deal.clone())
    }

    pub async fn set_filters(&self, patch: DealFilterPatch) {
        let mut state = self.state.write().await;
        if let Some(source) = patch.source {
            state.filters.source = source;
        }
        if let Some(min_margin) = patch.min_margin {
            state.filters.min_margin = min_margin;
        }
        if let Some(max_price) = patch.max_price {
            state.filters.max_price = max_price;
        }
        if let Some(min_seller_rating) = patch.min_seller_rating {
            state.filters.min_seller_rating = min_seller_rating;
        }
    }

    pub async fn set_view_mode(&self, mode: ViewMode) {
        self.state.write().await.view_mode = mode;
    }

    pub async fn view_mode(&self) -> ViewMode {
        self.state.read().await.view_mode
    }

    pub async fn toggle_selection(&self, id: &str) {
        let mut state = self.state.write().await;
        if let Some(position) = state.selected.iter().position(|s| s == id) {
            state.selected.remove(position);
        } else {
            state.selected.push(id.to_string());
        }
    }

    pub async fn selected(&self) -> Vec<String> {
        self.state.read().await.selected.clone()
    }

    /// The feed narrowed by the current filters, best score first.
    pub async fn filtered(&self) -> Vec<Deal> {
        let state = self.state.read().await;
        let mut deals: Vec<Deal> = state
            .deals
            .iter()
            .filter(|deal| state.filters.matches(deal))
            .cloned()
            .collect();
        deals.sort_by(|a, b| b.score.rank().cmp(&a.score.rank()));
        deals
    }

    pub async fn deals(&self) -> Vec<Deal> {
        self.state.read().await.deals.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Deal> {
        self.state
            .read()
            .await
            .deals
            .iter()
            .find(|deal| deal.id == id)
            .cloned()
    }

    pub async fn pending_deals(&self) -> Vec<Deal> {
        self.by_status(DealStatus::PendingReview).await
    }

    pub async fn approved_deals(&self) -> Vec<Deal> {
        self.by_status(DealStatus::Approved).await
    }

    async fn by_status(&self, status: DealStatus) -> Vec<Deal> {
        self.state
            .read()
            .await
            .deals
            .iter()
            .filter(|deal| deal.status == status)
            .cloned()
            .collect()
    }

    /// Sum of expected profit over every deal not yet rejected.
    pub async fn total_estimated_profit(&self) -> Decimal {
        self.state
            .read()
            .await
            .deals
            .iter()
            .filter(|deal| deal.status != DealStatus::Rejected)
            .map(Deal::estimated_profit)
            .sum()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}
