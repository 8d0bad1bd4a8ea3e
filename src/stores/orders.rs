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
use crate::models::{Channel, NewOrder, Order, OrderPatch, OrderStatus};

/// Active filter set for the orders table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilters {
    pub status: Option<OrderStatus>,
    pub platform: Option<Channel>,
}

impl OrderFilters {
    fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(platform) = self.platform {
            if order.platform != platform {
                return false;
            }
        }
        true
    }
}

/// Partial filter update; `None` leaves a slot untouched, `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct OrderFilterPatch {
    pub status: Option<Option<OrderStatus>>,
    pub platform: Option<Option<Channel>>,
}

#[derive(Debug, Default)]
struct OrdersState {
    orders: Vec<Order>,
    loading: bool,
    error: Option<String>,
    filters: OrderFilters,
}

/// Store for sales awaiting pick, label, and dispatch.
#[derive(Clone)]
pub struct OrderStore {
    state: Arc<RwLock<OrdersState>>,
    events: EventSender,
    fetch_latency: Duration,
}

impl OrderStore {
    pub fn new(config: &StoreConfig, events: EventSender) -> Self {
        Self {
            state: Arc::new(RwLock::new(OrdersState::default())),
            events,
            fetch_latency: Duration::from_millis(config.latency.orders_fetch_ms),
        }
    }

    /// Replaces the collection with a fresh sample set after a simulated
    /// round-trip. Last commit wins under concurrent calls.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Order>, StoreError> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }
        sleep(self.fetch_latency).await;
        let orders = mock::mock_orders(mock::ORDER_SAMPLE_SIZE);
        let mut state = self.state.write().await;
        state.orders = orders.clone();
        state.loading = false;
        info!(count = orders.len(), "orders refreshed");
        Ok(orders)
    }

    /// Records a new order under a generated id and creation timestamp.
    #[instrument(skip(self, new))]
    pub async fn create(&self, new: NewOrder) -> Result<Order, StoreError> {
        if let Err(err) = new.validate() {
            let mut state = self.state.write().await;
            state.error = Some(err.to_string());
            return Err(err.into());
        }
        let order = Order {
            id: Uuid::new_v4().to_string(),
            platform: new.platform,
            item_id: new.item_id,
            buyer: new.buyer,
            sale_price: new.sale_price,
            shipping_paid: new.shipping_paid,
            fees_est: new.fees_est,
            created_at: Utc::now(),
            status: new.status,
            buyer_rating: new.buyer_rating,
            notes: new.notes,
        };
        {
            let mut state = self.state.write().await;
            state.orders.push(order.clone());
        }
        let _ = self
            .events
            .send(Event::OrderCreated {
                order_id: order.id.clone(),
            })
            .await;
        Ok(order)
    }

    /// Shallow-merges the patch into the record. An unknown id is a no-op.
    pub async fn update(&self, id: &str, patch: OrderPatch) -> Option<Order> {
        let mut state = self.state.write().await;
        let order = state.orders.iter_mut().find(|order| order.id == id)?;
        patch.apply(order);
        Some(order.clone())
    }

    /// Moves an order through the fulfilment pipeline. Unknown ids are a
    /// no-op.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Option<Order> {
        let (updated, old_status) = {
            let mut state = self.state.write().await;
            let order = state.orders.iter_mut().find(|order| order.id == id)?;
            let old_status = order.status;
            order.status = status;
            (order.clone(), old_status)
        };
        let _ = self
            .events
            .send(Event::OrderStatusChanged {
                order_id: updated.id.clone(),
                old_status,
                new_status: status,
            })
            .await;
        Some(updated)
    }

    /// Removes by id. Removing an absent id is a no-op.
    pub async fn remove(&self, id: &str) {
        let mut state = self.state.write().await;
        state.orders.retain(|order| order.id != id);
    }

    pub async fn set_filters(&self, patch: OrderFilterPatch) {
        let mut state = self.state.write().await;
        if let Some(status) = patch.status {
            state.filters.status = status;
        }
        if let Some(platform) = patch.platform {
            state.filters.platform = platform;
        }
    }

    /// The collection narrowed by the current filters, most recent first.
    pub async fn filtered(&self) -> Vec<Order> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|order| state.filters.matches(order))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.state.read().await.orders.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Order> {
        self.state
            .read()
            .await
            .orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
    }

    pub async fn orders_by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.state
            .read()
            .await
            .orders
            .iter()
            .filter(|order| order.status == status)
            .cloned()
            .collect()
    }

    /// Orders still waiting to be picked.
    pub async fn pending_pick(&self) -> Vec<Order> {
        self.orders_by_status(OrderStatus::PendingPick).await
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}
