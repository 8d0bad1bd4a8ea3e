use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::{OrderStatus, PurchaseStatus};
use crate::stores::toasts::ToastStore;

/// Events emitted by the stores after a committed mutation.
///
/// Delivery is fire-and-forget: a store never waits on, or fails because
/// of, its event notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Inventory events
    ItemCreated { item_id: String },
    ItemUpdated { item_id: String },
    ItemRemoved { item_id: String },

    // Order events
    OrderCreated { order_id: String },
    OrderStatusChanged {
        order_id: String,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },

    // Sourcing events
    DealApproved { deal_id: String, purchase_id: String },
    DealRejected { deal_id: String },
    PurchaseStatusChanged {
        purchase_id: String,
        new_status: PurchaseStatus,
    },

    // Shipping events
    LabelPrintQueued { shipment_id: String, order_id: String },
    LabelPrinted { shipment_id: String, tracking: String },

    // Listing events
    ListingDraftSaved { listing_id: String },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging every event and surfacing user-facing
/// outcomes on the toast queue. Runs until all senders are dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>, toasts: ToastStore) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        debug!(?event, "store event");
        match &event {
            Event::DealApproved { deal_id, .. } => {
                toasts
                    .success(
                        "Deal approved",
                        Some(format!("Deal {} queued for purchase", deal_id)),
                    )
                    .await;
            }
            Event::DealRejected { deal_id } => {
                toasts
                    .info("Deal rejected", Some(format!("Deal {} dismissed", deal_id)))
                    .await;
            }
            Event::LabelPrinted { tracking, .. } => {
                toasts
                    .success("Label printed", Some(format!("Tracking {}", tracking)))
                    .await;
            }
            _ => {}
        }
    }
    info!("Event processor stopped");
}
