use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::deferred::DeferredTasks;
use crate::errors::StoreError;
use crate::events::{Event, EventSender};
use crate::mock;
use crate::models::{Shipment, ShipmentStatus};

const DEFAULT_CARRIER: &str = "Royal Mail";

#[derive(Debug)]
struct ShipmentsState {
    shipments: Vec<Shipment>,
    loading: bool,
    error: Option<String>,
    printers: Vec<String>,
    selected_printer: String,
}

impl Default for ShipmentsState {
    fn default() -> Self {
        Self {
            shipments: Vec::new(),
            loading: false,
            error: None,
            printers: vec![
                "Default Printer".to_string(),
                "Label Printer".to_string(),
                "Sunmi L2S".to_string(),
            ],
            selected_printer: "Default Printer".to_string(),
        }
    }
}

/// Store for shipping labels and the simulated print queue.
///
/// Printing is a two-step mutation: the label is appended in `printing`
/// state, and a deferred task flips it to `printed` once the simulated
/// printer latency elapses. The task is keyed by shipment id so removal
/// cancels it, and it re-checks that the shipment still exists before
/// applying the transition.
#[derive(Clone)]
pub struct ShipmentStore {
    state: Arc<RwLock<ShipmentsState>>,
    events: EventSender,
    transitions: DeferredTasks,
    fetch_latency: Duration,
    print_latency: Duration,
    retry_latency: Duration,
}

impl ShipmentStore {
    pub fn new(config: &StoreConfig, events: EventSender) -> Self {
        Self {
            state: Arc::new(RwLock::new(ShipmentsState::default())),
            events,
            transitions: DeferredTasks::new(),
            fetch_latency: Duration::from_millis(config.latency.shipments_fetch_ms),
            print_latency: Duration::from_millis(config.latency.print_label_ms),
            retry_latency: Duration::from_millis(config.latency.retry_print_ms),
        }
    }

    /// Replaces the collection with a fresh sample set after a simulated
    /// round-trip. Last commit wins under concurrent calls. Print
    /// transitions queued against replaced shipments fizzle on their
    /// existence check.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Shipment>, StoreError> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }
        sleep(self.fetch_latency).await;
        let shipments = mock::mock_shipments(mock::SHIPMENT_SAMPLE_SIZE);
        let mut state = self.state.write().await;
        state.shipments = shipments.clone();
        state.loading = false;
        info!(count = shipments.len(), "shipments refreshed");
        Ok(shipments)
    }

    /// Queues a label for an order. The shipment is visible immediately in
    /// `printing` state; the printed transition lands after the configured
    /// latency.
    #[instrument(skip(self))]
    pub async fn print_label(
        &self,
        order_id: &str,
        printer: Option<String>,
    ) -> Result<Shipment, StoreError> {
        let now = Utc::now();
        let shipment = {
            let mut state = self.state.write().await;
            let printer = printer.unwrap_or_else(|| state.selected_printer.clone());
            let shipment = Shipment {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.to_string(),
                carrier: DEFAULT_CARRIER.to_string(),
                label_url: None,
                printer: Some(printer),
                tracking: None,
                status: ShipmentStatus::Printing,
                created_at: now,
                updated_at: now,
            };
            state.shipments.push(shipment.clone());
            shipment
        };
        let _ = self
            .events
            .send(Event::LabelPrintQueued {
                shipment_id: shipment.id.clone(),
                order_id: order_id.to_string(),
            })
            .await;
        self.schedule_print_completion(shipment.id.clone(), self.print_latency);
        Ok(shipment)
    }

    /// Re-queues an existing label. Unknown ids are a no-op.
    #[instrument(skip(self))]
    pub async fn retry_print(&self, id: &str) -> Option<Shipment> {
        let updated = {
            let mut state = self.state.write().await;
            let shipment = state.shipments.iter_mut().find(|s| s.id == id)?;
            shipment.status = ShipmentStatus::Printing;
            shipment.updated_at = Utc::now();
            shipment.clone()
        };
        self.schedule_print_completion(updated.id.clone(), self.retry_latency);
        Some(updated)
    }

    fn schedule_print_completion(&self, id: String, delay: Duration) {
        let store = self.clone();
        let key = id.clone();
        self.transitions.schedule(&key, delay, async move {
            store.complete_print(&id).await;
        });
    }

    async fn complete_print(&self, id: &str) {
        let (shipment_id, tracking) = {
            let mut state = self.state.write().await;
            let Some(shipment) = state.shipments.iter_mut().find(|s| s.id == id) else {
                debug!(%id, "print completion for a removed shipment ignored");
                return;
            };
            shipment.status = ShipmentStatus::Printed;
            shipment.label_url = Some(mock::LABEL_PLACEHOLDER.to_string());
            if shipment.tracking.is_none() {
                shipment.tracking = Some(mock::tracking_code());
            }
            shipment.updated_at = Utc::now();
            (
                shipment.id.clone(),
                shipment.tracking.clone().unwrap_or_default(),
            )
        };
        let _ = self
            .events
            .send(Event::LabelPrinted {
                shipment_id,
                tracking,
            })
            .await;
    }

    /// Removes by id and cancels any pending print transition for it.
    /// Removing an absent id is a no-op.
    pub async fn remove(&self, id: &str) {
        self.transitions.cancel(id);
        let mut state = self.state.write().await;
        state.shipments.retain(|s| s.id != id);
    }

    pub async fn set_selected_printer(&self, printer: impl Into<String>) {
        self.state.write().await.selected_printer = printer.into();
    }

    pub async fn selected_printer(&self) -> String {
        self.state.read().await.selected_printer.clone()
    }

    pub async fn printers(&self) -> Vec<String> {
        self.state.read().await.printers.clone()
    }

    pub async fn shipments(&self) -> Vec<Shipment> {
        self.state.read().await.shipments.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Shipment> {
        self.state
            .read()
            .await
            .shipments
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub async fn by_status(&self, status: ShipmentStatus) -> Vec<Shipment> {
        self.state
            .read()
            .await
            .shipments
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect()
    }

    pub async fn pending_labels(&self) -> Vec<Shipment> {
        self.by_status(ShipmentStatus::Pending).await
    }

    pub async fn printed_labels(&self) -> Vec<Shipment> {
        self.by_status(ShipmentStatus::Printed).await
    }

    pub async fn failed_labels(&self) -> Vec<Shipment> {
        self.by_status(ShipmentStatus::Failed).await
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn store() -> ShipmentStore {
        let (tx, _rx) = mpsc::channel(16);
        ShipmentStore::new(&StoreConfig::default(), EventSender::new(tx))
    }

    #[tokio::test(start_paused = true)]
    async fn print_label_lands_printing_then_printed() {
        let store = store();
        let shipment = store.print_label("order-1", None).await.unwrap();
        assert_eq!(shipment.status, ShipmentStatus::Printing);
        assert_eq!(shipment.printer.as_deref(), Some("Default Printer"));
        assert!(shipment.tracking.is_none());

        sleep(Duration::from_millis(2_100)).await;
        let printed = store.get(&shipment.id).await.unwrap();
        assert_eq!(printed.status, ShipmentStatus::Printed);
        assert!(printed.label_url.is_some());
        let tracking = printed.tracking.expect("tracking assigned on print");
        assert!(tracking.starts_with("RM"));
    }

    #[tokio::test(start_paused = true)]
    async fn print_label_uses_the_selected_printer_by_default() {
        let store = store();
        store.set_selected_printer("Sunmi L2S").await;
        let shipment = store.print_label("order-2", None).await.unwrap();
        assert_eq!(shipment.printer.as_deref(), Some("Sunmi L2S"));

        let explicit = store
            .print_label("order-3", Some("Label Printer".to_string()))
            .await
            .unwrap();
        assert_eq!(explicit.printer.as_deref(), Some("Label Printer"));
    }

    #[tokio::test(start_paused = true)]
    async fn removal_cancels_the_pending_transition() {
        let store = store();
        let shipment = store.print_label("order-1", None).await.unwrap();
        store.remove(&shipment.id).await;
        sleep(Duration::from_millis(3_000)).await;
        assert!(store.get(&shipment.id).await.is_none());
        assert!(store.shipments().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn transition_against_replaced_collection_is_ignored() {
        let store = store();
        let shipment = store.print_label("order-1", None).await.unwrap();
        // A refresh lands while the label is still printing.
        store.fetch_all().await.unwrap();
        sleep(Duration::from_millis(3_000)).await;
        // The queued transition found no matching id and changed nothing.
        assert!(store.get(&shipment.id).await.is_none());
        assert_eq!(store.shipments().await.len(), mock::SHIPMENT_SAMPLE_SIZE);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_print_requeues_an_existing_label() {
        let store = store();
        let shipment = store.print_label("order-1", None).await.unwrap();
        sleep(Duration::from_millis(2_100)).await;
        assert_eq!(
            store.get(&shipment.id).await.unwrap().status,
            ShipmentStatus::Printed
        );

        let retried = store.retry_print(&shipment.id).await.unwrap();
        assert_eq!(retried.status, ShipmentStatus::Printing);
        sleep(Duration::from_millis(1_600)).await;
        assert_eq!(
            store.get(&shipment.id).await.unwrap().status,
            ShipmentStatus::Printed
        );
    }

    #[tokio::test]
    async fn retry_print_on_unknown_shipment_is_a_no_op() {
        let store = store();
        assert!(store.retry_print("missing").await.is_none());
    }
}
