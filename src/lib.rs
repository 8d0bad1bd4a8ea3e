//! Flipdesk store layer
//!
//! This crate is the state layer of a resale-operations dashboard: a set of
//! independently namespaced domain stores (items, deals, orders, shipments,
//! listings, purchases, settings, menus, toasts) composed into a single
//! [`AppState`]. Views dispatch operations against a store, the store does
//! its (simulated) async work and commits a mutation, and derived read
//! views recompute on access. All data access is mocked in-memory; there is
//! no network, database, or durable storage behind it.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
mod deferred;
pub mod errors;
pub mod events;
pub mod mock;
pub mod models;
pub mod ops;
pub mod stores;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::StoreConfig;
use crate::events::EventSender;
use crate::stores::{
    DealStore, InMemoryPreferences, ItemStore, ListingStore, MenuStore, OrderStore,
    PreferenceBackend, PurchaseStore, SettingsStore, ShipmentStore, ToastStore,
};

/// The application state tree: every domain store under one explicitly
/// constructed handle.
///
/// Created once at process start and passed to consumers by clone (all
/// stores share state through internal `Arc`s). There is no ambient
/// singleton; dropping every clone tears the tree down.
#[derive(Clone)]
pub struct AppState {
    pub config: StoreConfig,
    pub event_sender: EventSender,
    pub items: ItemStore,
    pub deals: DealStore,
    pub orders: OrderStore,
    pub shipments: ShipmentStore,
    pub listings: ListingStore,
    pub purchases: PurchaseStore,
    pub settings: SettingsStore,
    pub menus: MenuStore,
    pub toasts: ToastStore,
}

impl AppState {
    /// Builds the state tree with in-memory preference storage.
    ///
    /// Must be called within a tokio runtime: the event processor is
    /// spawned here.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_preferences(config, Arc::new(InMemoryPreferences::new()))
    }

    /// Builds the state tree against a caller-supplied preference backend
    /// (the browser-storage boundary).
    pub fn with_preferences(config: StoreConfig, prefs: Arc<dyn PreferenceBackend>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(config.event_channel_capacity);
        let event_sender = EventSender::new(event_tx);

        let toasts = ToastStore::new(&config);
        tokio::spawn(events::process_events(event_rx, toasts.clone()));

        Self {
            items: ItemStore::new(&config, event_sender.clone()),
            deals: DealStore::new(&config),
            orders: OrderStore::new(&config, event_sender.clone()),
            shipments: ShipmentStore::new(&config, event_sender.clone()),
            listings: ListingStore::new(&config, event_sender.clone()),
            purchases: PurchaseStore::new(event_sender.clone()),
            settings: SettingsStore::new(prefs),
            menus: MenuStore::new(),
            toasts,
            event_sender,
            config,
        }
    }

    /// Hydrates persisted preferences; call once after construction.
    pub async fn initialize(&self) {
        self.settings.initialize().await;
    }
}

pub mod prelude {
    pub use crate::config::{init_tracing, load_config, StoreConfig};
    pub use crate::errors::StoreError;
    pub use crate::events::{Event, EventSender};
    pub use crate::models::*;
    pub use crate::ops::{approve_deal, reject_deal, DealApproval};
    pub use crate::stores::*;
    pub use crate::AppState;
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[tokio::test]
    async fn app_state_wires_every_store() {
        let app = AppState::new(StoreConfig::default());
        app.initialize().await;

        assert!(app.items.items().await.is_empty());
        assert_eq!(app.deals.deals().await.len(), 3);
        assert_eq!(app.purchases.purchases().await.len(), 1);
        assert!(!app.settings.is_dark_mode().await);
        assert!(app.toasts.active().await.is_empty());
    }

    #[tokio::test]
    async fn clones_share_the_same_state_tree() {
        let app = AppState::new(StoreConfig::default());
        let clone = app.clone();
        clone.menus.set_main(Some("shipping".to_string())).await;
        assert_eq!(app.menus.active_main().await.as_deref(), Some("shipping"));
    }
}
