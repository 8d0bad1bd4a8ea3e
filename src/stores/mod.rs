//! Domain stores: one independently namespaced slice of application state
//! per module, each exposing the same mutate/read contract.

pub mod deals;
pub mod items;
pub mod listings;
pub mod menus;
pub mod orders;
pub mod purchases;
pub mod settings;
pub mod shipments;
pub mod toasts;

pub use deals::{DealFilterPatch, DealFilters, DealStore, ViewMode};
pub use items::{ItemFilterPatch, ItemFilters, ItemStore};
pub use listings::ListingStore;
pub use menus::MenuStore;
pub use orders::{OrderFilterPatch, OrderFilters, OrderStore};
pub use purchases::PurchaseStore;
pub use settings::{InMemoryPreferences, PreferenceBackend, SettingsStore, ThemeToggle};
pub use shipments::ShipmentStore;
pub use toasts::ToastStore;
