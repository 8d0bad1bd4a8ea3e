//! Domain record types shared across the stores.

pub mod deal;
pub mod item;
pub mod listing;
pub mod order;
pub mod purchase;
pub mod settings;
pub mod shipment;
pub mod toast;

pub use deal::{Deal, DealScore, DealStatus};
pub use item::{Channel, Condition, Item, ItemPatch, ItemStatus, NewItem, Source};
pub use listing::{Listing, ListingPatch, ListingStatus, NewListing};
pub use order::{NewOrder, Order, OrderPatch, OrderStatus};
pub use purchase::{
    NewPurchase, NewSearchQuery, Purchase, PurchaseStatus, SearchQuery, SearchQueryPatch,
    SearchQueryStatus,
};
pub use settings::{NewSavedView, SavedView, Settings, SortOrder};
pub use shipment::{Shipment, ShipmentStatus};
pub use toast::{NewToast, Toast, ToastAction, ToastKind};
