use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PurchaseStatus {
    PendingPurchase,
    Purchased,
    Shipped,
    Delivered,
}

/// An approved deal on its way into inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    /// Soft reference back to the originating deal; not enforced.
    pub deal_id: String,
    pub title: String,
    pub price: Decimal,
    pub seller: String,
    pub status: PurchaseStatus,
    pub purchased_at: DateTime<Utc>,
    pub expected_delivery: Option<NaiveDate>,
    pub tracking_number: Option<String>,
}

/// Payload for recording a purchase.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPurchase {
    #[validate(length(min = 1))]
    pub deal_id: String,
    #[validate(length(min = 1))]
    pub title: String,
    pub price: Decimal,
    pub seller: String,
    pub status: PurchaseStatus,
    pub expected_delivery: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchQueryStatus {
    Active,
    Paused,
}

/// A saved sourcing search that is polled for new deals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub id: String,
    pub query: String,
    pub category: String,
    pub max_price: Decimal,
    pub status: SearchQueryStatus,
    pub last_checked: DateTime<Utc>,
    pub results_found: u32,
}

/// Payload for saving a sourcing search. New queries start active with no
/// results recorded.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewSearchQuery {
    #[validate(length(min = 1))]
    pub query: String,
    pub category: String,
    pub max_price: Decimal,
}

/// Field-wise update for a search query. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQueryPatch {
    pub query: Option<String>,
    pub category: Option<String>,
    pub max_price: Option<Decimal>,
    pub status: Option<SearchQueryStatus>,
    pub last_checked: Option<DateTime<Utc>>,
    pub results_found: Option<u32>,
}

impl SearchQueryPatch {
    pub(crate) fn apply(self, query: &mut SearchQuery) {
        if let Some(text) = self.query {
            query.query = text;
        }
        if let Some(category) = self.category {
            query.category = category;
        }
        if let Some(max_price) = self.max_price {
            query.max_price = max_price;
        }
        if let Some(status) = self.status {
            query.status = status;
        }
        if let Some(last_checked) = self.last_checked {
            query.last_checked = last_checked;
        }
        if let Some(results_found) = self.results_found {
            query.results_found = results_found;
        }
    }
}
