use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

use super::item::Channel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ListingStatus {
    Draft,
    Active,
    Sold,
    Ended,
}

/// A marketplace listing for an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    /// Soft reference into the item collection; not enforced.
    pub item_id: String,
    pub platform: Channel,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub photos: Vec<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Payload for authoring a listing draft.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewListing {
    #[validate(length(min = 1))]
    pub item_id: String,
    pub platform: Channel,
    #[validate(length(min = 1))]
    pub title: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default = "NewListing::default_status")]
    pub status: ListingStatus,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewListing {
    fn default_status() -> ListingStatus {
        ListingStatus::Draft
    }
}

/// Field-wise update for a listing. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingPatch {
    pub platform: Option<Channel>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub photos: Option<Vec<String>>,
    pub status: Option<ListingStatus>,
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl ListingPatch {
    pub(crate) fn apply(self, listing: &mut Listing) {
        if let Some(platform) = self.platform {
            listing.platform = platform;
        }
        if let Some(title) = self.title {
            listing.title = title;
        }
        if let Some(description) = self.description {
            listing.description = description;
        }
        if let Some(price) = self.price {
            listing.price = price;
        }
        if let Some(photos) = self.photos {
            listing.photos = photos;
        }
        if let Some(status) = self.status {
            listing.status = status;
        }
        if let Some(published_at) = self.published_at {
            listing.published_at = published_at;
        }
    }
}
