use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};
use validator::Validate;

/// Where an item was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Source {
    Vinted,
    Facebook,
    Gumtree,
    Carboot,
    Charity,
    Other,
}

/// Sale channel an item can be listed or sold on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Channel {
    Vinted,
    Ebay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    ForParts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemStatus {
    InStock,
    Listed,
    Allocated,
    Sold,
    Archived,
}

/// A purchased item held in inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub sku: String,
    pub title: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub storage_gb: Option<u32>,
    pub condition: Condition,
    pub source: Source,
    pub buy_price: Decimal,
    pub ask_price: Option<Decimal>,
    pub est_resale: Option<Decimal>,
    pub channels: Vec<Channel>,
    pub location: Option<String>,
    pub status: ItemStatus,
    pub serial: Option<String>,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub listed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.sku)
    }
}

/// Payload for creating an item. The store assigns id and creation time.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewItem {
    #[validate(length(min = 1))]
    pub sku: String,
    #[validate(length(min = 1))]
    pub title: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub storage_gb: Option<u32>,
    pub condition: Condition,
    pub source: Source,
    pub buy_price: Decimal,
    pub ask_price: Option<Decimal>,
    pub est_resale: Option<Decimal>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    pub location: Option<String>,
    pub status: ItemStatus,
    pub serial: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub listed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Field-wise update for an item. `None` leaves the field untouched.
///
/// Optional record fields use a second `Option` layer so a patch can clear
/// them (`Some(None)`) as well as set them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    pub sku: Option<String>,
    pub title: Option<String>,
    pub brand: Option<Option<String>>,
    pub model: Option<Option<String>>,
    pub storage_gb: Option<Option<u32>>,
    pub condition: Option<Condition>,
    pub source: Option<Source>,
    pub buy_price: Option<Decimal>,
    pub ask_price: Option<Option<Decimal>>,
    pub est_resale: Option<Option<Decimal>>,
    pub channels: Option<Vec<Channel>>,
    pub location: Option<Option<String>>,
    pub status: Option<ItemStatus>,
    pub serial: Option<Option<String>>,
    pub photos: Option<Vec<String>>,
    pub listed_at: Option<Option<DateTime<Utc>>>,
    pub notes: Option<Option<String>>,
}

impl ItemPatch {
    pub(crate) fn apply(self, item: &mut Item) {
        if let Some(sku) = self.sku {
            item.sku = sku;
        }
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(brand) = self.brand {
            item.brand = brand;
        }
        if let Some(model) = self.model {
            item.model = model;
        }
        if let Some(storage_gb) = self.storage_gb {
            item.storage_gb = storage_gb;
        }
        if let Some(condition) = self.condition {
            item.condition = condition;
        }
        if let Some(source) = self.source {
            item.source = source;
        }
        if let Some(buy_price) = self.buy_price {
            item.buy_price = buy_price;
        }
        if let Some(ask_price) = self.ask_price {
            item.ask_price = ask_price;
        }
        if let Some(est_resale) = self.est_resale {
            item.est_resale = est_resale;
        }
        if let Some(channels) = self.channels {
            item.channels = channels;
        }
        if let Some(location) = self.location {
            item.location = location;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(serial) = self.serial {
            item.serial = serial;
        }
        if let Some(photos) = self.photos {
            item.photos = photos;
        }
        if let Some(listed_at) = self.listed_at {
            item.listed_at = listed_at;
        }
        if let Some(notes) = self.notes {
            item.notes = notes;
        }
    }
}
