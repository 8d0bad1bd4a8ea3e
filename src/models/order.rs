use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

use super::item::Channel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    PendingPick,
    LabelPending,
    LabelReady,
    Dispatched,
}

/// A sale made on one of the channels, awaiting pick/label/dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub platform: Channel,
    /// Soft reference into the item collection; not enforced.
    pub item_id: String,
    pub buyer: String,
    pub sale_price: Decimal,
    pub shipping_paid: Decimal,
    pub fees_est: Decimal,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub buyer_rating: Option<u8>,
    pub notes: Option<String>,
}

/// Payload for recording a new order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrder {
    pub platform: Channel,
    #[validate(length(min = 1))]
    pub item_id: String,
    #[validate(length(min = 1))]
    pub buyer: String,
    pub sale_price: Decimal,
    pub shipping_paid: Decimal,
    pub fees_est: Decimal,
    #[serde(default = "NewOrder::default_status")]
    pub status: OrderStatus,
    #[validate(range(min = 0, max = 5))]
    pub buyer_rating: Option<u8>,
    pub notes: Option<String>,
}

impl NewOrder {
    fn default_status() -> OrderStatus {
        OrderStatus::PendingPick
    }
}

/// Field-wise update for an order. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    pub platform: Option<Channel>,
    pub item_id: Option<String>,
    pub buyer: Option<String>,
    pub sale_price: Option<Decimal>,
    pub shipping_paid: Option<Decimal>,
    pub fees_est: Option<Decimal>,
    pub status: Option<OrderStatus>,
    pub buyer_rating: Option<Option<u8>>,
    pub notes: Option<Option<String>>,
}

impl OrderPatch {
    pub(crate) fn apply(self, order: &mut Order) {
        if let Some(platform) = self.platform {
            order.platform = platform;
        }
        if let Some(item_id) = self.item_id {
            order.item_id = item_id;
        }
        if let Some(buyer) = self.buyer {
            order.buyer = buyer;
        }
        if let Some(sale_price) = self.sale_price {
            order.sale_price = sale_price;
        }
        if let Some(shipping_paid) = self.shipping_paid {
            order.shipping_paid = shipping_paid;
        }
        if let Some(fees_est) = self.fees_est {
            order.fees_est = fees_est;
        }
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(buyer_rating) = self.buyer_rating {
            order.buyer_rating = buyer_rating;
        }
        if let Some(notes) = self.notes {
            order.notes = notes;
        }
    }
}
