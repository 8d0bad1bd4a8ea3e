use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    Printing,
    Printed,
    Failed,
}

/// A shipping label for an order, tracked through the print queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: String,
    /// Soft reference into the order collection; not enforced.
    pub order_id: String,
    pub carrier: String,
    pub label_url: Option<String>,
    pub printer: Option<String>,
    pub tracking: Option<String>,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
