use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::item::Source;

/// Letter grade assigned to a discovered deal by the sourcing heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum DealScore {
    A,
    B,
    C,
    D,
}

impl DealScore {
    /// Numeric rank used when ordering deal lists, best first.
    pub fn rank(self) -> u8 {
        match self {
            DealScore::A => 4,
            DealScore::B => 3,
            DealScore::C => 2,
            DealScore::D => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DealStatus {
    PendingReview,
    Approved,
    Rejected,
}

/// An externally discovered purchase opportunity. Not yet owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub source: Source,
    pub title: String,
    pub price: Decimal,
    pub url: String,
    pub seller_rating: u8,
    pub est_resale: Decimal,
    pub score: DealScore,
    pub age_minutes: u32,
    pub photos: Vec<String>,
    pub description: Option<String>,
    pub seller: Option<String>,
    pub location: Option<String>,
    pub status: DealStatus,
}

impl Deal {
    /// Expected margin in percent, derived from price and estimated resale.
    /// Never stored: the two inputs are the single source of truth.
    pub fn margin_pct(&self) -> Decimal {
        if self.price.is_zero() {
            return Decimal::ZERO;
        }
        (self.est_resale - self.price) / self.price * Decimal::ONE_HUNDRED
    }

    /// Expected profit if resold at the estimate.
    pub fn estimated_profit(&self) -> Decimal {
        self.est_resale - self.price
    }
}
