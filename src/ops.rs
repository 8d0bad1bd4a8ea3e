//! Cross-store workflows.
//!
//! Stores never call each other directly; the few flows that span two
//! slices live here as explicit orchestration functions whose results
//! capture every sub-operation outcome.

use tracing::instrument;

use crate::errors::StoreError;
use crate::events::Event;
use crate::models::{Deal, DealStatus, NewPurchase, Purchase, PurchaseStatus};
use crate::AppState;

/// Both outcomes of a deal approval: the re-statused deal and the purchase
/// recorded for it.
#[derive(Debug, Clone)]
pub struct DealApproval {
    pub deal: Deal,
    pub purchase: Purchase,
}

/// Approves a deal and records a pending purchase carrying over its title,
/// price, and seller.
///
/// An unknown deal id fails with `NotFound` before anything is mutated; a
/// failure recording the purchase is returned to the caller rather than
/// swallowed, with the deal left approved (there is no compensating
/// rollback in this layer).
#[instrument(skip(app))]
pub async fn approve_deal(app: &AppState, deal_id: &str) -> Result<DealApproval, StoreError> {
    let deal = app
        .deals
        .set_status(deal_id, DealStatus::Approved)
        .await
        .ok_or_else(|| StoreError::NotFound(format!("Deal {} not found", deal_id)))?;

    let purchase = app
        .purchases
        .add_purchase(NewPurchase {
            deal_id: deal.id.clone(),
            title: deal.title.clone(),
            price: deal.price,
            seller: deal.seller.clone().unwrap_or_default(),
            status: PurchaseStatus::PendingPurchase,
            expected_delivery: None,
        })
        .await?;

    let _ = app
        .event_sender
        .send(Event::DealApproved {
            deal_id: deal.id.clone(),
            purchase_id: purchase.id.clone(),
        })
        .await;

    Ok(DealApproval { deal, purchase })
}

/// Rejects a deal. An unknown deal id fails with `NotFound`.
#[instrument(skip(app))]
pub async fn reject_deal(app: &AppState, deal_id: &str) -> Result<Deal, StoreError> {
    let deal = app
        .deals
        .set_status(deal_id, DealStatus::Rejected)
        .await
        .ok_or_else(|| StoreError::NotFound(format!("Deal {} not found", deal_id)))?;

    let _ = app
        .event_sender
        .send(Event::DealRejected {
            deal_id: deal.id.clone(),
        })
        .await;

    Ok(deal)
}
