//! Membership Watch
//!
//! Read-only view of cart/wishlist membership used to decorate result rows.
//! The backend owns the sets; this service re-pulls them when notified that
//! one changed and fans the notification out on a broadcast channel so
//! interested views can re-render. The search subsystem never mutates
//! membership.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::api::StorefrontApi;
use crate::models::{MembershipSets, Product, ResultRow};
use crate::utils::error::AppResult;

/// Broadcast capacity; a lagging subscriber only misses superseded updates
const CHANNEL_CAPACITY: usize = 16;

/// Which membership set changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    Cart,
    Wishlist,
}

/// Holds the current membership snapshot and notifies subscribers on change
pub struct MembershipWatch {
    backend: Arc<dyn StorefrontApi>,
    sets: RwLock<MembershipSets>,
    tx: broadcast::Sender<MembershipChange>,
}

impl MembershipWatch {
    pub fn new(backend: Arc<dyn StorefrontApi>) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            backend,
            sets: RwLock::new(MembershipSets::default()),
            tx,
        }
    }

    /// Pull the current sets from the backend, replacing the snapshot
    pub async fn refresh(&self) -> AppResult<()> {
        let sets = self.backend.membership_sets().await?;
        let mut guard = self.sets.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = sets;
        Ok(())
    }

    /// Handle an external cart-change notification: re-pull, then broadcast
    pub async fn cart_changed(&self) {
        self.changed(MembershipChange::Cart).await;
    }

    /// Handle an external wishlist-change notification: re-pull, then broadcast
    pub async fn wishlist_changed(&self) {
        self.changed(MembershipChange::Wishlist).await;
    }

    async fn changed(&self, change: MembershipChange) {
        if let Err(e) = self.refresh().await {
            // keep the stale snapshot; subscribers still get the signal
            tracing::warn!(change = ?change, "Failed to refresh membership sets: {}", e);
        }
        let _ = self.tx.send(change);
    }

    /// Subscribe to membership-change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<MembershipChange> {
        self.tx.subscribe()
    }

    /// Current snapshot of both sets
    pub fn snapshot(&self) -> MembershipSets {
        self.sets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Decorate ranked products with in-cart/in-wishlist state
    pub fn decorate(&self, products: &[Product]) -> Vec<ResultRow> {
        let sets = self
            .sets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        products
            .iter()
            .map(|product| ResultRow {
                in_cart: sets.cart.contains(&product.id),
                in_wishlist: sets.wishlist.contains(&product.id),
                product: product.clone(),
            })
            .collect()
    }
}
