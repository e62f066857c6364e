//! Storefront Backend API
//!
//! Collaborator contracts implemented by the backend and consumed by the
//! search subsystem. The trait is object-safe so services can hold an
//! `Arc<dyn StorefrontApi>` and tests can substitute scripted fakes.

pub mod http;

use async_trait::async_trait;

use crate::models::{Category, MembershipSets, Product};
use crate::utils::error::AppResult;

pub use http::HttpStorefrontApi;

/// Read-only backend surface required by the search subsystem.
///
/// No ranking semantics are guaranteed for `remote_search` beyond the
/// backend's best effort for the raw text; the merge step owns final order.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Bulk product snapshot used to seed the local index and trending pool
    async fn fetch_all_products(&self) -> AppResult<Vec<Product>>;

    /// All known categories, used for category suggestions
    async fn fetch_categories(&self) -> AppResult<Vec<Category>>;

    /// Authoritative server-side search for a raw query string
    async fn remote_search(&self, query: &str) -> AppResult<Vec<Product>>;

    /// Current cart/wishlist membership, used only to decorate result rows
    async fn membership_sets(&self) -> AppResult<MembershipSets>;
}
