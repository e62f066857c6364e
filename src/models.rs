//! Domain Models
//!
//! Data structures shared across the search subsystem. Products and
//! categories are owned and mutated by the backend; this crate only reads
//! them. Field names follow the backend's camelCase JSON.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A product as served by the storefront backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable, unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Longer marketing description
    pub description: Option<String>,
    /// Category name, if assigned
    pub category: Option<String>,
    /// Free-form tags, in display order
    pub tags: Option<Vec<String>>,
    /// Current price, non-negative
    pub price: f64,
    /// Pre-discount price, if on sale
    pub original_price: Option<f64>,
    /// Average rating, 0 to 5
    pub rating: Option<f64>,
    /// Number of reviews behind the rating
    pub reviews: Option<u64>,
    /// Creation timestamp, ISO-8601
    pub created_at: Option<String>,
    /// Image URLs, in display order
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Create a product with minimal info
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            ..Default::default()
        }
    }
}

/// A product category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Cart and wishlist membership, as sets of product ids.
///
/// Read-only to this crate; used to decorate result rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipSets {
    #[serde(default)]
    pub cart: HashSet<String>,
    #[serde(default)]
    pub wishlist: HashSet<String>,
}

/// A ranked result row decorated with membership state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub product: Product,
    pub in_cart: bool,
    pub in_wishlist: bool,
}

/// Counts reported after a catalog load
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub product_count: usize,
    pub category_count: usize,
}
