//! Result Merging and Ranking
//!
//! Single owner of final result order. Local candidates and remote results
//! are produced independently and combined here in one deterministic step:
//! dedup by product id with local-before-remote priority (the relevance
//! order), then an optional stable re-sort for the other sort orders over
//! the entire combined list.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::services::search::matcher::LocalCandidate;

/// Available result orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Merge order: local matches by score, then remote arrivals
    #[default]
    Relevance,
    /// Price, ascending
    Price,
    /// Parsed createdAt, descending; unparsable dates sort oldest
    Newest,
    /// Rating, descending; missing rating counts as 0
    Rating,
    /// Review count, descending; missing counts as 0
    Popularity,
}

impl SortOrder {
    /// Parse from string, defaulting to Relevance
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "price" => Self::Price,
            "newest" => Self::Newest,
            "rating" => Self::Rating,
            "popularity" => Self::Popularity,
            _ => Self::Relevance,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Relevance => "relevance",
            Self::Price => "price",
            Self::Newest => "newest",
            Self::Rating => "rating",
            Self::Popularity => "popularity",
        };
        write!(f, "{}", name)
    }
}

/// Combine local and remote results into the relevance order.
///
/// Every local candidate (already score-sorted) precedes every remote-only
/// result regardless of the backend's internal ordering; duplicates by id
/// keep their first (local) position.
pub fn merge_ranked(local: Vec<LocalCandidate>, remote: Vec<Product>) -> Vec<Product> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<Product> = Vec::new();

    for candidate in local {
        if seen.insert(candidate.product.id.clone()) {
            merged.push(candidate.product);
        }
    }
    for product in remote {
        if seen.insert(product.id.clone()) {
            merged.push(product);
        }
    }
    merged
}

/// Re-sort a merge-ordered list for the requested sort order.
///
/// All sorts are stable, so equal keys preserve merge order. `Relevance`
/// returns the list unchanged.
pub fn apply_sort(mut products: Vec<Product>, sort: SortOrder) -> Vec<Product> {
    match sort {
        SortOrder::Relevance => {}
        SortOrder::Price => {
            products.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));
        }
        SortOrder::Newest => {
            products.sort_by(|a, b| created_timestamp(b).cmp(&created_timestamp(a)));
        }
        SortOrder::Rating => {
            products.sort_by(|a, b| {
                b.rating
                    .unwrap_or(0.0)
                    .partial_cmp(&a.rating.unwrap_or(0.0))
                    .unwrap_or(Ordering::Equal)
            });
        }
        SortOrder::Popularity => {
            products.sort_by(|a, b| b.reviews.unwrap_or(0).cmp(&a.reviews.unwrap_or(0)));
        }
    }
    products
}

/// createdAt as a unix timestamp; missing or unparsable values become the
/// epoch and therefore sort oldest
fn created_timestamp(product: &Product) -> i64 {
    product
        .created_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.timestamp())
        .unwrap_or(0)
}
