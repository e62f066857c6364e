//! Suggestion Engine
//!
//! Quick-pick lists derived from a trending pool unioned with the current
//! results, independent of the main ranked list. Suggestions are advisory:
//! selecting one re-seeds the query text and goes back through the
//! orchestrator, never around it.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Category, Product};

/// Cap on each suggestion list
pub const MAX_SUGGESTIONS: usize = 6;

/// Quick-pick suggestions for the current query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub products: Vec<String>,
    pub categories: Vec<String>,
}

/// Derives name and category suggestions from a curated pool
pub struct SuggestionEngine {
    trending: Vec<Product>,
    categories: Vec<Category>,
}

impl SuggestionEngine {
    pub fn new(trending: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            trending,
            categories,
        }
    }

    /// Suggest up to `MAX_SUGGESTIONS` product names and category names
    /// containing the query, case-insensitively.
    ///
    /// Product names are ordered starts-with-query first, then shorter name
    /// first; ties keep pool order (trending before current results). An
    /// empty query yields no suggestions.
    pub fn suggest(&self, query: &str, current_results: &[Product]) -> Suggestions {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Suggestions::default();
        }

        let mut seen_ids: HashSet<&str> = HashSet::new();
        let mut pool: Vec<&Product> = Vec::new();
        for product in self.trending.iter().chain(current_results.iter()) {
            if seen_ids.insert(product.id.as_str()) {
                pool.push(product);
            }
        }

        let mut names: Vec<&str> = pool
            .iter()
            .map(|product| product.name.as_str())
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect();
        names.sort_by_key(|name| (!name.to_lowercase().starts_with(&needle), name.len()));

        let mut seen_names: HashSet<String> = HashSet::new();
        let products: Vec<String> = names
            .into_iter()
            .filter(|name| seen_names.insert(name.to_lowercase()))
            .take(MAX_SUGGESTIONS)
            .map(|name| name.to_string())
            .collect();

        let categories: Vec<String> = self
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .filter(|name| name.to_lowercase().contains(&needle))
            .take(MAX_SUGGESTIONS)
            .map(|name| name.to_string())
            .collect();

        Suggestions {
            products,
            categories,
        }
    }
}

/// Default trending curation: most-reviewed first, rating as tie-break,
/// deduplicated by id, capped at `limit`.
pub fn trending_pool(products: &[Product], limit: usize) -> Vec<Product> {
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut pool: Vec<Product> = products
        .iter()
        .filter(|product| seen_ids.insert(product.id.as_str()))
        .cloned()
        .collect();

    pool.sort_by(|a, b| {
        b.reviews
            .unwrap_or(0)
            .cmp(&a.reviews.unwrap_or(0))
            .then_with(|| {
                b.rating
                    .unwrap_or(0.0)
                    .partial_cmp(&a.rating.unwrap_or(0.0))
                    .unwrap_or(Ordering::Equal)
            })
    });
    pool.truncate(limit);
    pool
}
