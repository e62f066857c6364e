//! Storefront Search - Client-Side Search Library
//!
//! Product search for a storefront client. It combines:
//! - A local fuzzy matcher over the loaded catalog
//! - An authoritative remote search, merged and deduplicated
//! - Debounced query orchestration with supersession and result caching
//! - Suggestions, persisted recent searches, and membership decoration

pub mod api;
pub mod models;
pub mod services;
pub mod utils;

pub use api::{HttpStorefrontApi, StorefrontApi};
pub use models::{CatalogSummary, Category, MembershipSets, Product, ResultRow};
pub use services::{
    MembershipChange, MembershipWatch, RecentSearchStore, SearchConfig, SearchOutcome,
    SearchService, SettledSearch, SortOrder, SuggestionEngine, Suggestions,
};
pub use utils::error::{AppError, AppResult};
