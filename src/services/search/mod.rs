//! Product Search Orchestrator
//!
//! Coordinates a full search cycle: debounce, local candidate ranking,
//! remote lookup, merge, sort, cache fill, and recent-search recording.
//! Every submission takes a monotonically increasing sequence number; a
//! cycle that finds a newer number at a resumption point abandons its work,
//! so a slow response can never overwrite a fresher one.
//!
//! ## Stale-While-Revalidate
//!
//! Merge-ordered result lists are cached per normalized query. Callers show
//! the cached list immediately (`cached`) while `search` runs the full cycle
//! and refreshes the entry. Sort order is applied on read, so re-sorting an
//! already-fetched query never touches the backend.
//!
//! ## Degradation
//!
//! A failing backend never fails a search. Remote errors are logged, the
//! cycle continues with local candidates only, and the settled outcome
//! carries `remote_degraded` so callers can surface a notice.

pub mod matcher;
pub mod merge;
pub mod recent;
pub mod scoring;
pub mod suggestions;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use mini_moka::sync::Cache;
use tokio::time::sleep;

use crate::api::StorefrontApi;
use crate::models::{CatalogSummary, Product};
use crate::utils::error::AppResult;

pub use matcher::{default_synonyms, ExpandedQuery, LocalCandidate};
pub use merge::SortOrder;
pub use recent::RecentSearchStore;
pub use suggestions::{SuggestionEngine, Suggestions};

use matcher::rank_local;
use merge::{apply_sort, merge_ranked};
use suggestions::trending_pool;

/// Pause between accepting a query and starting work, absorbing keystroke
/// bursts so only the final form of a word runs a cycle.
const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// How long a query must stay current before it enters the recent-search
/// store.
const DEFAULT_RECENT_IDLE_MS: u64 = 400;

/// Maximum number of cached merge-ordered result lists.
const DEFAULT_CACHE_CAPACITY: u64 = 512;

/// How many products the trending pool keeps for suggestions.
const DEFAULT_TRENDING_POOL_SIZE: usize = 12;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the search cycle.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Milliseconds to wait after submission before doing any work.
    pub debounce_ms: u64,
    /// Milliseconds a settled query must remain current before being
    /// recorded as a recent search.
    pub recent_idle_ms: u64,
    /// Synonym table used for query expansion.
    pub synonyms: HashMap<String, Vec<String>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            recent_idle_ms: DEFAULT_RECENT_IDLE_MS,
            synonyms: default_synonyms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// A search cycle that ran to completion.
#[derive(Debug, Clone)]
pub struct SettledSearch {
    /// Sequence number of the submission that produced these results.
    pub sequence: u64,
    /// Results in the requested sort order.
    pub results: Vec<Product>,
    /// `true` when the remote lookup failed and only local candidates
    /// are included.
    pub remote_degraded: bool,
    /// Human-readable reason when `remote_degraded` is `true`.
    pub remote_error: Option<String>,
}

impl SettledSearch {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Outcome of a submitted search.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// The cycle completed; results were current as of settlement.
    Settled(SettledSearch),
    /// A newer submission arrived mid-cycle; no results were produced.
    Superseded { sequence: u64 },
}

impl SearchOutcome {
    /// Results of a settled cycle, `None` when superseded.
    pub fn results(&self) -> Option<&[Product]> {
        match self {
            SearchOutcome::Settled(settled) => Some(&settled.results),
            SearchOutcome::Superseded { .. } => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, SearchOutcome::Superseded { .. })
    }
}

// ---------------------------------------------------------------------------
// SearchService
// ---------------------------------------------------------------------------

/// Everything derived from one catalog load, swapped atomically on reload.
struct CatalogSnapshot {
    products: Vec<Product>,
    suggestions: SuggestionEngine,
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            suggestions: SuggestionEngine::new(Vec::new(), Vec::new()),
        }
    }
}

/// Orchestrates search cycles against a catalog snapshot and a remote
/// backend.
///
/// The service is `Send + Sync`; one instance serves all submissions.
/// Supersession is tracked with a single atomic counter rather than task
/// handles, so abandoned cycles simply run to their next checkpoint and
/// return without side effects.
pub struct SearchService {
    backend: Arc<dyn StorefrontApi>,
    config: SearchConfig,
    catalog: RwLock<Arc<CatalogSnapshot>>,
    /// Merge-ordered result lists keyed by normalized query.
    cache: Cache<String, Arc<Vec<Product>>>,
    /// Monotonic submission counter; the latest value is the only live query.
    sequence: Arc<AtomicU64>,
    recent: Option<Arc<RecentSearchStore>>,
}

impl SearchService {
    pub fn new(backend: Arc<dyn StorefrontApi>) -> Self {
        Self {
            backend,
            config: SearchConfig::default(),
            catalog: RwLock::new(Arc::new(CatalogSnapshot::default())),
            cache: Cache::builder()
                .max_capacity(DEFAULT_CACHE_CAPACITY)
                .build(),
            sequence: Arc::new(AtomicU64::new(0)),
            recent: None,
        }
    }

    /// Builder-style override of the default configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a recent-search store; without one, recording is skipped.
    pub fn with_recent_store(mut self, store: Arc<RecentSearchStore>) -> Self {
        self.recent = Some(store);
        self
    }

    /// Pull the full catalog from the backend and rebuild the local index.
    ///
    /// Product failures are fatal because nothing else works without them.
    /// Category failures only degrade suggestions and are logged instead.
    pub async fn load_catalog(&self) -> AppResult<CatalogSummary> {
        let products = self.backend.fetch_all_products().await?;
        let categories = match self.backend.fetch_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                tracing::warn!("category fetch failed, suggestions degraded: {}", e);
                Vec::new()
            }
        };

        let summary = CatalogSummary {
            product_count: products.len(),
            category_count: categories.len(),
        };

        let trending = trending_pool(&products, DEFAULT_TRENDING_POOL_SIZE);
        let snapshot = Arc::new(CatalogSnapshot {
            suggestions: SuggestionEngine::new(trending, categories),
            products,
        });
        {
            let mut guard = self
                .catalog
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = snapshot;
        }

        tracing::info!(
            products = summary.product_count,
            categories = summary.category_count,
            "catalog loaded"
        );
        Ok(summary)
    }

    fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.catalog
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Cached merge-ordered results for a query, re-sorted per `sort`.
    ///
    /// Returns `None` for unseen and empty queries. Intended for showing
    /// stale results immediately while `search` revalidates.
    pub fn cached(&self, raw: &str, sort: SortOrder) -> Option<Vec<Product>> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        self.cache
            .get(&normalized)
            .map(|merged| apply_sort(merged.as_ref().clone(), sort))
    }

    /// Run one full search cycle for `raw`.
    ///
    /// Never fails: remote errors degrade to local-only results. The outcome
    /// is `Superseded` when a newer submission arrived during the debounce
    /// pause or the remote lookup.
    pub async fn search(&self, raw: &str, sort: SortOrder) -> SearchOutcome {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let query = ExpandedQuery::parse(raw, &self.config.synonyms);

        // Whitespace-only input settles immediately with nothing: no
        // debounce, no remote call, no cache entry. Taking a sequence
        // number first still cancels any in-flight cycle.
        if query.is_empty() {
            return SearchOutcome::Settled(SettledSearch {
                sequence,
                results: Vec::new(),
                remote_degraded: false,
                remote_error: None,
            });
        }

        sleep(Duration::from_millis(self.config.debounce_ms)).await;
        if self.superseded(sequence) {
            return SearchOutcome::Superseded { sequence };
        }

        let snapshot = self.snapshot();
        let local = rank_local(&snapshot.products, &query);

        let (remote, remote_error) = match self.backend.remote_search(&query.raw).await {
            Ok(products) => (products, None),
            Err(e) => {
                tracing::warn!(query = %query.normalized, "remote search failed: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        };
        if self.superseded(sequence) {
            return SearchOutcome::Superseded { sequence };
        }

        let merged = merge_ranked(local, remote);
        self.cache
            .insert(query.normalized.clone(), Arc::new(merged.clone()));
        let results = apply_sort(merged, sort);

        self.schedule_recent_record(sequence, query.raw.clone());

        tracing::debug!(
            query = %query.normalized,
            results = results.len(),
            degraded = remote_error.is_some(),
            "search settled"
        );
        SearchOutcome::Settled(SettledSearch {
            sequence,
            results,
            remote_degraded: remote_error.is_some(),
            remote_error,
        })
    }

    /// Suggestions for the dropdown, drawn from the current catalog snapshot.
    pub fn suggestions(&self, raw: &str, current_results: &[Product]) -> Suggestions {
        self.snapshot().suggestions.suggest(raw, current_results)
    }

    fn superseded(&self, sequence: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) != sequence
    }

    /// Record `raw` as a recent search once it has stayed current for the
    /// idle window. Fire-and-forget; a newer submission during the wait
    /// cancels the record.
    fn schedule_recent_record(&self, sequence: u64, raw: String) {
        if let Some(store) = &self.recent {
            let store = store.clone();
            let counter = self.sequence.clone();
            let idle = Duration::from_millis(self.config.recent_idle_ms);
            tokio::spawn(async move {
                sleep(idle).await;
                if counter.load(Ordering::SeqCst) == sequence {
                    store.record(&raw);
                }
            });
        }
    }
}
