//! Search Flow Integration Tests
//!
//! Drives full search cycles through `SearchService` against a scripted
//! backend: local/remote merge and ordering, sort switching served from
//! cache, remote outage degradation and recovery, and supersession under
//! rapid resubmission.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use storefront_search::api::StorefrontApi;
use storefront_search::models::{Category, MembershipSets, Product};
use storefront_search::services::search::{
    SearchConfig, SearchOutcome, SearchService, SettledSearch, SortOrder,
};
use storefront_search::utils::error::{AppError, AppResult};

// ============================================================================
// Scripted Backend
// ============================================================================

/// Backend with canned responses, a remote outage switch, and a call counter.
struct ScriptedBackend {
    products: Vec<Product>,
    remote_results: Vec<Product>,
    remote_delay_ms: u64,
    remote_down: AtomicBool,
    remote_calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(products: Vec<Product>, remote_results: Vec<Product>) -> Self {
        Self {
            products,
            remote_results,
            remote_delay_ms: 0,
            remote_down: AtomicBool::new(false),
            remote_calls: AtomicUsize::new(0),
        }
    }

    fn set_remote_down(&self, down: bool) {
        self.remote_down.store(down, Ordering::SeqCst);
    }

    fn remote_call_count(&self) -> usize {
        self.remote_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorefrontApi for ScriptedBackend {
    async fn fetch_all_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn fetch_categories(&self) -> AppResult<Vec<Category>> {
        Ok(Vec::new())
    }

    async fn remote_search(&self, _query: &str) -> AppResult<Vec<Product>> {
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        if self.remote_delay_ms > 0 {
            sleep(Duration::from_millis(self.remote_delay_ms)).await;
        }
        if self.remote_down.load(Ordering::SeqCst) {
            return Err(AppError::remote("storefront backend unreachable"));
        }
        Ok(self.remote_results.clone())
    }

    async fn membership_sets(&self) -> AppResult<MembershipSets> {
        Ok(MembershipSets::default())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn product(id: &str, name: &str, price: f64) -> Product {
    Product::new(id, name, price)
}

/// A catalog of two sneakers and a lamp, with one overlapping remote result.
fn sneaker_backend() -> ScriptedBackend {
    ScriptedBackend::new(
        vec![
            product("p1", "Red Sneakers", 60.0),
            product("p2", "Canvas Sneaker", 40.0),
            product("p3", "Desk Lamp", 15.0),
        ],
        vec![
            product("p1", "Red Sneakers", 60.0),
            product("r1", "Trail Sneaker", 20.0),
        ],
    )
}

fn quick_service(backend: Arc<ScriptedBackend>) -> SearchService {
    SearchService::new(backend).with_config(SearchConfig {
        debounce_ms: 5,
        recent_idle_ms: 20,
        ..SearchConfig::default()
    })
}

fn settle(outcome: SearchOutcome) -> SettledSearch {
    match outcome {
        SearchOutcome::Settled(settled) => settled,
        SearchOutcome::Superseded { sequence } => {
            panic!("cycle {sequence} was unexpectedly superseded")
        }
    }
}

fn ids(results: &[Product]) -> Vec<&str> {
    results.iter().map(|p| p.id.as_str()).collect()
}

// ============================================================================
// Merge and Ordering Tests
// ============================================================================

#[tokio::test]
async fn test_full_cycle_orders_local_before_remote() {
    let backend = Arc::new(sneaker_backend());
    let service = quick_service(backend.clone());
    service.load_catalog().await.unwrap();

    let settled = settle(service.search("sneaker", SortOrder::Relevance).await);

    // "Canvas Sneaker" carries an exact word match and outranks the prefix
    // match; the remote duplicate of p1 is dropped, the new remote id
    // appends after all local candidates.
    assert_eq!(ids(&settled.results), vec!["p2", "p1", "r1"]);
    assert!(!settled.remote_degraded);
    assert_eq!(backend.remote_call_count(), 1);
}

#[tokio::test]
async fn test_price_sort_spans_local_and_remote() {
    let backend = Arc::new(sneaker_backend());
    let service = quick_service(backend.clone());
    service.load_catalog().await.unwrap();

    let settled = settle(service.search("sneaker", SortOrder::Price).await);
    assert_eq!(ids(&settled.results), vec!["r1", "p2", "p1"]);
}

#[tokio::test]
async fn test_sort_switch_serves_from_cache() {
    let backend = Arc::new(sneaker_backend());
    let service = quick_service(backend.clone());
    service.load_catalog().await.unwrap();

    settle(service.search("sneaker", SortOrder::Relevance).await);
    assert_eq!(backend.remote_call_count(), 1);

    let by_price = service
        .cached("sneaker", SortOrder::Price)
        .expect("settled query should be served from cache");
    assert_eq!(ids(&by_price), vec!["r1", "p2", "p1"]);

    let by_relevance = service
        .cached("Sneaker", SortOrder::Relevance)
        .expect("cache lookups are case-insensitive");
    assert_eq!(ids(&by_relevance), vec!["p2", "p1", "r1"]);

    // Re-sorting never touched the backend.
    assert_eq!(backend.remote_call_count(), 1);
}

// ============================================================================
// Degradation Tests
// ============================================================================

#[tokio::test]
async fn test_remote_outage_degrades_then_recovers() {
    let backend = Arc::new(sneaker_backend());
    backend.set_remote_down(true);
    let service = quick_service(backend.clone());
    service.load_catalog().await.unwrap();

    let degraded = settle(service.search("sneaker", SortOrder::Relevance).await);
    assert!(degraded.remote_degraded);
    assert!(degraded.remote_error.is_some());
    assert_eq!(ids(&degraded.results), vec!["p2", "p1"]);

    backend.set_remote_down(false);
    let recovered = settle(service.search("sneaker", SortOrder::Relevance).await);
    assert!(!recovered.remote_degraded);
    assert_eq!(ids(&recovered.results), vec!["p2", "p1", "r1"]);
    assert_eq!(backend.remote_call_count(), 2);
}

#[tokio::test]
async fn test_whitespace_input_is_inert() {
    let backend = Arc::new(sneaker_backend());
    let service = quick_service(backend.clone());
    service.load_catalog().await.unwrap();

    let settled = settle(service.search("   ", SortOrder::Relevance).await);
    assert!(settled.is_empty());
    assert_eq!(backend.remote_call_count(), 0);
    assert!(service.cached("", SortOrder::Relevance).is_none());
}

// ============================================================================
// Supersession Tests
// ============================================================================

#[tokio::test]
async fn test_rapid_resubmission_settles_only_latest() {
    let mut backend = sneaker_backend();
    backend.remote_delay_ms = 60;
    let backend = Arc::new(backend);
    let service = Arc::new(quick_service(backend.clone()));
    service.load_catalog().await.unwrap();

    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.search("s", SortOrder::Relevance).await })
    };
    sleep(Duration::from_millis(15)).await;
    let second = {
        let service = service.clone();
        tokio::spawn(async move { service.search("sn", SortOrder::Relevance).await })
    };
    sleep(Duration::from_millis(15)).await;
    let latest = settle(service.search("sneaker", SortOrder::Relevance).await);

    assert!(first.await.unwrap().is_superseded());
    assert!(second.await.unwrap().is_superseded());
    assert_eq!(ids(&latest.results), vec!["p2", "p1", "r1"]);
}
