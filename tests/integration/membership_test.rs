//! Membership Decoration Integration Tests
//!
//! Settled search results decorated with cart/wishlist state, and the
//! decoration tracking membership changes signaled through the watch.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use storefront_search::api::StorefrontApi;
use storefront_search::models::{Category, MembershipSets, Product};
use storefront_search::services::membership::{MembershipChange, MembershipWatch};
use storefront_search::services::search::{
    SearchConfig, SearchOutcome, SearchService, SettledSearch, SortOrder,
};
use storefront_search::utils::error::AppResult;

struct MembershipBackend {
    products: Vec<Product>,
    sets: Mutex<MembershipSets>,
}

impl MembershipBackend {
    fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            sets: Mutex::new(MembershipSets::default()),
        }
    }

    fn put_in_cart(&self, id: &str) {
        self.sets.lock().unwrap().cart.insert(id.to_string());
    }

    fn put_in_wishlist(&self, id: &str) {
        self.sets.lock().unwrap().wishlist.insert(id.to_string());
    }
}

#[async_trait]
impl StorefrontApi for MembershipBackend {
    async fn fetch_all_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn fetch_categories(&self) -> AppResult<Vec<Category>> {
        Ok(Vec::new())
    }

    async fn remote_search(&self, _query: &str) -> AppResult<Vec<Product>> {
        Ok(Vec::new())
    }

    async fn membership_sets(&self) -> AppResult<MembershipSets> {
        Ok(self.sets.lock().unwrap().clone())
    }
}

fn sneaker_backend() -> Arc<MembershipBackend> {
    Arc::new(MembershipBackend::new(vec![
        Product::new("p1", "Red Sneakers", 60.0),
        Product::new("p2", "Canvas Sneaker", 40.0),
    ]))
}

async fn settle(service: &SearchService, query: &str) -> SettledSearch {
    match service.search(query, SortOrder::Relevance).await {
        SearchOutcome::Settled(settled) => settled,
        SearchOutcome::Superseded { sequence } => {
            panic!("cycle {sequence} was unexpectedly superseded")
        }
    }
}

#[tokio::test]
async fn test_search_results_carry_membership_flags() {
    let backend = sneaker_backend();
    backend.put_in_cart("p1");
    backend.put_in_wishlist("p2");

    let service = SearchService::new(backend.clone()).with_config(SearchConfig {
        debounce_ms: 5,
        ..SearchConfig::default()
    });
    service.load_catalog().await.unwrap();
    let watch = MembershipWatch::new(backend.clone());
    watch.refresh().await.unwrap();

    let settled = settle(&service, "sneaker").await;
    let rows = watch.decorate(&settled.results);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product.id, "p2");
    assert!(rows[0].in_wishlist);
    assert!(!rows[0].in_cart);
    assert_eq!(rows[1].product.id, "p1");
    assert!(rows[1].in_cart);
    assert!(!rows[1].in_wishlist);
}

#[tokio::test]
async fn test_decoration_follows_membership_changes() {
    let backend = sneaker_backend();
    let service = SearchService::new(backend.clone()).with_config(SearchConfig {
        debounce_ms: 5,
        ..SearchConfig::default()
    });
    service.load_catalog().await.unwrap();
    let watch = MembershipWatch::new(backend.clone());
    watch.refresh().await.unwrap();

    let settled = settle(&service, "sneaker").await;
    let before = watch.decorate(&settled.results);
    assert!(before.iter().all(|row| !row.in_cart && !row.in_wishlist));

    let mut rx = watch.subscribe();
    backend.put_in_cart("p1");
    watch.cart_changed().await;

    assert_eq!(rx.recv().await, Ok(MembershipChange::Cart));
    let after = watch.decorate(&settled.results);
    let p1 = after.iter().find(|row| row.product.id == "p1").unwrap();
    assert!(p1.in_cart);
}
