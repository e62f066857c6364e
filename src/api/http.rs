//! HTTP Backend Client
//!
//! `reqwest`-backed implementation of the `StorefrontApi` trait against the
//! storefront REST endpoints. Timeouts live here; the orchestrator imposes
//! none of its own.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::StorefrontApi;
use crate::models::{Category, MembershipSets, Product};
use crate::utils::error::{AppError, AppResult};

/// Default request timeout for backend calls
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the storefront backend
pub struct HttpStorefrontApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStorefrontApi {
    /// Create a client with the default timeout
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {}", e)))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON payload, mapping transport and status failures to
    /// `AppError::Remote`
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<(&str, &str)>,
    ) -> AppResult<T> {
        let mut request = self.client.get(self.url(path));
        if let Some((key, value)) = query {
            request = request.query(&[(key, value)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::remote(format!("GET {} failed: {}", path, e)))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::remote(format!(
                "GET {} returned status {}: {}",
                path, status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::remote(format!("Failed to parse response from {}: {}", path, e)))
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn fetch_all_products(&self) -> AppResult<Vec<Product>> {
        self.get_json("/products", None).await
    }

    async fn fetch_categories(&self) -> AppResult<Vec<Category>> {
        self.get_json("/categories", None).await
    }

    async fn remote_search(&self, query: &str) -> AppResult<Vec<Product>> {
        self.get_json("/products/search", Some(("q", query))).await
    }

    async fn membership_sets(&self) -> AppResult<MembershipSets> {
        self.get_json("/account/membership", None).await
    }
}
