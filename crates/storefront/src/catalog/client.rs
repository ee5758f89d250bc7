//! Catalog API client implementation.
//!
//! Plain REST/JSON over `reqwest` 0.13. Read endpoints are cached with
//! `moka`; order submission goes straight through.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::catalog::CatalogError;
use crate::catalog::cache::CacheValue;
use crate::catalog::types::{
    Category, DataEnvelope, GeneralDataEnvelope, OrderConfirmation, OrderRejection, OrderRequest,
    Product, ProductDetail, ProductPage, ProductSort, ProductsEnvelope, SiteSettings, Slider,
};
use crate::config::CatalogConfig;

/// Maximum cached responses.
const CACHE_CAPACITY: u64 = 1000;

/// How much of a response body to include in diagnostics.
const BODY_EXCERPT_LEN: usize = 500;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote catalog API.
///
/// Cheaply cloneable; read responses are cached for the configured TTL.
/// Each cache key carries a generation counter: a fetch records the
/// generation before the request and only inserts if it is unchanged when
/// the response arrives, so an invalidation can never be undone by a
/// response that was already in flight.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
    generations: Mutex<HashMap<String, u64>>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                cache,
                generations: Mutex::new(HashMap::new()),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    /// GET a JSON payload.
    ///
    /// `resource` names what was being fetched, for the 404 error message.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &str,
    ) -> Result<T, CatalogError> {
        let url = self.endpoint(path);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(resource.to_string()));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&body),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse catalog API response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Get one page of the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        page: u32,
        sort: ProductSort,
    ) -> Result<ProductPage, CatalogError> {
        let cache_key = format!("products:{page}:{}", sort.as_wire());

        if let Some(CacheValue::ProductPage(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let generation = self.generation(&cache_key);
        let path = format!("api/all-products?page={page}&sort={}", sort.as_wire());
        let products: ProductPage = self.get_json(&path, "products").await?;

        self.insert_if_current(
            cache_key,
            generation,
            CacheValue::ProductPage(products.clone()),
        )
        .await;

        Ok(products)
    }

    /// Get one page of products in a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown category slug, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn products_by_category(
        &self,
        slug: &str,
        page: u32,
        sort: ProductSort,
    ) -> Result<ProductPage, CatalogError> {
        let cache_key = format!("category-products:{slug}:{page}:{}", sort.as_wire());

        if let Some(CacheValue::ProductPage(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let generation = self.generation(&cache_key);
        let path = format!(
            "api/filter-category-products/{}?page={page}&sort={}",
            urlencoding::encode(slug),
            sort.as_wire()
        );
        let products: ProductPage = self
            .get_json(&path, &format!("category not found: {slug}"))
            .await?;

        self.insert_if_current(
            cache_key,
            generation,
            CacheValue::ProductPage(products.clone()),
        )
        .await;

        Ok(products)
    }

    /// Get one page of products in a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown subcategory slug, or
    /// an error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn products_by_subcategory(
        &self,
        slug: &str,
        page: u32,
        sort: ProductSort,
    ) -> Result<ProductPage, CatalogError> {
        let cache_key = format!("subcategory-products:{slug}:{page}:{}", sort.as_wire());

        if let Some(CacheValue::ProductPage(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for subcategory products");
            return Ok(products);
        }

        let generation = self.generation(&cache_key);
        let path = format!(
            "api/filter-subcategory-products/{}?page={page}&sort={}",
            urlencoding::encode(slug),
            sort.as_wire()
        );
        let products: ProductPage = self
            .get_json(&path, &format!("subcategory not found: {slug}"))
            .await?;

        self.insert_if_current(
            cache_key,
            generation,
            CacheValue::ProductPage(products.clone()),
        )
        .await;

        Ok(products)
    }

    /// Get a product by its slug, with related products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product(&self, slug: &str) -> Result<ProductDetail, CatalogError> {
        let cache_key = format!("product:{slug}");

        if let Some(CacheValue::ProductDetail(detail)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*detail);
        }

        let generation = self.generation(&cache_key);
        let path = format!("api/product/details/{}", urlencoding::encode(slug));
        let envelope: DataEnvelope<ProductDetail> = self
            .get_json(&path, &format!("product not found: {slug}"))
            .await?;
        let detail = envelope.data;

        self.insert_if_current(
            cache_key,
            generation,
            CacheValue::ProductDetail(Box::new(detail.clone())),
        )
        .await;

        Ok(detail)
    }

    /// Get the new-arrival product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn new_arrivals(&self) -> Result<Vec<Product>, CatalogError> {
        self.product_list("new-arrivals", "api/new-arrival/products/list")
            .await
    }

    /// Get the featured product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.product_list("featured-products", "api/feature/products/list")
            .await
    }

    /// Get the discounted product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn discounted_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.product_list("discounted-products", "api/discount/products/list")
            .await
    }

    /// Shared fetch for the curated `{"products": [...]}` list endpoints.
    async fn product_list(&self, kind: &str, path: &str) -> Result<Vec<Product>, CatalogError> {
        let cache_key = format!("{kind}:");

        if let Some(CacheValue::ProductList(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for {kind}");
            return Ok(products);
        }

        let generation = self.generation(&cache_key);
        let envelope: ProductsEnvelope = self.get_json(path, kind).await?;

        self.insert_if_current(
            cache_key,
            generation,
            CacheValue::ProductList(envelope.products.clone()),
        )
        .await;

        Ok(envelope.products)
    }

    // =========================================================================
    // Categories, sliders, settings
    // =========================================================================

    /// Get all categories with their subcategories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let cache_key = "categories:".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let generation = self.generation(&cache_key);
        let envelope: DataEnvelope<Vec<Category>> =
            self.get_json("api/categories", "categories").await?;

        self.insert_if_current(
            cache_key,
            generation,
            CacheValue::Categories(envelope.data.clone()),
        )
        .await;

        Ok(envelope.data)
    }

    /// Get the featured categories shown on the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let cache_key = "featured-categories:".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for featured categories");
            return Ok(categories);
        }

        let generation = self.generation(&cache_key);
        // This endpoint wraps the list in `categories` rather than `data`
        let envelope: crate::catalog::types::CategoriesEnvelope = self
            .get_json("api/get/categories", "featured categories")
            .await?;

        self.insert_if_current(
            cache_key,
            generation,
            CacheValue::Categories(envelope.categories.clone()),
        )
        .await;

        Ok(envelope.categories)
    }

    /// Get the home page banner sliders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn sliders(&self) -> Result<Vec<Slider>, CatalogError> {
        let cache_key = "sliders:".to_string();

        if let Some(CacheValue::Sliders(sliders)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for sliders");
            return Ok(sliders);
        }

        let generation = self.generation(&cache_key);
        let envelope: DataEnvelope<Vec<Slider>> =
            self.get_json("api/home-sliders", "home sliders").await?;

        self.insert_if_current(
            cache_key,
            generation,
            CacheValue::Sliders(envelope.data.clone()),
        )
        .await;

        Ok(envelope.data)
    }

    /// Get shop-wide settings (name, logo, contact details).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn site_settings(&self) -> Result<SiteSettings, CatalogError> {
        let cache_key = "settings:".to_string();

        if let Some(CacheValue::Settings(settings)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for settings");
            return Ok(settings);
        }

        let generation = self.generation(&cache_key);
        let envelope: GeneralDataEnvelope =
            self.get_json("api/general-data", "site settings").await?;

        self.insert_if_current(
            cache_key,
            generation,
            CacheValue::Settings(envelope.general_data.clone()),
        )
        .await;

        Ok(envelope.general_data)
    }

    // =========================================================================
    // Orders (not cached - mutable state)
    // =========================================================================

    /// Submit an order to the order-confirmation endpoint.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::OrderRejected` when the backend rejects the
    /// order with validation errors (HTTP 422), or another error if the
    /// request fails.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn submit_order(
        &self,
        request: &OrderRequest,
    ) -> Result<OrderConfirmation, CatalogError> {
        let url = self.endpoint("api/order/confirm");
        let response = self.inner.client.post(&url).json(request).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            // Laravel-style {message, errors: {field: [messages]}}
            return match serde_json::from_str::<OrderRejection>(&body) {
                Ok(rejection) => Err(CatalogError::OrderRejected(rejection)),
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        body = %excerpt(&body),
                        "Failed to parse order rejection body"
                    );
                    Err(CatalogError::Api {
                        status: status.as_u16(),
                        message: excerpt(&body),
                    })
                }
            };
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&body),
                "Order submission returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse order confirmation"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product detail.
    pub async fn invalidate_product(&self, slug: &str) {
        let cache_key = format!("product:{slug}");
        self.bump_generation(&cache_key);
        self.inner.cache.invalidate(&cache_key).await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.bump_all_generations();
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    /// Current generation for a cache key, registering it if unseen.
    fn generation(&self, cache_key: &str) -> u64 {
        let mut generations = self
            .inner
            .generations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *generations.entry(cache_key.to_string()).or_insert(0)
    }

    fn bump_generation(&self, cache_key: &str) {
        let mut generations = self
            .inner
            .generations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *generations.entry(cache_key.to_string()).or_insert(0) += 1;
    }

    fn bump_all_generations(&self) {
        let mut generations = self
            .inner
            .generations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for generation in generations.values_mut() {
            *generation += 1;
        }
    }

    /// Insert into the cache only if the key's generation has not moved
    /// since the fetch began. A stale in-flight response is dropped here.
    async fn insert_if_current(&self, cache_key: String, generation: u64, value: CacheValue) {
        if self.generation(&cache_key) == generation {
            self.inner.cache.insert(cache_key, value).await;
        } else {
            debug!(key = %cache_key, "Discarding superseded response");
        }
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LEN).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_client() -> CatalogClient {
        let config = CatalogConfig {
            api_url: url::Url::parse("https://catalog.example.com").unwrap(),
            cache_ttl_secs: 300,
        };
        CatalogClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = test_client();
        assert_eq!(
            client.endpoint("api/home-sliders"),
            "https://catalog.example.com/api/home-sliders"
        );
    }

    #[tokio::test]
    async fn test_stale_response_is_not_cached_after_invalidation() {
        let client = test_client();
        let key = "sliders:".to_string();

        // A fetch records the generation before the request goes out
        let generation = client.generation(&key);

        // The key is invalidated while the fetch is in flight
        client.bump_generation(&key);

        client
            .insert_if_current(key.clone(), generation, CacheValue::Sliders(Vec::new()))
            .await;

        assert!(client.inner.cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_current_response_is_cached() {
        let client = test_client();
        let key = "sliders:".to_string();

        let generation = client.generation(&key);
        client
            .insert_if_current(key.clone(), generation, CacheValue::Sliders(Vec::new()))
            .await;

        assert!(matches!(
            client.inner.cache.get(&key).await,
            Some(CacheValue::Sliders(_))
        ));
    }

    #[tokio::test]
    async fn test_invalidate_all_bumps_every_tracked_key() {
        let client = test_client();

        let sliders_generation = client.generation("sliders:");
        let products_generation = client.generation("products:1:newest");

        client.invalidate_all().await;

        assert_eq!(client.generation("sliders:"), sliders_generation + 1);
        assert_eq!(
            client.generation("products:1:newest"),
            products_generation + 1
        );
    }
}
