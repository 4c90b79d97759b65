//! HTTP implementation of [`StockApi`] over `reqwest`.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use rocketcart_core::{CatalogProduct, ProductId, StockRecord};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{StockApi, StockApiError};
use crate::config::StoreConfig;

/// Maximum number of catalog entries kept in memory.
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// Client for the stock/product service.
///
/// Cheap to clone; clones share the connection pool and catalog cache.
#[derive(Clone)]
pub struct HttpStockClient {
    inner: Arc<HttpStockClientInner>,
}

struct HttpStockClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    products: Cache<ProductId, CatalogProduct>,
}

impl HttpStockClient {
    /// Create a new client from store configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, StockApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(HttpStockClientInner {
                client,
                base_url: config.api_url.clone(),
                token: config.api_token.clone(),
                products,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, StockApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.inner.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<String, StockApiError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(StockApiError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(StockApiError::NotFound(path.to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Stock service returned non-success status"
            );
            return Err(StockApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    /// GET a JSON resource.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StockApiError> {
        let url = self.endpoint(path)?;
        let body = self.send(self.inner.client.get(url), path).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse stock service response"
            );
            StockApiError::Parse(e)
        })
    }
}

impl StockApi for HttpStockClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_stock(&self, id: ProductId) -> Result<StockRecord, StockApiError> {
        self.get_json(&format!("stock/{id}")).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<CatalogProduct, StockApiError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: CatalogProduct = self.get_json(&format!("products/{id}")).await?;

        self.inner.products.insert(id, product.clone()).await;

        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %record.id, amount = record.amount))]
    async fn update_stock(&self, record: StockRecord) -> Result<(), StockApiError> {
        let path = format!("stock/{}", record.id);
        let url = self.endpoint(&path)?;
        // The service echoes the record back; the body carries nothing new.
        self.send(self.inner.client.put(url).json(&record), &path)
            .await?;
        Ok(())
    }
}
