//! Stock/Product service client.
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` returns `{ id, amount }`
//! - `GET /products/{id}` returns the catalog entry
//! - `PUT /stock/{id}` with `{ id, amount }` overwrites the remote stock
//!
//! The service is the source of truth for stock. Stock reads are never
//! cached; catalog entries are cached in memory via `moka`.

mod client;

pub use client::HttpStockClient;

use std::future::Future;

use rocketcart_core::{CatalogProduct, ProductId, StockRecord};
use thiserror::Error;

/// Errors that can occur when talking to the stock/product service.
#[derive(Debug, Error)]
pub enum StockApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the service.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Service returned a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Remote stock and catalog operations used by the cart store.
pub trait StockApi: Send + Sync {
    /// Current remote stock for a product.
    fn get_stock(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<StockRecord, StockApiError>> + Send;

    /// Catalog details for a product.
    fn get_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<CatalogProduct, StockApiError>> + Send;

    /// Overwrite the remote stock for `record.id` with `record.amount`.
    fn update_stock(
        &self,
        record: StockRecord,
    ) -> impl Future<Output = Result<(), StockApiError>> + Send;
}

impl<A: StockApi> StockApi for std::sync::Arc<A> {
    async fn get_stock(&self, id: ProductId) -> Result<StockRecord, StockApiError> {
        (**self).get_stock(id).await
    }

    async fn get_product(&self, id: ProductId) -> Result<CatalogProduct, StockApiError> {
        (**self).get_product(id).await
    }

    async fn update_stock(&self, record: StockRecord) -> Result<(), StockApiError> {
        (**self).update_stock(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_api_error_display() {
        let err = StockApiError::NotFound("stock/12".to_string());
        assert_eq!(err.to_string(), "Not found: stock/12");

        let err = StockApiError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = StockApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
