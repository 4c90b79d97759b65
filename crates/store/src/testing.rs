//! In-memory stock/product service for tests.
//!
//! Records every stock update so tests can assert on the remote side effects
//! of cart operations.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use rocketcart_core::{CatalogProduct, Price, ProductId, StockRecord};

use crate::api::{StockApi, StockApiError};

#[derive(Debug, Default)]
struct FakeState {
    stock: HashMap<ProductId, i64>,
    catalog: HashMap<ProductId, CatalogProduct>,
    updates: Vec<StockRecord>,
    stock_reads: usize,
    fail_stock_reads: bool,
    fail_updates: bool,
    mismatched_stock_ids: bool,
}

/// Fake [`StockApi`] backed by hash maps.
#[derive(Debug, Default)]
pub struct FakeStockApi {
    state: Mutex<FakeState>,
}

impl FakeStockApi {
    /// Create an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog product with the given remote stock.
    #[must_use]
    pub fn with_product(self, id: i32, stock: i64) -> Self {
        let id = ProductId::new(id);
        {
            let mut state = self.lock();
            state.catalog.insert(id, catalog_entry(id));
            state.stock.insert(id, stock);
        }
        self
    }

    /// Make every stock read fail.
    pub fn fail_stock_reads(&self, fail: bool) {
        self.lock().fail_stock_reads = fail;
    }

    /// Make every stock update fail.
    pub fn fail_updates(&self, fail: bool) {
        self.lock().fail_updates = fail;
    }

    /// Answer stock reads with a record for a different product id.
    pub fn mismatch_stock_ids(&self, mismatch: bool) {
        self.lock().mismatched_stock_ids = mismatch;
    }

    /// Overwrite remote stock directly.
    pub fn set_stock(&self, id: i32, amount: i64) {
        self.lock().stock.insert(ProductId::new(id), amount);
    }

    /// Current remote stock.
    #[must_use]
    pub fn stock_of(&self, id: i32) -> Option<i64> {
        self.lock().stock.get(&ProductId::new(id)).copied()
    }

    /// Every successful stock update, in order.
    #[must_use]
    pub fn updates(&self) -> Vec<StockRecord> {
        self.lock().updates.clone()
    }

    /// Number of stock reads served or attempted.
    #[must_use]
    pub fn stock_reads(&self) -> usize {
        self.lock().stock_reads
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Catalog entry used for every fake product.
#[must_use]
pub fn catalog_entry(id: ProductId) -> CatalogProduct {
    CatalogProduct {
        id,
        title: format!("Tênis {id}"),
        price: Price::from_cents(13990),
        image: format!("https://cdn.example.com/sneakers/{id}.jpg"),
    }
}

impl StockApi for FakeStockApi {
    async fn get_stock(&self, id: ProductId) -> Result<StockRecord, StockApiError> {
        // Yield so concurrent operations get a chance to interleave.
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.stock_reads += 1;
        if state.fail_stock_reads {
            return Err(StockApiError::Status {
                status: 500,
                body: "stock service unavailable".to_string(),
            });
        }
        let amount = state
            .stock
            .get(&id)
            .copied()
            .ok_or_else(|| StockApiError::NotFound(format!("stock/{id}")))?;
        let id = if state.mismatched_stock_ids {
            ProductId::new(id.as_i32() + 1000)
        } else {
            id
        };
        Ok(StockRecord { id, amount })
    }

    async fn get_product(&self, id: ProductId) -> Result<CatalogProduct, StockApiError> {
        tokio::task::yield_now().await;
        self.lock()
            .catalog
            .get(&id)
            .cloned()
            .ok_or_else(|| StockApiError::NotFound(format!("products/{id}")))
    }

    async fn update_stock(&self, record: StockRecord) -> Result<(), StockApiError> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        if state.fail_updates {
            return Err(StockApiError::Status {
                status: 500,
                body: "stock service unavailable".to_string(),
            });
        }
        state.stock.insert(record.id, record.amount);
        state.updates.push(record);
        Ok(())
    }
}
