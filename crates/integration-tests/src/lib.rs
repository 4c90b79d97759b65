//! Integration tests for RocketCart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_http` - Cart store against an in-process stock service over HTTP
//! - `cart_persistence` - Cart store over file-backed local storage
//!
//! [`StockServer`] serves the same endpoints as the real stock/product
//! service from memory, on an ephemeral local port.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use rocketcart_core::{CatalogProduct, ProductId, StockRecord};
use rocketcart_store::testing::catalog_entry;

#[derive(Debug, Default)]
struct ServerState {
    stock: HashMap<ProductId, i64>,
    catalog: HashMap<ProductId, CatalogProduct>,
    stock_updates: Vec<StockRecord>,
    product_hits: usize,
    authorization: Vec<Option<String>>,
}

type Shared = Arc<Mutex<ServerState>>;

fn lock(state: &Shared) -> std::sync::MutexGuard<'_, ServerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process stock/product service.
pub struct StockServer {
    addr: SocketAddr,
    state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl StockServer {
    /// Start a server with the given `(product id, stock)` entries.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(products: &[(i32, i64)]) -> Self {
        let mut state = ServerState::default();
        for &(id, stock) in products {
            let id = ProductId::new(id);
            state.catalog.insert(id, catalog_entry(id));
            state.stock.insert(id, stock);
        }
        let state: Shared = Arc::new(Mutex::new(state));

        let app = Router::new()
            .route("/stock/{id}", get(get_stock).put(put_stock))
            .route("/products/{id}", get(get_product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read local address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL of the server.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Current remote stock for a product.
    #[must_use]
    pub fn stock_of(&self, id: i32) -> Option<i64> {
        lock(&self.state).stock.get(&ProductId::new(id)).copied()
    }

    /// Every `PUT /stock/{id}` body received, in order.
    #[must_use]
    pub fn stock_updates(&self) -> Vec<StockRecord> {
        lock(&self.state).stock_updates.clone()
    }

    /// Number of `GET /products/{id}` requests served.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        lock(&self.state).product_hits
    }

    /// `Authorization` header of every request received.
    #[must_use]
    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        lock(&self.state).authorization.clone()
    }
}

impl Drop for StockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn record_auth(state: &Shared, headers: &HeaderMap) {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    lock(state).authorization.push(value);
}

async fn get_stock(
    State(state): State<Shared>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<StockRecord>, StatusCode> {
    record_auth(&state, &headers);
    let id = ProductId::new(id);
    let amount = lock(&state)
        .stock
        .get(&id)
        .copied()
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(StockRecord { id, amount }))
}

async fn put_stock(
    State(state): State<Shared>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(record): Json<StockRecord>,
) -> Result<Json<StockRecord>, StatusCode> {
    record_auth(&state, &headers);
    if record.id != ProductId::new(id) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut state = lock(&state);
    state.stock.insert(record.id, record.amount);
    state.stock_updates.push(record);
    Ok(Json(record))
}

async fn get_product(
    State(state): State<Shared>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<CatalogProduct>, StatusCode> {
    record_auth(&state, &headers);
    let mut state = lock(&state);
    state.product_hits += 1;
    state
        .catalog
        .get(&ProductId::new(id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
