//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rocketcart show
//!
//! # Add one unit of product 3
//! rocketcart add 3
//!
//! # Set product 3 to 2 units
//! rocketcart update 3 2
//!
//! # Remove product 3
//! rocketcart remove 3
//!
//! # Header badge text
//! rocketcart badge
//! ```
//!
//! # Environment Variables
//!
//! See `rocketcart_store::config` for the full list.

use std::fmt::Write as _;

use rocketcart_core::{Product, ProductId, cart_size, cart_size_label, cart_total, format_price};
use rocketcart_store::{
    CartStore, ConfigError, FileStorage, HttpStockClient, Notification, StockApi, StockApiError,
    Storage, StorageError, StoreConfig,
};
use thiserror::Error;
use tokio::sync::broadcast;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Stock client could not be created.
    #[error("Stock API error: {0}")]
    Api(#[from] StockApiError),

    /// Stored cart could not be loaded.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The store rejected the operation and notified the shopper.
    #[error("{}", join_messages(.0))]
    Rejected(Vec<Notification>),
}

fn join_messages(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(|n| n.message())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Open the store described by `config`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the stored cart is
/// unreadable.
pub fn open_store(
    config: &StoreConfig,
) -> Result<CartStore<HttpStockClient, FileStorage>, CartCommandError> {
    let api = HttpStockClient::new(config)?;
    let storage = FileStorage::new(&config.storage_path);
    tracing::debug!(
        api_url = %api.base_url(),
        storage = %storage.path().display(),
        "Opening cart store"
    );
    Ok(CartStore::new(api, storage)?)
}

/// Print the cart.
pub async fn show<A: StockApi, S: Storage>(store: &CartStore<A, S>) {
    print_out(&render_cart(&store.cart().await));
}

/// Print the header badge label.
pub async fn badge<A: StockApi, S: Storage>(store: &CartStore<A, S>) {
    print_out(&cart_size_label(store.cart_size().await));
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns [`CartCommandError::Rejected`] if the store emitted notifications.
pub async fn add<A: StockApi, S: Storage>(
    store: &CartStore<A, S>,
    id: ProductId,
) -> Result<(), CartCommandError> {
    let mut notifications = store.notifications();
    store.add_product(id).await;
    finish(store, &mut notifications).await
}

/// Remove a product line.
///
/// # Errors
///
/// Returns [`CartCommandError::Rejected`] if the store emitted notifications.
pub async fn remove<A: StockApi, S: Storage>(
    store: &CartStore<A, S>,
    id: ProductId,
) -> Result<(), CartCommandError> {
    let mut notifications = store.notifications();
    store.remove_product(id).await;
    finish(store, &mut notifications).await
}

/// Set the quantity of a product line.
///
/// # Errors
///
/// Returns [`CartCommandError::Rejected`] if the store emitted notifications.
pub async fn update<A: StockApi, S: Storage>(
    store: &CartStore<A, S>,
    id: ProductId,
    amount: i64,
) -> Result<(), CartCommandError> {
    let mut notifications = store.notifications();
    store.update_product_amount(id, amount).await;
    finish(store, &mut notifications).await
}

async fn finish<A: StockApi, S: Storage>(
    store: &CartStore<A, S>,
    notifications: &mut broadcast::Receiver<Notification>,
) -> Result<(), CartCommandError> {
    let mut emitted = Vec::new();
    while let Ok(notification) = notifications.try_recv() {
        emitted.push(notification);
    }
    if !emitted.is_empty() {
        return Err(CartCommandError::Rejected(emitted));
    }
    show(store).await;
    Ok(())
}

/// Render the cart as a plain-text table.
#[must_use]
pub fn render_cart(cart: &[Product]) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    for line in cart {
        let _ = writeln!(
            out,
            "#{:<4} {:<40} {:>3} x {:>10} = {:>10}",
            line.id,
            line.title,
            line.amount,
            format_price(line.price),
            format_price(line.subtotal()),
        );
    }
    let _ = write!(
        out,
        "{} | total {}",
        cart_size_label(cart_size(cart)),
        format_price(cart_total(cart))
    );
    out
}

#[allow(clippy::print_stdout)]
fn print_out(text: &str) {
    println!("{text}");
}
