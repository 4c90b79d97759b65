//! Cart operation errors.
//!
//! These never leave the store: every public operation catches its
//! `CartError`, logs it and collapses it into a [`Notification`](crate::Notification).

use rocketcart_core::ProductId;
use thiserror::Error;

use crate::api::StockApiError;
use crate::storage::StorageError;

/// Error raised while running a cart operation.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds the remote stock.
    #[error("Out of stock: product {id} requested {requested}, available {available}")]
    OutOfStock {
        id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Requested quantity is zero or negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Product is not in the cart.
    #[error("Product not in cart: {0}")]
    NotFound(ProductId),

    /// Stock/product service call failed.
    #[error("Stock API error: {0}")]
    Api(#[from] StockApiError),

    /// Local storage read or write failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Whether this error means the shopper asked for more than is available.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        matches!(self, Self::OutOfStock { .. } | Self::InvalidAmount(_))
    }
}
