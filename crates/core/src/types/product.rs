//! Cart line items, catalog entries and stock records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A catalog entry as served by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
}

/// A cart line item.
///
/// Unique by `id` within a cart. `amount` is the quantity held in the cart
/// and is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    pub amount: i64,
}

impl Product {
    /// Build a line item from a catalog entry with the given quantity.
    #[must_use]
    pub fn from_catalog(catalog: CatalogProduct, amount: i64) -> Self {
        Self {
            id: catalog.id,
            title: catalog.title,
            price: catalog.price,
            image: catalog.image,
            amount,
        }
    }

    /// Line price (`price * amount`).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price * self.amount
    }
}

/// Last known remote inventory count for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: ProductId,
    pub amount: i64,
}

/// Number of distinct products in the cart (not total units).
#[must_use]
pub fn cart_size(cart: &[Product]) -> usize {
    cart.iter().map(|p| p.id).collect::<HashSet<_>>().len()
}

/// Header badge label for a cart size.
#[must_use]
pub fn cart_size_label(size: usize) -> String {
    if size == 1 {
        "1 item".to_string()
    } else {
        format!("{size} items")
    }
}

/// Sum of all line subtotals.
#[must_use]
pub fn cart_total(cart: &[Product]) -> Price {
    cart.iter().map(Product::subtotal).sum()
}
