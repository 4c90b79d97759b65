//! RocketCart store library.
//!
//! Owns the shopper's cart, keeps it in durable local storage and keeps the
//! remote stock service in step with every mutation.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketcart_store::{CartStore, FileStorage, HttpStockClient, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let api = HttpStockClient::new(&config)?;
//! let storage = FileStorage::new(&config.storage_path);
//! let store = CartStore::new(api, storage)?;
//!
//! store.add_product(ProductId::new(1)).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use api::{HttpStockClient, StockApi, StockApiError};
pub use config::{ConfigError, StoreConfig};
pub use error::CartError;
pub use notify::{Notification, Operation};
pub use storage::{CART_STORAGE_KEY, FileStorage, MemoryStorage, Storage, StorageError};
pub use store::CartStore;
