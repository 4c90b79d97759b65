//! Durable local key/value storage.
//!
//! Mirrors browser local storage semantics: string keys, string values,
//! synchronous reads and writes. The cart lives under a single key as a
//! JSON array.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use rocketcart_core::Product;
use thiserror::Error;

/// Key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Errors that can occur when reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored data is not valid JSON of the expected shape.
    #[error("Corrupt storage data: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored cart parses but breaks a cart invariant.
    #[error("Invalid stored cart: {0}")]
    InvalidCart(String),
}

/// Synchronous string key/value storage.
pub trait Storage: Send + Sync {
    /// Read a value. Returns `None` when the key was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Load the cart stored under [`CART_STORAGE_KEY`].
///
/// A missing key or blank value yields an empty cart.
///
/// # Errors
///
/// Returns an error if storage cannot be read or holds an invalid cart:
/// unparsable JSON, a repeated product id or a non-positive amount.
pub fn load_cart(storage: &impl Storage) -> Result<Vec<Product>, StorageError> {
    let cart: Vec<Product> = match storage.get_item(CART_STORAGE_KEY)? {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
        _ => return Ok(Vec::new()),
    };
    validate_cart(&cart)?;
    Ok(cart)
}

fn validate_cart(cart: &[Product]) -> Result<(), StorageError> {
    let mut seen = HashSet::with_capacity(cart.len());
    for line in cart {
        if !seen.insert(line.id) {
            return Err(StorageError::InvalidCart(format!(
                "product {} appears more than once",
                line.id
            )));
        }
        if line.amount <= 0 {
            return Err(StorageError::InvalidCart(format!(
                "product {} has amount {}",
                line.id, line.amount
            )));
        }
    }
    Ok(())
}

/// Overwrite the stored cart with a full snapshot.
///
/// # Errors
///
/// Returns an error if the cart cannot be serialized or written.
pub fn save_cart(storage: &impl Storage, cart: &[Product]) -> Result<(), StorageError> {
    let raw = serde_json::to_string(cart)?;
    storage.set_item(CART_STORAGE_KEY, &raw)
}

// =============================================================================
// FileStorage
// =============================================================================

/// Storage backed by one JSON file holding an object of key to value.
///
/// Every write replaces the file atomically (temporary file + rename).
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: std::sync::Mutex<()>,
}

impl FileStorage {
    /// Create storage backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: std::sync::Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content = serde_json::to_string_pretty(items)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: Storage> Storage for std::sync::Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketcart_core::{Price, ProductId};
    use tempfile::tempdir;

    use super::*;

    fn sneaker(id: i32, amount: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: "Tênis VR Caminhada Confortável".to_string(),
            price: Price::from_cents(13990),
            image: format!("https://cdn.example.com/{id}.jpg"),
            amount,
        }
    }

    #[test]
    fn test_load_cart_missing_key_is_empty() {
        let storage = MemoryStorage::new();
        assert!(load_cart(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_load_cart_blank_value_is_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_STORAGE_KEY, "   ").unwrap();
        assert!(load_cart(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_load_cart_corrupt_value_is_error() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_STORAGE_KEY, "{not json").unwrap();
        assert!(matches!(load_cart(&storage), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_load_cart_rejects_duplicate_ids() {
        let storage = MemoryStorage::new();
        save_cart(&storage, &[sneaker(1, 1), sneaker(2, 1), sneaker(1, 3)]).unwrap();
        assert!(matches!(
            load_cart(&storage),
            Err(StorageError::InvalidCart(msg)) if msg.contains("product 1")
        ));
    }

    #[test]
    fn test_load_cart_rejects_non_positive_amounts() {
        for amount in [0, -1] {
            let storage = MemoryStorage::new();
            save_cart(&storage, &[sneaker(4, 2), sneaker(5, amount)]).unwrap();
            assert!(matches!(
                load_cart(&storage),
                Err(StorageError::InvalidCart(msg)) if msg.contains("product 5")
            ));
        }
    }

    #[test]
    fn test_file_storage_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::new(&path);
        save_cart(&storage, &[sneaker(1, 2), sneaker(3, 1)]).unwrap();
        storage.set_item("theme", "dark").unwrap();

        // A fresh handle over the same file sees both keys
        let reopened = FileStorage::new(&path);
        let cart = load_cart(&reopened).unwrap();
        assert_eq!(cart, vec![sneaker(1, 2), sneaker(3, 1)]);
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));
        assert!(!dir.path().join("nested").join("storage.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_overwrites_snapshot() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));

        save_cart(&storage, &[sneaker(1, 1), sneaker(2, 1)]).unwrap();
        save_cart(&storage, &[sneaker(2, 4)]).unwrap();

        assert_eq!(load_cart(&storage).unwrap(), vec![sneaker(2, 4)]);
    }

    #[test]
    fn test_file_storage_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert!(storage.get_item(CART_STORAGE_KEY).unwrap().is_none());
    }
}
