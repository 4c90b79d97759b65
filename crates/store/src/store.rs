//! The cart store.
//!
//! [`CartStore`] owns the cart line items and the locally cached stock
//! levels. Every mutation is persisted to local storage as a full snapshot
//! and mirrored to the remote stock service.
//!
//! # Failure handling
//!
//! Public operations never return errors. A failure is logged and surfaced
//! as a [`Notification`] on the broadcast channel. Local changes applied
//! before the failing step are kept.
//!
//! # Concurrency
//!
//! Each operation holds a per-product lock for its whole local + remote
//! sequence, so operations on the same product run one after another while
//! operations on different products may interleave. A product's lock is
//! dropped from the lock table once no operation holds or awaits it.
//!
//! Persistence calls [`Storage::set_item`] synchronously while the cart lock
//! is held. `FileStorage` does blocking filesystem I/O there, which is fine
//! for a single-user client; a server sharing one store across many requests
//! should wrap a storage that offloads the write.

use std::collections::HashMap;
use std::sync::Arc;

use rocketcart_core::{Price, Product, ProductId, StockRecord, cart_size, cart_total};
use tokio::sync::{Mutex, RwLock, broadcast, watch};
use tracing::instrument;

use crate::api::StockApi;
use crate::error::CartError;
use crate::notify::{Notification, Operation};
use crate::storage::{Storage, StorageError, load_cart, save_cart};

/// Buffered notifications per subscriber before old ones are dropped.
const NOTIFICATION_CAPACITY: usize = 64;

/// Shopping cart synchronized with a remote stock service.
pub struct CartStore<A, S> {
    api: A,
    storage: S,
    cart: RwLock<Vec<Product>>,
    stock: RwLock<Vec<StockRecord>>,
    product_locks: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
    cart_tx: watch::Sender<Vec<Product>>,
    notify_tx: broadcast::Sender<Notification>,
}

impl<A, S> std::fmt::Debug for CartStore<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &*self.cart_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl<A: StockApi, S: Storage> CartStore<A, S> {
    /// Create a store, loading the cart from storage.
    ///
    /// The stock cache starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or holds an invalid cart.
    pub fn new(api: A, storage: S) -> Result<Self, StorageError> {
        let cart = load_cart(&storage)?;
        tracing::debug!(items = cart.len(), "Loaded cart from storage");

        let (cart_tx, _) = watch::channel(cart.clone());
        let (notify_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Ok(Self {
            api,
            storage,
            cart: RwLock::new(cart),
            stock: RwLock::new(Vec::new()),
            product_locks: Mutex::new(HashMap::new()),
            cart_tx,
            notify_tx,
        })
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Snapshot of the cart line items in display order.
    pub async fn cart(&self) -> Vec<Product> {
        self.cart.read().await.clone()
    }

    /// Snapshot of the locally cached stock levels.
    pub async fn stock(&self) -> Vec<StockRecord> {
        self.stock.read().await.clone()
    }

    /// Number of distinct products in the cart.
    pub async fn cart_size(&self) -> usize {
        cart_size(&self.cart.read().await)
    }

    /// Sum of all line subtotals.
    pub async fn total(&self) -> Price {
        cart_total(&self.cart.read().await)
    }

    /// Observe cart snapshots. The receiver sees the current cart and every
    /// snapshot applied after it.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.cart_tx.subscribe()
    }

    /// Receive user-facing notifications emitted after this call.
    #[must_use]
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notify_tx.subscribe()
    }

    /// The stock service this store talks to.
    pub const fn api(&self) -> &A {
        &self.api
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Add one unit of a product to the cart.
    ///
    /// Emits [`Notification::AddFailed`] on any failure, preceded by
    /// [`Notification::AddOutOfStock`] when the remote stock is exhausted.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_product(&self, id: ProductId) {
        self.with_product_lock(id, async {
            if let Err(err) = self.try_add_product(id).await {
                self.report(Operation::Add, id, &err);
            }
        })
        .await;
    }

    /// Remove a product line from the cart and give its units back to the
    /// remote stock.
    ///
    /// Emits [`Notification::RemoveFailed`] on any failure, including the
    /// product not being in the cart.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_product(&self, id: ProductId) {
        self.with_product_lock(id, async {
            if let Err(err) = self.try_remove_product(id).await {
                self.report(Operation::Remove, id, &err);
            }
        })
        .await;
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// Emits [`Notification::UpdateFailed`] on any failure, preceded by
    /// [`Notification::UpdateOutOfStock`] when `amount` is not positive or
    /// exceeds the remote stock.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_product_amount(&self, id: ProductId, amount: i64) {
        self.with_product_lock(id, async {
            if let Err(err) = self.try_update_product_amount(id, amount).await {
                self.report(Operation::Update, id, &err);
            }
        })
        .await;
    }

    async fn try_add_product(&self, id: ProductId) -> Result<(), CartError> {
        let remote = self.api.get_stock(id).await?;
        // A record for some other product tells us nothing about this one.
        let available = if remote.id == id { remote.amount } else { 0 };
        if available <= 0 {
            return Err(CartError::OutOfStock {
                id,
                requested: 1,
                available,
            });
        }

        let catalog = self.api.get_product(id).await?;

        let is_new = self
            .mutate_cart(|cart| {
                if let Some(line) = cart.iter_mut().find(|p| p.id == id) {
                    line.amount += 1;
                    Ok(false)
                } else {
                    cart.push(Product::from_catalog(catalog, 1));
                    Ok(true)
                }
            })
            .await?;

        if is_new {
            let mut stock = self.stock.write().await;
            stock.retain(|s| s.id != id);
            stock.push(StockRecord { id, amount: available });
        }

        self.api
            .update_stock(StockRecord {
                id,
                amount: available - 1,
            })
            .await?;

        tracing::info!(new_line = is_new, "Product added to cart");
        Ok(())
    }

    async fn try_remove_product(&self, id: ProductId) -> Result<(), CartError> {
        let removed = self
            .mutate_cart(|cart| {
                let index = cart
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or(CartError::NotFound(id))?;
                Ok(cart.remove(index))
            })
            .await?;

        let remote = self.api.get_stock(id).await?;
        let restored = removed.amount + remote.amount;

        self.stock.write().await.retain(|s| s.id != id);

        self.api
            .update_stock(StockRecord {
                id,
                amount: restored,
            })
            .await?;

        tracing::info!(restored, "Product removed from cart");
        Ok(())
    }

    async fn try_update_product_amount(&self, id: ProductId, amount: i64) -> Result<(), CartError> {
        if amount <= 0 {
            return Err(CartError::InvalidAmount(amount));
        }

        let remote = self.api.get_stock(id).await?;
        if remote.amount <= 0 || remote.amount < amount {
            return Err(CartError::OutOfStock {
                id,
                requested: amount,
                available: remote.amount,
            });
        }

        self.mutate_cart(|cart| {
            let line = cart
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(CartError::NotFound(id))?;
            line.amount = amount;
            Ok(())
        })
        .await?;

        let baseline = {
            let mut stock = self.stock.write().await;
            if let Some(record) = stock.iter().find(|s| s.id == id) {
                record.amount
            } else {
                // Cart restored from storage: no stock seen yet this session.
                stock.push(StockRecord {
                    id,
                    amount: remote.amount,
                });
                remote.amount
            }
        };

        self.api
            .update_stock(StockRecord {
                id,
                amount: baseline - amount,
            })
            .await?;

        tracing::info!(amount, "Product amount updated");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Apply `f` to a copy of the cart, persist the copy, then publish it.
    ///
    /// If `f` or persistence fails the cart is left untouched.
    async fn mutate_cart<T>(
        &self,
        f: impl FnOnce(&mut Vec<Product>) -> Result<T, CartError>,
    ) -> Result<T, CartError> {
        let mut cart = self.cart.write().await;
        let mut next = cart.clone();
        let output = f(&mut next)?;

        save_cart(&self.storage, &next)?;

        self.cart_tx.send_replace(next.clone());
        *cart = next;
        Ok(output)
    }

    /// Run `operation` while holding the lock for product `id`.
    async fn with_product_lock<T>(&self, id: ProductId, operation: impl Future<Output = T>) -> T {
        let lock = {
            let mut locks = self.product_locks.lock().await;
            Arc::clone(locks.entry(id).or_default())
        };

        let output = {
            let _guard = lock.lock().await;
            operation.await
        };

        // New waiters clone from the table under this lock, so a count of two
        // (table + ours) means nobody else holds or awaits the product lock.
        let mut locks = self.product_locks.lock().await;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&id);
        }
        output
    }

    fn report(&self, operation: Operation, id: ProductId, err: &CartError) {
        if err.is_out_of_stock() || matches!(err, CartError::NotFound(_)) {
            tracing::warn!(
                operation = operation.as_str(),
                product_id = %id,
                error = %err,
                "Cart operation rejected"
            );
        } else {
            tracing::error!(
                operation = operation.as_str(),
                product_id = %id,
                error = %err,
                "Cart operation failed"
            );
        }
        for &notification in Notification::for_failure(operation, err) {
            // No subscribers is fine: notifications are fire-and-forget.
            let _ = self.notify_tx.send(notification);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;
    use crate::storage::{CART_STORAGE_KEY, MemoryStorage};
    use crate::testing::{FakeStockApi, catalog_entry};

    type TestStore = CartStore<Arc<FakeStockApi>, Arc<MemoryStorage>>;

    fn store_with(api: FakeStockApi) -> (TestStore, Arc<FakeStockApi>, Arc<MemoryStorage>) {
        let api = Arc::new(api);
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::new(Arc::clone(&api), Arc::clone(&storage)).unwrap();
        (store, api, storage)
    }

    fn line(id: i32, amount: i64) -> Product {
        Product::from_catalog(catalog_entry(ProductId::new(id)), amount)
    }

    fn stored_cart(storage: &MemoryStorage) -> Vec<Product> {
        load_cart(storage).unwrap()
    }

    fn seeded_storage(cart: &[Product]) -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        save_cart(&*storage, cart).unwrap();
        storage
    }

    // =========================================================================
    // addProduct
    // =========================================================================

    #[tokio::test]
    async fn test_add_new_product() {
        let (store, api, storage) = store_with(FakeStockApi::new().with_product(1, 3));
        let mut notifications = store.notifications();

        store.add_product(ProductId::new(1)).await;

        assert_eq!(store.cart().await, vec![line(1, 1)]);
        assert_eq!(stored_cart(&storage), vec![line(1, 1)]);
        assert_eq!(
            store.stock().await,
            vec![StockRecord {
                id: ProductId::new(1),
                amount: 3
            }]
        );
        assert_eq!(
            api.updates(),
            vec![StockRecord {
                id: ProductId::new(1),
                amount: 2
            }]
        );
        assert_eq!(notifications.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_add_existing_product_increments() {
        let (store, api, storage) = store_with(FakeStockApi::new().with_product(1, 5));

        store.add_product(ProductId::new(1)).await;
        store.add_product(ProductId::new(1)).await;

        assert_eq!(store.cart().await, vec![line(1, 2)]);
        assert_eq!(stored_cart(&storage), vec![line(1, 2)]);
        assert_eq!(api.stock_of(1), Some(3));
        // Only the first add records a stock level
        assert_eq!(store.stock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_keeps_insertion_order() {
        let (store, _, _) = store_with(
            FakeStockApi::new()
                .with_product(2, 5)
                .with_product(1, 5),
        );

        store.add_product(ProductId::new(2)).await;
        store.add_product(ProductId::new(1)).await;
        store.add_product(ProductId::new(2)).await;

        let ids: Vec<i32> = store.cart().await.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_add_out_of_stock() {
        let (store, api, storage) = store_with(FakeStockApi::new().with_product(1, 0));
        let mut notifications = store.notifications();

        store.add_product(ProductId::new(1)).await;

        assert!(store.cart().await.is_empty());
        assert!(storage.get_item(CART_STORAGE_KEY).unwrap().is_none());
        assert!(api.updates().is_empty());
        assert_eq!(notifications.try_recv().unwrap(), Notification::AddOutOfStock);
        assert_eq!(notifications.try_recv().unwrap(), Notification::AddFailed);
        assert_eq!(notifications.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_add_mismatched_stock_record_is_out_of_stock() {
        let (store, _, _) = store_with(FakeStockApi::new().with_product(1, 10));
        store.api().mismatch_stock_ids(true);
        let mut notifications = store.notifications();

        store.add_product(ProductId::new(1)).await;

        assert!(store.cart().await.is_empty());
        assert_eq!(notifications.try_recv().unwrap(), Notification::AddOutOfStock);
        assert_eq!(notifications.try_recv().unwrap(), Notification::AddFailed);
    }

    #[tokio::test]
    async fn test_add_unknown_product_fails_generically() {
        let (store, _, _) = store_with(FakeStockApi::new());
        let mut notifications = store.notifications();

        store.add_product(ProductId::new(42)).await;

        assert!(store.cart().await.is_empty());
        assert_eq!(notifications.try_recv().unwrap(), Notification::AddFailed);
        assert_eq!(notifications.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_add_keeps_local_change_when_remote_update_fails() {
        let (store, api, storage) = store_with(FakeStockApi::new().with_product(1, 4));
        api.fail_updates(true);
        let mut notifications = store.notifications();

        store.add_product(ProductId::new(1)).await;

        // No rollback of the applied local mutation
        assert_eq!(store.cart().await, vec![line(1, 1)]);
        assert_eq!(stored_cart(&storage), vec![line(1, 1)]);
        assert_eq!(api.stock_of(1), Some(4));
        assert_eq!(notifications.try_recv().unwrap(), Notification::AddFailed);
    }

    // =========================================================================
    // removeProduct
    // =========================================================================

    #[tokio::test]
    async fn test_remove_product_restores_stock() {
        let api = Arc::new(
            FakeStockApi::new()
                .with_product(1, 2)
                .with_product(2, 7),
        );
        let storage = seeded_storage(&[line(1, 3), line(2, 1)]);
        let store = CartStore::new(Arc::clone(&api), Arc::clone(&storage)).unwrap();

        store.remove_product(ProductId::new(1)).await;

        assert_eq!(store.cart().await, vec![line(2, 1)]);
        assert_eq!(stored_cart(&storage), vec![line(2, 1)]);
        assert_eq!(
            api.updates(),
            vec![StockRecord {
                id: ProductId::new(1),
                amount: 5
            }]
        );
    }

    #[tokio::test]
    async fn test_remove_drops_cached_stock_record() {
        let (store, _, _) = store_with(FakeStockApi::new().with_product(1, 3));

        store.add_product(ProductId::new(1)).await;
        assert_eq!(store.stock().await.len(), 1);

        store.remove_product(ProductId::new(1)).await;
        assert!(store.stock().await.is_empty());
        assert!(store.cart().await.is_empty());
        assert_eq!(store.api().stock_of(1), Some(3));
    }

    #[tokio::test]
    async fn test_remove_absent_product() {
        let api = FakeStockApi::new().with_product(1, 2);
        let storage = seeded_storage(&[line(1, 1)]);
        let store = CartStore::new(Arc::new(api), Arc::clone(&storage)).unwrap();
        let mut notifications = store.notifications();

        store.remove_product(ProductId::new(2)).await;

        assert_eq!(store.cart().await, vec![line(1, 1)]);
        assert_eq!(stored_cart(&storage), vec![line(1, 1)]);
        assert_eq!(store.api().stock_reads(), 0);
        assert_eq!(notifications.try_recv().unwrap(), Notification::RemoveFailed);
    }

    #[tokio::test]
    async fn test_remove_keeps_local_change_when_stock_read_fails() {
        let api = Arc::new(FakeStockApi::new().with_product(1, 2));
        api.fail_stock_reads(true);
        let storage = seeded_storage(&[line(1, 1)]);
        let store = CartStore::new(Arc::clone(&api), Arc::clone(&storage)).unwrap();
        let mut notifications = store.notifications();

        store.remove_product(ProductId::new(1)).await;

        assert!(store.cart().await.is_empty());
        assert!(stored_cart(&storage).is_empty());
        assert!(api.updates().is_empty());
        assert_eq!(notifications.try_recv().unwrap(), Notification::RemoveFailed);
    }

    // =========================================================================
    // updateProductAmount
    // =========================================================================

    #[tokio::test]
    async fn test_update_amount_example() {
        let api = Arc::new(FakeStockApi::new().with_product(1, 5));
        let storage = seeded_storage(&[line(1, 1)]);
        let store = CartStore::new(Arc::clone(&api), Arc::clone(&storage)).unwrap();

        store.update_product_amount(ProductId::new(1), 3).await;

        assert_eq!(store.cart().await, vec![line(1, 3)]);
        assert_eq!(stored_cart(&storage), vec![line(1, 3)]);
        assert_eq!(
            api.updates(),
            vec![StockRecord {
                id: ProductId::new(1),
                amount: 2
            }]
        );
    }

    #[tokio::test]
    async fn test_update_uses_cached_stock_baseline() {
        let (store, api, _) = store_with(FakeStockApi::new().with_product(1, 10));

        // Cached baseline becomes 10, remote drops to 9
        store.add_product(ProductId::new(1)).await;
        store.update_product_amount(ProductId::new(1), 4).await;

        assert_eq!(store.cart().await, vec![line(1, 4)]);
        assert_eq!(api.stock_of(1), Some(6));
    }

    #[tokio::test]
    async fn test_update_non_positive_amount_rejected() {
        let api = Arc::new(FakeStockApi::new().with_product(1, 5));
        let storage = seeded_storage(&[line(1, 2)]);
        let store = CartStore::new(Arc::clone(&api), Arc::clone(&storage)).unwrap();
        let mut cart_rx = store.subscribe();
        cart_rx.mark_unchanged();
        let mut notifications = store.notifications();

        store.update_product_amount(ProductId::new(1), 0).await;
        store.update_product_amount(ProductId::new(1), -2).await;

        assert_eq!(store.cart().await, vec![line(1, 2)]);
        assert_eq!(stored_cart(&storage), vec![line(1, 2)]);
        assert!(!cart_rx.has_changed().unwrap());
        assert!(api.updates().is_empty());
        for _ in 0..2 {
            assert_eq!(notifications.try_recv().unwrap(), Notification::UpdateOutOfStock);
            assert_eq!(notifications.try_recv().unwrap(), Notification::UpdateFailed);
        }
        assert_eq!(notifications.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_update_beyond_remote_stock_rejected() {
        let api = Arc::new(FakeStockApi::new().with_product(1, 2));
        let storage = seeded_storage(&[line(1, 1)]);
        let store = CartStore::new(Arc::clone(&api), Arc::clone(&storage)).unwrap();
        let mut notifications = store.notifications();

        store.update_product_amount(ProductId::new(1), 3).await;

        assert_eq!(store.cart().await, vec![line(1, 1)]);
        assert!(api.updates().is_empty());
        assert_eq!(notifications.try_recv().unwrap(), Notification::UpdateOutOfStock);
        assert_eq!(notifications.try_recv().unwrap(), Notification::UpdateFailed);
        assert_eq!(notifications.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_update_with_zero_remote_stock_rejected() {
        let api = Arc::new(FakeStockApi::new().with_product(1, 0));
        let storage = seeded_storage(&[line(1, 1)]);
        let store = CartStore::new(Arc::clone(&api), storage).unwrap();
        let mut notifications = store.notifications();

        store.update_product_amount(ProductId::new(1), 1).await;

        assert_eq!(store.cart().await, vec![line(1, 1)]);
        assert_eq!(notifications.try_recv().unwrap(), Notification::UpdateOutOfStock);
        assert_eq!(notifications.try_recv().unwrap(), Notification::UpdateFailed);
    }

    #[tokio::test]
    async fn test_update_absent_product_fails_without_persisting() {
        let (store, api, storage) = store_with(FakeStockApi::new().with_product(1, 5));
        let mut notifications = store.notifications();

        store.update_product_amount(ProductId::new(1), 2).await;

        assert!(store.cart().await.is_empty());
        assert!(storage.get_item(CART_STORAGE_KEY).unwrap().is_none());
        assert!(api.updates().is_empty());
        assert_eq!(notifications.try_recv().unwrap(), Notification::UpdateFailed);
        assert_eq!(notifications.try_recv(), Err(TryRecvError::Empty));
    }

    // =========================================================================
    // Lifecycle & subscriptions
    // =========================================================================

    #[tokio::test]
    async fn test_new_rejects_corrupt_storage() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_STORAGE_KEY, "[{\"id\":").unwrap();
        assert!(CartStore::new(FakeStockApi::new(), storage).is_err());
    }

    #[tokio::test]
    async fn test_new_rejects_duplicate_lines() {
        let storage = seeded_storage(&[line(1, 1), line(1, 0)]);
        assert!(matches!(
            CartStore::new(FakeStockApi::new(), storage),
            Err(StorageError::InvalidCart(_))
        ));
    }

    #[tokio::test]
    async fn test_subscribe_sees_snapshots() {
        let (store, _, _) = store_with(FakeStockApi::new().with_product(1, 5));
        let mut cart_rx = store.subscribe();
        assert!(cart_rx.borrow_and_update().is_empty());

        store.add_product(ProductId::new(1)).await;

        assert!(cart_rx.has_changed().unwrap());
        assert_eq!(*cart_rx.borrow_and_update(), vec![line(1, 1)]);
    }

    #[tokio::test]
    async fn test_cart_size_and_total() {
        let storage = seeded_storage(&[line(1, 3), line(2, 1)]);
        let store = CartStore::new(FakeStockApi::new(), storage).unwrap();

        assert_eq!(store.cart_size().await, 2);
        assert_eq!(store.total().await, Price::from_cents(13990 * 4));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_on_same_product_are_serialized() {
        let (store, api, _) = store_with(FakeStockApi::new().with_product(1, 10));
        let store = Arc::new(store);

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.add_product(ProductId::new(1)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.cart().await, vec![line(1, 5)]);
        assert_eq!(api.stock_of(1), Some(5));
        assert!(store.product_locks.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_product_locks_released_after_operations() {
        let (store, _, _) = store_with(
            FakeStockApi::new()
                .with_product(1, 5)
                .with_product(2, 5),
        );

        store.add_product(ProductId::new(1)).await;
        store.add_product(ProductId::new(2)).await;
        store.update_product_amount(ProductId::new(1), 9).await;
        store.remove_product(ProductId::new(3)).await;

        assert!(store.product_locks.lock().await.is_empty());
    }
}
