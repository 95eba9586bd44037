//! Shared product store: the cart and wishlist of one client.
//!
//! The store is the single source of truth for both collections. It owns
//! the in-memory snapshots, writes every change through to [`Storage`], and
//! then notifies subscribers.
//!
//! # Mutation contract
//!
//! Every mutating operation:
//!
//! 1. computes the new collection under the store's write lock,
//! 2. persists it (best effort, failures are logged),
//! 3. swaps the snapshot readers see,
//! 4. releases the lock and notifies every subscriber.
//!
//! A mutation that changes nothing skips steps 2-4.
//!
//! # Snapshots
//!
//! [`ProductStore::cart`] and [`ProductStore::wishlist`] return shared
//! `Arc<[..]>` snapshots. Reading one never touches storage; storage is read
//! exactly once, at [`ProductStore::hydrate`].

mod events;
mod persist;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use luxe_core::{CartLine, Price, Product, ProductId, Quantity};
use serde::Serialize;

use crate::storage::{MemoryStorage, Storage};

pub use events::{Collection, StoreEvent, Subscription};

use events::Listeners;

/// Result of [`ProductStore::add_to_cart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum CartChange {
    /// A new line was appended with this quantity.
    Added { quantity: Quantity },
    /// An existing line was incremented; `quantity` is the new total.
    Increased { quantity: Quantity },
}

impl CartChange {
    /// Quantity of the line after the change.
    pub const fn quantity(self) -> Quantity {
        match self {
            Self::Added { quantity } | Self::Increased { quantity } => quantity,
        }
    }
}

/// Result of [`ProductStore::update_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum QuantityChange {
    /// The line now holds exactly `quantity` units.
    Updated {
        previous: Quantity,
        quantity: Quantity,
    },
    /// The requested quantity was zero or negative, so the line was removed.
    Removed(CartLine),
    /// No line exists for the product.
    NotInCart,
}

/// Result of [`ProductStore::add_to_wishlist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum WishlistChange {
    /// The product was appended.
    Added,
    /// The product was already saved; nothing changed.
    AlreadyPresent,
}

/// Header-badge figures read under a single lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreSummary {
    /// Sum of quantities across all cart lines.
    pub cart_count: u64,
    /// Sum of `price * quantity` across all cart lines.
    pub cart_total: Price,
    /// Number of wishlist entries.
    pub wishlist_count: usize,
}

struct Snapshots {
    cart: Arc<[CartLine]>,
    wishlist: Arc<[Product]>,
}

/// Outcome of an edit closure: whether anything changed, plus its result.
enum Edit<R> {
    Changed(R),
    Unchanged(R),
}

fn cart_slot(snapshots: &mut Snapshots) -> &mut Arc<[CartLine]> {
    &mut snapshots.cart
}

fn wishlist_slot(snapshots: &mut Snapshots) -> &mut Arc<[Product]> {
    &mut snapshots.wishlist
}

/// Cart and wishlist for one client, persisted and observable.
pub struct ProductStore {
    snapshots: RwLock<Snapshots>,
    storage: Option<Arc<dyn Storage>>,
    listeners: Arc<Listeners>,
}

impl ProductStore {
    /// Create a store backed by `storage`, reading both collections once.
    ///
    /// Missing or malformed documents start empty. Persisted carts with more
    /// than one line for a product are merged, and duplicate wishlist entries
    /// dropped, so the one-entry-per-product invariant holds from the start.
    #[must_use]
    pub fn hydrate(storage: Arc<dyn Storage>) -> Self {
        let cart = merge_duplicate_lines(persist::hydrate(
            storage.as_ref(),
            Collection::Cart.storage_key(),
        ));
        let wishlist = dedup_products(persist::hydrate(
            storage.as_ref(),
            Collection::Wishlist.storage_key(),
        ));

        tracing::debug!(
            cart_lines = cart.len(),
            wishlist_entries = wishlist.len(),
            "Product store hydrated"
        );

        Self {
            snapshots: RwLock::new(Snapshots {
                cart: cart.into(),
                wishlist: wishlist.into(),
            }),
            storage: Some(storage),
            listeners: Arc::default(),
        }
    }

    /// Create an empty store backed by fresh in-process storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::hydrate(Arc::new(MemoryStorage::new()))
    }

    /// Create a store with no storage at all.
    ///
    /// Snapshots start empty and deterministic. Mutations still apply in
    /// memory and notify subscribers, with `persisted: false`.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            snapshots: RwLock::new(Snapshots {
                cart: Arc::from(Vec::new()),
                wishlist: Arc::from(Vec::new()),
            }),
            storage: None,
            listeners: Arc::default(),
        }
    }

    /// Returns true if changes are written to durable storage.
    #[must_use]
    pub fn has_storage(&self) -> bool {
        self.storage.is_some()
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Register a listener called after every applied mutation.
    ///
    /// The listener runs on the mutating thread after the store lock has been
    /// released, so it may read snapshots. Listener order is unspecified.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(listener))
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn cart(&self) -> Arc<[CartLine]> {
        Arc::clone(&self.read().cart)
    }

    /// Current wishlist entries, in insertion order.
    #[must_use]
    pub fn wishlist(&self) -> Arc<[Product]> {
        Arc::clone(&self.read().wishlist)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add `quantity` units of `product`.
    ///
    /// Increments the existing line if the product is already in the cart,
    /// otherwise appends a new line. There is no upper bound short of
    /// `u32::MAX`, where the quantity saturates.
    pub fn add_to_cart(&self, product: &Product, quantity: Quantity) -> CartChange {
        let change = self.edit(Collection::Cart, cart_slot, |lines| {
            if let Some(line) = lines.iter_mut().find(|l| l.product.id == product.id) {
                line.quantity = line.quantity.saturating_add(quantity);
                Edit::Changed(CartChange::Increased {
                    quantity: line.quantity,
                })
            } else {
                lines.push(CartLine::new(product.clone(), quantity));
                Edit::Changed(CartChange::Added { quantity })
            }
        });

        tracing::debug!(
            product_id = %product.id,
            quantity = %change.quantity(),
            "Added to cart"
        );
        change
    }

    /// Remove the line for `product_id`, returning it if it existed.
    pub fn remove_from_cart(&self, product_id: ProductId) -> Option<CartLine> {
        let removed = self.edit(Collection::Cart, cart_slot, |lines| {
            match lines.iter().position(|l| l.product.id == product_id) {
                Some(index) => Edit::Changed(Some(lines.remove(index))),
                None => Edit::Unchanged(None),
            }
        });

        if removed.is_some() {
            tracing::debug!(product_id = %product_id, "Removed from cart");
        }
        removed
    }

    /// Set the line for `product_id` to exactly `quantity` units.
    ///
    /// `quantity <= 0` removes the line. Unknown products are left alone.
    pub fn update_quantity(&self, product_id: ProductId, quantity: i64) -> QuantityChange {
        let Some(quantity) = Quantity::from_signed(quantity) else {
            return self
                .remove_from_cart(product_id)
                .map_or(QuantityChange::NotInCart, QuantityChange::Removed);
        };

        self.edit(Collection::Cart, cart_slot, |lines| {
            match lines.iter_mut().find(|l| l.product.id == product_id) {
                Some(line) if line.quantity == quantity => Edit::Unchanged(QuantityChange::Updated {
                    previous: quantity,
                    quantity,
                }),
                Some(line) => {
                    let previous = std::mem::replace(&mut line.quantity, quantity);
                    Edit::Changed(QuantityChange::Updated { previous, quantity })
                }
                None => Edit::Unchanged(QuantityChange::NotInCart),
            }
        })
    }

    /// Empty the cart, returning the lines it held.
    pub fn clear_cart(&self) -> Vec<CartLine> {
        self.edit(Collection::Cart, cart_slot, |lines| {
            if lines.is_empty() {
                Edit::Unchanged(Vec::new())
            } else {
                Edit::Changed(std::mem::take(lines))
            }
        })
    }

    /// Returns true if the cart has a line for `product_id`.
    #[must_use]
    pub fn is_in_cart(&self, product_id: ProductId) -> bool {
        self.read().cart.iter().any(|l| l.product.id == product_id)
    }

    /// The cart line for `product_id`, if any.
    #[must_use]
    pub fn cart_line(&self, product_id: ProductId) -> Option<CartLine> {
        self.read()
            .cart
            .iter()
            .find(|l| l.product.id == product_id)
            .cloned()
    }

    /// Sum of `price * quantity` over all lines. Exact to the cent.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.read().cart.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines (not the number of lines).
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        count_units(&self.read().cart)
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Save `product`, unless it is already saved.
    pub fn add_to_wishlist(&self, product: &Product) -> WishlistChange {
        let change = self.edit(Collection::Wishlist, wishlist_slot, |entries| {
            if entries.iter().any(|p| p.id == product.id) {
                Edit::Unchanged(WishlistChange::AlreadyPresent)
            } else {
                entries.push(product.clone());
                Edit::Changed(WishlistChange::Added)
            }
        });

        tracing::debug!(product_id = %product.id, ?change, "Wishlist add");
        change
    }

    /// Remove `product_id` from the wishlist, returning it if it was saved.
    pub fn remove_from_wishlist(&self, product_id: ProductId) -> Option<Product> {
        self.edit(Collection::Wishlist, wishlist_slot, |entries| {
            match entries.iter().position(|p| p.id == product_id) {
                Some(index) => Edit::Changed(Some(entries.remove(index))),
                None => Edit::Unchanged(None),
            }
        })
    }

    /// Add one unit of a saved product to the cart. The wishlist entry stays.
    ///
    /// Returns `None` if the product is not on the wishlist.
    pub fn move_to_cart(&self, product_id: ProductId) -> Option<CartChange> {
        let product = self
            .read()
            .wishlist
            .iter()
            .find(|p| p.id == product_id)
            .cloned()?;
        Some(self.add_to_cart(&product, Quantity::ONE))
    }

    /// Returns true if `product_id` is on the wishlist.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.read().wishlist.iter().any(|p| p.id == product_id)
    }

    /// Number of wishlist entries.
    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.read().wishlist.len()
    }

    /// Cart count, cart total, and wishlist count from one consistent read.
    #[must_use]
    pub fn summary(&self) -> StoreSummary {
        let snapshots = self.read();
        StoreSummary {
            cart_count: count_units(&snapshots.cart),
            cart_total: snapshots.cart.iter().map(CartLine::line_total).sum(),
            wishlist_count: snapshots.wishlist.len(),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read(&self) -> RwLockReadGuard<'_, Snapshots> {
        self.snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshots> {
        self.snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `edit` to a copy of one collection and publish the result.
    fn edit<T, R>(
        &self,
        collection: Collection,
        slot: fn(&mut Snapshots) -> &mut Arc<[T]>,
        edit: impl FnOnce(&mut Vec<T>) -> Edit<R>,
    ) -> R
    where
        T: Clone + Serialize,
    {
        let (result, event) = {
            let mut snapshots = self.write();
            let current = slot(&mut *snapshots);
            let mut items = current.to_vec();

            let result = match edit(&mut items) {
                Edit::Unchanged(result) => return result,
                Edit::Changed(result) => result,
            };

            let persisted = self.storage.as_deref().is_some_and(|storage| {
                persist::commit(storage, collection.storage_key(), &items)
            });
            *current = items.into();

            (
                result,
                StoreEvent {
                    collection,
                    persisted,
                },
            )
        };

        self.listeners.notify(&event);
        result
    }
}

impl fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshots = self.read();
        f.debug_struct("ProductStore")
            .field("cart_lines", &snapshots.cart.len())
            .field("wishlist_entries", &snapshots.wishlist.len())
            .field("storage", &self.storage)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn count_units(lines: &[CartLine]) -> u64 {
    lines.iter().map(|l| u64::from(l.quantity.get())).sum()
}

/// Collapse lines for the same product into the first one, summing quantities.
fn merge_duplicate_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let total = lines.len();
    let mut merged: Vec<CartLine> = Vec::with_capacity(total);
    for line in lines {
        match merged.iter_mut().find(|m| m.product.id == line.product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }

    if merged.len() != total {
        tracing::warn!(
            before = total,
            after = merged.len(),
            "Merged duplicate cart lines from storage"
        );
    }
    merged
}

/// Keep the first entry for each product id.
fn dedup_products(products: Vec<Product>) -> Vec<Product> {
    let total = products.len();
    let mut unique: Vec<Product> = Vec::with_capacity(total);
    for product in products {
        if !unique.iter().any(|p| p.id == product.id) {
            unique.push(product);
        }
    }

    if unique.len() != total {
        tracing::warn!(
            before = total,
            after = unique.len(),
            "Dropped duplicate wishlist entries from storage"
        );
    }
    unique
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::{FileStorage, keys};

    fn product(id: u32, name: &str, price: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_major(price),
            category: "Business".to_string(),
            image: format!("/assets/{id}.jpg"),
            description: String::new(),
            specifications: None,
            details: None,
        }
    }

    fn gown() -> Product {
        product(1, "Silk Evening Gown", 599)
    }

    fn sweater() -> Product {
        product(2, "Cashmere Sweater", 299)
    }

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn ids(lines: &[CartLine]) -> Vec<u32> {
        lines.iter().map(|l| l.product.id.as_u32()).collect()
    }

    #[test]
    fn test_repeated_adds_accumulate_on_one_line() {
        let store = ProductStore::in_memory();

        assert_eq!(
            store.add_to_cart(&gown(), qty(1)),
            CartChange::Added { quantity: qty(1) }
        );
        assert_eq!(
            store.add_to_cart(&gown(), qty(2)),
            CartChange::Increased { quantity: qty(3) }
        );
        let _ = store.add_to_cart(&gown(), qty(4));

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart_count(), 7);
    }

    #[test]
    fn test_update_quantity_to_zero_or_negative_removes_line() {
        let store = ProductStore::in_memory();
        let _ = store.add_to_cart(&gown(), qty(2));
        let _ = store.add_to_cart(&sweater(), qty(1));

        assert!(matches!(
            store.update_quantity(gown().id, 0),
            QuantityChange::Removed(line) if line.quantity == qty(2)
        ));
        assert!(matches!(
            store.update_quantity(sweater().id, -5),
            QuantityChange::Removed(_)
        ));
        assert!(store.cart().is_empty());
        assert_eq!(store.update_quantity(gown().id, -1), QuantityChange::NotInCart);
    }

    #[test]
    fn test_update_quantity_replaces_instead_of_incrementing() {
        let store = ProductStore::in_memory();
        let _ = store.add_to_cart(&gown(), qty(5));

        assert_eq!(
            store.update_quantity(gown().id, 2),
            QuantityChange::Updated {
                previous: qty(5),
                quantity: qty(2)
            }
        );
        assert_eq!(store.cart_line(gown().id).unwrap().quantity, qty(2));
    }

    #[test]
    fn test_update_quantity_for_absent_product_is_noop() {
        let store = ProductStore::in_memory();
        let _ = store.add_to_cart(&gown(), qty(1));

        assert_eq!(store.update_quantity(sweater().id, 3), QuantityChange::NotInCart);
        assert_eq!(ids(&store.cart()), vec![1]);
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let store = ProductStore::in_memory();
        let _ = store.add_to_cart(&gown(), qty(1));
        let before = store.cart();

        assert_eq!(store.remove_from_cart(sweater().id), None);

        let after = store.cart();
        assert_eq!(before, after);
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn test_duplicate_wishlist_add_is_rejected() {
        let store = ProductStore::in_memory();

        assert_eq!(store.add_to_wishlist(&gown()), WishlistChange::Added);
        assert_eq!(
            store.add_to_wishlist(&gown()),
            WishlistChange::AlreadyPresent
        );
        assert_eq!(store.wishlist_count(), 1);
    }

    #[test]
    fn test_cart_total() {
        let store = ProductStore::in_memory();
        assert_eq!(store.cart_total(), Price::ZERO);

        let _ = store.add_to_cart(&gown(), qty(2));
        let _ = store.add_to_cart(&sweater(), qty(1));

        assert_eq!(store.cart_total(), Price::from_major(1497));
    }

    #[test]
    fn test_cart_total_stays_exact_after_many_updates() {
        let store = ProductStore::in_memory();
        let mut pocket_square = product(7, "Pocket Square", 0);
        pocket_square.price = Price::from_cents(10);

        for _ in 0..1000 {
            let _ = store.add_to_cart(&pocket_square, Quantity::ONE);
        }

        assert_eq!(store.cart_total(), Price::from_major(100));
    }

    #[test]
    fn test_add_update_remove_scenario() {
        let store = ProductStore::in_memory();

        let _ = store.add_to_cart(&gown(), qty(1));
        let _ = store.add_to_cart(&gown(), qty(2));
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart_line(gown().id).unwrap().quantity, qty(3));

        let _ = store.update_quantity(gown().id, 1);
        assert_eq!(store.cart_line(gown().id).unwrap().quantity, qty(1));

        assert!(store.remove_from_cart(gown().id).is_some());
        assert!(store.cart().is_empty());
        assert_eq!(store.cart_count(), 0);
    }

    #[test]
    fn test_round_trip_through_storage_preserves_order() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = ProductStore::hydrate(Arc::clone(&storage));
        let _ = store.add_to_cart(&sweater(), qty(2));
        let _ = store.add_to_cart(&product(3, "Leather Jacket", 499), qty(1));
        let _ = store.add_to_cart(&gown(), qty(4));
        let _ = store.add_to_wishlist(&product(6, "Wool Coat", 899));
        let _ = store.add_to_wishlist(&gown());

        let fresh = ProductStore::hydrate(storage);

        assert_eq!(fresh.cart(), store.cart());
        assert_eq!(ids(&fresh.cart()), vec![2, 3, 1]);
        assert_eq!(fresh.wishlist(), store.wishlist());
    }

    #[test]
    fn test_hydrate_tolerates_corrupt_storage() {
        let storage = MemoryStorage::new();
        storage.set(keys::CART, "this is not json").unwrap();
        storage.set(keys::WISHLIST, "[{\"id\": \"nope\"}]").unwrap();

        let store = ProductStore::hydrate(Arc::new(storage));

        assert!(store.cart().is_empty());
        assert!(store.wishlist().is_empty());
    }

    #[test]
    fn test_hydrate_merges_duplicate_lines() {
        let storage = MemoryStorage::new();
        let lines = vec![
            CartLine::new(gown(), qty(1)),
            CartLine::new(sweater(), qty(1)),
            CartLine::new(gown(), qty(2)),
        ];
        storage
            .set(keys::CART, &serde_json::to_string(&lines).unwrap())
            .unwrap();
        storage
            .set(
                keys::WISHLIST,
                &serde_json::to_string(&[sweater(), sweater()]).unwrap(),
            )
            .unwrap();

        let store = ProductStore::hydrate(Arc::new(storage));

        assert_eq!(ids(&store.cart()), vec![1, 2]);
        assert_eq!(store.cart_line(gown().id).unwrap().quantity, qty(3));
        assert_eq!(store.wishlist_count(), 1);
    }

    #[test]
    fn test_listeners_fire_after_each_change() {
        let store = ProductStore::in_memory();
        let events = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&events);
        let _subscription = store.subscribe(move |event| {
            seen.lock().unwrap().push(*event);
        });

        let _ = store.add_to_cart(&gown(), qty(1));
        let _ = store.add_to_wishlist(&sweater());
        let _ = store.remove_from_wishlist(sweater().id);

        let events = events.lock().unwrap();
        assert_eq!(
            events
                .iter()
                .map(|event| event.collection)
                .collect::<Vec<_>>(),
            vec![Collection::Cart, Collection::Wishlist, Collection::Wishlist]
        );
        assert!(events.iter().all(|event| event.persisted));
    }

    #[test]
    fn test_noop_mutations_do_not_notify() {
        let store = ProductStore::in_memory();
        let _ = store.add_to_wishlist(&gown());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _subscription = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(store.remove_from_cart(gown().id), None);
        assert_eq!(store.remove_from_wishlist(sweater().id), None);
        assert_eq!(
            store.add_to_wishlist(&gown()),
            WishlistChange::AlreadyPresent
        );
        assert!(store.clear_cart().is_empty());

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_can_read_snapshot_during_notification() {
        let store = Arc::new(ProductStore::in_memory());
        let observed = Arc::new(AtomicUsize::new(0));

        let reader = Arc::clone(&store);
        let sink = Arc::clone(&observed);
        let _subscription = store.subscribe(move |_| {
            let count = usize::try_from(reader.cart_count()).unwrap();
            sink.store(count, Ordering::SeqCst);
        });

        let _ = store.add_to_cart(&gown(), qty(3));

        assert_eq!(observed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe_removes_listener() {
        let store = ProductStore::in_memory();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.listener_count(), 1);

        subscription.unsubscribe();
        let _ = store.add_to_cart(&gown(), qty(1));

        assert_eq!(store.listener_count(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_storage_failure_keeps_in_memory_state() {
        let storage = Arc::new(MemoryStorage::with_quota(0));
        let store = ProductStore::hydrate(storage.clone());

        let persisted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&persisted);
        let _subscription = store.subscribe(move |event| {
            sink.lock().unwrap().push(event.persisted);
        });

        let _ = store.add_to_cart(&gown(), qty(2));

        assert_eq!(store.cart_count(), 2);
        assert_eq!(*persisted.lock().unwrap(), vec![false]);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_detached_store_is_empty_and_memory_only() {
        let store = ProductStore::detached();
        assert!(!store.has_storage());
        assert!(store.cart().is_empty());
        assert!(store.wishlist().is_empty());
        assert_eq!(store.summary(), StoreSummary::default());

        let persisted = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&persisted);
        let _subscription = store.subscribe(move |event| {
            *sink.lock().unwrap() = Some(event.persisted);
        });

        let _ = store.add_to_wishlist(&gown());
        assert_eq!(store.wishlist_count(), 1);
        assert_eq!(*persisted.lock().unwrap(), Some(false));
    }

    #[test]
    fn test_move_to_cart_keeps_wishlist_entry() {
        let store = ProductStore::in_memory();
        let _ = store.add_to_wishlist(&sweater());

        assert_eq!(
            store.move_to_cart(sweater().id),
            Some(CartChange::Added {
                quantity: Quantity::ONE
            })
        );
        assert_eq!(
            store.move_to_cart(sweater().id),
            Some(CartChange::Increased { quantity: qty(2) })
        );
        assert!(store.is_in_wishlist(sweater().id));
        assert!(store.is_in_cart(sweater().id));
        assert_eq!(store.move_to_cart(gown().id), None);
    }

    #[test]
    fn test_summary_and_clear_cart() {
        let store = ProductStore::in_memory();
        let _ = store.add_to_cart(&gown(), qty(2));
        let _ = store.add_to_cart(&sweater(), qty(1));
        let _ = store.add_to_wishlist(&gown());

        assert_eq!(
            store.summary(),
            StoreSummary {
                cart_count: 3,
                cart_total: Price::from_major(1497),
                wishlist_count: 1,
            }
        );

        let cleared = store.clear_cart();
        assert_eq!(cleared.len(), 2);
        assert_eq!(cleared[0].product.id, gown().id);
        assert_eq!(store.cart_count(), 0);
        assert_eq!(store.wishlist_count(), 1);
    }

    #[test]
    fn test_emptied_collections_are_removed_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ProductStore::hydrate(storage.clone());
        let _ = store.add_to_cart(&gown(), qty(1));
        let _ = store.add_to_cart(&sweater(), qty(1));
        let _ = store.add_to_wishlist(&gown());
        assert!(storage.get(keys::CART).unwrap().is_some());

        let _ = store.clear_cart();
        assert_eq!(storage.get(keys::CART).unwrap(), None);

        let _ = store.remove_from_wishlist(gown().id);
        assert_eq!(storage.get(keys::WISHLIST).unwrap(), None);
        assert!(storage.is_empty());

        let fresh = ProductStore::hydrate(storage);
        assert!(fresh.cart().is_empty());
        assert!(fresh.wishlist().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_file_backed_store_inside_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.path()));
        let store = ProductStore::hydrate(Arc::clone(&storage));

        let _ = store.add_to_cart(&gown(), qty(2));
        let _ = store.add_to_wishlist(&sweater());

        let fresh = ProductStore::hydrate(storage);
        assert_eq!(fresh.cart_count(), 2);
        assert!(fresh.is_in_wishlist(sweater().id));
    }

    #[test]
    fn test_snapshot_is_stable_after_later_mutations() {
        let store = ProductStore::in_memory();
        let _ = store.add_to_cart(&gown(), qty(1));
        let snapshot = store.cart();

        let _ = store.add_to_cart(&sweater(), qty(1));

        assert_eq!(ids(&snapshot), vec![1]);
        assert_eq!(ids(&store.cart()), vec![1, 2]);
    }
}
