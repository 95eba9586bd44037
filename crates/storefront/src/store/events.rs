//! Change notification for the product store.
//!
//! Listeners are plain closures. Registering one returns a [`Subscription`]
//! guard; dropping the guard removes the listener from the registry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Which persisted collection changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Cart,
    Wishlist,
}

impl Collection {
    /// Storage key the collection is persisted under.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Cart => crate::storage::keys::CART,
            Self::Wishlist => crate::storage::keys::WISHLIST,
        }
    }
}

/// Delivered to every listener after a mutation has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreEvent {
    /// The collection whose snapshot was replaced.
    pub collection: Collection,
    /// False when the new snapshot could not be written to storage (or the
    /// store has no storage). The in-memory snapshot is updated either way.
    pub persisted: bool,
}

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Registry of listeners keyed by a monotonically increasing id.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener)>>,
}

impl Listeners {
    pub(crate) fn add(self: &Arc<Self>, listener: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));

        Subscription {
            id,
            listeners: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(entry_id, _)| *entry_id != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Call every listener registered at the time of the call.
    ///
    /// The registry lock is released before any listener runs, so a listener
    /// may subscribe, unsubscribe, or read store snapshots.
    pub(crate) fn notify(&self, event: &StoreEvent) {
        let current: Vec<Listener> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in current {
            listener(event);
        }
    }
}

/// Handle for a registered listener.
///
/// The listener stays registered until this guard is dropped or
/// [`unsubscribe`](Self::unsubscribe) is called.
#[must_use = "dropping a Subscription immediately unregisters the listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep the listener registered for the rest of the store's lifetime.
    pub fn detach(mut self) {
        self.listeners = Weak::new();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &(self.listeners.strong_count() > 0))
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}
