use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

type Listener<V> = Arc<dyn Fn(&V) + Send + Sync>;

struct Shared<V> {
    value: RwLock<V>,
    // Insertion order is notification order.
    listeners: RwLock<Vec<(u64, Listener<V>)>>,
    next_listener: AtomicU64,
}

/// A mutable observable cell.
///
/// A `Store` holds a single value and notifies its subscribers synchronously,
/// in subscription order, every time the value is written. Cloning a `Store`
/// clones the handle, not the value: all clones share the same cell.
///
/// Subscribers are notified on writes only. A listener attached with
/// [`subscribe`](Store::subscribe) therefore observes exactly the sequence of
/// values written after it attached, one call per write.
///
/// # Examples
///
/// ```
/// use modelcell::Store;
///
/// let store = Store::new(1);
/// store.update(|n| *n += 1);
/// assert_eq!(store.get(), 2);
/// ```
pub struct Store<V> {
    shared: Arc<Shared<V>>,
}

impl<V: Clone + Send + Sync + 'static> Store<V> {
    /// Create a new store with the given initial value.
    pub fn new(initial: V) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: RwLock::new(initial),
                listeners: RwLock::new(Vec::new()),
                next_listener: AtomicU64::new(0),
            }),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> V {
        self.shared.value.read().clone()
    }

    /// Read the current value through a closure without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.shared.value.read())
    }

    /// Replace the value and notify every subscriber.
    pub fn set(&self, value: V) {
        let snapshot = {
            let mut slot = self.shared.value.write();
            *slot = value;
            slot.clone()
        };
        self.notify(&snapshot);
    }

    /// Mutate the value in place and notify every subscriber.
    pub fn update(&self, f: impl FnOnce(&mut V)) {
        let snapshot = {
            let mut slot = self.shared.value.write();
            f(&mut slot);
            slot.clone()
        };
        self.notify(&snapshot);
    }

    /// Replace the value only if it differs from the current one.
    ///
    /// Returns `true` if the store was written (and subscribers notified).
    /// Equal values produce no notification pass at all.
    pub fn set_if_changed(&self, value: V) -> bool
    where
        V: PartialEq,
    {
        let snapshot = {
            let mut slot = self.shared.value.write();
            if *slot == value {
                return false;
            }
            *slot = value;
            slot.clone()
        };
        self.notify(&snapshot);
        true
    }

    /// Subscribe to value changes.
    ///
    /// The listener runs synchronously on every write, with the value that
    /// write produced. It is not invoked at subscribe time; use
    /// [`get`](Store::get) or [`read`](Store::read) for the current value.
    ///
    /// The returned [`Subscription`] detaches the listener when dropped.
    pub fn subscribe(&self, listener: impl Fn(&V) + Send + Sync + 'static) -> Subscription {
        let id = self.shared.next_listener.fetch_add(1, Ordering::Relaxed);
        self.shared.listeners.write().push((id, Arc::new(listener)));

        // The guard holds only a weak handle so it never keeps the cell alive.
        let shared: Weak<Shared<V>> = Arc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.listeners.write().retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.listeners.read().len()
    }

    /// Notify all subscribers with the value a write produced.
    ///
    /// The listener list is snapshotted first and no lock is held during the
    /// calls, so listeners may freely read, write, or subscribe re-entrantly.
    fn notify(&self, value: &V) {
        let listeners: Vec<Listener<V>> = self
            .shared
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(value);
        }
    }
}

impl<V: Clone + Send + Sync + Default + 'static> Default for Store<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V> Clone for Store<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Handle identity: two stores are equal when they share the same cell,
/// regardless of the current value.
impl<V> PartialEq for Store<V> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<V> Eq for Store<V> {}

impl<V: Clone + Send + Sync + fmt::Debug + 'static> fmt::Debug for Store<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &*self.shared.value.read())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// RAII guard for a store subscription.
///
/// Dropping the guard detaches the listener. Call
/// [`detach`](Subscription::detach) to keep the listener attached for the
/// lifetime of its store instead.
#[must_use = "dropping a Subscription immediately detaches its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Detach the listener now. Equivalent to dropping the guard.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Consume the guard, leaving the listener attached until its store is
    /// dropped.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq)]
    struct AppState {
        count: usize,
        name: String,
    }

    #[test]
    fn store_get_set() {
        let store = Store::new(AppState {
            count: 0,
            name: "test".to_string(),
        });

        assert_eq!(store.get().count, 0);

        store.set(AppState {
            count: 42,
            name: "updated".to_string(),
        });

        assert_eq!(store.get().count, 42);
        assert_eq!(store.get().name, "updated");
    }

    #[test]
    fn store_update_in_place() {
        let store = Store::new(AppState {
            count: 0,
            name: "test".to_string(),
        });

        store.update(|state| {
            state.count += 10;
        });

        assert_eq!(store.get().count, 10);
    }

    #[test]
    fn store_read_without_clone() {
        let store = Store::new(AppState {
            count: 3,
            name: "test".to_string(),
        });

        let len = store.read(|state| state.name.len());
        assert_eq!(len, 4);
    }

    #[test]
    fn subscriber_sees_every_write_in_order() {
        let store = Store::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _sub = store.subscribe({
            let seen = seen.clone();
            move |value| seen.lock().push(*value)
        });

        store.set(1);
        store.set(2);
        store.update(|n| *n += 1);

        assert_eq!(*seen.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn subscriber_not_called_at_subscribe_time() {
        let store = Store::new(7);
        let calls = Arc::new(AtomicUsize::new(0));

        let _sub = store.subscribe({
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        store.set(8);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn notification_follows_subscription_order() {
        let store = Store::new(0);
        let order = Arc::new(Mutex::new(Vec::new()));

        let _first = store.subscribe({
            let order = order.clone();
            move |_| order.lock().push("first")
        });
        let _second = store.subscribe({
            let order = order.clone();
            move |_| order.lock().push("second")
        });

        store.set(1);
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn dropping_subscription_detaches_listener() {
        let store = Store::new(0);
        let calls = Arc::new(AtomicUsize::new(0));

        let sub = store.subscribe({
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });

        store.set(1);
        assert_eq!(store.subscriber_count(), 1);
        drop(sub);
        assert_eq!(store.subscriber_count(), 0);

        store.set(2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn detached_subscription_keeps_listening() {
        let store = Store::new(0);
        let calls = Arc::new(AtomicUsize::new(0));

        store
            .subscribe({
                let calls = calls.clone();
                move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                }
            })
            .detach();

        store.set(1);
        store.set(2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn set_if_changed_skips_equal_values() {
        let store = Store::new(5);
        let calls = Arc::new(AtomicUsize::new(0));

        let _sub = store.subscribe({
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert!(!store.set_if_changed(5));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(store.set_if_changed(6));
        assert_eq!(store.get(), 6);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_may_reenter_the_store() {
        let store = Store::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _sub = store.subscribe({
            let store = store.clone();
            let seen = seen.clone();
            move |value| seen.lock().push((*value, store.get()))
        });

        store.set(2);
        assert_eq!(*seen.lock(), vec![(2, 2)]);
    }

    #[test]
    fn clones_share_the_cell() {
        let store = Store::new(0);
        let other = store.clone();

        other.set(9);
        assert_eq!(store.get(), 9);
        assert_eq!(store, other);
        assert_ne!(store, Store::new(9));
    }

    #[test]
    fn subscription_outliving_store_is_harmless() {
        let store = Store::new(0);
        let sub = store.subscribe(|_| {});
        drop(store);
        drop(sub);
    }
}
