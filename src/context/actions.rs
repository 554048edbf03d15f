use std::fmt;

use crate::context::ModelStore;

/// Mutation operations bound to one specific store.
///
/// Resolving a store through the scope registry is only valid during
/// component initialization. An `Actions` handle is the sanctioned way out:
/// obtain it once during setup with
/// [`ModelContext::bind_actions`](crate::ModelContext::bind_actions), then
/// call it from anywhere — an event handler, another thread — for the rest of
/// the component's life. The handle stays bound to the store it resolved at
/// bind time, even if later registrations shadow it.
pub struct Actions<T> {
    store: ModelStore<T>,
}

impl<T: Clone + Send + Sync + 'static> Actions<T> {
    pub(crate) fn bound(store: ModelStore<T>) -> Self {
        Self { store }
    }

    /// Replace the bound store's model and notify subscribers.
    pub fn set(&self, value: impl Into<Option<T>>) {
        self.store.set(value.into());
    }

    /// Mutate the bound store's model in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut Option<T>)) {
        self.store.update(f);
    }

    /// Get a clone of the bound store's current model.
    pub fn get(&self) -> Option<T> {
        self.store.get()
    }

    /// The store this handle was bound to.
    pub fn store(&self) -> &ModelStore<T> {
        &self.store
    }
}

impl<T> Clone for Actions<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + fmt::Debug + 'static> fmt::Debug for Actions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actions").field("store", &self.store).finish()
    }
}
