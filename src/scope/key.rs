use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_KEY: AtomicU64 = AtomicU64::new(0);

/// A process-unique typed key for scope bindings.
///
/// The value type is phantom: a key only identifies a slot, it holds no data.
/// Because keys can only be minted through [`ContextKey::unique`], a lookup
/// with a `ContextKey<V>` always finds a value of type `V` (or nothing).
///
/// Keys are `Copy` and cheap to pass around regardless of `V`.
pub struct ContextKey<V> {
    id: u64,
    _value: PhantomData<fn() -> V>,
}

impl<V> ContextKey<V> {
    /// Mint a fresh key, distinct from every key minted before it.
    pub fn unique() -> Self {
        Self {
            id: NEXT_KEY.fetch_add(1, Ordering::Relaxed),
            _value: PhantomData,
        }
    }

    /// The key's numeric identity, for diagnostics.
    pub fn id(&self) -> u64 {
        self.id
    }
}

// Manual impls: derives would bound them on `V`, but the phantom type
// imposes no such requirement.
impl<V> Clone for ContextKey<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for ContextKey<V> {}

impl<V> PartialEq for ContextKey<V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<V> Eq for ContextKey<V> {}

impl<V> Hash for ContextKey<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<V> fmt::Debug for ContextKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextKey").field(&self.id).finish()
    }
}
